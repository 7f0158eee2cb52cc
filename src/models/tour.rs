// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Zoom tour data structures.
//!
//! A tour is a fixed graph of levels keyed by identifier. Each level shows
//! an image or a video and may carry hotspots that lead to other levels,
//! optionally through a transition video.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::time::Duration;

/// Identifier of a level inside a tour.
pub type LevelId = String;

/// Errors found while validating a tour.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum TourError {
    #[error("root level `{0}` is not defined")]
    UnknownRoot(LevelId),

    #[error("hotspot `{hotspot}` on level `{level}` targets undefined level `{target}`")]
    DanglingTarget {
        level: LevelId,
        hotspot: String,
        target: LevelId,
    },

    #[error("level `{level}` has more than one hotspot with id `{hotspot}`")]
    DuplicateHotspot { level: LevelId, hotspot: String },

    #[error("hotspot `{hotspot}` on level `{level}` has an invalid region: {reason}")]
    InvalidRegion {
        level: LevelId,
        hotspot: String,
        reason: String,
    },

    #[error("level `{level}` has an empty media path")]
    EmptyMedia { level: LevelId },
}

/// A video reference with an optional known duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoRef {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

impl VideoRef {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            duration_ms: None,
        }
    }

    pub fn duration(&self) -> Option<Duration> {
        self.duration_ms.map(Duration::from_millis)
    }
}

/// What a level displays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Media {
    Image {
        path: String,
    },
    Video {
        path: String,
        #[serde(default)]
        looping: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        duration_ms: Option<u64>,
    },
}

impl Media {
    pub fn path(&self) -> &str {
        match self {
            Media::Image { path } | Media::Video { path, .. } => path,
        }
    }
}

/// Coordinate convention of a hotspot region, tagged by `kind`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Units {
    /// Percentages of the rendered media box (0 to 100).
    #[default]
    Percent,
    /// Pixels relative to a reference frame size.
    Pixels {
        reference_width: f32,
        reference_height: f32,
    },
}

/// Slack allowed on the 0..=100 percent bounds for rounding in pixel
/// conversion.
const PERCENT_EPSILON: f32 = 1e-3;

/// Rectangular hotspot region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub units: Units,
}

impl Region {
    /// Create a region in percent units.
    pub fn percent(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            units: Units::Percent,
        }
    }

    /// Convert to percent units, leaving percent regions untouched.
    pub fn to_percent(self) -> Result<Region, String> {
        match self.units {
            Units::Percent => Ok(self),
            Units::Pixels {
                reference_width,
                reference_height,
            } => {
                if reference_width <= 0.0 || reference_height <= 0.0 {
                    return Err(format!(
                        "reference size {}x{} must be positive",
                        reference_width, reference_height
                    ));
                }
                let (x, y, width, height) = crate::util::geometry::pixels_to_percent(
                    [self.x, self.y, self.width, self.height],
                    [reference_width, reference_height],
                );
                Ok(Region::percent(
                    x,
                    y,
                    flush_to_edge(x, width),
                    flush_to_edge(y, height),
                ))
            }
        }
    }

    /// Check a percent region for sane bounds.
    fn check(&self) -> Result<(), String> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(format!("size {}x{} must be positive", self.width, self.height));
        }
        let within = |v: f32| (-PERCENT_EPSILON..=100.0 + PERCENT_EPSILON).contains(&v);
        if !within(self.x)
            || !within(self.y)
            || !within(self.x + self.width)
            || !within(self.y + self.height)
        {
            return Err(format!(
                "({}, {}, {}, {}) lies outside 0..=100 percent",
                self.x, self.y, self.width, self.height
            ));
        }
        Ok(())
    }

    /// Whether a point in percent coordinates lies inside the region.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }
}

/// Snap an extent whose far edge lands a rounding error past 100 back onto it.
fn flush_to_edge(start: f32, extent: f32) -> f32 {
    let end = start + extent;
    if end > 100.0 && end <= 100.0 + PERCENT_EPSILON {
        100.0 - start
    } else {
        extent
    }
}

/// A clickable area on a level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hotspot {
    pub id: String,
    pub label: String,
    pub next_level: LevelId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition: Option<VideoRef>,
    pub region: Region,
}

/// One node of the zoom hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub title: String,
    pub media: Media,
    #[serde(default)]
    pub hotspots: Vec<Hotspot>,
}

impl Level {
    pub fn hotspot(&self, id: &str) -> Option<&Hotspot> {
        self.hotspots.iter().find(|h| h.id == id)
    }

    /// The looping video this level plays on arrival, if any.
    pub fn looping_video(&self) -> Option<&str> {
        match &self.media {
            Media::Video {
                path,
                looping: true,
                ..
            } => Some(path),
            _ => None,
        }
    }
}

/// Complete tour definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tour {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    pub root: LevelId,
    pub levels: BTreeMap<LevelId, Level>,
}

impl Tour {
    pub fn level(&self, id: &str) -> Option<&Level> {
        self.levels.get(id)
    }

    /// Check graph closure and region sanity.
    pub fn validate(&self) -> Result<(), TourError> {
        if !self.levels.contains_key(&self.root) {
            return Err(TourError::UnknownRoot(self.root.clone()));
        }

        for (level_id, level) in &self.levels {
            if level.media.path().trim().is_empty() {
                return Err(TourError::EmptyMedia {
                    level: level_id.clone(),
                });
            }

            let mut seen = HashSet::new();
            for hotspot in &level.hotspots {
                if !seen.insert(hotspot.id.as_str()) {
                    return Err(TourError::DuplicateHotspot {
                        level: level_id.clone(),
                        hotspot: hotspot.id.clone(),
                    });
                }
                if !self.levels.contains_key(&hotspot.next_level) {
                    return Err(TourError::DanglingTarget {
                        level: level_id.clone(),
                        hotspot: hotspot.id.clone(),
                        target: hotspot.next_level.clone(),
                    });
                }
                hotspot
                    .region
                    .to_percent()
                    .and_then(|r| r.check())
                    .map_err(|reason| TourError::InvalidRegion {
                        level: level_id.clone(),
                        hotspot: hotspot.id.clone(),
                        reason,
                    })?;
                if let Some(video) = &hotspot.transition {
                    if video.path.trim().is_empty() {
                        return Err(TourError::EmptyMedia {
                            level: level_id.clone(),
                        });
                    }
                }
            }
        }

        Ok(())
    }

    /// Validate and rewrite every region into percent units.
    pub fn into_validated(mut self) -> Result<Tour, TourError> {
        self.validate()?;
        for (level_id, level) in self.levels.iter_mut() {
            for hotspot in level.hotspots.iter_mut() {
                let region = hotspot.region.to_percent();
                hotspot.region = region.map_err(|reason| TourError::InvalidRegion {
                    level: level_id.clone(),
                    hotspot: hotspot.id.clone(),
                    reason,
                })?;
            }
        }
        Ok(self)
    }

    /// The built-in Gingerbread Village tour.
    pub fn village() -> Self {
        let zoom_in = "videos/zoom-in-on-mamaw-and-papaw.mp4";
        let mut levels = BTreeMap::new();

        levels.insert(
            "village".to_string(),
            Level {
                title: "The Gingerbread Village".to_string(),
                media: Media::Image {
                    path: "images/village.png".to_string(),
                },
                hotspots: vec![Hotspot {
                    id: "grandparents".to_string(),
                    label: "Visit Grandparents".to_string(),
                    next_level: "houseRow".to_string(),
                    transition: Some(VideoRef::new("videos/village-to-house-row.mp4")),
                    region: Region::percent(48.0, 20.0, 20.0, 25.0),
                }],
            },
        );
        levels.insert(
            "houseRow".to_string(),
            Level {
                title: "The House Row".to_string(),
                media: Media::Image {
                    path: "images/house-row.png".to_string(),
                },
                hotspots: vec![Hotspot {
                    id: "grandparentsClose".to_string(),
                    label: "Mamaw & Papaw".to_string(),
                    next_level: "mamawPapawMid".to_string(),
                    transition: Some(VideoRef::new("videos/house-row-to-mamaw-and-papaw.mp4")),
                    region: Region::percent(50.0, 20.0, 30.0, 35.0),
                }],
            },
        );
        levels.insert(
            "mamawPapawMid".to_string(),
            Level {
                title: "Mamaw & Papaw's House".to_string(),
                media: Media::Image {
                    path: "images/mid-frame-mamaw-and-papaw.png".to_string(),
                },
                hotspots: vec![Hotspot {
                    id: "mamawPapawFinal".to_string(),
                    label: "Get Closer".to_string(),
                    next_level: "mamawPapawFinal".to_string(),
                    transition: Some(VideoRef::new(zoom_in)),
                    region: Region::percent(35.0, 35.0, 30.0, 35.0),
                }],
            },
        );
        levels.insert(
            "mamawPapawFinal".to_string(),
            Level {
                title: "Mamaw & Papaw".to_string(),
                media: Media::Video {
                    path: zoom_in.to_string(),
                    looping: true,
                    duration_ms: None,
                },
                hotspots: Vec::new(),
            },
        );

        Self {
            title: "The Gingerbread Village".to_string(),
            subtitle: Some("Click to explore the village!".to_string()),
            root: "village".to_string(),
            levels,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_village_graph_is_closed() {
        let tour = Tour::village();
        assert!(tour.validate().is_ok());
        for level in tour.levels.values() {
            for hotspot in &level.hotspots {
                assert!(tour.level(&hotspot.next_level).is_some());
            }
        }
    }

    #[test]
    fn test_dangling_target_is_rejected() {
        let mut tour = Tour::village();
        tour.levels
            .get_mut("village")
            .unwrap()
            .hotspots[0]
            .next_level = "nowhere".to_string();

        assert_eq!(
            tour.validate(),
            Err(TourError::DanglingTarget {
                level: "village".to_string(),
                hotspot: "grandparents".to_string(),
                target: "nowhere".to_string(),
            })
        );
    }

    #[test]
    fn test_unknown_root_is_rejected() {
        let mut tour = Tour::village();
        tour.root = "attic".to_string();
        assert_eq!(tour.validate(), Err(TourError::UnknownRoot("attic".to_string())));
    }

    #[test]
    fn test_duplicate_hotspot_is_rejected() {
        let mut tour = Tour::village();
        let level = tour.levels.get_mut("village").unwrap();
        let copy = level.hotspots[0].clone();
        level.hotspots.push(copy);

        assert!(matches!(
            tour.validate(),
            Err(TourError::DuplicateHotspot { .. })
        ));
    }

    #[test]
    fn test_region_out_of_bounds_is_rejected() {
        let mut tour = Tour::village();
        tour.levels.get_mut("houseRow").unwrap().hotspots[0].region =
            Region::percent(90.0, 20.0, 30.0, 10.0);

        let err = tour.validate().unwrap_err();
        assert!(err.to_string().contains("invalid region"));
    }

    #[test]
    fn test_pixel_region_normalizes_to_percent() {
        let mut tour = Tour::village();
        tour.levels.get_mut("village").unwrap().hotspots[0].region = Region {
            x: 960.0,
            y: 270.0,
            width: 192.0,
            height: 108.0,
            units: Units::Pixels {
                reference_width: 1920.0,
                reference_height: 1080.0,
            },
        };

        let tour = tour.into_validated().unwrap();
        let region = tour.level("village").unwrap().hotspots[0].region;
        assert_eq!(region.units, Units::Percent);
        assert!((region.x - 50.0).abs() < 1e-4);
        assert!((region.y - 25.0).abs() < 1e-4);
        assert!((region.width - 10.0).abs() < 1e-4);
        assert!((region.height - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_flush_edge_pixel_regions_are_accepted() {
        for reference in [7.0_f32, 9.0, 11.0, 13.0, 333.0, 600.0, 1080.0, 1366.0, 2560.0] {
            for start in 0..(reference as u32).min(64) {
                let start = start as f32;
                let region = Region {
                    x: start,
                    y: start,
                    width: reference - start,
                    height: reference - start,
                    units: Units::Pixels {
                        reference_width: reference,
                        reference_height: reference,
                    },
                };

                let mut tour = Tour::village();
                tour.levels.get_mut("village").unwrap().hotspots[0].region = region;
                let tour = tour
                    .into_validated()
                    .unwrap_or_else(|e| panic!("{start} of {reference} rejected: {e}"));

                let region = tour.level("village").unwrap().hotspots[0].region;
                assert!(region.x + region.width <= 100.0 + 1e-4);
                assert!(region.y + region.height <= 100.0 + 1e-4);
            }
        }
    }

    #[test]
    fn test_pixel_region_with_zero_reference_is_rejected() {
        let mut tour = Tour::village();
        tour.levels.get_mut("village").unwrap().hotspots[0].region = Region {
            x: 10.0,
            y: 10.0,
            width: 10.0,
            height: 10.0,
            units: Units::Pixels {
                reference_width: 0.0,
                reference_height: 1080.0,
            },
        };
        assert!(matches!(
            tour.into_validated(),
            Err(TourError::InvalidRegion { .. })
        ));
    }

    #[test]
    fn test_final_level_loops() {
        let tour = Tour::village();
        let last = tour.level("mamawPapawFinal").unwrap();
        assert!(last.looping_video().is_some());
        assert!(last.hotspots.is_empty());
        assert!(tour.level(&tour.root).unwrap().looping_video().is_none());
    }
}
