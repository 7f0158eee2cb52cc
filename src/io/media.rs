// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Media file loading.
//!
//! This module handles loading tour images on background threads and
//! converting them to textures for display in egui. A source that fails
//! to load keeps its error so the viewer can show it and offer a retry.

use anyhow::{bail, Context, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};

/// Decoded RGBA image.
pub struct LoadedImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Load an image file and convert it to RGBA8.
pub fn load_image(path: &Path) -> Result<LoadedImage> {
    let img = image::open(path)
        .with_context(|| format!("Failed to open image {}", path.display()))?
        .to_rgba8();
    let (width, height) = img.dimensions();
    Ok(LoadedImage {
        width,
        height,
        pixels: img.into_raw(),
    })
}

/// Resolve a media source against the asset root.
///
/// Remote sources are refused; the tour only reads local files.
pub fn resolve_source(root: &Path, source: &str) -> Result<PathBuf> {
    if source.starts_with("http://") || source.starts_with("https://") {
        bail!("Remote media is not supported: {}", source);
    }
    let path = Path::new(source.trim_start_matches('/'));
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(root.join(path))
    }
}

/// Load state of one media source.
pub enum MediaSlot {
    Loading,
    Ready {
        texture: egui::TextureHandle,
        size: [u32; 2],
    },
    Failed(String),
}

/// Image textures keyed by tour source string.
pub struct MediaCache {
    root: PathBuf,
    slots: HashMap<String, MediaSlot>,
    loaders: Vec<(String, Receiver<Result<LoadedImage, String>>)>,
}

impl MediaCache {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            slots: HashMap::new(),
            loaders: Vec::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Current state of `source`, starting a background load on first use.
    pub fn request(&mut self, source: &str) -> &MediaSlot {
        if !self.slots.contains_key(source) {
            self.spawn_load(source);
        }
        self.slots.entry(source.to_string()).or_insert(MediaSlot::Loading)
    }

    /// Forget a failed source so the next request loads it again.
    pub fn retry(&mut self, source: &str) {
        if matches!(self.slots.get(source), Some(MediaSlot::Failed(_))) {
            log::info!("Retrying media {}", source);
            self.slots.remove(source);
        }
    }

    /// Drop everything, e.g. after a new tour is opened.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.loaders.clear();
    }

    fn spawn_load(&mut self, source: &str) {
        let path = match resolve_source(&self.root, source) {
            Ok(path) => path,
            Err(e) => {
                log::warn!("{}", e);
                self.slots.insert(source.to_string(), MediaSlot::Failed(e.to_string()));
                return;
            }
        };

        let (sender, receiver) = channel();
        self.loaders.push((source.to_string(), receiver));
        self.slots.insert(source.to_string(), MediaSlot::Loading);

        // Spawn background thread for loading
        std::thread::spawn(move || {
            let result = load_image(&path).map_err(|e| format!("{:#}", e));
            let _ = sender.send(result);
        });
    }

    /// Turn finished background loads into textures.
    pub fn poll(&mut self, ctx: &egui::Context) {
        let mut finished = Vec::new();
        for (index, (source, receiver)) in self.loaders.iter().enumerate() {
            if let Ok(result) = receiver.try_recv() {
                finished.push(index);
                let slot = match result {
                    Ok(loaded) => {
                        let size = [loaded.width as usize, loaded.height as usize];
                        let color_image =
                            egui::ColorImage::from_rgba_unmultiplied(size, &loaded.pixels);
                        let texture = ctx.load_texture(
                            source.as_str(),
                            color_image,
                            egui::TextureOptions::LINEAR,
                        );
                        log::info!("Loaded media {} ({}x{})", source, loaded.width, loaded.height);
                        MediaSlot::Ready {
                            texture,
                            size: [loaded.width, loaded.height],
                        }
                    }
                    Err(e) => {
                        log::error!("Failed to load media {}: {}", source, e);
                        MediaSlot::Failed(e)
                    }
                };
                self.slots.insert(source.clone(), slot);
            }
        }

        for index in finished.into_iter().rev() {
            self.loaders.remove(index);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_relative_and_rooted_sources() {
        let root = Path::new("assets");
        assert_eq!(
            resolve_source(root, "images/village.png").unwrap(),
            PathBuf::from("assets/images/village.png")
        );
        // Web-style rooted paths resolve inside the asset root.
        assert_eq!(
            resolve_source(root, "/images/village.png").unwrap(),
            PathBuf::from("assets/images/village.png")
        );
    }

    #[test]
    fn test_remote_sources_are_refused() {
        let err = resolve_source(Path::new("assets"), "https://example.com/v.mp4").unwrap_err();
        assert!(err.to_string().contains("not supported"));
    }

    #[test]
    fn test_missing_file_reports_error() {
        let err = load_image(Path::new("definitely/not/here.png")).err().unwrap();
        assert!(err.to_string().contains("Failed to open image"));
    }

    #[test]
    fn test_remote_request_fails_without_loading() {
        let mut cache = MediaCache::new(PathBuf::from("assets"));
        assert!(matches!(cache.request("http://example.com/a.png"), MediaSlot::Failed(_)));
        assert!(cache.loaders.is_empty());

        cache.retry("http://example.com/a.png");
        assert!(matches!(cache.request("http://example.com/a.png"), MediaSlot::Failed(_)));
    }

    #[test]
    fn test_decodes_png_from_disk() {
        let path = std::env::temp_dir()
            .join(format!("gingerbread-media-{}.png", std::process::id()));
        image::RgbaImage::from_pixel(3, 2, image::Rgba([200, 10, 10, 255]))
            .save(&path)
            .unwrap();

        let loaded = load_image(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!((loaded.width, loaded.height), (3, 2));
        assert_eq!(loaded.pixels.len(), 3 * 2 * 4);
        assert_eq!(&loaded.pixels[..4], &[200, 10, 10, 255]);
    }
}
