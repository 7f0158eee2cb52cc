// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Video frame decoding.
//!
//! Decoding is optional. Built with the `video-opencv` feature, frames are
//! pulled from the file at the playback clock's position. Without it,
//! opening a source fails and the viewer falls back to showing progress.

use super::media::LoadedImage;
use crate::models::playback::Playback;
use anyhow::Result;
use std::path::Path;
use std::time::Duration;

#[cfg(feature = "video-opencv")]
mod decoder {
    use super::LoadedImage;
    use anyhow::{bail, Result};
    use opencv::{core::Mat, imgproc, prelude::*, videoio};
    use std::path::Path;
    use std::time::Duration;

    pub struct Decoder {
        capture: videoio::VideoCapture,
        fps: f64,
        frame_count: f64,
        next_index: i64,
    }

    impl Decoder {
        pub fn open(path: &Path) -> Result<Self> {
            let capture =
                videoio::VideoCapture::from_file(&path.to_string_lossy(), videoio::CAP_ANY)?;
            if !capture.is_opened()? {
                bail!("Could not open video {}", path.display());
            }
            let fps = capture.get(videoio::CAP_PROP_FPS)?;
            let frame_count = capture.get(videoio::CAP_PROP_FRAME_COUNT)?;
            Ok(Self {
                capture,
                fps,
                frame_count,
                next_index: 0,
            })
        }

        pub fn duration(&self) -> Option<Duration> {
            if self.fps > 0.0 && self.frame_count > 0.0 {
                Some(Duration::from_secs_f64(self.frame_count / self.fps))
            } else {
                None
            }
        }

        pub fn frame_at(&mut self, position: Duration) -> Result<Option<LoadedImage>> {
            if self.fps <= 0.0 {
                return Ok(None);
            }
            let target = (position.as_secs_f64() * self.fps) as i64;
            if target < self.next_index - 1 || target > self.next_index + 30 {
                self.capture
                    .set(videoio::CAP_PROP_POS_FRAMES, target as f64)?;
                self.next_index = target;
            } else if target == self.next_index - 1 {
                // Already showing this frame.
                return Ok(None);
            }

            let mut frame = Mat::default();
            while self.next_index <= target {
                if !self.capture.read(&mut frame)? {
                    return Ok(None);
                }
                self.next_index += 1;
            }
            if frame.empty() {
                return Ok(None);
            }

            let mut rgba = Mat::default();
            imgproc::cvt_color(&frame, &mut rgba, imgproc::COLOR_BGR2RGBA, 0)?;
            let size = rgba.size()?;
            Ok(Some(LoadedImage {
                width: size.width as u32,
                height: size.height as u32,
                pixels: rgba.data_bytes()?.to_vec(),
            }))
        }
    }
}

#[cfg(not(feature = "video-opencv"))]
mod decoder {
    use super::LoadedImage;
    use anyhow::{bail, Result};
    use std::path::Path;
    use std::time::Duration;

    pub struct Decoder;

    impl Decoder {
        pub fn open(path: &Path) -> Result<Self> {
            bail!(
                "Built without video decoding (enable `video-opencv`) for {}",
                path.display()
            )
        }

        pub fn duration(&self) -> Option<Duration> {
            None
        }

        pub fn frame_at(&mut self, _position: Duration) -> Result<Option<LoadedImage>> {
            Ok(None)
        }
    }
}

/// An open video file.
pub struct FrameSource {
    decoder: decoder::Decoder,
}

impl FrameSource {
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self {
            decoder: decoder::Decoder::open(path)?,
        })
    }

    /// Duration reported by the container, when known.
    pub fn duration(&self) -> Option<Duration> {
        self.decoder.duration()
    }

    /// Frame at `position`, or `None` when the visible frame is unchanged.
    pub fn frame_at(&mut self, position: Duration) -> Result<Option<LoadedImage>> {
        self.decoder.frame_at(position)
    }
}

/// What a video surface can show right now.
pub enum SurfaceView<'a> {
    Frame(&'a egui::TextureHandle),
    Unavailable(&'a str),
}

/// Texture-backed display for one playback slot.
pub struct VideoSurface {
    name: &'static str,
    source: Option<String>,
    frames: Option<FrameSource>,
    texture: Option<egui::TextureHandle>,
    note: String,
}

impl VideoSurface {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            source: None,
            frames: None,
            texture: None,
            note: String::new(),
        }
    }

    /// Follow `playback`, reopening when its source changes.
    ///
    /// Returns the duration probed from a newly opened file, so the caller
    /// can correct a playback that started with the default duration.
    pub fn sync(
        &mut self,
        ctx: &egui::Context,
        root: &Path,
        playback: Option<&Playback>,
    ) -> Option<Duration> {
        let Some(playback) = playback else {
            self.unload();
            return None;
        };

        let mut probed = None;
        if self.source.as_deref() != Some(playback.source()) {
            self.unload();
            self.source = Some(playback.source().to_string());
            match super::media::resolve_source(root, playback.source())
                .and_then(|path| FrameSource::open(&path))
            {
                Ok(frames) => {
                    probed = frames.duration();
                    self.frames = Some(frames);
                }
                Err(e) => {
                    log::warn!("{} video unavailable: {:#}", self.name, e);
                    self.note = format!("{:#}", e);
                }
            }
        }

        if let Some(frames) = self.frames.as_mut() {
            match frames.frame_at(playback.position()) {
                Ok(Some(frame)) => {
                    let size = [frame.width as usize, frame.height as usize];
                    let image = egui::ColorImage::from_rgba_unmultiplied(size, &frame.pixels);
                    match self.texture.as_mut() {
                        Some(texture) => texture.set(image, egui::TextureOptions::LINEAR),
                        None => {
                            let options = egui::TextureOptions::LINEAR;
                            self.texture = Some(ctx.load_texture(self.name, image, options));
                        }
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    log::error!("{} video decode failed: {:#}", self.name, e);
                    self.note = format!("{:#}", e);
                    self.frames = None;
                }
            }
        }

        probed
    }

    pub fn view(&self) -> SurfaceView<'_> {
        match &self.texture {
            Some(texture) => SurfaceView::Frame(texture),
            None => SurfaceView::Unavailable(&self.note),
        }
    }

    fn unload(&mut self) {
        self.source = None;
        self.frames = None;
        self.texture = None;
        self.note.clear();
    }
}

#[cfg(all(test, not(feature = "video-opencv")))]
mod tests {
    use super::*;

    #[test]
    fn test_open_reports_missing_decoder() {
        let err = FrameSource::open(Path::new("videos/a.mp4")).err().unwrap();
        assert!(err.to_string().contains("video-opencv"));
    }
}
