// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! This module provides conversions between screen space, the logical
//! scene frame, and percentage-based hotspot regions.

use crate::models::tour::Region;
use egui::{Pos2, Rect, Vec2};

/// Axis-aligned rectangle in scene frame pixels with open bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameRect {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl FrameRect {
    /// Strict containment; points on the border are outside.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x > self.min_x && x < self.max_x && y > self.min_y && y < self.max_y
    }
}

/// Largest rect with the given aspect ratio centered inside `available`.
pub fn fit_rect(available: Rect, aspect: f32) -> Rect {
    let available_aspect = available.width() / available.height();

    let size = if aspect > available_aspect {
        // Content is wider - fit to width
        Vec2::new(available.width(), available.width() / aspect)
    } else {
        // Content is taller - fit to height
        Vec2::new(available.height() * aspect, available.height())
    };

    Rect::from_center_size(available.center(), size)
}

/// Convert a pixel rectangle to percentages of a reference size.
pub fn pixels_to_percent(rect: [f32; 4], reference: [f32; 2]) -> (f32, f32, f32, f32) {
    let [x, y, width, height] = rect;
    let [ref_w, ref_h] = reference;
    (
        x / ref_w * 100.0,
        y / ref_h * 100.0,
        width / ref_w * 100.0,
        height / ref_h * 100.0,
    )
}

/// Screen rectangle of a percent region inside the rendered media box.
pub fn region_to_rect(region: &Region, media: Rect) -> Rect {
    Rect::from_min_size(
        media.min + Vec2::new(region.x / 100.0 * media.width(), region.y / 100.0 * media.height()),
        Vec2::new(
            region.width / 100.0 * media.width(),
            region.height / 100.0 * media.height(),
        ),
    )
}

/// Map a screen position into logical frame pixels.
pub fn screen_to_frame(pos: Pos2, display: Rect, frame: Vec2) -> Pos2 {
    Pos2::new(
        (pos.x - display.min.x) / display.width() * frame.x,
        (pos.y - display.min.y) / display.height() * frame.y,
    )
}

/// Map logical frame pixels onto the screen.
pub fn frame_to_screen(point: Pos2, display: Rect, frame: Vec2) -> Pos2 {
    Pos2::new(
        display.min.x + point.x / frame.x * display.width(),
        display.min.y + point.y / frame.y * display.height(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_frame_roundtrip() {
        let display = Rect::from_min_size(Pos2::new(40.0, 20.0), Vec2::new(400.0, 300.0));
        let frame = Vec2::new(800.0, 600.0);
        let point = Pos2::new(123.0, 456.0);

        let screen = frame_to_screen(point, display, frame);
        let back = screen_to_frame(screen, display, frame);

        assert!((back.x - point.x).abs() < 0.001);
        assert!((back.y - point.y).abs() < 0.001);
    }

    #[test]
    fn test_screen_to_frame_corners() {
        let display = Rect::from_min_size(Pos2::new(10.0, 10.0), Vec2::new(400.0, 300.0));
        let frame = Vec2::new(800.0, 600.0);

        // Top-left corner
        let tl = screen_to_frame(display.min, display, frame);
        assert_eq!(tl, Pos2::new(0.0, 0.0));

        // Bottom-right corner
        let br = screen_to_frame(display.max, display, frame);
        assert_eq!(br, Pos2::new(800.0, 600.0));
    }

    #[test]
    fn test_fit_rect_letterboxes_wide_content() {
        let available = Rect::from_min_size(Pos2::ZERO, Vec2::new(1000.0, 1000.0));
        let fitted = fit_rect(available, 16.0 / 9.0);

        assert!((fitted.width() - 1000.0).abs() < 0.001);
        assert!((fitted.height() - 562.5).abs() < 0.001);
        assert_eq!(fitted.center(), available.center());
    }

    #[test]
    fn test_fit_rect_pillarboxes_tall_content() {
        let available = Rect::from_min_size(Pos2::ZERO, Vec2::new(1600.0, 600.0));
        let fitted = fit_rect(available, 4.0 / 3.0);

        assert!((fitted.width() - 800.0).abs() < 0.001);
        assert!((fitted.height() - 600.0).abs() < 0.001);
    }

    #[test]
    fn test_region_to_rect() {
        let media = Rect::from_min_size(Pos2::new(100.0, 50.0), Vec2::new(1000.0, 500.0));
        let rect = region_to_rect(&Region::percent(48.0, 20.0, 20.0, 25.0), media);

        assert!((rect.min.x - 580.0).abs() < 0.01);
        assert!((rect.min.y - 150.0).abs() < 0.01);
        assert!((rect.width() - 200.0).abs() < 0.01);
        assert!((rect.height() - 125.0).abs() < 0.01);
    }

    #[test]
    fn test_frame_rect_excludes_border() {
        let rect = FrameRect {
            min_x: 100.0,
            min_y: 150.0,
            max_x: 220.0,
            max_y: 250.0,
        };
        assert!(rect.contains(150.0, 200.0));
        assert!(!rect.contains(100.0, 200.0));
        assert!(!rect.contains(150.0, 250.0));
    }
}
