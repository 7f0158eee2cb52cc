// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Zoom tour viewer.
//!
//! Shows the current level's image or video in a 16:9 box with its
//! hotspots overlaid, or the transition video while one plays. Widgets
//! here only read state and return a `ViewerAction`.

use crate::io::media::{MediaCache, MediaSlot};
use crate::io::video::{SurfaceView, VideoSurface};
use crate::models::navigation::NavigationSession;
use crate::models::playback::{Playback, PlaybackState};
use crate::models::tour::{Level, Media, Tour};
use crate::util::geometry::{fit_rect, region_to_rect};
use egui::{Color32, Rect, RichText, Stroke, Vec2};

/// Result of viewer interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewerAction {
    None,
    ActivateHotspot(String),
    Back,
    ToggleSound,
    RetryMedia(String),
}

const AMBER: Color32 = Color32::from_rgb(251, 191, 36);

/// Everything the viewer draws from.
pub struct ViewerState<'a> {
    pub tour: &'a Tour,
    pub session: &'a NavigationSession,
    pub main_surface: &'a VideoSurface,
    pub transition_surface: &'a VideoSurface,
}

/// Display the tour and handle hotspot and control clicks.
pub fn show(ui: &mut egui::Ui, view: ViewerState<'_>, media: &mut MediaCache) -> ViewerAction {
    let mut action = ViewerAction::None;
    let session = view.session;

    let Some(level) = view.tour.level(session.current()) else {
        ui.centered_and_justified(|ui| {
            ui.label(format!("Level '{}' is missing from the tour", session.current()));
        });
        return action;
    };

    // Header
    ui.vertical_centered(|ui| {
        ui.heading(RichText::new(&level.title).size(32.0).color(Color32::WHITE));
        let hint = if level.hotspots.is_empty() {
            "Enjoying the view"
        } else {
            "Click on areas to zoom in and explore"
        };
        ui.label(RichText::new(hint).size(16.0).color(Color32::from_gray(200)));
    });
    ui.add_space(8.0);

    // Controls take the bottom strip; the media box gets the rest.
    let controls_height = 64.0;
    let available = ui.available_rect_before_wrap();
    let media_area = Rect::from_min_max(
        available.min,
        egui::pos2(available.max.x, (available.max.y - controls_height).max(available.min.y)),
    );
    let media_rect = fit_rect(media_area, 16.0 / 9.0);
    ui.allocate_rect(media_area, egui::Sense::hover());
    ui.painter().rect_filled(media_rect, 8.0, Color32::BLACK);

    if let Some(transition) = session.transition_video() {
        draw_video(ui, media_rect, view.transition_surface, transition, "Zooming in...");
    } else {
        match &level.media {
            Media::Image { path } => {
                if let Some(retry) = draw_image(ui, media_rect, media, path, &level.title) {
                    action = retry;
                }
                if let Some(hotspot) = draw_hotspots(ui, media_rect, level) {
                    action = ViewerAction::ActivateHotspot(hotspot);
                }
            }
            Media::Video { .. } => {
                if let Some(main) = session.main_video() {
                    draw_video(ui, media_rect, view.main_surface, main, &level.title);
                }
                if let Some(hotspot) = draw_hotspots(ui, media_rect, level) {
                    action = ViewerAction::ActivateHotspot(hotspot);
                }
            }
        }
    }

    // Controls
    ui.add_space(12.0);
    ui.horizontal(|ui| {
        let back = egui::Button::new(RichText::new("← Back").size(16.0));
        if ui.add_enabled(session.can_go_back(), back).clicked() {
            action = ViewerAction::Back;
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let label = if session.sound_enabled() {
                "🔊 Sound On"
            } else {
                "🔇 Sound Off"
            };
            if ui.button(RichText::new(label).size(16.0)).clicked() {
                action = ViewerAction::ToggleSound;
            }
        });
    });
    ui.vertical_centered(|ui| {
        ui.label(
            RichText::new("Hover over highlighted areas to see what you can explore")
                .small()
                .color(Color32::from_gray(150)),
        );
    });

    action
}

/// Draw a level image, or its loading/failure state.
fn draw_image(
    ui: &mut egui::Ui,
    rect: Rect,
    media: &mut MediaCache,
    source: &str,
    title: &str,
) -> Option<ViewerAction> {
    match media.request(source) {
        MediaSlot::Ready { texture, size } => {
            let image_rect = fit_rect(rect, size[0] as f32 / size[1].max(1) as f32);
            ui.painter().image(
                texture.id(),
                image_rect,
                Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                Color32::WHITE,
            );
            None
        }
        MediaSlot::Loading => {
            ui.put(rect, egui::Spinner::new().size(32.0));
            None
        }
        MediaSlot::Failed(message) => {
            let message = message.clone();
            let mut retry = None;
            ui.allocate_ui_at_rect(rect.shrink(24.0), |ui| {
                ui.vertical_centered(|ui| {
                    ui.add_space(rect.height() / 3.0);
                    ui.label(RichText::new(title).size(20.0).color(Color32::WHITE));
                    ui.label(
                        RichText::new(format!("Could not load {}: {}", source, message))
                            .color(Color32::LIGHT_RED),
                    );
                    if ui.button("Retry").clicked() {
                        retry = Some(ViewerAction::RetryMedia(source.to_string()));
                    }
                });
            });
            retry
        }
    }
}

/// Draw decoded video frames, or a progress card when none are available.
fn draw_video(
    ui: &mut egui::Ui,
    rect: Rect,
    surface: &VideoSurface,
    playback: &Playback,
    title: &str,
) {
    match surface.view() {
        SurfaceView::Frame(texture) => {
            let size = texture.size_vec2();
            let frame_rect = fit_rect(rect, size.x / size.y.max(1.0));
            ui.painter().image(
                texture.id(),
                frame_rect,
                Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                Color32::WHITE,
            );
        }
        SurfaceView::Unavailable(note) => {
            let card = Rect::from_center_size(rect.center(), Vec2::new(rect.width() * 0.6, 120.0));
            ui.allocate_ui_at_rect(card, |ui| {
                ui.vertical_centered(|ui| {
                    ui.label(RichText::new(title).size(20.0).color(Color32::WHITE));
                    let source = if playback.is_looping() {
                        format!("{} (looping)", playback.source())
                    } else {
                        playback.source().to_string()
                    };
                    ui.label(RichText::new(source).small().color(Color32::from_gray(160)));
                    let bar = egui::ProgressBar::new(playback.progress())
                        .desired_width(card.width());
                    let bar = match playback.state() {
                        PlaybackState::Playing => bar,
                        PlaybackState::Paused => bar.text("Paused"),
                        PlaybackState::Ended => bar.text("Done"),
                    };
                    ui.add(bar);
                    if !note.is_empty() {
                        ui.label(RichText::new(note).small().color(Color32::from_gray(130)));
                    }
                });
            });
        }
    }
}

/// Draw hotspot overlays, returning the id of a clicked hotspot.
fn draw_hotspots(ui: &mut egui::Ui, media_rect: Rect, level: &Level) -> Option<String> {
    let mut clicked = None;

    for hotspot in &level.hotspots {
        let rect = region_to_rect(&hotspot.region, media_rect);
        let id = ui.id().with(("hotspot", &hotspot.id));
        let response = ui
            .interact(rect, id, egui::Sense::click())
            .on_hover_cursor(egui::CursorIcon::PointingHand);

        if response.hovered() {
            let painter = ui.painter();
            painter.rect_filled(rect, 8.0, AMBER.gamma_multiply(0.2));
            painter.rect_stroke(rect, 8.0, Stroke::new(2.0, AMBER));

            let galley = painter.layout_no_wrap(
                hotspot.label.clone(),
                egui::FontId::proportional(14.0),
                Color32::WHITE,
            );
            let pill = Rect::from_center_size(rect.center(), galley.size() + Vec2::new(32.0, 16.0));
            painter.rect_filled(pill, pill.height() / 2.0, Color32::from_rgb(217, 119, 6));
            painter.galley(pill.center() - galley.size() / 2.0, galley, Color32::WHITE);
        }

        if response.clicked() {
            clicked = Some(hotspot.id.clone());
        }
    }

    clicked
}
