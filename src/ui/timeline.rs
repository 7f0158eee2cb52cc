// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Story playback strip.
//!
//! Draws one tick per scheduled step, filled once it has fired, with a
//! playhead at the elapsed story time. The controls below it play and
//! pause the story, toggle sound and set snow intensity.

use crate::models::timeline::{Cue, Timeline};
use egui::{Color32, Rect, Sense, Stroke, Vec2};
use std::time::Duration;

/// Result of timeline control interaction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimelineAction {
    None,
    Play,
    Pause,
    ToggleSound,
    SetSnow(f32),
}

/// Snow intensity slider bounds.
pub const SNOW_RANGE: std::ops::RangeInclusive<f32> = 0.1..=2.0;

const FIRED: Color32 = Color32::from_rgb(220, 38, 38);
const PENDING: Color32 = Color32::from_gray(90);
const GOLD: Color32 = Color32::from_rgb(255, 215, 0);

/// Display the progress strip and story controls.
pub fn show(
    ui: &mut egui::Ui,
    timeline: &Timeline,
    now: Duration,
    sound_enabled: bool,
    snow_intensity: f32,
) -> TimelineAction {
    let mut action = TimelineAction::None;

    let elapsed = timeline.elapsed(now);
    draw_strip(ui, timeline, elapsed);

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        if timeline.is_running() {
            if ui.button("⏸ Pause").clicked() {
                action = TimelineAction::Pause;
            }
        } else if ui.button("▶ Play").clicked() {
            action = TimelineAction::Play;
        }

        let sound = if sound_enabled {
            "🔊 Sound"
        } else {
            "🔇 Muted"
        };
        if ui.button(sound).clicked() {
            action = TimelineAction::ToggleSound;
        }

        ui.separator();

        ui.label("❄ Snow:");
        let mut intensity = snow_intensity;
        let slider = egui::Slider::new(&mut intensity, SNOW_RANGE)
            .step_by(0.1)
            .show_value(false);
        if ui.add(slider).changed() {
            action = TimelineAction::SetSnow(intensity);
        }
        ui.label(format!("{:.0}%", intensity * 100.0));

        ui.separator();

        let shown = elapsed.unwrap_or_default().min(timeline.total());
        ui.label(
            egui::RichText::new(format!(
                "{} / {} beats  {:.1}s / {:.0}s",
                timeline.fired(),
                timeline.steps().len(),
                shown.as_secs_f32(),
                timeline.total().as_secs_f32()
            ))
            .monospace()
            .weak(),
        );
    });

    action
}

fn draw_strip(ui: &mut egui::Ui, timeline: &Timeline, elapsed: Option<Duration>) {
    let width = ui.available_width();
    let (rect, _response) = ui.allocate_exact_size(Vec2::new(width, 24.0), Sense::hover());
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 4.0, Color32::from_gray(30));

    let total = timeline.total().as_secs_f32();
    if total <= 0.0 {
        return;
    }
    let track = rect.shrink2(Vec2::new(8.0, 6.0));
    let x_at = |t: f32| track.left() + track.width() * (t / total).clamp(0.0, 1.0);

    painter.line_segment(
        [
            egui::pos2(track.left(), track.center().y),
            egui::pos2(track.right(), track.center().y),
        ],
        Stroke::new(1.0, PENDING),
    );

    for (index, step) in timeline.steps().iter().enumerate() {
        let x = x_at(step.at.as_secs_f32());
        let fired = index < timeline.fired();
        let color = if fired { FIRED } else { PENDING };
        match step.cue {
            Cue::Set(_) => {
                painter.circle_filled(egui::pos2(x, track.center().y), 4.0, color);
            }
            Cue::Finish => {
                let marker =
                    Rect::from_center_size(egui::pos2(x, track.center().y), Vec2::splat(8.0));
                let fill = if fired { GOLD } else { color };
                painter.rect_filled(marker, 0.0, fill);
            }
        }
    }

    if let Some(elapsed) = elapsed {
        let x = x_at(elapsed.as_secs_f32());
        painter.line_segment(
            [egui::pos2(x, rect.top()), egui::pos2(x, rect.bottom())],
            Stroke::new(2.0, Color32::WHITE),
        );
    }
}
