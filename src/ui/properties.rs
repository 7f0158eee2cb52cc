// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Side panel.
//!
//! In tour mode it describes the current level, its hotspots and the
//! path taken so far. In story mode it lists every vignette with a
//! checkbox, including the ones the timeline never plays.

use crate::models::navigation::NavigationSession;
use crate::models::scene::{AnimationState, SceneFlag};
use crate::models::tour::{Media, Tour};

/// Result of properties panel interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertiesAction {
    None,
    ActivateHotspot(String),
    SetFlag(SceneFlag, bool),
}

/// Tour details for the current level.
pub fn show_tour(ui: &mut egui::Ui, tour: &Tour, session: &NavigationSession) -> PropertiesAction {
    let mut action = PropertiesAction::None;

    ui.heading(&tour.title);
    if let Some(subtitle) = &tour.subtitle {
        ui.label(egui::RichText::new(subtitle).weak());
    }
    ui.separator();

    let Some(level) = tour.level(session.current()) else {
        ui.label("No level selected");
        return action;
    };

    egui::Grid::new("level_info")
        .num_columns(2)
        .spacing([8.0, 4.0])
        .show(ui, |ui| {
            ui.label("Level:");
            ui.label(session.current());
            ui.end_row();

            ui.label("Media:");
            let kind = match &level.media {
                Media::Image { .. } => "image",
                Media::Video { .. } if level.looping_video().is_some() => "looping video",
                Media::Video { .. } => "video",
            };
            ui.label(kind).on_hover_text(level.media.path());
            ui.end_row();

            ui.label("Depth:");
            ui.label(session.history().len().to_string());
            ui.end_row();
        });

    if let Some(transition) = session.transition() {
        ui.add_space(4.0);
        ui.label(
            egui::RichText::new(format!("Zooming via '{}'...", transition.hotspot))
                .italics()
                .color(egui::Color32::from_rgb(251, 191, 36)),
        );
    }

    ui.separator();
    ui.heading("Hotspots");

    if level.hotspots.is_empty() {
        ui.label("Nothing more to explore here.");
    } else {
        let enabled = !session.is_transitioning();
        for hotspot in &level.hotspots {
            ui.horizontal(|ui| {
                let target = &hotspot.next_level;
                let button = egui::Button::new(&hotspot.label);
                if ui
                    .add_enabled(enabled, button)
                    .on_hover_text(format!("Goes to {}", target))
                    .clicked()
                {
                    action = PropertiesAction::ActivateHotspot(hotspot.id.clone());
                }
            });
        }
    }

    ui.separator();
    ui.heading("Path");

    egui::ScrollArea::vertical().id_source("history").show(ui, |ui| {
        for id in session.history() {
            let title = tour.level(id).map(|l| l.title.as_str()).unwrap_or(id);
            ui.label(format!("• {}", title));
        }
        ui.label(egui::RichText::new(format!("▶ {}", level.title)).strong());
    });

    action
}

/// Vignette checkboxes for the story scene.
pub fn show_story(ui: &mut egui::Ui, state: &AnimationState) -> PropertiesAction {
    let mut action = PropertiesAction::None;

    ui.heading("Vignettes");
    ui.label(format!(
        "{} of {} active",
        state.active().count(),
        SceneFlag::COUNT
    ));
    ui.separator();

    egui::ScrollArea::vertical().id_source("flags").show(ui, |ui| {
        for flag in SceneFlag::ALL {
            let mut value = state.is_set(flag);
            if ui.checkbox(&mut value, flag.label()).changed() {
                action = PropertiesAction::SetFlag(flag, value);
            }
        }
    });

    if state.is_finished() {
        ui.separator();
        ui.label(egui::RichText::new("The End").strong());
    }

    action
}
