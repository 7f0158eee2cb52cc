// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Toolbar and mode selection UI.

use crate::app::Mode;

/// Display the toolbar with mode selection buttons.
pub fn show(ui: &mut egui::Ui, current_mode: &mut Mode) {
    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        ui.label("View:");

        ui.separator();

        if ui.selectable_label(*current_mode == Mode::Tour, "🔍 Zoom Tour").clicked() {
            *current_mode = Mode::Tour;
        }

        if ui.selectable_label(*current_mode == Mode::Story, "🎄 Story").clicked() {
            *current_mode = Mode::Story;
        }

        ui.separator();

        let mode_text = match current_mode {
            Mode::Tour => "Click highlighted areas to zoom in, Escape to go back",
            Mode::Story => "Press Start or click the village to bring it to life",
        };

        ui.label(egui::RichText::new(mode_text).italics().weak());
    });
}
