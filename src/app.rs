// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! This module contains the main application structure that implements
//! the egui::App trait. It owns the navigation session, the story state
//! and timeline, and the media cache. Widgets return actions which are
//! applied here after the UI pass.

use crate::io::media::MediaCache;
use crate::io::share::{self, ClipboardShare, ShareRequest, ShareTarget};
use crate::io::video::VideoSurface;
use crate::models::{
    navigation::{NavEvent, NavigationSession},
    scene::{AnimationState, SceneMotion},
    timeline::Timeline,
    tour::Tour,
};
use crate::ui::{canvas, properties, timeline, toolbar, viewer};
use std::path::PathBuf;
use std::time::Duration;

/// Longest frame delta fed to the clocks, so a stalled window doesn't
/// skip a whole transition.
const MAX_FRAME_DT: f32 = 0.1;

/// Which experience is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Mode {
    Tour,
    Story,
}

/// Startup settings, resolved from the command line.
pub struct AppConfig {
    pub tour: Tour,
    pub assets: PathBuf,
    pub mode: Mode,
    pub snow: f32,
    pub sound: bool,
    pub seed: u64,
}

/// Main application state.
pub struct VillageApp {
    /// Tour or story
    mode: Mode,

    /// Loaded tour definition
    tour: Tour,

    /// Where the tour is and how it got there
    session: NavigationSession,

    /// Story vignette flags
    animation: AnimationState,

    /// Snow and dog, advanced every painted frame
    motion: SceneMotion,

    /// Story schedule
    timeline: Timeline,

    /// Whether the story has been started at least once
    story_started: bool,

    /// Level images
    media: MediaCache,

    /// Frames for the level video and the transition video
    main_surface: VideoSurface,
    transition_surface: VideoSurface,

    /// Platform share capability, if any
    share_target: Option<Box<dyn ShareTarget>>,

    show_about: bool,

    /// Last user-facing error, shown until dismissed
    error_message: Option<String>,
}

impl VillageApp {
    /// Create a new application instance.
    pub fn new(config: AppConfig) -> Self {
        let session = NavigationSession::new(&config.tour, config.sound);
        log::info!(
            "Starting in {:?} mode at level '{}'",
            config.mode,
            session.current()
        );
        Self {
            mode: config.mode,
            session,
            tour: config.tour,
            animation: AnimationState::default(),
            motion: SceneMotion::new(config.snow, config.seed),
            timeline: Timeline::story(),
            story_started: false,
            media: MediaCache::new(config.assets),
            main_surface: VideoSurface::new("main_video"),
            transition_surface: VideoSurface::new("transition_video"),
            share_target: Some(Box::new(ClipboardShare)),
            show_about: false,
            error_message: None,
        }
    }

    /// Replace the tour with one read from `path`. An invalid file leaves
    /// the current tour in place.
    fn open_tour(&mut self, path: PathBuf) {
        match crate::io::serialization::import_tour(&path) {
            Ok(tour) => {
                self.session = NavigationSession::new(&tour, self.session.sound_enabled());
                self.tour = tour;
                self.media.clear();
                self.error_message = None;
            }
            Err(e) => {
                log::error!("Failed to open tour: {:#}", e);
                self.error_message = Some(format!("{:#}", e));
            }
        }
    }

    /// Export the tour to a file.
    fn export_tour(&mut self, path: PathBuf) {
        match crate::io::serialization::export_tour(&self.tour, &path) {
            Ok(()) => log::info!("Exported tour to {}", path.display()),
            Err(e) => {
                log::error!("Failed to export tour: {:#}", e);
                self.error_message = Some(format!("{:#}", e));
            }
        }
    }

    fn start_story(&mut self, now: Duration) {
        self.timeline.start(now, &mut self.animation);
        self.story_started = true;
    }

    /// Tour videos hold their place while the story is on screen.
    fn on_mode_changed(&mut self) {
        log::info!("Switched to {:?} mode", self.mode);
        for video in self.session.videos_mut() {
            match self.mode {
                Mode::Story => video.pause(),
                Mode::Tour => video.resume(),
            }
        }
    }

    fn toggle_sound(&mut self) {
        let enabled = self.session.toggle_sound();
        log::info!("Sound {}", if enabled { "on" } else { "off" });
    }

    fn set_snow(&mut self, intensity: f32) {
        let intensity = intensity.clamp(*timeline::SNOW_RANGE.start(), *timeline::SNOW_RANGE.end());
        self.motion.snow.set_intensity(intensity);
        log::debug!("Snow intensity {:.1}", intensity);
    }

    /// Advance clocks by one frame and apply what came due.
    fn advance(&mut self, ctx: &egui::Context, now: Duration, dt: Duration) {
        self.media.poll(ctx);

        if let Some(event) = self.session.tick(&self.tour, dt) {
            log::debug!("Navigation: {:?}", event);
        }

        let probed = self
            .main_surface
            .sync(ctx, self.media.root(), self.session.main_video());
        if let (Some(duration), Some(video)) = (probed, self.session.main_video_mut()) {
            video.set_duration(duration);
        }
        let probed = self
            .transition_surface
            .sync(ctx, self.media.root(), self.session.transition_video());
        if let (Some(duration), Some(video)) = (probed, self.session.transition_video_mut()) {
            video.set_duration(duration);
        }

        for event in self.timeline.poll(now, &mut self.animation) {
            log::debug!("Timeline: {:?}", event);
        }
    }

    fn menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open Tour...").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("Tours", &["yaml", "yml", "json"])
                            .pick_file()
                        {
                            self.open_tour(path);
                        }
                        ui.close_menu();
                    }
                    if ui.button("Reset to Village Tour").clicked() {
                        let tour = Tour::village();
                        self.session = NavigationSession::new(&tour, self.session.sound_enabled());
                        self.tour = tour;
                        self.media.clear();
                        ui.close_menu();
                    }
                    ui.separator();
                    ui.menu_button("Export Tour", |ui| {
                        if ui.button("Export as YAML...").clicked() {
                            if let Some(path) = rfd::FileDialog::new()
                                .add_filter("YAML", &["yaml", "yml"])
                                .set_file_name("tour.yaml")
                                .save_file()
                            {
                                self.export_tour(path);
                            }
                            ui.close_menu();
                        }
                        if ui.button("Export as JSON...").clicked() {
                            if let Some(path) = rfd::FileDialog::new()
                                .add_filter("JSON", &["json"])
                                .set_file_name("tour.json")
                                .save_file()
                            {
                                self.export_tour(path);
                            }
                            ui.close_menu();
                        }
                    });
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.menu_button("Help", |ui| {
                    if ui.button("About").clicked() {
                        self.show_about = true;
                        ui.close_menu();
                    }
                });
            });
        });
    }

    fn windows(&mut self, ctx: &egui::Context) {
        egui::Window::new("About")
            .open(&mut self.show_about)
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.heading("The Gingerbread Village");
                ui.label("A zoom tour and a little story about a village made of gingerbread.");
                ui.label(format!("Version {}", env!("CARGO_PKG_VERSION")));
            });

        let mut dismissed = false;
        if let Some(message) = &self.error_message {
            egui::Window::new("Error")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
                .show(ctx, |ui| {
                    ui.label(egui::RichText::new(message).color(egui::Color32::LIGHT_RED));
                    if ui.button("OK").clicked() {
                        dismissed = true;
                    }
                });
        }
        if dismissed {
            self.error_message = None;
        }
    }

    fn apply_viewer(&mut self, action: viewer::ViewerAction) {
        match action {
            viewer::ViewerAction::ActivateHotspot(id) => {
                self.activate_hotspot(&id);
            }
            viewer::ViewerAction::Back => {
                self.session.go_back(&self.tour);
            }
            viewer::ViewerAction::ToggleSound => self.toggle_sound(),
            viewer::ViewerAction::RetryMedia(source) => self.media.retry(&source),
            viewer::ViewerAction::None => {}
        }
    }

    fn activate_hotspot(&mut self, id: &str) {
        match self.session.activate_hotspot(&self.tour, id) {
            NavEvent::Ignored => log::debug!("Hotspot '{}' ignored", id),
            event => log::debug!("Navigation: {:?}", event),
        }
    }

    fn apply_properties(&mut self, action: properties::PropertiesAction) {
        match action {
            properties::PropertiesAction::ActivateHotspot(id) => self.activate_hotspot(&id),
            properties::PropertiesAction::SetFlag(flag, value) => {
                self.animation.set(flag, value);
                log::info!("{} {}", flag.label(), if value { "on" } else { "off" });
            }
            properties::PropertiesAction::None => {}
        }
    }

    fn apply_canvas(&mut self, ctx: &egui::Context, action: canvas::CanvasAction, now: Duration) {
        match action {
            canvas::CanvasAction::Toggle(flag) => {
                let value = self.animation.toggle(flag);
                log::info!("Clicked {}: {}", flag.label(), if value { "on" } else { "off" });
            }
            canvas::CanvasAction::Start | canvas::CanvasAction::Replay => self.start_story(now),
            canvas::CanvasAction::Share => {
                share::share(self.share_target.as_deref(), ctx, &ShareRequest::story());
            }
            canvas::CanvasAction::None => {}
        }
    }

    fn apply_timeline(&mut self, action: timeline::TimelineAction, now: Duration) {
        match action {
            timeline::TimelineAction::Play => self.start_story(now),
            timeline::TimelineAction::Pause => self.timeline.cancel(),
            timeline::TimelineAction::ToggleSound => self.toggle_sound(),
            timeline::TimelineAction::SetSnow(intensity) => self.set_snow(intensity),
            timeline::TimelineAction::None => {}
        }
    }
}

impl eframe::App for VillageApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Duration::from_secs_f64(ctx.input(|i| i.time));
        let dt = Duration::from_secs_f32(ctx.input(|i| i.stable_dt).clamp(0.0, MAX_FRAME_DT));

        self.advance(ctx, now, dt);

        self.menu_bar(ctx);

        // Toolbar
        let previous_mode = self.mode;
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            toolbar::show(ui, &mut self.mode);
        });
        if self.mode != previous_mode {
            self.on_mode_changed();
        }

        // Handle keyboard events
        if !ctx.wants_keyboard_input() && ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            match self.mode {
                Mode::Tour => {
                    self.session.go_back(&self.tour);
                }
                Mode::Story => self.timeline.cancel(),
            }
        }

        // Properties panel (right side)
        let properties_action = egui::SidePanel::right("properties")
            .default_width(250.0)
            .show(ctx, |ui| match self.mode {
                Mode::Tour => properties::show_tour(ui, &self.tour, &self.session),
                Mode::Story => properties::show_story(ui, &self.animation),
            })
            .inner;
        self.apply_properties(properties_action);

        match self.mode {
            Mode::Tour => {
                let action = egui::CentralPanel::default()
                    .frame(
                        egui::Frame::central_panel(&ctx.style())
                            .fill(egui::Color32::from_rgb(23, 37, 84)),
                    )
                    .show(ctx, |ui| {
                        let view = viewer::ViewerState {
                            tour: &self.tour,
                            session: &self.session,
                            main_surface: &self.main_surface,
                            transition_surface: &self.transition_surface,
                        };
                        viewer::show(ui, view, &mut self.media)
                    })
                    .inner;
                self.apply_viewer(action);
            }
            Mode::Story => {
                let timeline_action = egui::TopBottomPanel::bottom("story_timeline")
                    .show(ctx, |ui| {
                        timeline::show(
                            ui,
                            &self.timeline,
                            now,
                            self.session.sound_enabled(),
                            self.motion.snow.intensity(),
                        )
                    })
                    .inner;
                self.apply_timeline(timeline_action, now);

                let canvas_action = egui::CentralPanel::default()
                    .show(ctx, |ui| {
                        canvas::show(
                            ui,
                            &self.animation,
                            &mut self.motion,
                            now.as_secs_f64(),
                            self.story_started,
                        )
                    })
                    .inner;
                self.apply_canvas(ctx, canvas_action, now);
            }
        }

        self.windows(ctx);

        // Snow, dog and video clocks all move every frame.
        ctx.request_repaint();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::scene::SceneFlag;

    fn app() -> VillageApp {
        VillageApp::new(AppConfig {
            tour: Tour::village(),
            assets: PathBuf::from("assets"),
            mode: Mode::Story,
            snow: 1.0,
            sound: false,
            seed: 7,
        })
    }

    #[test]
    fn test_play_pause_and_replay() {
        let mut app = app();
        app.apply_timeline(timeline::TimelineAction::Play, Duration::ZERO);
        assert!(app.story_started);
        assert!(app.timeline.is_running());

        app.timeline.poll(Duration::from_millis(2001), &mut app.animation);
        app.apply_timeline(timeline::TimelineAction::Pause, Duration::from_millis(2001));
        assert!(!app.timeline.is_running());
        assert_eq!(app.animation.active().count(), 2);

        let ctx = egui::Context::default();
        app.apply_canvas(&ctx, canvas::CanvasAction::Replay, Duration::from_secs(10));
        assert!(app.timeline.is_running());
        assert!(!app.animation.any_set());
    }

    #[test]
    fn test_canvas_toggle_and_properties_flag() {
        let mut app = app();
        let ctx = egui::Context::default();
        app.apply_canvas(&ctx, canvas::CanvasAction::Toggle(SceneFlag::CatInTree), Duration::ZERO);
        assert!(app.animation.is_set(SceneFlag::CatInTree));

        app.apply_properties(properties::PropertiesAction::SetFlag(
            SceneFlag::KidEatingHouse,
            true,
        ));
        assert!(app.animation.is_set(SceneFlag::KidEatingHouse));
    }

    #[test]
    fn test_snow_intensity_is_clamped() {
        let mut app = app();
        app.apply_timeline(timeline::TimelineAction::SetSnow(5.0), Duration::ZERO);
        assert_eq!(app.motion.snow.intensity(), 2.0);
        assert_eq!(app.motion.snow.particles().len(), 200);
    }

    #[test]
    fn test_sound_is_shared_between_modes() {
        let mut app = app();
        app.apply_timeline(timeline::TimelineAction::ToggleSound, Duration::ZERO);
        assert!(app.session.sound_enabled());
        app.apply_viewer(viewer::ViewerAction::ToggleSound);
        assert!(!app.session.sound_enabled());
    }

    #[test]
    fn test_story_mode_pauses_tour_transition() {
        let mut app = app();
        app.mode = Mode::Tour;
        app.activate_hotspot("grandparents");
        assert!(app.session.is_transitioning());

        app.mode = Mode::Story;
        app.on_mode_changed();
        assert_eq!(app.session.tick(&app.tour, Duration::from_secs(10)), None);
        assert!(app.session.is_transitioning());

        app.mode = Mode::Tour;
        app.on_mode_changed();
        assert!(app.session.tick(&app.tour, Duration::from_secs(10)).is_some());
        assert!(!app.session.is_transitioning());
    }

    #[test]
    fn test_invalid_tour_file_keeps_current_tour() {
        let mut app = app();
        app.open_tour(PathBuf::from("does/not/exist.yaml"));
        assert!(app.error_message.is_some());
        assert_eq!(app.tour.root, Tour::village().root);
    }
}
