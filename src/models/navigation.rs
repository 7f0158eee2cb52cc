// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Navigation session state machine.
//!
//! The session tracks the current level, the back history, the transition
//! in progress, and the sound flag. It mutates only through hotspot
//! activation, transition completion, and the back action. Transitions are
//! keyed by the hotspot that started them, so the destination is known up
//! front and never re-derived from the video being played.

use super::playback::Playback;
use super::tour::{LevelId, Media, Tour};
use std::time::Duration;

/// Identifies one transition: the level it starts from and the hotspot
/// that was activated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionId {
    pub level: LevelId,
    pub hotspot: String,
}

#[derive(Debug, Clone, PartialEq)]
struct PendingTransition {
    id: TransitionId,
    target: LevelId,
}

/// Outcome of a navigation input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavEvent {
    /// Input was not accepted (transition in progress, unknown hotspot).
    Ignored,
    /// A transition video started playing.
    TransitionStarted(TransitionId),
    /// The session arrived at a level.
    Arrived(LevelId),
}

/// Navigation state for one mounted tour view.
#[derive(Debug, Clone)]
pub struct NavigationSession {
    current: LevelId,
    history: Vec<LevelId>,
    pending: Option<PendingTransition>,
    sound_enabled: bool,
    main_video: Option<Playback>,
    transition_video: Option<Playback>,
}

impl NavigationSession {
    /// Start at the tour's root with empty history.
    pub fn new(tour: &Tour, sound_enabled: bool) -> Self {
        let mut session = Self {
            current: tour.root.clone(),
            history: Vec::new(),
            pending: None,
            sound_enabled,
            main_video: None,
            transition_video: None,
        };
        session.start_main_video(tour);
        session
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    pub fn history(&self) -> &[LevelId] {
        &self.history
    }

    pub fn is_transitioning(&self) -> bool {
        self.pending.is_some()
    }

    /// Whether the Back control should be offered.
    pub fn can_go_back(&self) -> bool {
        !self.history.is_empty() && !self.is_transitioning()
    }

    pub fn sound_enabled(&self) -> bool {
        self.sound_enabled
    }

    pub fn main_video(&self) -> Option<&Playback> {
        self.main_video.as_ref()
    }

    pub fn transition_video(&self) -> Option<&Playback> {
        self.transition_video.as_ref()
    }

    pub fn transition_video_mut(&mut self) -> Option<&mut Playback> {
        self.transition_video.as_mut()
    }

    pub fn main_video_mut(&mut self) -> Option<&mut Playback> {
        self.main_video.as_mut()
    }

    /// The transition in progress, if any.
    pub fn transition(&self) -> Option<&TransitionId> {
        self.pending.as_ref().map(|p| &p.id)
    }

    /// Activate a hotspot on the current level.
    pub fn activate_hotspot(&mut self, tour: &Tour, hotspot_id: &str) -> NavEvent {
        if self.is_transitioning() {
            log::debug!("Ignoring hotspot '{}' while transitioning", hotspot_id);
            return NavEvent::Ignored;
        }

        let Some(hotspot) = tour
            .level(&self.current)
            .and_then(|level| level.hotspot(hotspot_id))
        else {
            log::warn!(
                "Hotspot '{}' does not exist on level '{}'",
                hotspot_id,
                self.current
            );
            return NavEvent::Ignored;
        };

        self.history.push(self.current.clone());

        match &hotspot.transition {
            Some(video) => {
                let id = TransitionId {
                    level: self.current.clone(),
                    hotspot: hotspot.id.clone(),
                };
                self.pending = Some(PendingTransition {
                    id: id.clone(),
                    target: hotspot.next_level.clone(),
                });
                self.main_video = None;
                self.transition_video = Some(
                    Playback::new(video.path.clone(), false, video.duration())
                        .with_muted(!self.sound_enabled),
                );
                log::info!(
                    "Transition {}/{} -> {} started",
                    id.level,
                    id.hotspot,
                    hotspot.next_level
                );
                NavEvent::TransitionStarted(id)
            }
            None => {
                let target = hotspot.next_level.clone();
                self.arrive(tour, target.clone());
                NavEvent::Arrived(target)
            }
        }
    }

    /// Finish the transition identified by `id`.
    ///
    /// Completions for any other transition are stale and ignored.
    pub fn on_transition_ended(&mut self, tour: &Tour, id: &TransitionId) -> NavEvent {
        let target = match &self.pending {
            Some(pending) if &pending.id == id => pending.target.clone(),
            _ => {
                log::debug!("Ignoring stale transition end for {}/{}", id.level, id.hotspot);
                return NavEvent::Ignored;
            }
        };

        self.arrive(tour, target.clone());
        NavEvent::Arrived(target)
    }

    /// Advance video clocks, completing the transition when its video ends.
    pub fn tick(&mut self, tour: &Tour, dt: Duration) -> Option<NavEvent> {
        if let Some(main) = self.main_video.as_mut() {
            main.advance(dt);
        }

        let ended = self
            .transition_video
            .as_mut()
            .map(|video| video.advance(dt))
            .unwrap_or(false);

        if ended {
            let id = self.pending.as_ref().map(|p| p.id.clone())?;
            return Some(self.on_transition_ended(tour, &id));
        }
        None
    }

    /// Return to the previous level.
    ///
    /// Aborts a transition in progress. Returns `false` when there is no
    /// history.
    pub fn go_back(&mut self, tour: &Tour) -> bool {
        let Some(previous) = self.history.pop() else {
            return false;
        };

        if let Some(video) = self.main_video.as_mut() {
            video.stop();
        }
        if let Some(video) = self.transition_video.as_mut() {
            video.stop();
        }
        self.main_video = None;
        self.transition_video = None;
        self.pending = None;
        self.current = previous;
        self.start_main_video(tour);

        log::info!("Back to level '{}'", self.current);
        true
    }

    /// Flip the sound flag and re-mute every video slot to match.
    pub fn toggle_sound(&mut self) -> bool {
        self.set_sound(!self.sound_enabled);
        self.sound_enabled
    }

    pub fn set_sound(&mut self, enabled: bool) {
        self.sound_enabled = enabled;
        for video in self.videos_mut() {
            video.set_muted(!enabled);
        }
    }

    /// Both playback slots, whichever are active.
    pub fn videos_mut(&mut self) -> impl Iterator<Item = &mut Playback> {
        [self.main_video.as_mut(), self.transition_video.as_mut()]
            .into_iter()
            .flatten()
    }

    fn arrive(&mut self, tour: &Tour, target: LevelId) {
        self.current = target;
        self.pending = None;
        self.transition_video = None;
        self.start_main_video(tour);
        log::info!("Arrived at level '{}'", self.current);
    }

    fn start_main_video(&mut self, tour: &Tour) {
        self.main_video = match tour.level(&self.current).map(|l| &l.media) {
            Some(Media::Video {
                path,
                looping,
                duration_ms,
            }) => Some(
                Playback::new(path.clone(), *looping, duration_ms.map(Duration::from_millis))
                    .with_muted(!self.sound_enabled),
            ),
            _ => None,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::tour::{Hotspot, Level, Region};

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn enter(session: &mut NavigationSession, tour: &Tour, hotspot: &str) {
        match session.activate_hotspot(tour, hotspot) {
            NavEvent::TransitionStarted(id) => {
                session.on_transition_ended(tour, &id);
            }
            NavEvent::Arrived(_) => {}
            NavEvent::Ignored => panic!("hotspot {hotspot} was ignored"),
        }
    }

    #[test]
    fn test_starts_at_root_with_empty_history() {
        let tour = Tour::village();
        let session = NavigationSession::new(&tour, false);
        assert_eq!(session.current(), "village");
        assert!(session.history().is_empty());
        assert!(!session.is_transitioning());
        assert!(!session.can_go_back());
    }

    #[test]
    fn test_hotspot_plays_transition_then_arrives() {
        let tour = Tour::village();
        let mut session = NavigationSession::new(&tour, false);

        let event = session.activate_hotspot(&tour, "grandparents");
        let id = match event {
            NavEvent::TransitionStarted(id) => id,
            other => panic!("unexpected {other:?}"),
        };
        assert!(session.is_transitioning());
        let video = session.transition_video().unwrap();
        assert_eq!(video.source(), "videos/village-to-house-row.mp4");
        assert!(video.is_muted());

        assert_eq!(
            session.on_transition_ended(&tour, &id),
            NavEvent::Arrived("houseRow".to_string())
        );
        assert_eq!(session.current(), "houseRow");
        assert!(!session.is_transitioning());
        assert!(session.transition_video().is_none());
    }

    #[test]
    fn test_tick_completes_transition_when_video_ends() {
        let tour = Tour::village();
        let mut session = NavigationSession::new(&tour, false);
        session.activate_hotspot(&tour, "grandparents");

        assert_eq!(session.tick(&tour, ms(1000)), None);
        assert_eq!(
            session.tick(&tour, Playback::DEFAULT_DURATION),
            Some(NavEvent::Arrived("houseRow".to_string()))
        );
        assert!(!session.is_transitioning());
    }

    #[test]
    fn test_activation_ignored_while_transitioning() {
        let tour = Tour::village();
        let mut session = NavigationSession::new(&tour, false);
        session.activate_hotspot(&tour, "grandparents");

        for _ in 0..5 {
            assert_eq!(session.activate_hotspot(&tour, "grandparents"), NavEvent::Ignored);
        }
        assert_eq!(session.history(), ["village".to_string()]);
    }

    #[test]
    fn test_stale_transition_end_is_ignored() {
        let tour = Tour::village();
        let mut session = NavigationSession::new(&tour, false);
        session.activate_hotspot(&tour, "grandparents");

        let stale = TransitionId {
            level: "houseRow".to_string(),
            hotspot: "grandparentsClose".to_string(),
        };
        assert_eq!(session.on_transition_ended(&tour, &stale), NavEvent::Ignored);
        assert!(session.is_transitioning());
        assert_eq!(session.current(), "village");
    }

    #[test]
    fn test_forward_then_back_restores_level() {
        let tour = Tour::village();
        let mut session = NavigationSession::new(&tour, false);

        enter(&mut session, &tour, "grandparents");
        enter(&mut session, &tour, "grandparentsClose");
        assert_eq!(session.history().len(), 2);

        assert!(session.go_back(&tour));
        assert_eq!(session.current(), "houseRow");
        assert_eq!(session.history(), ["village".to_string()]);

        assert!(session.go_back(&tour));
        assert_eq!(session.current(), "village");
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_back_on_empty_history_is_noop() {
        let tour = Tour::village();
        let mut session = NavigationSession::new(&tour, true);

        assert!(!session.go_back(&tour));
        assert_eq!(session.current(), "village");
        assert!(!session.is_transitioning());
        assert!(session.sound_enabled());
    }

    #[test]
    fn test_back_during_transition_aborts_it() {
        let tour = Tour::village();
        let mut session = NavigationSession::new(&tour, false);
        session.activate_hotspot(&tour, "grandparents");

        assert!(session.go_back(&tour));
        assert_eq!(session.current(), "village");
        assert!(!session.is_transitioning());
        assert!(session.transition_video().is_none());
        assert_eq!(session.tick(&tour, ms(10_000)), None);
    }

    #[test]
    fn test_looping_level_starts_video_and_back_stops_it() {
        let tour = Tour::village();
        let mut session = NavigationSession::new(&tour, false);
        enter(&mut session, &tour, "grandparents");
        enter(&mut session, &tour, "grandparentsClose");
        enter(&mut session, &tour, "mamawPapawFinal");

        let main = session.main_video().unwrap();
        assert!(main.is_looping());
        assert_eq!(main.source(), "videos/zoom-in-on-mamaw-and-papaw.mp4");

        assert!(session.go_back(&tour));
        assert_eq!(session.current(), "mamawPapawMid");
        assert!(session.main_video().is_none());
    }

    #[test]
    fn test_hotspot_without_transition_moves_immediately() {
        let mut tour = Tour::village();
        tour.levels.insert(
            "shortcut".to_string(),
            Level {
                title: "Shortcut".to_string(),
                media: Media::Image {
                    path: "images/shortcut.png".to_string(),
                },
                hotspots: vec![Hotspot {
                    id: "home".to_string(),
                    label: "Home".to_string(),
                    next_level: "village".to_string(),
                    transition: None,
                    region: Region::percent(0.0, 0.0, 10.0, 10.0),
                }],
            },
        );
        tour.root = "shortcut".to_string();

        let mut session = NavigationSession::new(&tour, false);
        assert_eq!(
            session.activate_hotspot(&tour, "home"),
            NavEvent::Arrived("village".to_string())
        );
        assert!(!session.is_transitioning());
        assert_eq!(session.history(), ["shortcut".to_string()]);
    }

    #[test]
    fn test_shared_transition_video_lands_on_activated_target() {
        let mut tour = Tour::village();
        let shared = tour.level("village").unwrap().hotspots[0].transition.clone();
        tour.levels.get_mut("village").unwrap().hotspots.push(Hotspot {
            id: "skipAhead".to_string(),
            label: "Skip ahead".to_string(),
            next_level: "mamawPapawMid".to_string(),
            transition: shared.clone(),
            region: Region::percent(0.0, 0.0, 10.0, 10.0),
        });
        let tour = tour.into_validated().unwrap();

        let mut session = NavigationSession::new(&tour, false);
        session.activate_hotspot(&tour, "skipAhead");
        assert_eq!(
            session.transition_video().unwrap().source(),
            shared.unwrap().path
        );

        assert_eq!(
            session.tick(&tour, Playback::DEFAULT_DURATION),
            Some(NavEvent::Arrived("mamawPapawMid".to_string()))
        );
        assert_eq!(session.current(), "mamawPapawMid");
        assert_eq!(session.history(), ["village".to_string()]);
    }

    #[test]
    fn test_sound_toggle_remutes_videos() {
        let tour = Tour::village();
        let mut session = NavigationSession::new(&tour, false);
        session.activate_hotspot(&tour, "grandparents");
        assert!(session.transition_video().unwrap().is_muted());

        assert!(session.toggle_sound());
        assert!(!session.transition_video().unwrap().is_muted());

        assert!(!session.toggle_sound());
        assert!(session.transition_video().unwrap().is_muted());
    }

    #[test]
    fn test_unknown_hotspot_is_ignored() {
        let tour = Tour::village();
        let mut session = NavigationSession::new(&tour, false);
        assert_eq!(session.activate_hotspot(&tour, "chimney"), NavEvent::Ignored);
        assert!(session.history().is_empty());
    }
}
