// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Video playback clocks.
//!
//! A playback tracks position, mute state, and completion for one video
//! slot. It is driven by frame deltas from the app, so "video ended" is an
//! explicit edge rather than a callback from a media element.

use std::time::Duration;

/// Playback state of a video slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Playing,
    Paused,
    Ended,
}

/// Clock for a single video.
#[derive(Debug, Clone, PartialEq)]
pub struct Playback {
    source: String,
    looping: bool,
    muted: bool,
    duration: Duration,
    position: Duration,
    state: PlaybackState,
}

impl Playback {
    /// Duration used when neither the tour nor the decoder knows better.
    pub const DEFAULT_DURATION: Duration = Duration::from_millis(3000);

    /// Start playing `source` from the beginning.
    pub fn new(source: impl Into<String>, looping: bool, duration: Option<Duration>) -> Self {
        Self {
            source: source.into(),
            looping,
            muted: true,
            duration: duration.unwrap_or(Self::DEFAULT_DURATION),
            position: Duration::ZERO,
            state: PlaybackState::Playing,
        }
    }

    pub fn with_muted(mut self, muted: bool) -> Self {
        self.muted = muted;
        self
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn position(&self) -> Duration {
        self.position
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Replace the duration once the decoder has probed the file.
    ///
    /// A position already past the new end is resolved by the next
    /// `advance`, so the ended edge is still reported there.
    pub fn set_duration(&mut self, duration: Duration) {
        self.duration = duration;
    }

    /// Fraction of the video played, in 0.0..=1.0.
    pub fn progress(&self) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.position.as_secs_f32() / self.duration.as_secs_f32()).clamp(0.0, 1.0)
    }

    /// Advance the clock by `dt`.
    ///
    /// Returns `true` only on the step where a non-looping video reaches
    /// its end.
    pub fn advance(&mut self, dt: Duration) -> bool {
        if self.state != PlaybackState::Playing {
            return false;
        }

        self.position += dt;
        if self.position < self.duration {
            return false;
        }

        if self.looping {
            let total = self.duration.as_nanos();
            self.position = if total == 0 {
                Duration::ZERO
            } else {
                Duration::from_nanos((self.position.as_nanos() % total) as u64)
            };
            false
        } else {
            self.position = self.duration;
            self.state = PlaybackState::Ended;
            true
        }
    }

    pub fn pause(&mut self) {
        if self.state == PlaybackState::Playing {
            self.state = PlaybackState::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.state == PlaybackState::Paused {
            self.state = PlaybackState::Playing;
        }
    }

    /// Pause and rewind to the start.
    pub fn stop(&mut self) {
        self.position = Duration::ZERO;
        self.state = PlaybackState::Paused;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_ended_edge_fires_once() {
        let mut playback = Playback::new("a.mp4", false, Some(ms(1000)));

        assert!(!playback.advance(ms(600)));
        assert!(playback.advance(ms(600)));
        assert_eq!(playback.state(), PlaybackState::Ended);
        assert_eq!(playback.position(), ms(1000));
        assert!(!playback.advance(ms(600)));
    }

    #[test]
    fn test_looping_wraps_without_ending() {
        let mut playback = Playback::new("loop.mp4", true, Some(ms(1000)));

        assert!(!playback.advance(ms(2500)));
        assert_eq!(playback.state(), PlaybackState::Playing);
        assert_eq!(playback.position(), ms(500));
    }

    #[test]
    fn test_default_duration_and_mute() {
        let playback = Playback::new("a.mp4", false, None).with_muted(false);
        assert_eq!(playback.duration(), Playback::DEFAULT_DURATION);
        assert!(!playback.is_muted());
    }

    #[test]
    fn test_paused_does_not_advance() {
        let mut playback = Playback::new("a.mp4", false, Some(ms(1000)));
        playback.pause();
        assert!(!playback.advance(ms(5000)));
        assert_eq!(playback.position(), Duration::ZERO);

        playback.resume();
        playback.advance(ms(250));
        assert!((playback.progress() - 0.25).abs() < 1e-4);
    }

    #[test]
    fn test_stop_rewinds() {
        let mut playback = Playback::new("a.mp4", true, Some(ms(1000)));
        playback.advance(ms(400));
        playback.stop();
        assert_eq!(playback.position(), Duration::ZERO);
        assert_eq!(playback.state(), PlaybackState::Paused);
    }

    #[test]
    fn test_shorter_probed_duration_ends_playback() {
        let mut playback = Playback::new("a.mp4", false, None);
        playback.advance(ms(2000));
        playback.set_duration(ms(1500));
        assert_eq!(playback.state(), PlaybackState::Playing);
        assert!(playback.advance(Duration::ZERO));
        assert_eq!(playback.state(), PlaybackState::Ended);
    }
}
