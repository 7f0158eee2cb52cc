// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Story timeline scheduler.
//!
//! The story is a fixed list of cues at absolute offsets from the moment
//! it was started. The app polls the timeline with the current clock and
//! due cues are applied to the animation state in order. Restarting or
//! cancelling drops every pending cue, so nothing from an earlier run can
//! fire after a reset.

use super::scene::{AnimationState, SceneFlag};
use std::time::Duration;

/// Spacing between story beats.
pub const STEP_INTERVAL: Duration = Duration::from_millis(2000);

/// Flags raised by the story, in order, one per `STEP_INTERVAL`.
pub const STORY: [SceneFlag; 16] = [
    SceneFlag::DogChasing,
    SceneFlag::DadFalling,
    SceneFlag::GossipFence,
    SceneFlag::SnowballFight,
    SceneFlag::IceSkatersSlip,
    SceneFlag::SleddingWipeout,
    SceneFlag::MarshmallowRoast,
    SceneFlag::CarolersSinging,
    SceneFlag::MailmanDelivering,
    SceneFlag::MistletoeKiss,
    SceneFlag::ChoppingWood,
    SceneFlag::HotCocoaStand,
    SceneFlag::DecoratingTree,
    SceneFlag::SantaStuckChimney,
    SceneFlag::CatInTree,
    SceneFlag::Proposal,
];

/// What a step does when it comes due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Set(SceneFlag),
    Finish,
}

/// A cue at an offset from the start of the story.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub at: Duration,
    pub cue: Cue,
}

/// Something the timeline did during a poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimelineEvent {
    FlagSet(SceneFlag),
    Finished,
}

/// Drives a step list against a clock.
#[derive(Debug, Clone)]
pub struct Timeline {
    steps: Vec<Step>,
    started_at: Option<Duration>,
    next: usize,
}

impl Timeline {
    /// Build a timeline. Offsets must be non-decreasing.
    pub fn new(steps: Vec<Step>) -> Self {
        debug_assert!(steps.windows(2).all(|w| w[0].at <= w[1].at));
        Self {
            steps,
            started_at: None,
            next: 0,
        }
    }

    /// The village story: every `STORY` flag in turn, then `Finish`.
    pub fn story() -> Self {
        let mut steps: Vec<Step> = STORY
            .iter()
            .enumerate()
            .map(|(i, flag)| Step {
                at: STEP_INTERVAL * i as u32,
                cue: Cue::Set(*flag),
            })
            .collect();
        steps.push(Step {
            at: STEP_INTERVAL * STORY.len() as u32,
            cue: Cue::Finish,
        });
        Self::new(steps)
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Number of steps fired in the current or most recent run.
    pub fn fired(&self) -> usize {
        self.next
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    /// Offset of the last step.
    pub fn total(&self) -> Duration {
        self.steps.last().map(|s| s.at).unwrap_or_default()
    }

    /// Time since `start`, while running.
    pub fn elapsed(&self, now: Duration) -> Option<Duration> {
        self.started_at.map(|start| now.saturating_sub(start))
    }

    /// Reset the animation state and schedule every step from `now`.
    pub fn start(&mut self, now: Duration, state: &mut AnimationState) {
        if self.is_running() {
            log::debug!("Restarting story, dropping {} pending steps", self.pending());
        }
        state.reset();
        self.started_at = Some(now);
        self.next = 0;
        log::info!("Story started with {} steps", self.steps.len());
    }

    /// Drop every pending step. Flags already set are left alone.
    pub fn cancel(&mut self) {
        if self.started_at.take().is_some() {
            log::info!("Story cancelled with {} steps pending", self.pending());
        }
    }

    fn pending(&self) -> usize {
        self.steps.len() - self.next
    }

    /// Apply every step due at `now`, in order.
    pub fn poll(&mut self, now: Duration, state: &mut AnimationState) -> Vec<TimelineEvent> {
        let Some(elapsed) = self.elapsed(now) else {
            return Vec::new();
        };

        let mut events = Vec::new();
        while let Some(step) = self.steps.get(self.next) {
            if step.at > elapsed {
                break;
            }
            match step.cue {
                Cue::Set(flag) => {
                    state.set(flag, true);
                    log::debug!("Story beat: {}", flag.label());
                    events.push(TimelineEvent::FlagSet(flag));
                }
                Cue::Finish => {
                    state.set_finished(true);
                    log::info!("Story finished");
                    events.push(TimelineEvent::Finished);
                }
            }
            self.next += 1;
        }

        if self.next == self.steps.len() {
            self.started_at = None;
        }
        events
    }
}
