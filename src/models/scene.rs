// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Story scene state.
//!
//! `AnimationState` holds the named vignette flags that the timeline and
//! direct clicks toggle. `SceneMotion` holds what the renderer advances
//! every frame: the snow field and the dog's progress along its path.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Logical width of the scene frame in pixels.
pub const SCENE_WIDTH: f32 = 800.0;
/// Logical height of the scene frame in pixels.
pub const SCENE_HEIGHT: f32 = 600.0;

/// One named vignette in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneFlag {
    DadFalling,
    DadTangledLights,
    DogChasing,
    SnowballFight,
    IceSkatersSlip,
    SleddingWipeout,
    CarolersSinging,
    CarolersKnocking,
    GossipFence,
    MarshmallowRoast,
    MailmanDelivering,
    MistletoeKiss,
    KidEatingHouse,
    ChoppingWood,
    HotCocoaStand,
    DecoratingTree,
    SantaStuckChimney,
    CatInTree,
    Proposal,
}

impl SceneFlag {
    pub const COUNT: usize = 19;

    pub const ALL: [SceneFlag; Self::COUNT] = [
        SceneFlag::DadFalling,
        SceneFlag::DadTangledLights,
        SceneFlag::DogChasing,
        SceneFlag::SnowballFight,
        SceneFlag::IceSkatersSlip,
        SceneFlag::SleddingWipeout,
        SceneFlag::CarolersSinging,
        SceneFlag::CarolersKnocking,
        SceneFlag::GossipFence,
        SceneFlag::MarshmallowRoast,
        SceneFlag::MailmanDelivering,
        SceneFlag::MistletoeKiss,
        SceneFlag::KidEatingHouse,
        SceneFlag::ChoppingWood,
        SceneFlag::HotCocoaStand,
        SceneFlag::DecoratingTree,
        SceneFlag::SantaStuckChimney,
        SceneFlag::CatInTree,
        SceneFlag::Proposal,
    ];

    fn index(self) -> usize {
        self as usize
    }

    /// Human readable name for panels and logs.
    pub fn label(self) -> &'static str {
        match self {
            SceneFlag::DadFalling => "Dad falls off the roof",
            SceneFlag::DadTangledLights => "Dad tangled in lights",
            SceneFlag::DogChasing => "Dog chase",
            SceneFlag::SnowballFight => "Snowball fight",
            SceneFlag::IceSkatersSlip => "Ice skaters slip",
            SceneFlag::SleddingWipeout => "Sledding wipeout",
            SceneFlag::CarolersSinging => "Carolers singing",
            SceneFlag::CarolersKnocking => "Carolers knocking",
            SceneFlag::GossipFence => "Gossip at the fence",
            SceneFlag::MarshmallowRoast => "Marshmallow roast",
            SceneFlag::MailmanDelivering => "Mailman delivering",
            SceneFlag::MistletoeKiss => "Mistletoe kiss",
            SceneFlag::KidEatingHouse => "Kid eating the house",
            SceneFlag::ChoppingWood => "Chopping wood",
            SceneFlag::HotCocoaStand => "Hot cocoa stand",
            SceneFlag::DecoratingTree => "Decorating the tree",
            SceneFlag::SantaStuckChimney => "Santa stuck in chimney",
            SceneFlag::CatInTree => "Cat in the tree",
            SceneFlag::Proposal => "Proposal",
        }
    }
}

/// Vignette flags plus the story's finished marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AnimationState {
    flags: [bool; SceneFlag::COUNT],
    finished: bool,
}

impl AnimationState {
    /// Clear every flag and the finished marker.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_set(&self, flag: SceneFlag) -> bool {
        self.flags[flag.index()]
    }

    pub fn set(&mut self, flag: SceneFlag, value: bool) {
        self.flags[flag.index()] = value;
    }

    /// Flip a flag, returning its new value.
    pub fn toggle(&mut self, flag: SceneFlag) -> bool {
        let value = !self.is_set(flag);
        self.set(flag, value);
        value
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn set_finished(&mut self, finished: bool) {
        self.finished = finished;
    }

    /// Flags currently set, in declaration order.
    pub fn active(&self) -> impl Iterator<Item = SceneFlag> + '_ {
        SceneFlag::ALL.into_iter().filter(|f| self.is_set(*f))
    }

    pub fn any_set(&self) -> bool {
        self.flags.iter().any(|f| *f)
    }
}

/// A single snowflake.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnowParticle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub size: f32,
}

/// Falling snow across the scene frame.
#[derive(Debug, Clone)]
pub struct SnowField {
    particles: Vec<SnowParticle>,
    width: f32,
    height: f32,
    intensity: f32,
    rng: StdRng,
}

impl SnowField {
    /// Particles per unit of intensity.
    pub const BASE_COUNT: f32 = 100.0;

    /// Number of particles for an intensity multiplier, truncated.
    pub fn particle_count(intensity: f32) -> usize {
        // Slider steps like 0.7 are not exact in f32.
        (Self::BASE_COUNT * intensity.max(0.0) + 1e-3).floor() as usize
    }

    pub fn new(width: f32, height: f32, intensity: f32, seed: u64) -> Self {
        let mut field = Self {
            particles: Vec::new(),
            width,
            height,
            intensity,
            rng: StdRng::seed_from_u64(seed),
        };
        field.populate();
        field
    }

    fn populate(&mut self) {
        let count = Self::particle_count(self.intensity);
        self.particles.clear();
        self.particles.reserve(count);
        for _ in 0..count {
            let particle = SnowParticle {
                x: self.rng.random::<f32>() * self.width,
                y: self.rng.random::<f32>() * self.height,
                vx: (self.rng.random::<f32>() - 0.5) * 0.5,
                vy: self.rng.random::<f32>() + 0.5,
                size: self.rng.random::<f32>() * 3.0 + 1.0,
            };
            self.particles.push(particle);
        }
    }

    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    /// Change the intensity, re-seeding the field when it differs.
    pub fn set_intensity(&mut self, intensity: f32) {
        if (intensity - self.intensity).abs() > f32::EPSILON {
            self.intensity = intensity;
            self.populate();
            log::debug!("Snow re-seeded with {} particles", self.particles.len());
        }
    }

    pub fn particles(&self) -> &[SnowParticle] {
        &self.particles
    }

    /// Move every particle one frame, wrapping at the frame edges.
    pub fn step(&mut self) {
        let (width, height) = (self.width, self.height);
        for particle in self.particles.iter_mut() {
            particle.x += particle.vx;
            particle.y += particle.vy;

            if particle.y > height {
                particle.y = 0.0;
                particle.x = self.rng.random::<f32>() * width;
            }
            if particle.x < 0.0 {
                particle.x = width;
            }
            if particle.x > width {
                particle.x = 0.0;
            }
        }
    }
}

/// Waypoints of the dog's chase path in frame pixels.
pub const DOG_PATH: [(f32, f32); 7] = [
    (50.0, 400.0),
    (150.0, 350.0),
    (250.0, 380.0),
    (350.0, 340.0),
    (450.0, 370.0),
    (550.0, 350.0),
    (650.0, 380.0),
];

/// The dog's progress along `DOG_PATH`, in 0.0..1.0.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DogChase {
    progress: f32,
}

impl DogChase {
    pub const SPEED: f32 = 0.005;

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn advance(&mut self) {
        self.progress += Self::SPEED;
        if self.progress >= 1.0 {
            self.progress = 0.0;
        }
    }

    /// Interpolated position on the path.
    pub fn position(&self) -> (f32, f32) {
        let segments = (DOG_PATH.len() - 1) as f32;
        let scaled = self.progress.clamp(0.0, 1.0) * segments;
        let index = (scaled.floor() as usize).min(DOG_PATH.len() - 2);
        let t = scaled - index as f32;

        let (x0, y0) = DOG_PATH[index];
        let (x1, y1) = DOG_PATH[index + 1];
        (x0 + (x1 - x0) * t, y0 + (y1 - y0) * t)
    }
}

/// Per-frame moving parts of the scene.
#[derive(Debug, Clone)]
pub struct SceneMotion {
    pub snow: SnowField,
    pub dog: DogChase,
}

impl SceneMotion {
    pub fn new(intensity: f32, seed: u64) -> Self {
        Self {
            snow: SnowField::new(SCENE_WIDTH, SCENE_HEIGHT, intensity, seed),
            dog: DogChase::default(),
        }
    }

    /// Advance one display frame. The dog only runs while its flag is set.
    pub fn step(&mut self, state: &AnimationState) {
        self.snow.step();
        if state.is_set(SceneFlag::DogChasing) {
            self.dog.advance();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_clears_all_flags() {
        let mut state = AnimationState::default();
        for flag in SceneFlag::ALL {
            state.set(flag, true);
        }
        state.set_finished(true);

        state.reset();
        assert!(!state.any_set());
        assert!(!state.is_finished());
    }

    #[test]
    fn test_toggle_flips_only_one_flag() {
        let mut state = AnimationState::default();
        assert!(state.toggle(SceneFlag::Proposal));
        assert_eq!(state.active().collect::<Vec<_>>(), vec![SceneFlag::Proposal]);
        assert!(!state.toggle(SceneFlag::Proposal));
        assert!(!state.any_set());
    }

    #[test]
    fn test_particle_count_scales_with_intensity() {
        let one = SnowField::new(SCENE_WIDTH, SCENE_HEIGHT, 1.0, 7);
        let two = SnowField::new(SCENE_WIDTH, SCENE_HEIGHT, 2.0, 7);
        assert_eq!(one.particles().len(), 100);
        assert_eq!(two.particles().len(), 200);
        assert_eq!(SnowField::particle_count(0.7), 70);
        assert_eq!(SnowField::particle_count(0.15), 15);
        assert_eq!(SnowField::particle_count(1.239), 123);
    }

    #[test]
    fn test_particles_start_inside_frame() {
        let field = SnowField::new(SCENE_WIDTH, SCENE_HEIGHT, 1.5, 3);
        for p in field.particles() {
            assert!((0.0..=SCENE_WIDTH).contains(&p.x));
            assert!((0.0..=SCENE_HEIGHT).contains(&p.y));
            assert!((-0.25..=0.25).contains(&p.vx));
            assert!((0.5..=1.5).contains(&p.vy));
            assert!((1.0..=4.0).contains(&p.size));
        }
    }

    #[test]
    fn test_snow_wraps_at_edges() {
        let mut field = SnowField::new(100.0, 100.0, 0.03, 11);
        let flake = |x: f32, y: f32, vx: f32, vy: f32| SnowParticle {
            x,
            y,
            vx,
            vy,
            size: 1.0,
        };
        field.particles = vec![
            flake(50.0, 99.9, 0.0, 1.0),
            flake(0.1, 10.0, -0.2, 0.5),
            flake(99.9, 10.0, 0.2, 0.5),
        ];

        field.step();
        let p = field.particles();
        assert_eq!(p[0].y, 0.0);
        assert!((0.0..=100.0).contains(&p[0].x));
        assert_eq!(p[1].x, 100.0);
        assert_eq!(p[2].x, 0.0);
    }

    #[test]
    fn test_set_intensity_reseeds_only_on_change() {
        let mut field = SnowField::new(SCENE_WIDTH, SCENE_HEIGHT, 1.0, 5);
        let before = field.particles().to_vec();
        field.set_intensity(1.0);
        assert_eq!(field.particles(), before.as_slice());

        field.set_intensity(0.5);
        assert_eq!(field.particles().len(), 50);
    }

    #[test]
    fn test_dog_position_interpolates_and_wraps() {
        let mut dog = DogChase::default();
        assert_eq!(dog.position(), DOG_PATH[0]);

        // Halfway along the first of six segments.
        dog.progress = 1.0 / 12.0;
        let (x, y) = dog.position();
        assert!((x - 100.0).abs() < 1e-3);
        assert!((y - 375.0).abs() < 1e-3);

        dog.progress = 0.999;
        dog.advance();
        assert_eq!(dog.progress(), 0.0);
    }

    #[test]
    fn test_dog_only_runs_while_chasing() {
        let mut motion = SceneMotion::new(0.1, 1);
        let mut state = AnimationState::default();

        motion.step(&state);
        assert_eq!(motion.dog.progress(), 0.0);

        state.set(SceneFlag::DogChasing, true);
        motion.step(&state);
        assert!((motion.dog.progress() - DogChase::SPEED).abs() < 1e-6);
    }
}
