// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Story canvas.
//!
//! Draws the village scene into a fixed 800x600 logical frame scaled to the
//! panel. Static layers are painted back to front, then one overlay per
//! active animation flag, then the dog and the snow. Clicks are mapped back
//! into frame pixels and looked up in a fixed hit table.

use crate::models::scene::{
    AnimationState, SceneFlag, SceneMotion, DOG_PATH, SCENE_HEIGHT, SCENE_WIDTH,
};
use crate::util::geometry::{fit_rect, frame_to_screen, screen_to_frame, FrameRect};
use egui::{Align2, Color32, FontId, Pos2, Rect, Shape, Stroke, Vec2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::PI;

const H: f32 = SCENE_HEIGHT;

/// Result of canvas interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanvasAction {
    None,
    Toggle(SceneFlag),
    Start,
    Replay,
    Share,
}

/// A clickable rectangle in frame pixels mapped to one flag.
#[derive(Debug, Clone, Copy)]
pub struct HitRegion {
    pub rect: FrameRect,
    pub flag: SceneFlag,
}

const fn hit(min_x: f32, min_y: f32, max_x: f32, max_y: f32, flag: SceneFlag) -> HitRegion {
    HitRegion {
        rect: FrameRect {
            min_x,
            min_y,
            max_x,
            max_y,
        },
        flag,
    }
}

/// Hit table, checked in order; the first match wins.
pub const HIT_REGIONS: [HitRegion; 15] = [
    hit(100.0, 150.0, 220.0, 250.0, SceneFlag::DadFalling),
    hit(50.0, H - 250.0, 120.0, H - 150.0, SceneFlag::SnowballFight),
    hit(150.0, H - 280.0, 290.0, H - 200.0, SceneFlag::IceSkatersSlip),
    hit(300.0, 170.0, 400.0, 260.0, SceneFlag::GossipFence),
    hit(450.0, H - 300.0, 550.0, H - 150.0, SceneFlag::SleddingWipeout),
    hit(580.0, H - 200.0, 680.0, H - 150.0, SceneFlag::MarshmallowRoast),
    hit(320.0, H - 180.0, 360.0, H - 160.0, SceneFlag::CarolersSinging),
    hit(260.0, H - 175.0, 290.0, H - 155.0, SceneFlag::MailmanDelivering),
    hit(145.0, 240.0, 205.0, 280.0, SceneFlag::MistletoeKiss),
    hit(670.0, H - 210.0, 750.0, H - 150.0, SceneFlag::HotCocoaStand),
    hit(25.0, H - 175.0, 75.0, H - 135.0, SceneFlag::ChoppingWood),
    hit(150.0, 90.0, 180.0, 120.0, SceneFlag::SantaStuckChimney),
    hit(340.0, H - 250.0, 375.0, H - 225.0, SceneFlag::CatInTree),
    hit(420.0, 235.0, 470.0, 265.0, SceneFlag::Proposal),
    hit(360.0, H - 225.0, 400.0, H - 150.0, SceneFlag::DecoratingTree),
];

/// Flag whose region contains the frame point, if any.
pub fn hit_test(x: f32, y: f32) -> Option<SceneFlag> {
    HIT_REGIONS
        .iter()
        .find(|region| region.rect.contains(x, y))
        .map(|region| region.flag)
}

/// Display the story canvas and handle clicks.
pub fn show(
    ui: &mut egui::Ui,
    state: &AnimationState,
    motion: &mut SceneMotion,
    time: f64,
    started: bool,
) -> CanvasAction {
    let mut action = CanvasAction::None;

    let (available, response) = ui.allocate_exact_size(ui.available_size(), egui::Sense::click());
    let display = fit_rect(available, SCENE_WIDTH / SCENE_HEIGHT);

    let painter = ui.painter_at(display);
    let scene = ScenePainter::new(&painter, display);
    paint_scene(&scene, state, motion, time);

    if response.clicked() {
        if let Some(pos) = response.interact_pointer_pos() {
            if display.contains(pos) {
                let frame = screen_to_frame(pos, display, Vec2::new(SCENE_WIDTH, SCENE_HEIGHT));
                if let Some(flag) = hit_test(frame.x, frame.y) {
                    action = CanvasAction::Toggle(flag);
                }
            }
        }
    }

    if !started {
        painter.rect_filled(display, 8.0, Color32::from_rgba_unmultiplied(30, 58, 138, 50));
        let button = egui::Button::new(
            egui::RichText::new("▶ Start the Story")
                .size(22.0)
                .color(Color32::WHITE),
        )
        .fill(rgb(0xDC2626));
        let rect = Rect::from_center_size(display.center(), Vec2::new(240.0, 56.0));
        if ui.put(rect, button).clicked() {
            action = CanvasAction::Start;
        }
    } else if state.is_finished() {
        let replay = Rect::from_min_size(
            display.right_top() + Vec2::new(-230.0, 16.0),
            Vec2::new(120.0, 28.0),
        );
        let share = Rect::from_min_size(
            display.right_top() + Vec2::new(-100.0, 16.0),
            Vec2::new(84.0, 28.0),
        );
        if ui.put(replay, egui::Button::new("⟲ Watch Again")).clicked() {
            action = CanvasAction::Replay;
        }
        if ui.put(share, egui::Button::new("Share")).clicked() {
            action = CanvasAction::Share;
        }
    }

    action
}

fn rgb(hex: u32) -> Color32 {
    Color32::from_rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
}

fn rgba(r: u8, g: u8, b: u8, a: f32) -> Color32 {
    Color32::from_rgba_unmultiplied(r, g, b, (a * 255.0) as u8)
}

/// Points along a quadratic curve from `from` to `to`.
fn quadratic(from: Pos2, control: Pos2, to: Pos2) -> Vec<Pos2> {
    (0..=16)
        .map(|i| {
            let t = i as f32 / 16.0;
            let u = 1.0 - t;
            Pos2::new(
                u * u * from.x + 2.0 * u * t * control.x + t * t * to.x,
                u * u * from.y + 2.0 * u * t * control.y + t * t * to.y,
            )
        })
        .collect()
}

/// Painter working in frame pixels.
struct ScenePainter<'a> {
    painter: &'a egui::Painter,
    display: Rect,
    scale: f32,
}

impl<'a> ScenePainter<'a> {
    fn new(painter: &'a egui::Painter, display: Rect) -> Self {
        Self {
            painter,
            display,
            scale: display.width() / SCENE_WIDTH,
        }
    }

    fn pos(&self, x: f32, y: f32) -> Pos2 {
        frame_to_screen(Pos2::new(x, y), self.display, Vec2::new(SCENE_WIDTH, SCENE_HEIGHT))
    }

    fn stroke(&self, width: f32, color: Color32) -> Stroke {
        Stroke::new(width * self.scale, color)
    }

    fn rect(&self, x: f32, y: f32, w: f32, h: f32, color: Color32) {
        self.painter
            .rect_filled(Rect::from_two_pos(self.pos(x, y), self.pos(x + w, y + h)), 0.0, color);
    }

    fn stroke_rect(&self, x: f32, y: f32, w: f32, h: f32, width: f32, color: Color32) {
        self.painter.rect_stroke(
            Rect::from_two_pos(self.pos(x, y), self.pos(x + w, y + h)),
            0.0,
            self.stroke(width, color),
        );
    }

    fn circle(&self, x: f32, y: f32, r: f32, color: Color32) {
        self.painter.circle_filled(self.pos(x, y), r * self.scale, color);
    }

    fn line(&self, points: &[(f32, f32)], width: f32, color: Color32) {
        let points = points.iter().map(|&(x, y)| self.pos(x, y)).collect();
        self.painter.add(Shape::line(points, self.stroke(width, color)));
    }

    fn segment(&self, from: (f32, f32), to: (f32, f32), width: f32, color: Color32) {
        self.painter.line_segment(
            [self.pos(from.0, from.1), self.pos(to.0, to.1)],
            self.stroke(width, color),
        );
    }

    fn polygon(&self, points: &[(f32, f32)], color: Color32) {
        let points = points.iter().map(|&(x, y)| self.pos(x, y)).collect();
        self.painter.add(Shape::convex_polygon(points, color, Stroke::NONE));
    }

    fn ellipse_points(cx: f32, cy: f32, rx: f32, ry: f32, rotation: f32) -> Vec<(f32, f32)> {
        let (sin, cos) = rotation.sin_cos();
        (0..32)
            .map(|i| {
                let a = i as f32 / 32.0 * 2.0 * PI;
                let (px, py) = (rx * a.cos(), ry * a.sin());
                (cx + px * cos - py * sin, cy + px * sin + py * cos)
            })
            .collect()
    }

    fn ellipse(&self, cx: f32, cy: f32, rx: f32, ry: f32, rotation: f32, color: Color32) {
        self.polygon(&Self::ellipse_points(cx, cy, rx, ry, rotation), color);
    }

    /// Stroke an arc from `start` to `end` radians, clockwise on screen.
    fn arc(&self, cx: f32, cy: f32, r: f32, start: f32, end: f32, width: f32, color: Color32) {
        let points: Vec<(f32, f32)> = (0..=24)
            .map(|i| {
                let a = start + (end - start) * i as f32 / 24.0;
                (cx + r * a.cos(), cy + r * a.sin())
            })
            .collect();
        self.line(&points, width, color);
    }

    fn curve(
        &self,
        from: (f32, f32),
        control: (f32, f32),
        to: (f32, f32),
        width: f32,
        color: Color32,
    ) {
        let points = quadratic(
            self.pos(from.0, from.1),
            self.pos(control.0, control.1),
            self.pos(to.0, to.1),
        );
        self.painter.add(Shape::line(points, self.stroke(width, color)));
    }

    fn text(&self, x: f32, y: f32, text: &str, size: f32, color: Color32) {
        self.painter.text(
            self.pos(x, y),
            Align2::CENTER_BOTTOM,
            text,
            FontId::proportional(size * self.scale),
            color,
        );
    }

    fn vertical_gradient(&self, x: f32, y: f32, w: f32, h: f32, stops: &[(f32, Color32)]) {
        let mut mesh = egui::Mesh::default();
        for (i, (t, color)) in stops.iter().enumerate() {
            mesh.colored_vertex(self.pos(x, y + h * t), *color);
            mesh.colored_vertex(self.pos(x + w, y + h * t), *color);
            if i > 0 {
                let base = (i as u32 - 1) * 2;
                mesh.add_triangle(base, base + 1, base + 2);
                mesh.add_triangle(base + 1, base + 3, base + 2);
            }
        }
        self.painter.add(Shape::mesh(mesh));
    }
}

/// Arm pose of a gingerbread character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pose {
    Standing,
    Falling,
    Throwing,
    Singing,
    Running,
    Kissing,
    Shocked,
    Chopping,
    Carrying,
    Kneeling,
}

const GINGER: u32 = 0xA0724E;
const ICING: u32 = 0xF0E6D2;
const DARK_GINGER: u32 = 0x6E4F3A;
const SNOW: u32 = 0xFFFAFA;
const RED: u32 = 0xB8313A;
const GOLD: u32 = 0xFFD700;

fn paint_scene(s: &ScenePainter, state: &AnimationState, motion: &mut SceneMotion, time: f64) {
    // Sky and ground
    s.vertical_gradient(0.0, 0.0, SCENE_WIDTH, H, &[(0.0, rgb(0x4A5A7A)), (1.0, rgb(0x6B7B9B))]);
    s.rect(0.0, H - 150.0, SCENE_WIDTH, 150.0, rgb(SNOW));

    // Back layer - houses
    draw_house(s, 100.0, 150.0, 120.0, 100.0, "Main House");
    if state.is_set(SceneFlag::DadFalling) {
        draw_character(s, 160.0, 120.0, 0.8, Pose::Falling);
    } else {
        draw_character(s, 160.0, 135.0, 0.8, Pose::Standing);
    }
    for i in 0..10 {
        let color = if i % 2 == 0 { rgb(RED) } else { rgb(GOLD) };
        s.circle(110.0 + i as f32 * 12.0, 150.0, 3.0, color);
    }
    if state.is_set(SceneFlag::DadTangledLights) {
        draw_tangled_lights(s);
    }

    draw_house(s, 300.0, 170.0, 100.0, 90.0, "Grandparents");
    s.rect(290.0, 260.0, 120.0, 10.0, rgb(0x8B6444));
    if state.is_set(SceneFlag::GossipFence) {
        draw_gossip(s);
    }
    if state.is_set(SceneFlag::CarolersKnocking) {
        draw_carolers_knocking(s);
    }

    draw_house(s, 500.0, 180.0, 110.0, 95.0, "Kids' Cottage");
    // Bite taken out
    s.circle(560.0, 200.0, 25.0, rgb(0x6B7B9B));
    if state.is_set(SceneFlag::KidEatingHouse) {
        draw_character(s, 590.0, 215.0, 0.6, Pose::Carrying);
        s.circle(598.0, 213.0, 3.0, rgb(GINGER));
    }

    // Mid layer - attractions
    draw_tree(s, 350.0, H - 200.0);

    draw_pond(s, 150.0, H - 280.0, 140.0, 80.0);
    let skater = if state.is_set(SceneFlag::IceSkatersSlip) {
        Pose::Falling
    } else {
        Pose::Standing
    };
    draw_character(s, 200.0, H - 250.0, 0.9, skater);
    draw_character(s, 240.0, H - 240.0, 0.9, Pose::Standing);

    // Sledding hill
    let mut hill: Vec<(f32, f32)> = quadratic(
        Pos2::new(450.0, H - 300.0),
        Pos2::new(500.0, H - 250.0),
        Pos2::new(550.0, H - 150.0),
    )
    .into_iter()
    .map(|p| (p.x, p.y))
    .collect();
    hill.push((450.0, H - 150.0));
    s.polygon(&hill, rgb(SNOW));
    if state.is_set(SceneFlag::SleddingWipeout) {
        draw_character(s, 520.0, H - 180.0, 1.0, Pose::Falling);
        s.rect(530.0, H - 170.0, 30.0, 8.0, rgb(RED));
    }

    // Front layer
    draw_firepit(s, 620.0, H - 180.0, time);
    s.rect(580.0, H - 160.0, 40.0, 10.0, rgb(DARK_GINGER));
    s.rect(640.0, H - 160.0, 40.0, 10.0, rgb(DARK_GINGER));
    if state.is_set(SceneFlag::MarshmallowRoast) {
        draw_character(s, 600.0, H - 175.0, 1.0, Pose::Standing);
        s.segment((600.0, H - 175.0), (620.0, H - 185.0), 2.0, rgb(DARK_GINGER));
        s.circle(622.0, H - 186.0, 4.0, rgb(SNOW));
    }

    draw_snowfort(s, 80.0, H - 180.0);
    if state.is_set(SceneFlag::SnowballFight) {
        draw_character(s, 60.0, H - 200.0, 0.9, Pose::Throwing);
        draw_character(s, 100.0, H - 195.0, 0.9, Pose::Standing);
        s.circle(80.0, H - 220.0, 4.0, rgb(SNOW));
    }

    if state.is_set(SceneFlag::DogChasing) {
        draw_dog_chase(s, motion);
    }

    for flag in state.active() {
        match flag {
            SceneFlag::CarolersSinging => draw_carolers(s),
            SceneFlag::MailmanDelivering => draw_mailman(s),
            SceneFlag::MistletoeKiss => draw_mistletoe(s),
            SceneFlag::HotCocoaStand => draw_cocoa_stand(s),
            SceneFlag::ChoppingWood => draw_chopping_wood(s),
            SceneFlag::SantaStuckChimney => draw_santa(s),
            SceneFlag::CatInTree => draw_cat(s),
            SceneFlag::Proposal => draw_proposal(s),
            SceneFlag::DecoratingTree => draw_decorating(s),
            _ => {}
        }
    }

    motion.step(state);
    for particle in motion.snow.particles() {
        s.circle(particle.x, particle.y, particle.size, rgba(255, 255, 255, 0.8));
    }
}

fn draw_gingerbread(s: &ScenePainter, x: f32, y: f32, w: f32, h: f32) {
    s.vertical_gradient(
        x,
        y,
        w,
        h,
        &[(0.0, rgb(GINGER)), (0.5, rgb(0x8B6444)), (1.0, rgb(DARK_GINGER))],
    );
    // Speckles stay put between frames.
    let mut rng = StdRng::seed_from_u64(((x as u64) << 16) ^ y as u64);
    for _ in 0..20 {
        let tx = x + rng.random::<f32>() * w;
        let ty = y + rng.random::<f32>() * h;
        s.rect(tx, ty, 2.0, 2.0, rgba(110, 79, 58, 0.3));
    }
}

fn draw_icing_waves(s: &ScenePainter, x: f32, y: f32) {
    for i in 0..5 {
        s.arc(x + i as f32 * 8.0, y, 4.0, 0.0, -PI, 3.0, rgb(ICING));
    }
}

fn draw_house(s: &ScenePainter, x: f32, y: f32, w: f32, h: f32, label: &str) {
    draw_gingerbread(s, x, y, w, h);

    // Roof
    s.polygon(&[(x - 10.0, y), (x + w / 2.0, y - 40.0), (x + w + 10.0, y)], rgb(DARK_GINGER));
    draw_icing_waves(s, x, y);

    // Door
    s.rect(x + w / 2.0 - 15.0, y + h - 35.0, 30.0, 35.0, rgb(0x5A3825));

    // Window
    s.rect(x + 15.0, y + 20.0, 25.0, 25.0, rgb(0xFFE5B4));
    s.stroke_rect(x + 15.0, y + 20.0, 25.0, 25.0, 2.0, rgb(DARK_GINGER));
    s.segment((x + 27.5, y + 20.0), (x + 27.5, y + 45.0), 2.0, rgb(DARK_GINGER));
    s.segment((x + 15.0, y + 32.5), (x + 40.0, y + 32.5), 2.0, rgb(DARK_GINGER));

    s.text(x + w / 2.0, y + h + 15.0, label, 12.0, Color32::WHITE);
}

fn draw_character(s: &ScenePainter, x: f32, y: f32, scale: f32, pose: Pose) {
    let at = |dx: f32, dy: f32| (x + dx * scale, y + dy * scale);
    let ginger = rgb(GINGER);

    // Body and head
    s.circle(x, y, 8.0 * scale, ginger);
    s.circle(at(0.0, -12.0).0, at(0.0, -12.0).1, 6.0 * scale, ginger);

    // Icing eyes
    for dx in [-2.0, 2.0] {
        let (ex, ey) = at(dx, -12.0);
        s.circle(ex, ey, 1.5 * scale, rgb(ICING));
    }

    let limb = |from: (f32, f32), to: (f32, f32)| {
        s.segment(at(from.0, from.1), at(to.0, to.1), 3.0 * scale, ginger);
    };

    let (left, right) = match pose {
        Pose::Falling => ((-15.0, -8.0), (15.0, -8.0)),
        Pose::Throwing => ((-12.0, -12.0), (15.0, 5.0)),
        Pose::Singing => ((-15.0, 0.0), (15.0, 0.0)),
        Pose::Running => ((-15.0, -5.0), (12.0, 8.0)),
        Pose::Kissing => ((-10.0, 2.0), (10.0, 2.0)),
        Pose::Shocked => ((-15.0, -10.0), (15.0, -10.0)),
        Pose::Chopping => ((-5.0, -15.0), (5.0, -15.0)),
        Pose::Carrying => ((-12.0, 0.0), (12.0, 0.0)),
        Pose::Kneeling | Pose::Standing => ((-12.0, 5.0), (12.0, 5.0)),
    };
    limb((-8.0, -2.0), left);
    limb((8.0, -2.0), right);

    if pose == Pose::Singing {
        let (mx, my) = at(0.0, -10.0);
        s.circle(mx, my, 2.0 * scale, rgb(0x5A3825));
    }

    if pose == Pose::Kneeling {
        // Only one leg visible
        limb((-3.0, 8.0), (-8.0, 15.0));
    } else {
        limb((-3.0, 8.0), (-5.0, 18.0));
        limb((3.0, 8.0), (5.0, 18.0));
    }
}

fn draw_tree(s: &ScenePainter, x: f32, y: f32) {
    s.rect(x - 5.0, y, 10.0, 20.0, rgb(DARK_GINGER));
    for i in 0..3 {
        let i = i as f32;
        s.polygon(
            &[
                (x - 20.0 + i * 5.0, y - i * 15.0),
                (x, y - 25.0 - i * 15.0),
                (x + 20.0 - i * 5.0, y - i * 15.0),
            ],
            rgb(0x2C5530),
        );
    }

    let colors = [rgb(RED), rgb(GOLD), rgb(0x4169E1)];
    let mut rng = StdRng::seed_from_u64(0x7EE);
    for i in 0..8 {
        let ox = x + (rng.random::<f32>() - 0.5) * 30.0;
        let oy = y - 10.0 - rng.random::<f32>() * 50.0;
        s.circle(ox, oy, 3.0, colors[i % colors.len()]);
    }

    // Star on top
    let star: Vec<(f32, f32)> = (0..5)
        .map(|i| {
            let angle = (i as f32 * 4.0 * PI) / 5.0 - PI / 2.0;
            let r = if i % 2 == 0 { 8.0 } else { 4.0 };
            (x + angle.cos() * r, y - 70.0 + angle.sin() * r)
        })
        .collect();
    s.line(&[star.as_slice(), &star[..1]].concat(), 2.0, rgb(GOLD));
    s.circle(x, y - 70.0, 3.0, rgb(GOLD));
}

fn draw_pond(s: &ScenePainter, x: f32, y: f32, w: f32, h: f32) {
    let (cx, cy) = (x + w / 2.0, y + h / 2.0);
    s.ellipse(cx, cy, w / 2.0, h / 2.0, 0.0, rgb(0xB8DDE6));
    s.ellipse(cx, cy, w / 3.0, h / 3.0, 0.0, rgb(0xD5E8F0));
    s.arc(cx - 20.0, cy - 10.0, 30.0, 0.2, 1.5, 2.0, rgba(255, 255, 255, 0.5));
}

fn draw_firepit(s: &ScenePainter, x: f32, y: f32, time: f64) {
    for i in 0..8 {
        let angle = i as f32 * PI * 2.0 / 8.0;
        let (rx, ry) = (x + angle.cos() * 25.0, y + angle.sin() * 25.0);
        s.rect(rx - 5.0, ry - 5.0, 10.0, 10.0, rgb(0x666666));
    }

    let t = (time * 10.0) as f32;
    let flames = [rgb(0xFF6B35), rgb(0xFF8C42), rgb(GOLD)];
    for (i, color) in flames.iter().enumerate() {
        let off = i as f32 * 10.0;
        let flicker = (t + i as f32).sin() * 5.0;
        let mut flame: Vec<(f32, f32)> = quadratic(
            Pos2::new(x - 10.0 + off, y),
            Pos2::new(x - 5.0 + off, y - 20.0 + flicker),
            Pos2::new(x + off, y - 30.0 + flicker),
        )
        .into_iter()
        .chain(quadratic(
            Pos2::new(x + off, y - 30.0 + flicker),
            Pos2::new(x + 5.0 + off, y - 20.0 + flicker),
            Pos2::new(x + 10.0 + off, y),
        ))
        .map(|p| (p.x, p.y))
        .collect();
        flame.dedup();
        s.polygon(&flame, *color);
    }
}

fn draw_snowfort(s: &ScenePainter, x: f32, y: f32) {
    let wall = rgb(SNOW);
    s.rect(x - 40.0, y - 20.0, 15.0, 30.0, wall);
    s.rect(x + 25.0, y - 20.0, 15.0, 30.0, wall);
    s.rect(x - 25.0, y - 15.0, 50.0, 20.0, wall);

    let mut rng = StdRng::seed_from_u64(0xF047);
    for _ in 0..30 {
        let tx = x - 40.0 + rng.random::<f32>() * 80.0;
        let ty = y - 20.0 + rng.random::<f32>() * 30.0;
        s.rect(tx, ty, 2.0, 2.0, rgba(200, 220, 240, 0.5));
    }
}

fn draw_dog_chase(s: &ScenePainter, motion: &SceneMotion) {
    let path: Vec<Pos2> = DOG_PATH.iter().map(|&(x, y)| s.pos(x, y)).collect();
    s.painter.extend(Shape::dashed_line(
        &path,
        s.stroke(2.0, rgba(139, 100, 68, 0.4)),
        5.0 * s.scale,
        10.0 * s.scale,
    ));

    let (x, y) = motion.dog.position();
    let fur = rgb(0x8B6444);
    s.ellipse(x, y, 12.0, 8.0, 0.0, fur);
    s.ellipse(x - 8.0, y - 5.0, 4.0, 6.0, -0.3, fur);
    s.ellipse(x + 8.0, y - 5.0, 4.0, 6.0, 0.3, fur);
    s.arc(x + 10.0, y, 8.0, -PI / 4.0, PI / 4.0, 4.0, fur);

    // Owner running after it
    draw_character(s, x - 35.0, y - 12.0, 0.8, Pose::Running);
}

fn draw_tangled_lights(s: &ScenePainter) {
    let strand: Vec<(f32, f32)> = (0..=12)
        .map(|i| {
            let a = i as f32 / 12.0 * 4.0 * PI;
            (160.0 + a.cos() * 12.0, 128.0 + a.sin() * 8.0 + i as f32 * 0.8)
        })
        .collect();
    s.line(&strand, 1.5, rgb(0x228B22));
    for (i, &(lx, ly)) in strand.iter().enumerate().step_by(2) {
        let color = if i % 4 == 0 { rgb(RED) } else { rgb(GOLD) };
        s.circle(lx, ly, 2.5, color);
    }
}

fn draw_gossip(s: &ScenePainter) {
    draw_character(s, 370.0, 240.0, 0.7, Pose::Standing);
    draw_character(s, 420.0, 240.0, 0.7, Pose::Standing);
    s.circle(380.0, 215.0, 15.0, rgba(255, 255, 255, 0.9));
    s.circle(430.0, 215.0, 15.0, rgba(255, 255, 255, 0.9));
    s.text(380.0, 220.0, "...", 10.0, Color32::BLACK);
    s.text(430.0, 220.0, "...", 10.0, Color32::BLACK);
}

fn draw_carolers_knocking(s: &ScenePainter) {
    draw_character(s, 335.0, 245.0, 0.6, Pose::Singing);
    draw_character(s, 348.0, 242.0, 0.6, Pose::Carrying);
    draw_character(s, 362.0, 246.0, 0.6, Pose::Singing);
    s.text(352.0, 222.0, "knock knock", 8.0, Color32::WHITE);
}

fn draw_carolers(s: &ScenePainter) {
    for (x, dy) in [(320.0, 170.0), (335.0, 175.0), (350.0, 168.0)] {
        draw_character(s, x, H - dy, 0.7, Pose::Singing);
    }
    // Songbooks
    s.rect(318.0, H - 165.0, 8.0, 10.0, rgb(SNOW));
    s.rect(333.0, H - 170.0, 8.0, 10.0, rgb(SNOW));
    s.rect(348.0, H - 163.0, 8.0, 10.0, rgb(SNOW));
    s.text(340.0, H - 190.0, "♪", 12.0, rgb(0x333333));
    s.text(355.0, H - 195.0, "♫", 12.0, rgb(0x333333));
}

fn draw_mailman(s: &ScenePainter) {
    draw_character(s, 270.0, H - 165.0, 0.8, Pose::Carrying);
    s.rect(275.0, H - 160.0, 12.0, 10.0, rgb(RED));
    s.rect(260.0, H - 155.0, 10.0, 8.0, rgb(0x228B22));
    s.segment((275.0, H - 155.0), (287.0, H - 155.0), 1.0, rgb(GOLD));
    s.segment((281.0, H - 160.0), (281.0, H - 150.0), 1.0, rgb(GOLD));
}

fn draw_mistletoe(s: &ScenePainter) {
    s.circle(165.0, 245.0, 8.0, rgb(0x228B22));
    s.circle(163.0, 248.0, 2.0, Color32::RED);
    s.circle(167.0, 248.0, 2.0, Color32::RED);
    draw_character(s, 155.0, 270.0, 0.7, Pose::Kissing);
    draw_character(s, 175.0, 270.0, 0.7, Pose::Kissing);
    // Kid going "eww"
    draw_character(s, 195.0, 275.0, 0.5, Pose::Shocked);
    s.text(197.0, 262.0, "EWW!", 8.0, Color32::WHITE);
}

fn draw_cocoa_stand(s: &ScenePainter) {
    let wood = rgb(GINGER);
    s.rect(680.0, H - 170.0, 50.0, 5.0, wood);
    s.rect(685.0, H - 165.0, 5.0, 15.0, wood);
    s.rect(720.0, H - 165.0, 5.0, 15.0, wood);
    for cx in [690.0, 705.0, 718.0] {
        s.rect(cx, H - 180.0, 8.0, 10.0, rgb(SNOW));
    }
    s.curve(
        (694.0, H - 182.0),
        (696.0, H - 190.0),
        (694.0, H - 195.0),
        1.0,
        rgba(255, 255, 255, 0.5),
    );
    draw_character(s, 735.0, H - 175.0, 0.6, Pose::Standing);
    s.rect(740.0, H - 200.0, 30.0, 20.0, rgb(0x8B4513));
    s.text(755.0, H - 190.0, "HOT", 6.0, Color32::WHITE);
    s.text(755.0, H - 183.0, "COCOA", 6.0, Color32::WHITE);
}

fn draw_chopping_wood(s: &ScenePainter) {
    for i in 0..4 {
        let i = i as f32;
        s.ellipse(35.0 + i * 8.0, H - 140.0 + i * 3.0, 8.0, 4.0, 0.0, rgb(DARK_GINGER));
    }
    draw_character(s, 55.0, H - 165.0, 0.9, Pose::Chopping);
    s.segment((55.0, H - 180.0), (55.0, H - 200.0), 2.0, rgb(DARK_GINGER));
    s.polygon(&[(50.0, H - 200.0), (60.0, H - 200.0), (55.0, H - 210.0)], rgb(0x888888));
}

fn draw_santa(s: &ScenePainter) {
    s.segment((160.0, 115.0), (155.0, 95.0), 5.0, rgb(RED));
    s.segment((170.0, 115.0), (175.0, 95.0), 5.0, rgb(RED));
    s.ellipse(155.0, 92.0, 5.0, 3.0, 0.0, Color32::BLACK);
    s.ellipse(175.0, 92.0, 5.0, 3.0, 0.0, Color32::BLACK);
}

fn draw_cat(s: &ScenePainter) {
    let orange = rgb(0xFF8C00);
    s.ellipse(360.0, H - 235.0, 6.0, 4.0, 0.0, orange);
    s.circle(355.0, H - 238.0, 4.0, orange);
    s.polygon(&[(352.0, H - 242.0), (350.0, H - 248.0), (354.0, H - 244.0)], orange);
    s.polygon(&[(358.0, H - 242.0), (360.0, H - 248.0), (356.0, H - 244.0)], orange);
    s.arc(368.0, H - 235.0, 6.0, PI, PI * 1.5, 2.0, orange);
}

fn draw_proposal(s: &ScenePainter) {
    draw_character(s, 430.0, 255.0, 0.8, Pose::Kneeling);
    draw_character(s, 450.0, 245.0, 0.8, Pose::Shocked);
    s.circle(435.0, 252.0, 3.0, rgb(GOLD));
    s.text(445.0, 228.0, "❤", 14.0, rgb(0xFF69B4));
}

fn draw_decorating(s: &ScenePainter) {
    let ladder = rgb(0x8B4513);
    s.segment((370.0, H - 150.0), (365.0, H - 220.0), 2.0, ladder);
    s.segment((380.0, H - 150.0), (375.0, H - 220.0), 2.0, ladder);
    for i in 0..5 {
        let i = i as f32;
        let y = H - 160.0 - i * 14.0;
        s.segment((370.0 - i, y), (380.0 - i, y), 2.0, ladder);
    }
    draw_character(s, 372.0, H - 210.0, 0.7, Pose::Standing);
    draw_character(s, 390.0, H - 165.0, 0.7, Pose::Standing);
    s.circle(385.0, H - 180.0, 4.0, rgb(RED));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_table_maps_each_vignette() {
        assert_eq!(hit_test(160.0, 200.0), Some(SceneFlag::DadFalling));
        assert_eq!(hit_test(85.0, 400.0), Some(SceneFlag::SnowballFight));
        assert_eq!(hit_test(165.0, 100.0), Some(SceneFlag::SantaStuckChimney));
        assert_eq!(hit_test(445.0, 250.0), Some(SceneFlag::Proposal));
        assert_eq!(hit_test(700.0, 420.0), Some(SceneFlag::HotCocoaStand));
        assert_eq!(hit_test(357.0, 362.0), Some(SceneFlag::CatInTree));
    }

    #[test]
    fn test_first_matching_region_wins() {
        // Inside both the main house and the mistletoe area.
        assert_eq!(hit_test(170.0, 245.0), Some(SceneFlag::DadFalling));
        // Below the house, only the mistletoe remains.
        assert_eq!(hit_test(170.0, 265.0), Some(SceneFlag::MistletoeKiss));
    }

    #[test]
    fn test_empty_sky_has_no_hit() {
        assert_eq!(hit_test(700.0, 40.0), None);
        assert_eq!(hit_test(100.0, 200.0), None);
    }

    #[test]
    fn test_every_region_is_inside_the_frame() {
        for region in HIT_REGIONS {
            let r = region.rect;
            assert!(r.min_x >= 0.0 && r.max_x <= SCENE_WIDTH, "{:?}", region.flag);
            assert!(r.min_y >= 0.0 && r.max_y <= SCENE_HEIGHT, "{:?}", region.flag);
            assert!(r.min_x < r.max_x && r.min_y < r.max_y);
        }
    }

    #[test]
    fn test_quadratic_hits_endpoints() {
        let points = quadratic(Pos2::new(0.0, 0.0), Pos2::new(5.0, 10.0), Pos2::new(10.0, 0.0));
        assert_eq!(points.first(), Some(&Pos2::new(0.0, 0.0)));
        assert_eq!(points.last(), Some(&Pos2::new(10.0, 0.0)));
        assert!((points[8].y - 5.0).abs() < 1e-4);
    }
}
