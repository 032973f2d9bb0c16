//! Scene description for the runner
//!
//! `render` reads the simulation state and issues draw calls in back-to-front
//! order. It never mutates the state; scroll offsets are advanced by the
//! simulation.

use glam::Vec2;

use super::surface::{Align, Surface, TextLine};
use super::vertex::colors::{self, with_alpha};
use crate::consts::{CANVAS_H, CANVAS_W};
use crate::i18n::{TextKey, TextSource};
use crate::platform::InputModality;
use crate::sim::{Mode, Obstacle, ObstacleKind, ParallaxLayer, Player, RunnerState};

/// Per-frame context that is not part of the simulation
pub struct FrameView<'a> {
    pub modality: InputModality,
    pub text: &'a dyn TextSource,
}

const SPIKE_WIDTH: f32 = 8.0;
const HUD_MARGIN: f32 = 16.0;
const HUD_BASELINE: f32 = 30.0;

pub fn render(state: &RunnerState, view: &FrameView<'_>, surface: &mut impl Surface) {
    let ground_y = state.tuning().ground_y;

    surface.fill_rect(0.0, 0.0, CANVAS_W, CANVAS_H, colors::BACKGROUND);

    let wrap = state.tuning().parallax_wrap;
    for layer in &state.layers {
        draw_layer(surface, layer, ground_y, wrap);
    }

    draw_ground(surface, ground_y, state.ground_offset, state.tuning().ground_texture_period);

    for obstacle in &state.obstacles {
        let top = ground_y - obstacle.height;
        match obstacle.kind {
            ObstacleKind::Crawler => draw_crawler(surface, obstacle.x, top),
            ObstacleKind::SpikeRow => draw_spikes(surface, obstacle, top),
        }
    }

    draw_player(surface, &state.player, state.on_ground());

    draw_hud(surface, state, view.text);

    match state.mode {
        Mode::Idle => draw_idle_overlay(surface, view),
        Mode::GameOver => draw_game_over_overlay(surface, state, view),
        Mode::Playing => {}
    }
}

/// Buildings at their wrapped positions, with a grid of lit windows
fn draw_layer(surface: &mut impl Surface, layer: &ParallaxLayer, ground_y: f32, wrap: f32) {
    let fill = with_alpha(colors::BUILDING, layer.alpha);
    let window = with_alpha(colors::WINDOW, layer.alpha * 0.5);

    for b in &layer.buildings {
        let mut bx = b.x - layer.offset.rem_euclid(wrap);
        while bx < -b.width {
            bx += wrap;
        }
        if bx >= CANVAS_W + b.width {
            continue;
        }
        let top = ground_y - b.height;
        surface.fill_rect(bx, top, b.width, b.height, fill);

        let mut wy = top + 8.0;
        while wy < ground_y - 4.0 {
            let mut wx = bx + 6.0;
            while wx < bx + b.width - 4.0 {
                surface.fill_rect(wx, wy, 4.0, 4.0, window);
                wx += 10.0;
            }
            wy += 12.0;
        }
    }
}

fn draw_ground(surface: &mut impl Surface, ground_y: f32, offset: f32, period: f32) {
    surface.fill_rect(0.0, ground_y, CANVAS_W, 4.0, colors::GROUND_TOP);
    surface.fill_rect(
        0.0,
        ground_y + 4.0,
        CANVAS_W,
        CANVAS_H - ground_y - 4.0,
        colors::GROUND_FILL,
    );

    let half = period / 2.0;
    let mut gx = -offset;
    while gx < CANVAS_W {
        surface.fill_rect(gx, ground_y + 6.0, half, 2.0, colors::GROUND_PATTERN);
        surface.fill_rect(gx + half, ground_y + 14.0, half, 2.0, colors::GROUND_PATTERN);
        gx += period;
    }
}

/// Hard-hat walker, drawn from its top-left corner
fn draw_crawler(surface: &mut impl Surface, x: f32, y: f32) {
    surface.fill_half_disc(Vec2::new(x + 10.0, y + 6.0), 10.0, colors::HARD_HAT);
    surface.fill_rect(x - 2.0, y + 5.0, 24.0, 4.0, colors::HARD_HAT);

    surface.fill_rect(x + 3.0, y + 9.0, 14.0, 6.0, colors::CRAWLER_FACE);

    surface.fill_rect(x + 5.0, y + 9.0, 3.0, 3.0, colors::EYE_WHITE);
    surface.fill_rect(x + 12.0, y + 9.0, 3.0, 3.0, colors::EYE_WHITE);
    surface.fill_rect(x + 6.0, y + 10.0, 2.0, 2.0, colors::EYE_PUPIL);
    surface.fill_rect(x + 13.0, y + 10.0, 2.0, 2.0, colors::EYE_PUPIL);
}

fn draw_spikes(surface: &mut impl Surface, obstacle: &Obstacle, top: f32) {
    let count = (obstacle.width / SPIKE_WIDTH).floor() as usize;
    let h = obstacle.height;
    let bottom = top + h;

    for i in 0..count {
        let sx = obstacle.x + i as f32 * SPIKE_WIDTH;
        surface.fill_triangle(
            Vec2::new(sx, bottom),
            Vec2::new(sx + SPIKE_WIDTH / 2.0, top),
            Vec2::new(sx + SPIKE_WIDTH, bottom),
            colors::SPIKE,
        );
    }
    // Red tips over the upper 40%
    for i in 0..count {
        let sx = obstacle.x + i as f32 * SPIKE_WIDTH;
        surface.fill_triangle(
            Vec2::new(sx + 2.0, top + h * 0.4),
            Vec2::new(sx + SPIKE_WIDTH / 2.0, top),
            Vec2::new(sx + SPIKE_WIDTH - 2.0, top + h * 0.4),
            colors::DANGER,
        );
    }
}

/// Whether the hit flash is in its dim half (alternating 0.1 s slices)
pub fn hit_flash_dimmed(hit_timer: f32) -> bool {
    hit_timer > 0.0 && ((hit_timer * 10.0).floor() as i64) % 2 == 0
}

/// 20×30 armored runner. Legs depend on pose and run frame.
fn draw_player(surface: &mut impl Surface, player: &Player, on_ground: bool) {
    let Vec2 { x, y } = player.pos;
    let alpha = if hit_flash_dimmed(player.hit_timer) {
        0.5
    } else {
        1.0
    };
    let armor = with_alpha(colors::ARMOR, alpha);
    let light = with_alpha(colors::ARMOR_LIGHT, alpha);
    let skin = with_alpha(colors::SKIN, alpha);
    let boots = with_alpha(colors::BOOTS, alpha);

    // Helmet and gem
    surface.fill_rect(x + 2.0, y, 16.0, 10.0, armor);
    surface.fill_rect(x + 8.0, y + 1.0, 4.0, 4.0, light);
    // Face
    surface.fill_rect(x + 4.0, y + 10.0, 12.0, 6.0, skin);
    // Body and chest plate
    surface.fill_rect(x + 2.0, y + 16.0, 16.0, 8.0, armor);
    surface.fill_rect(x + 6.0, y + 17.0, 8.0, 3.0, light);

    if on_ground {
        let stride = if player.frame == 0 { 0.0 } else { 3.0 };
        surface.fill_rect(x + 3.0, y + 24.0, 5.0, 4.0 + stride, armor);
        surface.fill_rect(x + 12.0, y + 24.0, 5.0, 4.0 + (3.0 - stride), armor);
        surface.fill_rect(x + 2.0, y + 27.0 + stride, 6.0, 3.0, boots);
        surface.fill_rect(x + 11.0, y + 27.0 + (3.0 - stride), 6.0, 3.0, boots);
    } else {
        // Legs together
        surface.fill_rect(x + 4.0, y + 24.0, 5.0, 6.0, armor);
        surface.fill_rect(x + 11.0, y + 24.0, 5.0, 6.0, armor);
        surface.fill_rect(x + 3.0, y + 28.0, 6.0, 2.0, boots);
        surface.fill_rect(x + 11.0, y + 28.0, 6.0, 2.0, boots);
    }

    // Arm cannon
    surface.fill_rect(x + 16.0, y + 16.0, 6.0, 5.0, armor);
    surface.fill_rect(x + 20.0, y + 17.0, 3.0, 3.0, light);
}

/// `LABEL: 00042`
pub fn padded_score(label: &str, value: u64) -> String {
    format!("{}: {:05}", label, value)
}

fn draw_hud(surface: &mut impl Surface, state: &RunnerState, text: &dyn TextSource) {
    surface.text(TextLine::new(
        padded_score(text.text(TextKey::Score), state.display_score()),
        CANVAS_W - HUD_MARGIN,
        HUD_BASELINE,
        16.0,
        colors::TEXT,
        Align::Right,
    ));
    surface.text(TextLine::new(
        padded_score(text.text(TextKey::HighScore), state.high_score),
        HUD_MARGIN,
        HUD_BASELINE,
        16.0,
        colors::PRIMARY,
        Align::Left,
    ));
}

fn draw_idle_overlay(surface: &mut impl Surface, view: &FrameView<'_>) {
    surface.fill_rect(0.0, 0.0, CANVAS_W, CANVAS_H, with_alpha(colors::OVERLAY, 0.6));
    let cx = CANVAS_W / 2.0;
    let cy = CANVAS_H / 2.0;
    surface.text(TextLine::new(
        view.text.text(TextKey::GameTitle),
        cx,
        cy - 30.0,
        20.0,
        colors::PRIMARY,
        Align::Center,
    ));
    let start = if view.modality.is_touch() {
        TextKey::StartMobile
    } else {
        TextKey::Start
    };
    surface.text(TextLine::new(
        view.text.text(start),
        cx,
        cy + 20.0,
        10.0,
        colors::TEXT_DIM,
        Align::Center,
    ));
}

fn draw_game_over_overlay(surface: &mut impl Surface, state: &RunnerState, view: &FrameView<'_>) {
    surface.fill_rect(0.0, 0.0, CANVAS_W, CANVAS_H, with_alpha(colors::OVERLAY, 0.7));
    let cx = CANVAS_W / 2.0;
    let cy = CANVAS_H / 2.0;
    surface.text(TextLine::new(
        view.text.text(TextKey::GameOver),
        cx,
        cy - 40.0,
        20.0,
        colors::DANGER,
        Align::Center,
    ));
    surface.text(TextLine::new(
        format!("{}: {}", view.text.text(TextKey::Score), state.display_score()),
        cx,
        cy + 10.0,
        14.0,
        colors::TEXT,
        Align::Center,
    ));
    // Touch players get the same "tap" prompt for retry
    let retry = if view.modality.is_touch() {
        TextKey::StartMobile
    } else {
        TextKey::Retry
    };
    surface.text(TextLine::new(
        view.text.text(retry),
        cx,
        cy + 50.0,
        10.0,
        colors::TEXT_DIM,
        Align::Center,
    ));
}
