//! Scene building from a simulation snapshot
//!
//! Pure function of its inputs: no surface, no clock. Entities outside the
//! viewport are culled before any command is emitted for them.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::theme::{Color, colors};
use crate::settings::Settings;
use crate::sim::{Camera, Checkpoint, GameState, Goal, Platform, Player, Viewport, is_visible};
use crate::ui::Hud;

/// Number of background stars
const STAR_COUNT: u32 = 30;
/// Stars scroll at this fraction of the camera speed
const STAR_PARALLAX: f64 = 0.2;
/// Spacing between platform rivets
const RIVET_SPACING: f64 = 25.0;

/// Immutable copy of everything a frame needs to draw
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub player: Player,
    pub platforms: Vec<Platform>,
    pub checkpoints: Vec<Checkpoint>,
    pub goal: Goal,
    pub camera: Camera,
    pub viewport: Viewport,
    pub hud: Hud,
    /// Tick count, seeds the star twinkle
    pub frame: u64,
    /// Host clock, drives the checkpoint pulse
    pub time_ms: f64,
}

impl Snapshot {
    pub fn capture(state: &GameState, time_ms: f64) -> Self {
        Self {
            player: state.player.clone(),
            platforms: state.platforms.clone(),
            checkpoints: state.checkpoints.clone(),
            goal: state.goal.clone(),
            camera: state.camera,
            viewport: state.viewport,
            hud: Hud::from_state(state),
            frame: state.time_ticks,
            time_ms,
        }
    }
}

/// One drawing operation in screen space
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    /// Vertical gradient over a rectangle
    Gradient {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        top: Color,
        bottom: Color,
    },
    FillRect {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        color: Color,
    },
    /// Rectangle with a blurred shadow halo
    Glow {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        color: Color,
        blur: f64,
    },
    Triangle {
        points: [[f64; 2]; 3],
        color: Color,
    },
    Text {
        x: f64,
        y: f64,
        text: String,
        color: Color,
    },
}

fn rect(x: f64, y: f64, w: f64, h: f64, color: Color) -> DrawCmd {
    DrawCmd::FillRect { x, y, w, h, color }
}

fn background(snapshot: &Snapshot, settings: &Settings, out: &mut Vec<DrawCmd>) {
    let Viewport { width, height } = snapshot.viewport;
    out.push(DrawCmd::Gradient {
        x: 0.0,
        y: 0.0,
        w: width,
        h: height,
        top: colors::BACKGROUND_TOP,
        bottom: colors::BACKGROUND_BOTTOM,
    });

    if !settings.starfield {
        return;
    }

    let mut rng = Pcg32::seed_from_u64(snapshot.frame);
    let wrap = width + 800.0;
    for i in 0..STAR_COUNT {
        let x = (i as f64 * 67.0 + snapshot.camera.offset * STAR_PARALLAX) % wrap;
        let y = (i as f64 * 31.0) % height;
        let size = rng.random::<f64>() * 1.2;
        out.push(rect(x, y, size, size, colors::STAR));
    }
}

fn platforms(snapshot: &Snapshot, settings: &Settings, out: &mut Vec<DrawCmd>) {
    for platform in &snapshot.platforms {
        let sx = snapshot.camera.to_screen_x(platform.pos.x);
        if !is_visible(sx, platform.width, snapshot.viewport.width) {
            continue;
        }
        let y = platform.pos.y;

        if settings.glow {
            out.push(DrawCmd::Glow {
                x: sx - 1.0,
                y: y - 1.0,
                w: platform.width + 2.0,
                h: platform.height + 2.0,
                color: colors::PLATFORM,
                blur: 8.0,
            });
        }
        out.push(rect(sx, y, platform.width, platform.height, colors::PLATFORM));

        let mut i = 0.0;
        while i < platform.width {
            out.push(rect(sx + i, y + 2.0, 2.0, 3.0, colors::PLATFORM_RIVET));
            i += RIVET_SPACING;
        }
    }
}

fn checkpoints(snapshot: &Snapshot, settings: &Settings, out: &mut Vec<DrawCmd>) {
    let blur = if settings.effective_pulse() {
        (snapshot.time_ms * 0.01).sin() * 5.0 + 10.0
    } else {
        10.0
    };

    for checkpoint in snapshot.checkpoints.iter().filter(|c| !c.is_claimed()) {
        let sx = snapshot.camera.to_screen_x(checkpoint.pos.x);
        if !is_visible(sx, checkpoint.width, snapshot.viewport.width) {
            continue;
        }
        let y = checkpoint.pos.y;

        if settings.glow {
            out.push(DrawCmd::Glow {
                x: sx - 5.0,
                y: y - 5.0,
                w: checkpoint.width + 10.0,
                h: checkpoint.height + 10.0,
                color: colors::CHECKPOINT,
                blur,
            });
        }
        out.push(rect(sx, y, checkpoint.width, checkpoint.height, colors::CHECKPOINT));
    }
}

fn goal(snapshot: &Snapshot, settings: &Settings, out: &mut Vec<DrawCmd>) {
    let goal = &snapshot.goal;
    let sx = snapshot.camera.to_screen_x(goal.pos.x);
    if !is_visible(sx, goal.width, snapshot.viewport.width) {
        return;
    }
    let y = goal.pos.y;

    if settings.glow {
        out.push(DrawCmd::Glow {
            x: sx - 2.0,
            y: y + 38.0,
            w: goal.width + 4.0,
            h: 24.0,
            color: colors::GOAL,
            blur: 15.0,
        });
    }
    // Base plate, pole, pennant
    out.push(rect(sx, y + 40.0, goal.width, 20.0, colors::GOAL));
    out.push(rect(sx + 40.0, y, 5.0, 40.0, colors::GOAL_POLE));
    out.push(DrawCmd::Triangle {
        points: [[sx + 45.0, y], [sx + 45.0, y + 20.0], [sx + 60.0, y + 10.0]],
        color: colors::GOAL_FLAG,
    });
}

fn player(snapshot: &Snapshot, settings: &Settings, out: &mut Vec<DrawCmd>) {
    let player = &snapshot.player;
    let sx = snapshot.camera.to_screen_x(player.pos.x);
    let y = player.pos.y;

    if settings.glow {
        out.push(DrawCmd::Glow {
            x: sx - 2.0,
            y: y - 2.0,
            w: player.width + 4.0,
            h: player.height + 4.0,
            color: colors::PLAYER,
            blur: 15.0,
        });
    }
    out.push(rect(sx, y, player.width, player.height, colors::PLAYER));
    out.push(rect(sx + 8.0, y + 12.0, 4.0, 4.0, colors::PLAYER_EYES));
    out.push(rect(sx + 18.0, y + 12.0, 4.0, 4.0, colors::PLAYER_EYES));
}

fn hud(snapshot: &Snapshot, settings: &Settings, out: &mut Vec<DrawCmd>) {
    if !settings.show_hud {
        return;
    }

    for (i, line) in snapshot.hud.lines().into_iter().enumerate() {
        out.push(DrawCmd::Text {
            x: 10.0,
            y: 20.0 + i as f64 * 15.0,
            text: line,
            color: colors::HUD_TEXT,
        });
    }

    if snapshot.hud.goal_ahead {
        out.push(DrawCmd::Text {
            x: snapshot.viewport.width - 120.0,
            y: 25.0,
            text: "GOAL AHEAD".to_string(),
            color: colors::GOAL,
        });
    }
}

/// Build the frame: background, static entities, player, HUD, in that order
pub fn build_scene(snapshot: &Snapshot, settings: &Settings) -> Vec<DrawCmd> {
    let mut out = Vec::with_capacity(128);
    background(snapshot, settings, &mut out);
    platforms(snapshot, settings, &mut out);
    checkpoints(snapshot, settings, &mut out);
    goal(snapshot, settings, &mut out);
    player(snapshot, settings, &mut out);
    hud(snapshot, settings, &mut out);
    out
}
