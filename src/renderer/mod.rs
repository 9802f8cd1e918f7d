//! Canvas 2D scene painting
//!
//! Draws the world under the camera transform: background grid, pickups,
//! player, enemy, then loose effect particles. Reads pure geometric state
//! from the sim; never mutates it.

use std::f32::consts::{PI, TAU};
use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::sim::{Barrier, Camera, Enemy, GameSession, Particle, Player};

const BACKGROUND: &str = "#1a1a2e";
const PLAYER_BODY: &str = "#48dbfb";
const ENEMY_BODY: &str = "#ff6b6b";
const SHIELD: &str = "#feca57";
const GRID_SIZE: f64 = 80.0;

pub struct Renderer {
    ctx: CanvasRenderingContext2d,
    /// Device pixel ratio applied before the camera transform
    dpr: f64,
}

impl Renderer {
    pub fn new(ctx: CanvasRenderingContext2d, dpr: f64) -> Self {
        Self { ctx, dpr }
    }

    pub fn set_dpr(&mut self, dpr: f64) {
        self.dpr = dpr;
    }

    /// Paint one frame of the session
    pub fn render(&self, session: &GameSession) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        let cam = &session.camera;

        // Clear in device space
        ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)?;
        ctx.set_fill_style_str(BACKGROUND);
        ctx.fill_rect(
            0.0,
            0.0,
            cam.viewport.x as f64 * self.dpr,
            cam.viewport.y as f64 * self.dpr,
        );

        ctx.save();
        ctx.scale(self.dpr, self.dpr)?;
        ctx.scale(cam.zoom as f64, cam.zoom as f64)?;
        ctx.translate(-cam.pos.x as f64, -cam.pos.y as f64)?;

        self.draw_grid(cam)?;
        for barrier in &session.barriers.active {
            self.draw_barrier(barrier)?;
        }
        self.draw_player(&session.player, session.ticks)?;
        self.draw_enemy(&session.enemy)?;
        self.draw_particles(&session.effects)?;

        ctx.restore();
        Ok(())
    }

    /// Faint world-space grid so camera motion is readable
    fn draw_grid(&self, cam: &Camera) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        let view_w = cam.viewport.x as f64 / cam.zoom as f64;
        let view_h = cam.viewport.y as f64 / cam.zoom as f64;
        let cam_x = cam.pos.x as f64;
        let cam_y = cam.pos.y as f64;

        ctx.set_stroke_style_str("rgba(255, 255, 255, 0.03)");
        ctx.set_line_width(1.0);

        let mut x = (cam_x / GRID_SIZE).floor() * GRID_SIZE;
        while x <= cam_x + view_w {
            ctx.begin_path();
            ctx.move_to(x, cam_y);
            ctx.line_to(x, cam_y + view_h);
            ctx.stroke();
            x += GRID_SIZE;
        }

        let mut y = (cam_y / GRID_SIZE).floor() * GRID_SIZE;
        while y <= cam_y + view_h {
            ctx.begin_path();
            ctx.move_to(cam_x, y);
            ctx.line_to(cam_x + view_w, y);
            ctx.stroke();
            y += GRID_SIZE;
        }
        Ok(())
    }

    fn draw_barrier(&self, barrier: &Barrier) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        let size = barrier.size as f64;

        ctx.save();
        ctx.translate(barrier.pos.x as f64, barrier.pos.y as f64)?;
        ctx.rotate(barrier.rotation as f64)?;

        let pulse = 1.0 + (barrier.pulse_phase.sin() * 0.15) as f64;
        ctx.scale(pulse, pulse)?;

        // Outer ring
        ctx.set_stroke_style_str(SHIELD);
        ctx.set_line_width(2.0);
        ctx.begin_path();
        ctx.arc(0.0, 0.0, size, 0.0, TAU as f64)?;
        ctx.stroke();

        // Shield icon
        ctx.set_fill_style_str(SHIELD);
        ctx.begin_path();
        ctx.move_to(0.0, -size * 0.5);
        ctx.line_to(size * 0.3, -size * 0.2);
        ctx.line_to(size * 0.3, size * 0.3);
        ctx.line_to(-size * 0.3, size * 0.3);
        ctx.line_to(-size * 0.3, -size * 0.2);
        ctx.close_path();
        ctx.fill();

        // Inner facet
        ctx.set_fill_style_str("#ffffff");
        ctx.begin_path();
        ctx.move_to(0.0, -size * 0.25);
        ctx.line_to(size * 0.15, 0.0);
        ctx.line_to(0.0, size * 0.25);
        ctx.line_to(-size * 0.15, 0.0);
        ctx.close_path();
        ctx.fill();

        ctx.restore();
        Ok(())
    }

    fn draw_player(&self, player: &Player, ticks: u64) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        self.draw_particles(&player.particles)?;

        let x = player.pos.x as f64;
        let y = player.pos.y as f64;
        let size = player.size as f64;

        ctx.save();

        if player.is_dashing {
            let scale = 1.0 + ((ticks as f32 * 0.6).sin() * 0.2) as f64;
            ctx.translate(x, y)?;
            ctx.scale(scale, scale)?;
            ctx.translate(-x, -y)?;
        }

        ctx.set_fill_style_str(PLAYER_BODY);
        ctx.begin_path();
        ctx.arc(x, y, size, 0.0, TAU as f64)?;
        ctx.fill();

        // Face
        ctx.set_fill_style_str("#ffffff");
        ctx.begin_path();
        ctx.arc(x - 5.0, y - 3.0, 4.0, 0.0, TAU as f64)?;
        ctx.arc(x + 5.0, y - 3.0, 4.0, 0.0, TAU as f64)?;
        ctx.fill();

        ctx.set_fill_style_str(ENEMY_BODY);
        ctx.begin_path();
        ctx.arc(x, y + 5.0, 3.0, 0.0, PI as f64)?;
        ctx.fill();

        // Dash cooldown ring
        if player.dash_cooldown > 0 {
            let remaining = player.dash_cooldown_fraction() as f64;
            ctx.set_stroke_style_str(SHIELD);
            ctx.set_line_width(3.0);
            ctx.begin_path();
            ctx.arc(
                x,
                y,
                size + 8.0,
                -PI as f64 / 2.0,
                -PI as f64 / 2.0 + TAU as f64 * (1.0 - remaining),
            )?;
            ctx.stroke();
        }

        // Invulnerability shimmer
        if player.is_invulnerable() {
            let alpha = 0.5 + ((ticks as f32 * 0.6).sin() * 0.3) as f64;
            ctx.set_stroke_style_str(&format!("rgba(255, 255, 255, {alpha:.2})"));
            ctx.set_line_width(2.0);
            ctx.begin_path();
            ctx.arc(x, y, size + 5.0, 0.0, TAU as f64)?;
            ctx.stroke();
        }

        ctx.restore();
        Ok(())
    }

    fn draw_enemy(&self, enemy: &Enemy) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        self.draw_particles(&enemy.particles)?;

        let size = enemy.size as f64;

        ctx.save();
        ctx.translate(enemy.pos.x as f64, enemy.pos.y as f64)?;
        ctx.rotate((enemy.heading + PI / 2.0) as f64)?;

        let pulse = 1.0 + (enemy.pulse_phase.sin() * 0.1) as f64;
        ctx.scale(pulse, pulse)?;

        ctx.set_fill_style_str(ENEMY_BODY);
        ctx.begin_path();
        ctx.arc(0.0, 0.0, size, 0.0, TAU as f64)?;
        ctx.fill();

        // Label
        ctx.set_fill_style_str("#ffffff");
        ctx.set_font(&format!("bold {}px Arial", (size * 0.7) as u32));
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");
        ctx.fill_text("69", 0.0, 0.0)?;

        // Eyes
        ctx.set_fill_style_str("#ffffff");
        ctx.begin_path();
        ctx.arc(-size * 0.25, -size * 0.15, size * 0.12, 0.0, TAU as f64)?;
        ctx.arc(size * 0.25, -size * 0.15, size * 0.12, 0.0, TAU as f64)?;
        ctx.fill();

        ctx.set_fill_style_str("#000000");
        ctx.begin_path();
        ctx.arc(-size * 0.25, -size * 0.15, size * 0.06, 0.0, TAU as f64)?;
        ctx.arc(size * 0.25, -size * 0.15, size * 0.06, 0.0, TAU as f64)?;
        ctx.fill();

        // Brows
        ctx.set_stroke_style_str("#000000");
        ctx.set_line_width(2.0);
        ctx.begin_path();
        ctx.move_to(-size * 0.35, -size * 0.3);
        ctx.line_to(-size * 0.15, -size * 0.25);
        ctx.move_to(size * 0.35, -size * 0.3);
        ctx.line_to(size * 0.15, -size * 0.25);
        ctx.stroke();

        ctx.restore();
        Ok(())
    }

    fn draw_particles(&self, particles: &[Particle]) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        for p in particles {
            ctx.save();
            ctx.set_global_alpha(p.alpha() as f64);
            ctx.set_fill_style_str(p.color.css());
            ctx.begin_path();
            ctx.arc(p.pos.x as f64, p.pos.y as f64, p.size as f64, 0.0, TAU as f64)?;
            ctx.fill();
            ctx.restore();
        }
        Ok(())
    }
}
