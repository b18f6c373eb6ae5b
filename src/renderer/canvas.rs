//! Canvas 2D painter
//!
//! Draws a [`SceneView`] back to front: sky, sun, stars, mountains, clouds,
//! ground, platforms, particles, player, HUD. Canvas calls that can fail are
//! ignored so one bad shape never stops the frame.

use std::f64::consts::TAU;

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::scene::{GroundView, RidgeView, SceneView};
use crate::consts::TILE_SIZE;
use crate::sim::color::Rgb;
use crate::sim::ground::GroundTiles;

/// Puffy cloud outline: start point, then cubic segments (c1, c2, end)
const CLOUD_START: (f64, f64) = (20.0, 30.0);
const CLOUD_CURVES: [[(f64, f64); 3]; 7] = [
    [(10.0, 30.0), (5.0, 22.0), (8.0, 16.0)],
    [(4.0, 5.0), (18.0, 2.0), (24.0, 8.0)],
    [(28.0, 2.0), (40.0, 4.0), (39.0, 14.0)],
    [(48.0, 14.0), (50.0, 22.0), (46.0, 27.0)],
    [(52.0, 40.0), (34.0, 44.0), (30.0, 36.0)],
    [(26.0, 40.0), (16.0, 40.0), (14.0, 34.0)],
    [(10.0, 38.0), (2.0, 36.0), (4.0, 28.0)],
];
const CLOUD_LAYER_OPACITY: f64 = 0.92;
const ACCENT_OPACITY: f64 = 0.25;
const ACCENT_HEIGHT: f64 = 4.0;

/// Paints scene snapshots onto a 2D canvas
pub struct CanvasPainter {
    ctx: CanvasRenderingContext2d,
    /// Device pixels per CSS pixel
    scale: f64,
}

impl CanvasPainter {
    pub fn new(canvas: &HtmlCanvasElement, scale: f64) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self { ctx, scale })
    }

    pub fn set_scale(&mut self, scale: f64) {
        self.scale = scale;
    }

    fn fill(&self, color: Rgb) {
        self.ctx.set_fill_style_str(&color.to_css());
    }

    fn alpha(&self, alpha: f32) {
        self.ctx.set_global_alpha(alpha.clamp(0.0, 1.0) as f64);
    }

    pub fn draw(&self, view: &SceneView<'_>) {
        let ctx = &self.ctx;
        let _ = ctx.set_transform(self.scale, 0.0, 0.0, self.scale, 0.0, 0.0);
        self.alpha(1.0);

        self.draw_sky(view);
        self.draw_ridge(&view.far);
        self.draw_ridge(&view.near);
        self.draw_clouds(view);
        self.draw_ground(&view.ground, view.width);

        self.alpha(1.0);
        for platform in &view.platforms {
            self.fill(platform.color);
            let r = platform.rect;
            ctx.fill_rect(r.left() as f64, r.top() as f64, r.size.x as f64, r.size.y as f64);
        }

        for particle in &view.particles {
            self.alpha(particle.opacity);
            self.fill(particle.color);
            ctx.begin_path();
            let _ = ctx.arc(
                particle.pos.x as f64,
                particle.pos.y as f64,
                particle.radius.max(0.1) as f64,
                0.0,
                TAU,
            );
            ctx.fill();
        }

        self.draw_player(view);
        self.draw_hud(view);
    }

    fn draw_sky(&self, view: &SceneView<'_>) {
        let ctx = &self.ctx;
        let (w, h) = (view.width as f64, view.height as f64);

        let gradient = ctx.create_linear_gradient(0.0, 0.0, 0.0, h);
        let _ = gradient.add_color_stop(0.0, &view.sky.top.to_css());
        let _ = gradient.add_color_stop(0.5, &view.sky.mid.to_css());
        let _ = gradient.add_color_stop(1.0, &view.sky.bot.to_css());
        ctx.set_fill_style_canvas_gradient(&gradient);
        ctx.fill_rect(0.0, 0.0, w, h);

        if let Some(sun) = view.sun {
            self.alpha(sun.opacity);
            ctx.set_fill_style_str("#fff3b0");
            ctx.begin_path();
            let _ = ctx.arc(sun.x as f64, sun.y as f64, sun.radius as f64, 0.0, TAU);
            ctx.fill();
        }

        if view.star_alpha > 0.0 {
            ctx.set_fill_style_str("#ffffff");
            for star in view.stars {
                let twinkle = 0.75 + 0.25 * (view.time * star.twinkle * 2.0).sin();
                self.alpha(view.star_alpha * twinkle);
                ctx.begin_path();
                let _ = ctx.arc(
                    star.pos.x as f64,
                    star.pos.y as f64,
                    star.radius as f64,
                    0.0,
                    TAU,
                );
                ctx.fill();
            }
        }
        self.alpha(1.0);
    }

    fn draw_ridge(&self, ridge: &RidgeView<'_>) {
        let ctx = &self.ctx;
        self.alpha(ridge.style.opacity);
        self.fill(ridge.style.color);
        for [a, b, c] in ridge.triangles() {
            ctx.begin_path();
            ctx.move_to(a.x as f64, a.y as f64);
            ctx.line_to(b.x as f64, b.y as f64);
            ctx.line_to(c.x as f64, c.y as f64);
            ctx.close_path();
            ctx.fill();
        }
        self.alpha(1.0);
    }

    fn draw_clouds(&self, view: &SceneView<'_>) {
        let ctx = &self.ctx;
        ctx.set_fill_style_str("#ffffff");
        for cloud in &view.clouds {
            ctx.save();
            let _ = ctx.translate(cloud.pos.x as f64, cloud.pos.y as f64);
            let _ = ctx.scale(cloud.scale as f64, cloud.scale as f64);
            ctx.set_global_alpha(CLOUD_LAYER_OPACITY * cloud.opacity.clamp(0.0, 1.0) as f64);
            ctx.begin_path();
            ctx.move_to(CLOUD_START.0, CLOUD_START.1);
            for [c1, c2, end] in CLOUD_CURVES {
                ctx.bezier_curve_to(c1.0, c1.1, c2.0, c2.1, end.0, end.1);
            }
            ctx.close_path();
            ctx.fill();
            ctx.restore();
        }
    }

    fn draw_tiles(&self, tiles: &GroundTiles, opacity: f32) {
        self.alpha(opacity);
        let size = TILE_SIZE as f64;
        for tile in tiles.tiles() {
            self.fill(tile.color);
            // Overdraw by a pixel to hide seams between columns
            self.ctx
                .fill_rect(tile.x as f64, tile.y as f64, size + 1.0, size + 1.0);
        }
    }

    fn draw_ground(&self, ground: &GroundView<'_>, width: f32) {
        self.draw_tiles(ground.current, ground.current_opacity());
        if ground.draws_next() {
            self.draw_tiles(ground.next, ground.blend);
        }
        self.ctx.set_global_alpha(ACCENT_OPACITY);
        self.fill(ground.accent);
        self.ctx
            .fill_rect(0.0, ground.accent_y as f64, width as f64, ACCENT_HEIGHT);
        self.alpha(1.0);
    }

    fn draw_player(&self, view: &SceneView<'_>) {
        let ctx = &self.ctx;
        let player = &view.player;

        let shadow = player.shadow;
        self.alpha(shadow.opacity);
        ctx.set_fill_style_str("#000000");
        ctx.begin_path();
        let _ = ctx.ellipse(
            shadow.center.x as f64,
            shadow.center.y as f64,
            shadow.radii.x.max(0.1) as f64,
            shadow.radii.y.max(0.1) as f64,
            0.0,
            0.0,
            TAU,
        );
        ctx.fill();

        self.alpha(1.0);
        self.fill(player.color);
        let r = player.rect;
        ctx.fill_rect(r.left() as f64, r.top() as f64, r.size.x as f64, r.size.y as f64);
    }

    fn draw_hud(&self, view: &SceneView<'_>) {
        let ctx = &self.ctx;
        self.alpha(1.0);
        ctx.set_fill_style_str("#ffffff");
        ctx.set_text_align("left");
        ctx.set_font("bold 24px sans-serif");
        let _ = ctx.fill_text(&format!("Score {}", view.score), 16.0, 36.0);
        ctx.set_font("16px sans-serif");
        let _ = ctx.fill_text(&format!("Best {}", view.best_score), 16.0, 60.0);

        if view.game_over {
            let (cx, cy) = (view.width as f64 / 2.0, view.height as f64 / 2.0);
            ctx.set_text_align("center");
            ctx.set_font("bold 28px sans-serif");
            let _ = ctx.fill_text("Game Over - tap to restart", cx, cy);
            if view.is_new_best() {
                ctx.set_fill_style_str("#ffd54f");
                ctx.set_font("bold 20px sans-serif");
                let _ = ctx.fill_text("New Best Score!", cx, cy + 34.0);
            }
        }
    }
}
