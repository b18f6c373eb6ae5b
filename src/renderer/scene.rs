//! Per-frame scene snapshot
//!
//! Everything the painter needs, already resolved to positions, colours and
//! opacities. Capturing borrows the state immutably; nothing flows back.

use glam::Vec2;

use crate::settings::Settings;
use crate::sim::biome::BiomeDef;
use crate::sim::collision::Aabb;
use crate::sim::color::Rgb;
use crate::sim::daynight::{self, SkyPalette, Sun};
use crate::sim::ground::GroundTiles;
use crate::sim::scenery::{self, CLOUD_COUNT, Cloud, Ridge, RidgeStyle, Star};
use crate::sim::state::GameState;

/// Platforms within this distance above the ground line take the dirt colour
pub const GROUND_MERGE_DISTANCE: f32 = 24.0;
/// Height above ground at which the shadow stops shrinking
const SHADOW_FALLOFF: f32 = 600.0;
const SHADOW_MIN_SCALE: f32 = 0.4;

const PLAYER_GROUNDED: Rgb = Rgb::hex(0xffcc00);
const PLAYER_AIRBORNE: Rgb = Rgb::hex(0xff8c42);

/// A parallax ridge with its tint and per-peak horizontal offset
#[derive(Debug, Clone, Copy)]
pub struct RidgeView<'a> {
    ridge: &'a Ridge,
    pub style: RidgeStyle,
    /// `Some(t)` drifts peaks with time `t`
    drift: Option<f32>,
    width: f32,
}

impl<'a> RidgeView<'a> {
    /// Triangle outlines to fill, malformed peaks skipped
    pub fn triangles(&self) -> impl Iterator<Item = [Vec2; 3]> + 'a {
        let (drift, width) = (self.drift, self.width);
        self.ridge.silhouettes().map(move |(i, s)| {
            let dx = drift.map_or(0.0, |t| scenery::near_drift(t, i, width));
            s.points.map(|p| p + Vec2::new(dx, 0.0))
        })
    }
}

/// Both ground buffers and how far the cross-fade has progressed
#[derive(Debug, Clone, Copy)]
pub struct GroundView<'a> {
    pub current: &'a GroundTiles,
    pub next: &'a GroundTiles,
    /// Opacity of `next`; `current` is drawn at `1 - blend`
    pub blend: f32,
    /// Thin strip along the ground line
    pub accent: Rgb,
    pub accent_y: f32,
}

impl GroundView<'_> {
    pub fn current_opacity(&self) -> f32 {
        1.0 - self.blend
    }

    /// The incoming buffer is only drawn mid-fade
    pub fn draws_next(&self) -> bool {
        self.blend > 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlatformView {
    pub rect: Aabb,
    pub color: Rgb,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleView {
    pub pos: Vec2,
    pub radius: f32,
    pub color: Rgb,
    pub opacity: f32,
}

/// Ellipse under the player
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowView {
    pub center: Vec2,
    pub radii: Vec2,
    pub opacity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerView {
    /// Drawn box after squash/stretch, centred on the body
    pub rect: Aabb,
    pub color: Rgb,
    pub shadow: ShadowView,
}

/// Read-only view of one frame
#[derive(Debug, Clone)]
pub struct SceneView<'a> {
    pub width: f32,
    pub height: f32,
    /// Seconds since the run started
    pub time: f32,
    pub sky: SkyPalette,
    pub sun: Option<Sun>,
    pub star_alpha: f32,
    pub stars: &'a [Star],
    pub far: RidgeView<'a>,
    pub near: RidgeView<'a>,
    pub clouds: [Cloud; CLOUD_COUNT],
    pub ground: GroundView<'a>,
    pub platforms: Vec<PlatformView>,
    pub particles: Vec<ParticleView>,
    pub player: PlayerView,
    pub score: u64,
    pub best_score: u64,
    pub game_over: bool,
}

impl<'a> SceneView<'a> {
    pub fn capture(state: &'a GameState, settings: &Settings) -> Self {
        let (width, height) = (state.viewport.width, state.viewport.height);
        let ground_y = state.viewport.ground_y();
        let t = state.cycle_phase();
        let day_factor = daynight::day_factor(t);
        let biome = state.biome.current();

        let drift = (!settings.reduced_motion).then_some(state.elapsed);
        let far = RidgeView {
            ridge: &state.scenery.far,
            style: scenery::far_style(day_factor),
            drift: None,
            width,
        };
        let near = RidgeView {
            ridge: &state.scenery.near,
            style: scenery::near_style(day_factor),
            drift,
            width,
        };

        let blend = state.biome.blend();
        let ground = GroundView {
            current: state.ground.get(state.biome.active),
            next: state.ground.get(state.biome.inactive()),
            blend,
            accent: biome.accent.mix(state.biome.next().accent, blend),
            accent_y: ground_y,
        };

        let platforms = state
            .platforms
            .iter()
            .map(|p| PlatformView {
                rect: p.aabb(),
                color: platform_color(biome, p.pos.y, ground_y),
            })
            .collect();

        let particles = state
            .particles
            .iter()
            .map(|p| ParticleView {
                pos: p.pos,
                radius: p.radius(),
                color: p.color(),
                opacity: p.opacity(),
            })
            .collect();

        Self {
            width,
            height,
            time: state.elapsed,
            sky: daynight::palette_for(t),
            sun: daynight::sun_for(t, width, height),
            star_alpha: daynight::star_alpha(t),
            stars: &state.scenery.stars,
            far,
            near,
            clouds: scenery::clouds(state.elapsed, width),
            ground,
            platforms,
            particles,
            player: player_view(state, settings, ground_y, day_factor),
            score: state.score,
            best_score: state.best_score,
            game_over: state.game_over,
        }
    }

    /// Game over on a run that set the best score
    pub fn is_new_best(&self) -> bool {
        self.game_over && self.score > 0 && self.score == self.best_score
    }
}

/// Platforms hugging the ground blend into it
pub fn platform_color(biome: &BiomeDef, top: f32, ground_y: f32) -> Rgb {
    if top > ground_y - GROUND_MERGE_DISTANCE {
        biome.dirt[1]
    } else {
        biome.platform
    }
}

/// Shadow shrinks with height above the ground line
pub fn shadow_scale(height_above_ground: f32) -> f32 {
    (1.0 - height_above_ground.max(0.0) / SHADOW_FALLOFF).max(SHADOW_MIN_SCALE)
}

fn player_view(state: &GameState, settings: &Settings, ground_y: f32, day_factor: f32) -> PlayerView {
    let player = &state.player;
    let stretch = if settings.reduced_motion {
        1.0
    } else {
        player.stretch()
    };
    let center = player.pos + player.size / 2.0;
    let drawn = Vec2::new(player.size.x / stretch, player.size.y * stretch);

    let scale = shadow_scale(ground_y - player.bottom());
    let radius = player.size.x / 2.0;

    PlayerView {
        rect: Aabb::new(center - drawn / 2.0, drawn),
        color: if player.on_ground {
            PLAYER_GROUNDED
        } else {
            PLAYER_AIRBORNE
        },
        shadow: ShadowView {
            center: Vec2::new(center.x, ground_y - 4.0),
            radii: Vec2::new(radius * scale * 1.4, radius * scale * 0.55),
            opacity: 0.25 * (0.6 + 0.4 * day_factor),
        },
    }
}
