//! Game state and core simulation types
//!
//! Everything the frame step mutates lives in [`GameState`]. The presentation
//! layer only ever reads it.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::biome::{BiomeCycle, biome_by_index};
use super::daynight;
use super::ground::{GroundBuffers, GroundLayout};
use super::particles::{Emitter, Particle};
use super::platforms::{Platform, spawn_platforms, starter_baseline, starter_platforms};
use super::player::{JumpKind, Player};
use super::scenery::Scenery;

/// Screen size in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Y of the ground strip's top edge
    pub fn ground_y(&self) -> f32 {
        (self.height - 40.0).min(self.height * 0.82)
    }

    /// Y past which the player has fallen out of the world
    pub fn fail_y(&self) -> f32 {
        self.height + crate::consts::FAIL_MARGIN
    }
}

/// Discrete things that happened during a tick or input, drained by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Jumped(JumpKind),
    /// Fail state entered with this final score
    Died { score: u64 },
    /// A fresh run began
    Restarted,
}

/// Monotonic ID source
#[derive(Debug, Clone)]
pub struct IdCounter(u32);

impl Default for IdCounter {
    fn default() -> Self {
        Self(1)
    }
}

impl IdCounter {
    pub fn next(&mut self) -> u32 {
        let id = self.0;
        self.0 += 1;
        id
    }
}

/// Complete mutable world
#[derive(Debug, Clone)]
pub struct GameState {
    pub viewport: Viewport,
    /// Uniform randomness for platforms, particles and scenery
    pub rng: Pcg32,
    pub player: Player,
    /// Left to right, in creation order
    pub platforms: Vec<Platform>,
    /// Oldest first
    pub particles: Vec<Particle>,
    pub ember_emitter: Emitter,
    pub snow_emitter: Emitter,
    pub biome: BiomeCycle,
    pub ground: GroundBuffers,
    pub scenery: Scenery,
    /// Horizontal wind for snow (pixels/s)
    pub wind: f32,
    /// Seconds since the run started
    pub elapsed: f32,
    pub score: u64,
    /// Last known persisted best
    pub best_score: u64,
    pub game_over: bool,
    /// Emitters run only when enabled
    pub particles_enabled: bool,
    /// Pending events for the host
    pub events: Vec<GameEvent>,
    pub platform_ids: IdCounter,
    pub particle_ids: IdCounter,
}

impl GameState {
    /// Create a ready-to-run state for `viewport`
    pub fn new(viewport: Viewport, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let scenery = Scenery::generate(viewport.width, viewport.height, &mut rng);
        let mut state = Self {
            viewport,
            rng,
            player: Player::standing_on(starter_baseline(viewport.height)),
            platforms: Vec::new(),
            particles: Vec::new(),
            ember_emitter: Emitter::default(),
            snow_emitter: Emitter::default(),
            biome: BiomeCycle::default(),
            ground: GroundBuffers::default(),
            scenery,
            wind: 0.0,
            elapsed: 0.0,
            score: 0,
            best_score: 0,
            game_over: false,
            particles_enabled: true,
            events: Vec::new(),
            platform_ids: IdCounter::default(),
            particle_ids: IdCounter::default(),
        };
        state.reset_run();
        state
    }

    /// Day/night phase in [0, 1)
    pub fn cycle_phase(&self) -> f32 {
        daynight::cycle_phase(self.elapsed)
    }

    pub fn day_factor(&self) -> f32 {
        daynight::day_factor(self.cycle_phase())
    }

    /// Layout matching the active ground buffer (or a fresh one)
    pub fn ground_layout(&self) -> GroundLayout {
        self.ground
            .get(self.biome.active)
            .layout()
            .unwrap_or_else(|| {
                GroundLayout::for_viewport(self.viewport.width, self.viewport.ground_y())
            })
    }

    /// Build biome `index` into the inactive buffer, aligned with the active one
    pub fn prebuild_next_ground(&mut self, index: u32) {
        let layout = self.ground_layout();
        let day_factor = self.day_factor();
        let target = self.biome.inactive();
        self.ground.build_into(
            target,
            biome_by_index(index),
            &layout,
            day_factor,
        );
    }

    /// Reinitialise everything belonging to a run. Best score, settings,
    /// scenery and ID counters carry over.
    pub fn reset_run(&mut self) {
        let viewport = self.viewport;

        let mut platforms = starter_platforms(viewport.height, || self.platform_ids.next());
        let furthest = platforms.last().map(Platform::right).unwrap_or(0.0);
        spawn_platforms(
            &mut platforms,
            furthest,
            viewport.width,
            viewport.height,
            &mut self.rng,
            || self.platform_ids.next(),
        );
        self.platforms = platforms;

        self.player = Player::standing_on(starter_baseline(viewport.height));
        self.particles.clear();
        self.ember_emitter = Emitter::default();
        self.snow_emitter = Emitter::default();
        self.biome = BiomeCycle::default();
        self.wind = 0.0;
        self.elapsed = 0.0;
        self.score = 0;
        self.game_over = false;

        let layout = GroundLayout::for_viewport(viewport.width, viewport.ground_y());
        let day_factor = self.day_factor();
        self.ground.build_into(self.biome.active, self.biome.current(), &layout, day_factor);
        self.ground.build_into(self.biome.inactive(), self.biome.next(), &layout, day_factor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;

    #[test]
    fn test_new_state_is_ready() {
        let state = GameState::new(Viewport::new(800.0, 600.0), 42);
        assert!(!state.game_over);
        assert_eq!(state.score, 0);
        assert!(state.player.on_ground);
        assert!(!state.player.double_jump);
        // Starter section plus a full lookahead buffer
        assert!(state.platforms.len() > STARTER_PLATFORMS);
        assert!(state.platforms.last().unwrap().right() >= 2400.0);
        // Player stands on the first starter platform
        assert_eq!(state.player.bottom(), state.platforms[0].pos.y);
        // Both ground buffers ready and aligned
        assert_eq!(state.ground.a.columns.len(), state.ground.b.columns.len());
        assert!(!state.ground.a.columns.is_empty());
    }

    #[test]
    fn test_ids_are_unique_across_resets() {
        let mut state = GameState::new(Viewport::new(800.0, 600.0), 1);
        let first_max = state.platforms.iter().map(|p| p.id).max().unwrap();
        state.reset_run();
        let second_min = state.platforms.iter().map(|p| p.id).min().unwrap();
        assert!(second_min > first_max);
    }

    #[test]
    fn test_ground_line() {
        let vp = Viewport::new(800.0, 600.0);
        assert_eq!(vp.ground_y(), 492.0);
        let tall = Viewport::new(800.0, 100.0);
        assert_eq!(tall.ground_y(), 60.0);
    }
}
