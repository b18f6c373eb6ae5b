//! Biome Dash - an endless side-scrolling platformer
//!
//! Core modules:
//! - `sim`: Simulation core (physics, collisions, procedural generation, biomes)
//! - `renderer`: Per-frame scene snapshot and the Canvas 2D painter
//! - `platform`: Frame timing
//! - `persistence`: Key-value storage backends
//! - `highscores`: Best score gateway
//! - `session`: Frame driver tying the simulation to storage and audio

pub mod audio;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;

pub use highscores::BestScoreStore;
pub use session::Session;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Largest frame delta fed to the simulation (seconds)
    pub const MAX_FRAME_DT: f32 = 0.033;
    /// Delta used for the very first frame, before a previous timestamp exists
    pub const FIRST_FRAME_DT: f32 = 1.0 / 60.0;

    /// Player body
    pub const PLAYER_X: f32 = 80.0;
    pub const PLAYER_SIZE: f32 = 40.0;

    /// Downward acceleration (pixels/s²)
    pub const GRAVITY: f32 = 1700.0;
    /// Primary jump velocity (negative is up)
    pub const JUMP_VELOCITY: f32 = -780.0;
    /// Second jump strength relative to the primary jump
    pub const DOUBLE_JUMP_FACTOR: f32 = 0.85;
    /// Fraction of the gravity increment applied while rising
    pub const APEX_DAMPING: f32 = 0.82;
    /// Repeat presses inside this window count as a primary jump (seconds)
    pub const JUMP_BUFFER: f64 = 0.110;

    /// World scroll speed (pixels/s)
    pub const SCROLL_SPEED: f32 = 180.0;

    /// Platform generation
    pub const PLATFORM_HEIGHT: f32 = 24.0;
    pub const GAP_MIN: f32 = 80.0;
    pub const GAP_MAX: f32 = 260.0;
    pub const PLATFORM_WIDTH_MIN: f32 = 140.0;
    pub const PLATFORM_WIDTH_MAX: f32 = 280.0;
    pub const VERTICAL_JITTER: f32 = 140.0;
    /// Highest allowed platform top
    pub const PLATFORM_MIN_Y: f32 = 120.0;
    /// Platforms stay at least this far above the bottom of the screen
    pub const PLATFORM_BOTTOM_CLEARANCE: f32 = 100.0;
    /// Screens of platforms kept ready past the right edge
    pub const LOOKAHEAD_SCREENS: f32 = 2.0;
    /// Platforms whose right edge is left of this are dropped
    pub const CULL_X: f32 = -200.0;
    pub const STARTER_PLATFORMS: usize = 6;
    pub const STARTER_PLATFORM_WIDTH: f32 = 160.0;

    /// Landing still registers this far below a platform's bottom edge
    pub const LANDING_TOLERANCE: f32 = 40.0;
    /// Falling this far below the screen ends the run
    pub const FAIL_MARGIN: f32 = 40.0;

    /// Biome timing (seconds)
    pub const BIOME_DURATION: f32 = 45.0;
    pub const BIOME_TRANSITION: f32 = 5.5;

    /// Full day/night cycle (seconds)
    pub const CYCLE_DURATION: f32 = 120.0;

    /// Ground tiles
    pub const TILE_SIZE: f32 = 40.0;
    pub const GROUND_ROWS: usize = 4;
    /// Extra columns beyond the screen width
    pub const GROUND_BUFFER_COLS: usize = 4;

    /// Particles
    pub const MAX_PARTICLES: usize = 220;
    pub const EMBER_RATE: f32 = 8.0;
    pub const SNOW_RATE: f32 = 14.0;
    pub const PARTICLE_MARGIN: f32 = 30.0;
}
