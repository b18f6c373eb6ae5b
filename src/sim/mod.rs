//! Simulation module
//!
//! All gameplay logic lives here. Nothing in this module touches the host:
//! time arrives as `dt`, randomness from the seeded generator in the state,
//! and everything the host must react to is queued as a [`GameEvent`].

pub mod biome;
pub mod collision;
pub mod color;
pub mod daynight;
pub mod ground;
pub mod particles;
pub mod platforms;
pub mod player;
pub mod scenery;
pub mod state;
pub mod tick;

pub use biome::{BIOMES, BiomeCycle, BiomeDef, BiomeKind, BufferLabel, biome_by_index};
pub use collision::{Aabb, lands_on};
pub use color::Rgb;
pub use daynight::{SkyPalette, day_factor, is_night, palette_for};
pub use ground::{GroundBuffers, GroundTiles};
pub use particles::{Particle, ParticleKind};
pub use platforms::Platform;
pub use player::{JumpKind, Player};
pub use state::{GameEvent, GameState, Viewport};
pub use tick::{jump, tick};
