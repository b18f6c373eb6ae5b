//! Biome catalog and the biome cycle state machine
//!
//! Biomes are visited in catalog order, wrapping. Each biome lasts
//! `BIOME_DURATION` seconds, then cross-fades into the next one over
//! `BIOME_TRANSITION` seconds.

use serde::{Deserialize, Serialize};

use super::color::Rgb;
use crate::consts::{BIOME_DURATION, BIOME_TRANSITION};

/// Biome identity (drives particle emitters)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BiomeKind {
    Grass,
    Desert,
    Snow,
    Volcanic,
    Alien,
}

/// Colour roles for one biome
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiomeDef {
    pub kind: BiomeKind,
    pub name: &'static str,
    pub grass_top: [Rgb; 3],
    pub dirt: [Rgb; 3],
    pub accent: Rgb,
    pub platform: Rgb,
}

pub const BIOMES: [BiomeDef; 5] = [
    BiomeDef {
        kind: BiomeKind::Grass,
        name: "grass",
        grass_top: [Rgb::hex(0x3da93f), Rgb::hex(0x2e8d31), Rgb::hex(0x48c14c)],
        dirt: [Rgb::hex(0x7a4d22), Rgb::hex(0x5e3a18), Rgb::hex(0x8f592b)],
        accent: Rgb::hex(0xd6f7b1),
        platform: Rgb::hex(0x3ddc97),
    },
    BiomeDef {
        kind: BiomeKind::Desert,
        name: "desert",
        grass_top: [Rgb::hex(0xe4c56a), Rgb::hex(0xd9b24d), Rgb::hex(0xf0d283)],
        dirt: [Rgb::hex(0xc89b48), Rgb::hex(0xb48436), Rgb::hex(0xd6ae62)],
        accent: Rgb::hex(0xfff2b0),
        platform: Rgb::hex(0xe8c76a),
    },
    BiomeDef {
        kind: BiomeKind::Snow,
        name: "snow",
        grass_top: [Rgb::hex(0xe8f7ff), Rgb::hex(0xd2eefc), Rgb::hex(0xffffff)],
        dirt: [Rgb::hex(0x9aa7b5), Rgb::hex(0x7b8692), Rgb::hex(0xb9c3cf)],
        accent: Rgb::hex(0xffffff),
        platform: Rgb::hex(0xb2e2ff),
    },
    BiomeDef {
        kind: BiomeKind::Volcanic,
        name: "volcanic",
        grass_top: [Rgb::hex(0x4d1f1f), Rgb::hex(0x5c2622), Rgb::hex(0x712d25)],
        dirt: [Rgb::hex(0x331313), Rgb::hex(0x47201c), Rgb::hex(0x5a2620)],
        accent: Rgb::hex(0xff8a40),
        platform: Rgb::hex(0xff5c33),
    },
    BiomeDef {
        kind: BiomeKind::Alien,
        name: "alien",
        grass_top: [Rgb::hex(0x4d236b), Rgb::hex(0x5f2d85), Rgb::hex(0x73379d)],
        dirt: [Rgb::hex(0x2a123d), Rgb::hex(0x34184d), Rgb::hex(0x422060)],
        accent: Rgb::hex(0xc05bff),
        platform: Rgb::hex(0x9d5cff),
    },
];

/// Look up a biome by (unbounded) cycle index
pub fn biome_by_index(index: u32) -> &'static BiomeDef {
    &BIOMES[index as usize % BIOMES.len()]
}

/// Which ground buffer is which
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BufferLabel {
    A,
    B,
}

impl BufferLabel {
    pub fn other(self) -> BufferLabel {
        match self {
            BufferLabel::A => BufferLabel::B,
            BufferLabel::B => BufferLabel::A,
        }
    }
}

/// Biome sub-machine phase
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BiomePhase {
    /// Sitting in the current biome
    Steady,
    /// Cross-fading toward `next_index`; seconds since the fade began
    Transitioning { elapsed: f32 },
}

/// Edge reported by [`BiomeCycle::advance`] so the caller can rebuild tiles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BiomeEdge {
    /// Fade just began; the upcoming biome needs tiles in the inactive buffer
    TransitionStarted { next_index: u32 },
    /// Fade finished and buffers swapped; the new upcoming biome needs tiles
    /// in the (new) inactive buffer
    TransitionFinished { next_index: u32 },
}

/// Biome timers and double-buffer bookkeeping
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BiomeCycle {
    /// Current biome (unbounded, wrap with `biome_by_index`)
    pub index: u32,
    /// Upcoming biome, always `index + 1`
    pub next_index: u32,
    /// Seconds spent in the current biome
    pub timer: f32,
    pub phase: BiomePhase,
    /// Buffer holding the current biome's tiles
    pub active: BufferLabel,
}

impl Default for BiomeCycle {
    fn default() -> Self {
        Self {
            index: 0,
            next_index: 1,
            timer: 0.0,
            phase: BiomePhase::Steady,
            active: BufferLabel::A,
        }
    }
}

impl BiomeCycle {
    pub fn current(&self) -> &'static BiomeDef {
        biome_by_index(self.index)
    }

    pub fn next(&self) -> &'static BiomeDef {
        biome_by_index(self.next_index)
    }

    /// Buffer holding the upcoming biome's tiles
    pub fn inactive(&self) -> BufferLabel {
        self.active.other()
    }

    /// Cross-fade progress in [0, 1] (0 when steady)
    pub fn blend(&self) -> f32 {
        match self.phase {
            BiomePhase::Steady => 0.0,
            BiomePhase::Transitioning { elapsed } => (elapsed / BIOME_TRANSITION).min(1.0),
        }
    }

    pub fn is_transitioning(&self) -> bool {
        matches!(self.phase, BiomePhase::Transitioning { .. })
    }

    /// Advance timers by `dt`, returning the edge crossed this tick (if any)
    pub fn advance(&mut self, dt: f32) -> Option<BiomeEdge> {
        match self.phase {
            BiomePhase::Transitioning { elapsed } => {
                let elapsed = elapsed + dt;
                if elapsed >= BIOME_TRANSITION {
                    self.phase = BiomePhase::Steady;
                    self.index = self.next_index;
                    self.next_index = self.index + 1;
                    self.timer = 0.0;
                    self.active = self.active.other();
                    log::info!(
                        "Entered biome '{}' (next: '{}')",
                        self.current().name,
                        self.next().name
                    );
                    Some(BiomeEdge::TransitionFinished {
                        next_index: self.next_index,
                    })
                } else {
                    self.phase = BiomePhase::Transitioning { elapsed };
                    None
                }
            }
            BiomePhase::Steady => {
                self.timer += dt;
                if self.timer >= BIOME_DURATION {
                    self.phase = BiomePhase::Transitioning { elapsed: 0.0 };
                    log::info!(
                        "Biome transition '{}' -> '{}'",
                        self.current().name,
                        self.next().name
                    );
                    Some(BiomeEdge::TransitionStarted {
                        next_index: self.next_index,
                    })
                } else {
                    None
                }
            }
        }
    }
}
