//! Biome particles: rising embers and falling snow
//!
//! Emitters accumulate `rate * dt` and release one particle per whole unit,
//! carrying the fractional remainder so the average rate holds at any frame
//! rate.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::color::Rgb;
use crate::consts::{MAX_PARTICLES, PARTICLE_MARGIN};

/// Particle flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleKind {
    Ember,
    Snow,
}

/// A visual particle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub id: u32,
    pub kind: ParticleKind,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Seconds alive
    pub life: f32,
    pub max_life: f32,
    /// Per-particle motion variation
    pub seed: f32,
}

const EMBER_WARM: Rgb = Rgb::hex(0xffb347);
const EMBER_HOT: Rgb = Rgb::hex(0xff5c33);

impl Particle {
    /// Fraction of lifetime used, in [0, 1]
    pub fn life_fraction(&self) -> f32 {
        if self.max_life <= 0.0 {
            return 1.0;
        }
        (self.life / self.max_life).clamp(0.0, 1.0)
    }

    /// Advance age and position by `dt` under the given wind
    pub fn step(&mut self, dt: f32, wind: f32) {
        self.life += dt;
        match self.kind {
            ParticleKind::Ember => {
                self.pos.x += self.vel.x * dt + ((self.life + self.seed) * 6.0).sin() * 5.0 * dt;
            }
            ParticleKind::Snow => {
                self.pos.x += self.vel.x * dt
                    + ((self.life + self.seed) * 2.0).sin() * 8.0 * dt
                    + wind * dt * 0.5;
            }
        }
        self.pos.y += self.vel.y * dt;
    }

    /// Still inside the screen (plus margin)
    pub fn on_screen(&self, width: f32, height: f32) -> bool {
        self.pos.x >= -PARTICLE_MARGIN
            && self.pos.x <= width + PARTICLE_MARGIN
            && self.pos.y >= -PARTICLE_MARGIN
            && self.pos.y <= height + PARTICLE_MARGIN
    }

    pub fn color(&self) -> Rgb {
        match self.kind {
            ParticleKind::Ember if self.life_fraction() < 0.5 => EMBER_WARM,
            ParticleKind::Ember => EMBER_HOT,
            ParticleKind::Snow => Rgb::WHITE,
        }
    }

    /// Embers fade over their whole life; snow only over the final 10%
    pub fn opacity(&self) -> f32 {
        let t = self.life_fraction();
        match self.kind {
            ParticleKind::Ember => 1.0 - t,
            ParticleKind::Snow if t < 0.9 => 0.85,
            ParticleKind::Snow => (1.0 - (t - 0.9) / 0.1) * 0.85,
        }
    }

    pub fn radius(&self) -> f32 {
        match self.kind {
            ParticleKind::Ember => 3.0 + ((self.life + self.seed) * 12.0).sin() * 1.2,
            ParticleKind::Snow => 2.0 + ((self.life + self.seed) * 5.0).sin() * 0.4,
        }
    }
}

/// Fractional-rate spawn accumulator
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Emitter {
    pub acc: f32,
}

impl Emitter {
    /// Accumulate `rate * dt` and return how many whole particles to emit
    pub fn advance(&mut self, rate: f32, dt: f32) -> u32 {
        self.acc += rate * dt;
        let mut count = 0;
        while self.acc >= 1.0 {
            self.acc -= 1.0;
            count += 1;
        }
        count
    }
}

/// Where particles may appear
#[derive(Debug, Clone, Copy)]
pub struct EmitArea {
    pub width: f32,
    pub height: f32,
    pub ground_y: f32,
    pub wind: f32,
}

/// Ember rising from near the ground line
pub fn spawn_ember<R: Rng>(id: u32, area: &EmitArea, rng: &mut R) -> Particle {
    Particle {
        id,
        kind: ParticleKind::Ember,
        pos: Vec2::new(
            rng.random_range(0.0..area.width),
            area.ground_y - 8.0 - rng.random_range(0.0..40.0),
        ),
        vel: Vec2::new(rng.random_range(-10.0..10.0), -40.0 - rng.random_range(0.0..60.0)),
        life: 0.0,
        max_life: 1.2 + rng.random_range(0.0..0.8),
        seed: rng.random_range(0.0..1000.0),
    }
}

/// Snowflake falling from the top, pushed by the wind
pub fn spawn_snow<R: Rng>(id: u32, area: &EmitArea, rng: &mut R) -> Particle {
    let vy = 30.0 + rng.random_range(0.0..25.0);
    Particle {
        id,
        kind: ParticleKind::Snow,
        pos: Vec2::new(rng.random_range(0.0..area.width), -10.0),
        vel: Vec2::new(rng.random_range(-7.5..7.5) + area.wind * 0.2, vy),
        life: 0.0,
        // Long enough to reach the bottom
        max_life: (area.height + 40.0) / vy,
        seed: rng.random_range(0.0..1000.0),
    }
}

/// Step every particle, drop dead or off-screen ones, then enforce the cap
/// by dropping the oldest.
pub fn update_particles(particles: &mut Vec<Particle>, dt: f32, wind: f32, width: f32, height: f32) {
    particles.retain_mut(|p| {
        p.step(dt, wind);
        p.life <= p.max_life && p.on_screen(width, height)
    });
    enforce_cap(particles);
}

/// Keep at most `MAX_PARTICLES`, newest last
pub fn enforce_cap(particles: &mut Vec<Particle>) {
    if particles.len() > MAX_PARTICLES {
        let excess = particles.len() - MAX_PARTICLES;
        particles.drain(..excess);
    }
}
