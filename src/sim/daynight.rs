//! Day/night cycle: sky palette, day factor, sun and stars
//!
//! The cycle phase `t` is `(elapsed mod CYCLE_DURATION) / CYCLE_DURATION`.
//! The sky is a table of named phases covering [0, 1) end to end. Each phase
//! blends from its own reference palette to the next phase's, so colour is
//! continuous across every boundary including the wrap at 1.0.

use std::f32::consts::PI;

use super::color::Rgb;
use crate::consts::CYCLE_DURATION;

/// Lowest value any sky channel may take
pub const MIN_SKY_CHANNEL: u8 = 12;
/// Day factor never drops below this at night
pub const NIGHT_DAY_FACTOR: f32 = 0.15;

/// Daylight span (sun visible)
pub const DAYLIGHT_START: f32 = 0.15;
pub const DAYLIGHT_END: f32 = 0.70;

/// Three-stop vertical sky gradient
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkyPalette {
    pub top: Rgb,
    pub mid: Rgb,
    pub bot: Rgb,
}

impl SkyPalette {
    const fn hex(top: u32, mid: u32, bot: u32) -> Self {
        Self {
            top: Rgb::hex(top),
            mid: Rgb::hex(mid),
            bot: Rgb::hex(bot),
        }
    }

    fn lerp(self, other: SkyPalette, t: f32) -> SkyPalette {
        SkyPalette {
            top: self.top.mix(other.top, t),
            mid: self.mid.mix(other.mid, t),
            bot: self.bot.mix(other.bot, t),
        }
    }

    fn floored(self) -> SkyPalette {
        SkyPalette {
            top: self.top.floor(MIN_SKY_CHANNEL),
            mid: self.mid.floor(MIN_SKY_CHANNEL),
            bot: self.bot.floor(MIN_SKY_CHANNEL),
        }
    }

    /// Largest channel difference across all three stops
    pub fn max_delta(&self, other: &SkyPalette) -> u8 {
        self.top
            .max_channel_delta(other.top)
            .max(self.mid.max_channel_delta(other.mid))
            .max(self.bot.max_channel_delta(other.bot))
    }
}

/// Named sky phases, in cycle order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkyPhase {
    Night,
    Sunrise,
    Dawn,
    Day,
    Dusk,
    Sunset,
    Nightfall,
}

struct PhaseSpan {
    phase: SkyPhase,
    start: f32,
    end: f32,
    palette: SkyPalette,
}

const NIGHT: SkyPalette = SkyPalette::hex(0x0a1444, 0x081a55, 0x050d26);
const SUNRISE: SkyPalette = SkyPalette::hex(0x3b3470, 0x8a5a8c, 0xe0866a);
const DAWN: SkyPalette = SkyPalette::hex(0xf9d29d, 0xf9c46b, 0xf39b6d);
const DAY: SkyPalette = SkyPalette::hex(0xa3d9ff, 0x68b7ff, 0x4fa3f0);
const DUSK: SkyPalette = SkyPalette::hex(0xffb199, 0xff8e72, 0x2d3a63);
const SUNSET: SkyPalette = SkyPalette::hex(0x6b3f6e, 0x8c4a5c, 0x1c2450);
const NIGHTFALL: SkyPalette = SkyPalette::hex(0x101a4a, 0x0b1a52, 0x060f2c);

/// Each span blends from its palette to the following span's palette
const PHASES: [PhaseSpan; 7] = [
    PhaseSpan { phase: SkyPhase::Night, start: 0.00, end: 0.10, palette: NIGHT },
    PhaseSpan { phase: SkyPhase::Sunrise, start: 0.10, end: 0.20, palette: SUNRISE },
    PhaseSpan { phase: SkyPhase::Dawn, start: 0.20, end: 0.35, palette: DAWN },
    PhaseSpan { phase: SkyPhase::Day, start: 0.35, end: 0.50, palette: DAY },
    PhaseSpan { phase: SkyPhase::Dusk, start: 0.50, end: 0.65, palette: DUSK },
    PhaseSpan { phase: SkyPhase::Sunset, start: 0.65, end: 0.80, palette: SUNSET },
    PhaseSpan { phase: SkyPhase::Nightfall, start: 0.80, end: 1.00, palette: NIGHTFALL },
];

/// Cycle phase in [0, 1) for an elapsed time in seconds
pub fn cycle_phase(elapsed: f32) -> f32 {
    let t = elapsed.rem_euclid(CYCLE_DURATION) / CYCLE_DURATION;
    // rem_euclid can round up to exactly the modulus
    if t >= 1.0 { 0.0 } else { t }
}

fn span_index(t: f32) -> usize {
    PHASES
        .iter()
        .position(|span| t < span.end)
        .unwrap_or(PHASES.len() - 1)
}

/// Named phase containing `t`
pub fn sky_phase(t: f32) -> SkyPhase {
    PHASES[span_index(t.clamp(0.0, 1.0))].phase
}

/// Sky gradient for cycle phase `t`
pub fn palette_for(t: f32) -> SkyPalette {
    let t = t.clamp(0.0, 1.0);
    let i = span_index(t);
    let span = &PHASES[i];
    let next = &PHASES[(i + 1) % PHASES.len()];
    let local = ((t - span.start) / (span.end - span.start)).clamp(0.0, 1.0);
    span.palette.lerp(next.palette, local).floored()
}

/// Daylight intensity in [NIGHT_DAY_FACTOR, 1]
pub fn day_factor(t: f32) -> f32 {
    if !(DAYLIGHT_START..=DAYLIGHT_END).contains(&t) {
        return NIGHT_DAY_FACTOR;
    }
    let p = (t - DAYLIGHT_START) / (DAYLIGHT_END - DAYLIGHT_START);
    (PI * p).sin().max(NIGHT_DAY_FACTOR)
}

/// Night-like portion of the cycle (stars out, snow falls)
pub fn is_night(t: f32) -> bool {
    !(DAYLIGHT_START..DAYLIGHT_END).contains(&t)
}

/// Star layer opacity
pub fn star_alpha(t: f32) -> f32 {
    if (0.70..0.85).contains(&t) {
        (t - 0.70) / 0.15
    } else if t >= 0.85 || t < 0.15 {
        1.0
    } else if (0.15..0.25).contains(&t) {
        1.0 - (t - 0.15) / 0.10
    } else {
        0.0
    }
}

/// Sun placement for a viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sun {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub opacity: f32,
}

/// Sun position arcs across the daylight span; `None` at night
pub fn sun_for(t: f32, width: f32, height: f32) -> Option<Sun> {
    if !(DAYLIGHT_START..=DAYLIGHT_END).contains(&t) {
        return None;
    }
    let p = (t - DAYLIGHT_START) / (DAYLIGHT_END - DAYLIGHT_START);
    Some(Sun {
        x: width * (0.1 + 0.8 * p),
        y: height * (0.55 - (PI * p).sin() * 0.3),
        radius: height * 0.09,
        opacity: 0.85,
    })
}
