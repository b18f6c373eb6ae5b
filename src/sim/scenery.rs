//! Background scenery: stars, mountain ridges and clouds
//!
//! Generated once per viewport and only read afterwards.

use glam::Vec2;
use rand::Rng;

use super::color::Rgb;

/// A twinkling star
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    pub pos: Vec2,
    pub radius: f32,
    /// Twinkle speed factor
    pub twinkle: f32,
}

/// Closed triangular mountain outline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Silhouette {
    pub points: [Vec2; 3],
}

impl Silhouette {
    /// Triangle from `x` spanning `width`, or `None` if degenerate
    pub fn triangle(x: f32, width: f32, base_y: f32, peak_y: f32) -> Option<Self> {
        let valid = [x, width, base_y, peak_y].iter().all(|v| v.is_finite())
            && width > 0.0
            && peak_y < base_y;
        valid.then(|| Self {
            points: [
                Vec2::new(x, base_y),
                Vec2::new(x + width / 2.0, peak_y),
                Vec2::new(x + width, base_y),
            ],
        })
    }
}

/// A parallax ridge; malformed silhouettes are kept as `None` and skipped
#[derive(Debug, Clone, Default)]
pub struct Ridge {
    pub peaks: Vec<Option<Silhouette>>,
}

impl Ridge {
    pub fn silhouettes(&self) -> impl Iterator<Item = (usize, &Silhouette)> {
        self.peaks
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|s| (i, s)))
    }
}

struct RidgeParams {
    base: f32,
    start_x: f32,
    width: (f32, f32),
    height: (f32, f32),
    step: f32,
}

fn build_ridge<R: Rng>(params: &RidgeParams, screen_w: f32, rng: &mut R) -> Ridge {
    let mut peaks = Vec::new();
    let mut cursor = params.start_x;
    while cursor < screen_w + 160.0 {
        let w = params.width.0 + rng.random_range(0.0..params.width.1);
        let h = params.height.0 + rng.random_range(0.0..params.height.1);
        peaks.push(Silhouette::triangle(cursor, w, params.base, params.base - h));
        // Overlap for a ridge line
        cursor += w * params.step;
    }
    Ridge { peaks }
}

/// Mountain tints at night and day
const FAR_NIGHT: Rgb = Rgb::hex(0x20344a);
const FAR_DAY: Rgb = Rgb::hex(0x4b8cc5);
const NEAR_NIGHT: Rgb = Rgb::hex(0x2d4f75);
const NEAR_DAY: Rgb = Rgb::hex(0x6fb4e6);

/// Static background for one viewport
#[derive(Debug, Clone, Default)]
pub struct Scenery {
    pub stars: Vec<Star>,
    pub far: Ridge,
    pub near: Ridge,
}

impl Scenery {
    pub fn generate<R: Rng>(width: f32, height: f32, rng: &mut R) -> Self {
        let count = (width / 12.0).round().clamp(40.0, 60.0) as usize;
        let stars = (0..count)
            .map(|_| Star {
                pos: Vec2::new(
                    rng.random_range(0.0..width.max(1.0)),
                    rng.random_range(0.0..(height * 0.5).max(1.0)),
                ),
                radius: 1.0 + rng.random_range(0.0..1.6),
                twinkle: 0.5 + rng.random_range(0.0..1.5),
            })
            .collect();

        let far = build_ridge(
            &RidgeParams {
                base: height * 0.72,
                start_x: -80.0,
                width: (180.0, 140.0),
                height: (120.0, 90.0),
                step: 0.6,
            },
            width,
            rng,
        );
        let near = build_ridge(
            &RidgeParams {
                base: height * 0.8,
                start_x: -60.0,
                width: (200.0, 160.0),
                height: (160.0, 120.0),
                step: 0.55,
            },
            width,
            rng,
        );

        Self { stars, far, near }
    }
}

/// Ridge tint and opacity for the current day factor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RidgeStyle {
    pub color: Rgb,
    pub opacity: f32,
}

pub fn far_style(day_factor: f32) -> RidgeStyle {
    RidgeStyle {
        color: FAR_NIGHT.mix(FAR_DAY, day_factor),
        opacity: (0.55 * (0.6 + 0.4 * day_factor)).max(0.35),
    }
}

pub fn near_style(day_factor: f32) -> RidgeStyle {
    RidgeStyle {
        color: NEAR_NIGHT.mix(NEAR_DAY, day_factor),
        opacity: (0.7 * (0.6 + 0.4 * day_factor)).max(0.45),
    }
}

/// Horizontal drift of near peak `index` at time `t`
pub fn near_drift(t: f32, index: usize, screen_w: f32) -> f32 {
    ((t * 5.0 + index as f32 * 40.0) % (screen_w + 300.0)) * 0.03 - 20.0
}

/// A cloud placement for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cloud {
    pub pos: Vec2,
    pub scale: f32,
    pub opacity: f32,
}

pub const CLOUD_COUNT: usize = 4;

/// Cloud placements at time `t`
pub fn clouds(t: f32, screen_w: f32) -> [Cloud; CLOUD_COUNT] {
    std::array::from_fn(|i| {
        let i_f = i as f32;
        let speed = 6.0 + i_f * 2.0;
        let range = screen_w + 260.0;
        Cloud {
            pos: Vec2::new(
                ((t * speed + i_f * 50.0) % range) - 130.0,
                70.0 + i_f * 68.0 + (t * 0.4 + i_f).sin() * 8.0,
            ),
            scale: 0.9 + i_f * 0.35,
            opacity: 0.85 - i_f * 0.12,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_degenerate_triangles_are_rejected() {
        assert!(Silhouette::triangle(0.0, 100.0, 500.0, 300.0).is_some());
        assert!(Silhouette::triangle(0.0, 0.0, 500.0, 300.0).is_none());
        assert!(Silhouette::triangle(0.0, 100.0, 300.0, 500.0).is_none());
        assert!(Silhouette::triangle(f32::NAN, 100.0, 500.0, 300.0).is_none());
    }

    #[test]
    fn test_ridges_span_screen() {
        let mut rng = Pcg32::seed_from_u64(11);
        let scenery = Scenery::generate(800.0, 600.0, &mut rng);
        for ridge in [&scenery.far, &scenery.near] {
            let right = ridge
                .silhouettes()
                .map(|(_, s)| s.points[2].x)
                .fold(f32::MIN, f32::max);
            assert!(right >= 800.0);
            assert!(ridge.peaks.iter().all(Option::is_some));
        }
        assert!((40..=60).contains(&scenery.stars.len()));
        assert!(scenery.stars.iter().all(|s| s.pos.y <= 300.0));
    }

    #[test]
    fn test_skipped_silhouettes_keep_indices() {
        let ridge = Ridge {
            peaks: vec![
                Silhouette::triangle(0.0, 10.0, 10.0, 0.0),
                None,
                Silhouette::triangle(20.0, 10.0, 10.0, 0.0),
            ],
        };
        let indices: Vec<usize> = ridge.silhouettes().map(|(i, _)| i).collect();
        assert_eq!(indices, vec![0, 2]);
    }

    #[test]
    fn test_ridge_opacity_floors() {
        assert_eq!(far_style(0.0).opacity, 0.35);
        assert_eq!(near_style(0.0).opacity, 0.45);
        assert!((far_style(1.0).opacity - 0.55).abs() < 1e-6);
        assert_eq!(far_style(1.0).color, FAR_DAY);
    }

    #[test]
    fn test_clouds_layered() {
        let c = clouds(0.0, 800.0);
        assert_eq!(c[0].pos.x, -130.0);
        assert!(c.windows(2).all(|w| w[0].opacity > w[1].opacity));
    }
}
