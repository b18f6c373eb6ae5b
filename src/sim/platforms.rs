//! Platforms: starter section, procedural spawner and culling

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::consts::*;

/// A platform entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub id: u32,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Already counted toward the score
    pub passed: bool,
}

impl Platform {
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

/// Row the starter section sits on
pub fn starter_baseline(screen_h: f32) -> f32 {
    (screen_h - 120.0).min(screen_h * 0.75)
}

/// Baseline spawned platforms jitter around
pub fn spawn_baseline(screen_h: f32) -> f32 {
    (screen_h - 120.0).min(screen_h * 0.78)
}

/// Lay down the flat run-up at the start of a run
pub fn starter_platforms(screen_h: f32, mut next_id: impl FnMut() -> u32) -> Vec<Platform> {
    let y = starter_baseline(screen_h);
    (0..STARTER_PLATFORMS)
        .map(|i| Platform {
            id: next_id(),
            pos: Vec2::new(i as f32 * STARTER_PLATFORM_WIDTH, y),
            size: Vec2::new(STARTER_PLATFORM_WIDTH, PLATFORM_HEIGHT),
            passed: false,
        })
        .collect()
}

/// Append platforms until the rightmost edge is `LOOKAHEAD_SCREENS` screens
/// past the visible right edge.
///
/// `furthest_right` is the rightmost occupied x after this tick's scroll.
pub fn spawn_platforms<R: Rng>(
    platforms: &mut Vec<Platform>,
    mut furthest_right: f32,
    screen_w: f32,
    screen_h: f32,
    rng: &mut R,
    mut next_id: impl FnMut() -> u32,
) {
    let target = screen_w + screen_w * LOOKAHEAD_SCREENS;
    let baseline = spawn_baseline(screen_h);
    let lowest = (screen_h - PLATFORM_BOTTOM_CLEARANCE).max(PLATFORM_MIN_Y);

    while furthest_right < target {
        let gap = rng.random_range(GAP_MIN..GAP_MAX);
        let width = rng.random_range(PLATFORM_WIDTH_MIN..PLATFORM_WIDTH_MAX);
        let jitter = rng.random_range(-VERTICAL_JITTER / 2.0..VERTICAL_JITTER / 2.0);
        let y = (baseline + jitter).clamp(PLATFORM_MIN_Y, lowest);

        let x = match platforms.last() {
            Some(last) => last.right() + gap,
            None => furthest_right + gap,
        };
        platforms.push(Platform {
            id: next_id(),
            pos: Vec2::new(x, y),
            size: Vec2::new(width, PLATFORM_HEIGHT),
            passed: false,
        });
        furthest_right = x + width;
    }
}

/// Drop platforms that have scrolled past the cull line
pub fn cull_platforms(platforms: &mut Vec<Platform>) {
    platforms.retain(|p| p.right() > CULL_X);
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn counter() -> impl FnMut() -> u32 {
        let mut id = 0;
        move || {
            id += 1;
            id
        }
    }

    #[test]
    fn test_starter_section_is_flat_and_contiguous() {
        let platforms = starter_platforms(600.0, counter());
        assert_eq!(platforms.len(), STARTER_PLATFORMS);
        for pair in platforms.windows(2) {
            assert_eq!(pair[0].right(), pair[1].pos.x);
            assert_eq!(pair[0].pos.y, pair[1].pos.y);
            assert!(pair[0].id < pair[1].id);
        }
        assert_eq!(platforms[0].pos.y, 450.0);
    }

    #[test]
    fn test_spawn_from_empty() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut platforms = Vec::new();
        spawn_platforms(&mut platforms, 0.0, 800.0, 600.0, &mut rng, counter());
        assert!(!platforms.is_empty());
        assert!(platforms.last().unwrap().right() >= 2400.0);
        assert!(platforms[0].pos.x >= GAP_MIN);
    }

    #[test]
    fn test_cull_threshold() {
        let mut platforms = starter_platforms(600.0, counter());
        for p in &mut platforms {
            p.pos.x -= 500.0;
        }
        // Rights are now -340, -180, -20, ...
        cull_platforms(&mut platforms);
        assert_eq!(platforms.len(), STARTER_PLATFORMS - 1);
        assert!(platforms.iter().all(|p| p.right() >= CULL_X));
    }

    proptest! {
        #[test]
        fn prop_spawn_fills_lookahead(
            seed in any::<u64>(),
            w in 200.0f32..2000.0,
            h in 300.0f32..1400.0,
            shift in 0.0f32..3000.0,
        ) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut ids = counter();
            let mut platforms = starter_platforms(h, &mut ids);
            for p in &mut platforms {
                p.pos.x -= shift;
            }
            let furthest = platforms.iter().map(Platform::right).fold(0.0, f32::max);
            spawn_platforms(&mut platforms, furthest, w, h, &mut rng, &mut ids);

            let last = platforms.last().unwrap();
            prop_assert!(last.right() >= w + 2.0 * w);
            for p in &platforms[STARTER_PLATFORMS..] {
                prop_assert!(p.pos.y >= PLATFORM_MIN_Y);
                prop_assert!(p.pos.y <= (h - PLATFORM_BOTTOM_CLEARANCE).max(PLATFORM_MIN_Y));
                prop_assert!((PLATFORM_WIDTH_MIN..PLATFORM_WIDTH_MAX).contains(&p.size.x));
            }
            for pair in platforms.windows(2) {
                prop_assert!(pair[0].id < pair[1].id);
                prop_assert!(pair[0].pos.x < pair[1].pos.x);
            }
        }
    }
}
