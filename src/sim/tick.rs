//! Per-frame simulation step
//!
//! Advances the world by a variable, already-clamped `dt`. The order of the
//! stages below matters: spawning reads the post-scroll edge, collision reads
//! the post-integration player, and the fail check sees the resolved position.

use super::biome::{BiomeEdge, BiomeKind};
use super::collision::lands_on;
use super::daynight;
use super::particles::{self, EmitArea};
use super::platforms::{cull_platforms, spawn_platforms};
use super::state::{GameEvent, GameState};
use crate::consts::*;

/// Shared horizontal wind at `elapsed` seconds
pub fn wind_at(elapsed: f32) -> f32 {
    (elapsed * 0.12).sin() * 28.0 + (elapsed * 0.53).sin() * 6.0
}

/// Advance the game by `dt` seconds
pub fn tick(state: &mut GameState, dt: f32) {
    if !state.game_over {
        step_world(state, dt);
    }
    state.elapsed += dt;
}

fn step_world(state: &mut GameState, dt: f32) {
    // Biome timers, keeping one ready buffer ahead
    match state.biome.advance(dt) {
        Some(BiomeEdge::TransitionStarted { next_index })
        | Some(BiomeEdge::TransitionFinished { next_index }) => {
            state.prebuild_next_ground(next_index);
        }
        None => {}
    }

    state.wind = wind_at(state.elapsed);

    // Scroll
    let dx = SCROLL_SPEED * dt;
    let mut furthest_right: f32 = 0.0;
    for platform in &mut state.platforms {
        platform.pos.x -= dx;
        furthest_right = furthest_right.max(platform.right());
    }
    scroll_ground(state, dx);

    cull_platforms(&mut state.platforms);
    spawn_platforms(
        &mut state.platforms,
        furthest_right,
        state.viewport.width,
        state.viewport.height,
        &mut state.rng,
        || state.platform_ids.next(),
    );

    state.player.integrate(dt);
    resolve_platforms(state);

    if state.player.pos.y > state.viewport.fail_y() {
        state.game_over = true;
        state.events.push(GameEvent::Died { score: state.score });
        log::info!("Run over with score {}", state.score);
    }

    emit_particles(state, dt);
    particles::update_particles(
        &mut state.particles,
        dt,
        state.wind,
        state.viewport.width,
        state.viewport.height,
    );
}

fn scroll_ground(state: &mut GameState, dx: f32) {
    let day_factor = state.day_factor();
    let (active, inactive) = (state.biome.active, state.biome.inactive());
    let (current, next) = (state.biome.current(), state.biome.next());

    let tiles = state.ground.get_mut(active);
    tiles.scroll(dx);
    tiles.recycle(current, 0.0, day_factor);

    let tiles = state.ground.get_mut(inactive);
    tiles.scroll(dx);
    tiles.recycle(next, 0.0, day_factor);
}

/// Land on platforms from above and score the ones left behind
fn resolve_platforms(state: &mut GameState) {
    let player = &mut state.player;
    for platform in &mut state.platforms {
        if lands_on(&player.aabb(), player.vy, &platform.aabb(), LANDING_TOLERANCE) {
            player.land(platform.pos.y);
        }
        if !platform.passed && platform.right() < player.pos.x {
            platform.passed = true;
            state.score += 1;
        }
    }
}

fn emit_particles(state: &mut GameState, dt: f32) {
    if !state.particles_enabled {
        return;
    }
    let night = daynight::is_night(state.cycle_phase());
    let area = EmitArea {
        width: state.viewport.width,
        height: state.viewport.height,
        ground_y: state.viewport.ground_y(),
        wind: state.wind,
    };

    match state.biome.current().kind {
        BiomeKind::Volcanic => {
            for _ in 0..state.ember_emitter.advance(EMBER_RATE, dt) {
                let id = state.particle_ids.next();
                let p = particles::spawn_ember(id, &area, &mut state.rng);
                state.particles.push(p);
            }
        }
        BiomeKind::Snow if night => {
            for _ in 0..state.snow_emitter.advance(SNOW_RATE, dt) {
                let id = state.particle_ids.next();
                let p = particles::spawn_snow(id, &area, &mut state.rng);
                state.particles.push(p);
            }
        }
        _ => {}
    }
}

/// Handle an edge-triggered jump press at host time `now` (seconds).
///
/// After a fail this restarts the run instead.
pub fn jump(state: &mut GameState, now: f64) {
    if state.game_over {
        state.reset_run();
        state.events.push(GameEvent::Restarted);
        log::info!("Run restarted");
        return;
    }
    if let Some(kind) = state.player.try_jump(now) {
        state.events.push(GameEvent::Jumped(kind));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::biome::{BiomePhase, BufferLabel, biome_by_index};
    use crate::sim::ground::tile_color;
    use crate::sim::player::JumpKind;
    use crate::sim::state::Viewport;
    use proptest::prelude::*;

    const DT: f32 = 1.0 / 60.0;

    fn new_state(seed: u64) -> GameState {
        GameState::new(Viewport::new(800.0, 600.0), seed)
    }

    #[test]
    fn test_standing_player_stays_grounded() {
        let mut state = new_state(1);
        for _ in 0..30 {
            tick(&mut state, DT);
        }
        assert!(state.player.on_ground);
        assert!(!state.game_over);
        assert_eq!(state.player.bottom(), state.platforms[0].pos.y);
    }

    #[test]
    fn test_fail_below_screen_ends_run() {
        let mut state = new_state(2);
        state.score = 7;
        state.player.pos.y = 600.0 + 41.0;
        state.player.on_ground = false;
        tick(&mut state, DT);
        assert!(state.game_over);
        assert_eq!(state.events, vec![GameEvent::Died { score: 7 }]);
    }

    #[test]
    fn test_game_over_freezes_world() {
        let mut state = new_state(3);
        state.game_over = true;
        let before: Vec<f32> = state.platforms.iter().map(|p| p.pos.x).collect();
        tick(&mut state, DT);
        let after: Vec<f32> = state.platforms.iter().map(|p| p.pos.x).collect();
        assert_eq!(before, after);
        assert!(state.elapsed > 0.0);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_jump_after_game_over_restarts() {
        let mut state = new_state(4);
        for _ in 0..10 {
            tick(&mut state, DT);
        }
        state.score = 12;
        state.game_over = true;
        jump(&mut state, 5.0);
        assert!(!state.game_over);
        assert_eq!(state.score, 0);
        assert_eq!(state.elapsed, 0.0);
        assert!(state.player.on_ground);
        assert_eq!(state.events, vec![GameEvent::Restarted]);
    }

    #[test]
    fn test_jump_events() {
        let mut state = new_state(5);
        jump(&mut state, 1.0);
        tick(&mut state, DT);
        jump(&mut state, 1.5);
        tick(&mut state, DT);
        jump(&mut state, 2.0);
        assert_eq!(
            state.events,
            vec![
                GameEvent::Jumped(JumpKind::Primary),
                GameEvent::Jumped(JumpKind::Double),
            ]
        );
    }

    #[test]
    fn test_scores_passed_platforms_once() {
        let mut state = new_state(6);
        // One second of scrolling carries the first starter platform behind the player
        for _ in 0..60 {
            tick(&mut state, DT);
        }
        assert_eq!(state.score, 1);
        assert!(state.platforms.iter().filter(|p| p.passed).count() == 1);
    }

    #[test]
    fn test_biome_transition_prebuilds_inactive_buffer() {
        let mut state = new_state(7);
        state.biome.timer = BIOME_DURATION - DT / 2.0;
        tick(&mut state, DT);
        assert!(state.biome.is_transitioning());

        let inactive = state.ground.get(state.biome.inactive());
        let active = state.ground.get(state.biome.active);
        assert_eq!(inactive.layout(), active.layout());
        let column = &inactive.columns[0];
        assert_eq!(
            column.colors[0],
            tile_color(biome_by_index(1), column.col, 0, 0.0)
        );

        state.biome.phase = BiomePhase::Transitioning {
            elapsed: BIOME_TRANSITION - DT / 2.0,
        };
        tick(&mut state, DT);
        assert_eq!(state.biome.index, 1);
        assert_eq!(state.biome.active, BufferLabel::B);
        let upcoming = &state.ground.get(BufferLabel::A).columns[0];
        assert_eq!(
            upcoming.colors[0],
            tile_color(biome_by_index(2), upcoming.col, 0, 0.0)
        );
    }

    #[test]
    fn test_embers_only_in_volcanic_biome() {
        let mut state = new_state(8);
        for _ in 0..60 {
            tick(&mut state, DT);
        }
        assert!(state.particles.is_empty());

        let mut state = new_state(8);
        state.biome.index = 3;
        for _ in 0..60 {
            tick(&mut state, DT);
        }
        assert!((7..=8).contains(&state.particles.len()));
    }

    #[test]
    fn test_snow_only_at_night() {
        // Elapsed 0 is night
        let mut state = new_state(9);
        state.biome.index = 2;
        for _ in 0..60 {
            tick(&mut state, DT);
        }
        assert!(!state.particles.is_empty());

        // Midday
        let mut state = new_state(9);
        state.biome.index = 2;
        state.elapsed = CYCLE_DURATION * 0.4;
        for _ in 0..60 {
            tick(&mut state, DT);
        }
        assert!(state.particles.is_empty());
    }

    #[test]
    fn test_particles_disabled_emit_nothing() {
        let mut state = new_state(10);
        state.biome.index = 3;
        state.particles_enabled = false;
        for _ in 0..60 {
            tick(&mut state, DT);
        }
        assert!(state.particles.is_empty());
    }

    #[test]
    fn test_particle_cap_after_tick() {
        let mut state = new_state(11);
        state.biome.index = 3;
        let area = EmitArea {
            width: 800.0,
            height: 600.0,
            ground_y: state.viewport.ground_y(),
            wind: 0.0,
        };
        for _ in 0..400 {
            let id = state.particle_ids.next();
            let p = particles::spawn_ember(id, &area, &mut state.rng);
            state.particles.push(p);
        }
        tick(&mut state, DT);
        assert!(state.particles.len() <= MAX_PARTICLES);
    }

    #[test]
    fn test_wind_is_bounded() {
        for i in 0..1000 {
            assert!(wind_at(i as f32 * 0.7).abs() <= 34.0);
        }
        assert_eq!(wind_at(0.0), 0.0);
    }

    proptest! {
        #[test]
        fn prop_run_invariants(seed in any::<u64>(), presses in prop::collection::vec(0u32..40, 0..20)) {
            let mut state = new_state(seed);
            let mut last_score = 0;
            let mut now = 0.0f64;
            let mut press_at: Vec<u32> = presses;
            press_at.sort_unstable();
            let mut next_press = press_at.into_iter().peekable();

            for frame in 0..600u32 {
                while next_press.peek().is_some_and(|&p| p * 15 == frame) {
                    next_press.next();
                    jump(&mut state, now);
                }
                tick(&mut state, DT);
                now += DT as f64;
                if state.game_over {
                    break;
                }

                prop_assert!(state.score >= last_score);
                last_score = state.score;
                prop_assert!(state.platforms.iter().all(|p| p.right() >= CULL_X));
                let right = state.platforms.last().map(|p| p.right()).unwrap_or(0.0);
                prop_assert!(right >= 800.0 * 3.0);
                prop_assert!(state.particles.len() <= MAX_PARTICLES);
            }
        }
    }
}
