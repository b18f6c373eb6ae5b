//! Frame driver
//!
//! Owns the simulation state and its collaborators (score storage, audio,
//! settings) and turns host callbacks into ticks. Collaborator failures are
//! absorbed here so the loop never stops.

use crate::audio::{AudioSink, SoundEffect};
use crate::highscores::BestScoreStore;
use crate::persistence::KeyValueStore;
use crate::platform::FrameClock;
use crate::renderer::SceneView;
use crate::settings::Settings;
use crate::sim::{self, GameEvent, GameState, Viewport};

/// One running game
pub struct Session<S, A> {
    state: GameState,
    scores: BestScoreStore<S>,
    audio: A,
    settings: Settings,
    clock: FrameClock,
    /// Best score reported by the last compare-and-store, shown from the next frame
    pending_best: Option<u64>,
    paused: bool,
}

impl<S: KeyValueStore, A: AudioSink> Session<S, A> {
    pub fn new(viewport: Viewport, seed: u64, store: S, mut audio: A) -> Self {
        let settings = Settings::load(&store);
        let scores = BestScoreStore::new(store);
        let mut state = GameState::new(viewport, seed);
        state.best_score = scores.get_best_score();
        state.particles_enabled = settings.particles;
        audio.apply_settings(&settings);
        log::info!(
            "Session ready: {}x{}, seed {}, best {}",
            viewport.width,
            viewport.height,
            seed,
            state.best_score
        );
        Self {
            state,
            scores,
            audio,
            settings,
            clock: FrameClock::new(),
            pending_best: None,
            paused: false,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn scores(&self) -> &BestScoreStore<S> {
        &self.scores
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Read-only snapshot for the painter
    pub fn view(&self) -> SceneView<'_> {
        SceneView::capture(&self.state, &self.settings)
    }

    /// Begin background music
    pub fn start(&mut self) {
        self.audio.start_music();
    }

    /// Host frame callback at `now` seconds
    pub fn frame(&mut self, now: f64) {
        if let Some(best) = self.pending_best.take() {
            self.state.best_score = self.state.best_score.max(best);
        }
        if self.paused {
            return;
        }
        let dt = self.clock.delta(now);
        sim::tick(&mut self.state, dt);
        self.handle_events();
    }

    /// Jump press at `now` seconds
    pub fn jump(&mut self, now: f64) {
        if self.paused {
            return;
        }
        sim::jump(&mut self.state, now);
        self.handle_events();
    }

    /// Page hidden
    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            self.audio.pause_music();
            log::debug!("Session paused");
        }
    }

    /// Page visible again
    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            self.clock.reset();
            self.audio.resume_music();
            log::debug!("Session resumed");
        }
    }

    /// Replace and persist settings
    pub fn set_settings(&mut self, settings: Settings) {
        self.state.particles_enabled = settings.particles;
        if !settings.particles {
            self.state.particles.clear();
        }
        self.audio.apply_settings(&settings);
        settings.save(self.scores.store());
        self.settings = settings;
    }

    /// Stop everything; the host should stop requesting frames
    pub fn dispose(&mut self) {
        self.audio.stop_music();
        self.audio.dispose();
        log::info!("Session disposed");
    }

    fn handle_events(&mut self) {
        for event in std::mem::take(&mut self.state.events) {
            match event {
                GameEvent::Jumped(_) => self.audio.play(SoundEffect::Jump),
                GameEvent::Died { score } => {
                    self.audio.play(SoundEffect::Death);
                    self.audio.stop_music();
                    if self.scores.update_best_score_if_higher(score) {
                        self.pending_best = Some(score);
                    }
                }
                GameEvent::Restarted => self.audio.start_music(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::BEST_SCORE_KEY;
    use crate::persistence::{MemoryStore, StorageError};

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Call {
        Play(SoundEffect),
        Start,
        Stop,
        Pause,
        Resume,
        Dispose,
    }

    #[derive(Default)]
    struct Recording {
        calls: Vec<Call>,
    }

    impl AudioSink for Recording {
        fn play(&mut self, effect: SoundEffect) {
            self.calls.push(Call::Play(effect));
        }
        fn start_music(&mut self) {
            self.calls.push(Call::Start);
        }
        fn stop_music(&mut self) {
            self.calls.push(Call::Stop);
        }
        fn pause_music(&mut self) {
            self.calls.push(Call::Pause);
        }
        fn resume_music(&mut self) {
            self.calls.push(Call::Resume);
        }
        fn dispose(&mut self) {
            self.calls.push(Call::Dispose);
        }
    }

    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get_item(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(Some("9".into()))
        }

        fn set_item(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable)
        }
    }

    fn session() -> Session<MemoryStore, Recording> {
        Session::new(
            Viewport::new(800.0, 600.0),
            42,
            MemoryStore::new(),
            Recording::default(),
        )
    }

    fn fall_out(session: &mut Session<impl KeyValueStore, impl AudioSink>, score: u64) {
        let state = session.state_mut();
        state.score = score;
        state.player.pos.y = state.viewport.height + 41.0;
        state.player.vy = 0.0;
        state.player.on_ground = false;
    }

    #[test]
    fn test_loads_best_score() {
        let store = MemoryStore::new();
        store.set_item(BEST_SCORE_KEY, "17").unwrap();
        let session = Session::new(Viewport::new(800.0, 600.0), 1, store, Recording::default());
        assert_eq!(session.state().best_score, 17);
    }

    #[test]
    fn test_fall_stores_score_and_adopts_it_next_frame() {
        let mut session = session();
        session.frame(0.0);
        fall_out(&mut session, 4);
        session.frame(0.016);

        assert!(session.state().game_over);
        assert_eq!(session.scores().get_best_score(), 4);
        assert_eq!(
            session.audio().calls,
            vec![Call::Play(SoundEffect::Death), Call::Stop]
        );
        assert_eq!(session.state().best_score, 0);

        session.frame(0.032);
        assert_eq!(session.state().best_score, 4);
    }

    #[test]
    fn test_lower_score_keeps_best() {
        let store = MemoryStore::new();
        store.set_item(BEST_SCORE_KEY, "5").unwrap();
        let mut session = Session::new(Viewport::new(800.0, 600.0), 2, store, Recording::default());
        fall_out(&mut session, 3);
        session.frame(0.0);
        session.frame(0.016);
        assert_eq!(session.scores().get_best_score(), 5);
        assert_eq!(session.state().best_score, 5);
    }

    #[test]
    fn test_failed_store_keeps_last_known_best() {
        let mut session = Session::new(
            Viewport::new(800.0, 600.0),
            3,
            ReadOnlyStore,
            Recording::default(),
        );
        assert_eq!(session.state().best_score, 9);
        fall_out(&mut session, 20);
        session.frame(0.0);
        session.frame(0.016);
        assert!(session.state().game_over);
        assert_eq!(session.state().best_score, 9);
    }

    #[test]
    fn test_jump_sounds_and_restart_music() {
        let mut session = session();
        session.jump(0.0);
        assert_eq!(session.audio().calls, vec![Call::Play(SoundEffect::Jump)]);

        fall_out(&mut session, 0);
        session.frame(0.1);
        session.jump(0.2);
        assert!(!session.state().game_over);
        assert_eq!(session.audio().calls.last(), Some(&Call::Start));
    }

    #[test]
    fn test_pause_stops_ticking() {
        let mut session = session();
        session.frame(0.0);
        session.pause();
        let elapsed = session.state().elapsed;
        session.frame(0.016);
        session.jump(0.02);
        assert_eq!(session.state().elapsed, elapsed);
        assert!(session.state().player.on_ground);

        session.resume();
        session.frame(10.0);
        assert!(session.state().elapsed > elapsed);
        assert_eq!(session.audio().calls, vec![Call::Pause, Call::Resume]);
    }

    #[test]
    fn test_settings_persist_and_gate_particles() {
        let mut session = session();
        let settings = Settings {
            particles: false,
            ..Settings::default()
        };
        session.set_settings(settings.clone());
        assert!(!session.state().particles_enabled);
        assert_eq!(Settings::load(session.scores().store()), settings);
    }

    #[test]
    fn test_dispose_releases_audio() {
        let mut session = session();
        session.start();
        session.dispose();
        assert_eq!(
            session.audio().calls,
            vec![Call::Start, Call::Stop, Call::Dispose]
        );
    }
}
