//! Frame driver
//!
//! [`Game`] owns the world state plus the host capabilities it talks to. The
//! host calls [`Game::frame`] once per animation frame and stops scheduling
//! frames when it returns [`TickOutcome::Stop`].

use crate::audio::{AudioSink, SoundEffect};
use crate::highscores::HighScoreStore;
use crate::renderer::{RenderSurface, draw_frame};
use crate::sim::{GameEvent, GameState, Playfield, TickInput, TickOutcome, tick};
use crate::tuning::Tuning;

/// One game session: repeated runs sharing a high score store
pub struct Game<A: AudioSink, S: HighScoreStore> {
    state: GameState,
    audio: A,
    store: S,
    /// Stored best when the current run started
    run_start_best: u32,
    /// Last value read from or written to the store
    stored_best: u32,
    /// Whether the last frame ended the game-over fade
    stopped: bool,
    /// Apply shake offsets when drawing
    pub screen_shake: bool,
}

impl<A: AudioSink, S: HighScoreStore> Game<A, S> {
    pub fn new(seed: u64, playfield: Playfield, tuning: Tuning, audio: A, store: S) -> Self {
        let mut state = GameState::new(seed, playfield, tuning);
        let best = store.high_score();
        state.high_score = best;
        log::info!("New game (seed {}), stored best {}", seed, best);
        Self {
            state,
            audio,
            store,
            run_start_best: best,
            stored_best: best,
            stopped: false,
            screen_shake: true,
        }
    }

    /// Advance one frame, deliver its cues and draw it
    pub fn frame<R: RenderSurface + ?Sized>(
        &mut self,
        input: &TickInput,
        surface: &mut R,
    ) -> TickOutcome {
        let outcome = tick(&mut self.state, input);

        for event in self.state.drain_events() {
            self.audio.play(SoundEffect::for_event(event));
            if event == GameEvent::Crash && self.state.score > self.run_start_best {
                log::info!(
                    "New high score {} (was {})",
                    self.state.score,
                    self.run_start_best
                );
                self.audio.play(SoundEffect::HighScore);
            }
        }

        let score = self.state.score;
        if score > self.state.high_score {
            self.state.high_score = score;
        }
        if score > self.stored_best {
            self.store.set_high_score(score);
            self.stored_best = score;
        }

        draw_frame(&self.state, surface, self.screen_shake);

        self.stopped = outcome == TickOutcome::Stop;
        outcome
    }

    /// Start a new run with the stored high score
    pub fn restart(&mut self) {
        self.state.reset();
        let best = self.store.high_score();
        self.state.high_score = best;
        self.run_start_best = best;
        self.stored_best = best;
        self.stopped = false;
        log::info!("Restarted, best {}", best);
    }

    /// True once the game-over fade has finished
    pub fn restart_available(&self) -> bool {
        self.stopped
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn audio_mut(&mut self) -> &mut A {
        &mut self.audio
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
