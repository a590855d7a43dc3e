//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects - no external files needed!
//!
//! Browsers keep the `AudioContext` suspended until a user gesture. Every
//! click or key press retries the unlock until the context reports running;
//! failures are logged, never fatal.
//!
//! A looping march plays under gameplay while a round is in progress.

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Player fires
    Shoot,
    /// Invader destroyed
    Explosion,
    /// Player struck by an enemy bullet
    PlayerHit,
    /// New level started
    LevelUp,
    /// Game over
    GameOver,
}

impl SoundEffect {
    /// Sound cue for a simulation event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::PlayerFired { .. } => Some(SoundEffect::Shoot),
            GameEvent::InvaderDestroyed { .. } => Some(SoundEffect::Explosion),
            GameEvent::PlayerHit { .. } => Some(SoundEffect::PlayerHit),
            GameEvent::LevelStarted { .. } => Some(SoundEffect::LevelUp),
            GameEvent::GameOver { .. } => Some(SoundEffect::GameOver),
            _ => None,
        }
    }
}

/// Background march: four descending bass notes, looped
const MUSIC_NOTES: [f32; 4] = [98.0, 87.31, 77.78, 73.42];
/// Seconds between march notes on level 1
const MUSIC_BASE_STEP_SECS: f64 = 0.5;
const MUSIC_STEP_PER_LEVEL_SECS: f64 = 0.04;
const MUSIC_MIN_STEP_SECS: f64 = 0.2;

/// Frequency of the `step`th note of the march loop
pub fn music_note(step: usize) -> f32 {
    MUSIC_NOTES[step % MUSIC_NOTES.len()]
}

/// Mute, autoplay-unlock and music bookkeeping
#[derive(Debug, Clone)]
pub struct AudioControl {
    muted: bool,
    /// The audio context was last seen running
    unlocked: bool,
    failed_unlocks: u32,
    /// A round is in progress; the march loop follows it
    in_play: bool,
    level: u32,
}

impl Default for AudioControl {
    fn default() -> Self {
        Self::new(false)
    }
}

impl AudioControl {
    pub fn new(muted: bool) -> Self {
        Self {
            muted,
            unlocked: false,
            failed_unlocks: 0,
            in_play: false,
            level: 1,
        }
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    /// Flip mute, returning the new state
    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        log::info!("Sound {}", if self.muted { "muted" } else { "unmuted" });
        self.muted
    }

    /// Record whether the audio context is currently running
    ///
    /// Only a running context counts as unlocked. A context the browser
    /// suspends again goes back to needing an unlock.
    pub fn note_context_state(&mut self, running: bool) {
        if running && !self.unlocked {
            log::info!("Audio unlocked");
        } else if !running && self.unlocked {
            log::warn!("Audio context suspended - will resume on next interaction");
        }
        self.unlocked = running;
    }

    /// Record a resume attempt the browser refused outright
    pub fn note_unlock_failed(&mut self, reason: &str) {
        self.failed_unlocks += 1;
        log::warn!(
            "Audio unlock failed (attempt {}): {} - will retry on next interaction",
            self.failed_unlocks,
            reason
        );
    }

    /// Whether the next gesture should attempt an unlock
    pub fn needs_unlock(&self) -> bool {
        !self.unlocked
    }

    pub fn should_play(&self) -> bool {
        self.unlocked && !self.muted
    }

    /// Track play state and level for the march loop
    pub fn note_event(&mut self, event: &GameEvent) {
        match event {
            GameEvent::Resumed => self.in_play = true,
            GameEvent::Restarted => {
                self.in_play = true;
                self.level = 1;
            }
            GameEvent::Paused | GameEvent::GameOver { .. } => self.in_play = false,
            GameEvent::LevelStarted { level } => self.level = *level,
            _ => {}
        }
    }

    /// Set play state directly (sessions that open already playing)
    pub fn set_in_play(&mut self, in_play: bool) {
        self.in_play = in_play;
    }

    pub fn music_should_play(&self) -> bool {
        self.in_play && self.should_play()
    }

    /// Seconds between march notes; the loop quickens each level
    pub fn music_step_secs(&self) -> f64 {
        let levels = self.level.saturating_sub(1) as f64;
        (MUSIC_BASE_STEP_SECS - MUSIC_STEP_PER_LEVEL_SECS * levels).max(MUSIC_MIN_STEP_SECS)
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, AudioContextState, GainNode, OscillatorNode, OscillatorType};

    use wasm_bindgen_futures::JsFuture;

    use super::{AudioControl, SoundEffect, music_note};
    use crate::sim::GameEvent;

    /// How far ahead of the audio clock march notes are queued
    const MUSIC_LOOKAHEAD_SECS: f64 = 0.1;

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        pub control: AudioControl,
        volume: f32,
        music_step: usize,
        /// Audio-clock time of the next queued march note (0 when stopped)
        next_note_time: f64,
    }

    impl AudioManager {
        pub fn new(muted: bool) -> Self {
            // Try to create audio context (may fail if not in secure context)
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                control: AudioControl::new(muted),
                volume: 0.6,
                music_step: 0,
                next_note_time: 0.0,
            }
        }

        /// Call from every click/keydown/change handler
        ///
        /// A resumed context is only trusted once its state reads `Running`,
        /// so a rejected resume leaves it locked for the next gesture.
        pub fn on_user_gesture(&mut self) {
            let Some(ctx) = &self.ctx else { return };
            let running = ctx.state() == AudioContextState::Running;
            self.control.note_context_state(running);
            if running {
                return;
            }

            match ctx.resume() {
                Ok(promise) => {
                    wasm_bindgen_futures::spawn_local(async move {
                        if let Err(e) = JsFuture::from(promise).await {
                            log::warn!(
                                "Audio resume rejected: {:?} - will retry on next interaction",
                                e
                            );
                        }
                    });
                }
                Err(e) => self.control.note_unlock_failed(&format!("{:?}", e)),
            }
        }

        /// Keep the march loop queued ahead of the audio clock. Call once per frame.
        pub fn update_music(&mut self) {
            let Some(ctx) = self.ctx.clone() else { return };
            self.control
                .note_context_state(ctx.state() == AudioContextState::Running);

            if !self.control.music_should_play() {
                self.next_note_time = 0.0;
                return;
            }

            let now = ctx.current_time();
            if self.next_note_time < now {
                self.next_note_time = now + 0.05;
            }
            let step = self.control.music_step_secs();
            while self.next_note_time < now + MUSIC_LOOKAHEAD_SECS {
                self.play_music_note(&ctx, music_note(self.music_step), self.next_note_time, step);
                self.music_step = self.music_step.wrapping_add(1);
                self.next_note_time += step;
            }
        }

        pub fn toggle_mute(&mut self) -> bool {
            self.control.toggle_mute()
        }

        /// Update music state and play the cue for each event that has one
        pub fn play_events(&mut self, events: &[GameEvent]) {
            for event in events {
                self.control.note_event(event);
            }
            for effect in events.iter().filter_map(SoundEffect::for_event) {
                self.play(effect);
            }
        }

        /// Play a sound effect
        pub fn play(&self, effect: SoundEffect) {
            if !self.control.should_play() {
                return;
            }
            let Some(ctx) = &self.ctx else { return };
            let vol = self.volume;

            match effect {
                SoundEffect::Shoot => self.play_shoot(ctx, vol),
                SoundEffect::Explosion => self.play_explosion(ctx, vol),
                SoundEffect::PlayerHit => self.play_player_hit(ctx, vol),
                SoundEffect::LevelUp => self.play_level_up(ctx, vol),
                SoundEffect::GameOver => self.play_game_over(ctx, vol),
            }
        }

        // === Sound generators ===

        /// Create an oscillator with gain envelope
        fn create_osc(
            &self,
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// Laser chirp
        fn play_shoot(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 880.0, OscillatorType::Square) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.2, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.12)
                .ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(220.0, t + 0.12)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.14).ok();
        }

        /// Crunchy burst
        fn play_explosion(&self, ctx: &AudioContext, vol: f32) {
            let t = ctx.current_time();

            if let Some((osc, gain)) = self.create_osc(ctx, 120.0, OscillatorType::Sawtooth) {
                gain.gain().set_value_at_time(vol * 0.4, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                    .ok();
                osc.frequency()
                    .exponential_ramp_to_value_at_time(40.0, t + 0.3)
                    .ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.32).ok();
            }

            // Rattle on top
            if let Some((osc, gain)) = self.create_osc(ctx, 1800.0, OscillatorType::Square) {
                gain.gain().set_value_at_time(vol * 0.08, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.1)
                    .ok();
                osc.frequency().set_value_at_time(900.0, t + 0.03).ok();
                osc.frequency().set_value_at_time(1400.0, t + 0.06).ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.12).ok();
            }
        }

        /// Low thud
        fn play_player_hit(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 200.0, OscillatorType::Triangle) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.6, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.4)
                .ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(50.0, t + 0.4)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.45).ok();
        }

        /// Rising arpeggio
        fn play_level_up(&self, ctx: &AudioContext, vol: f32) {
            let t = ctx.current_time();
            for (i, freq) in [523.25, 659.25, 783.99, 1046.5].iter().enumerate() {
                let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sine) else {
                    continue;
                };
                let start = t + i as f64 * 0.09;
                gain.gain().set_value_at_time(0.0, t).ok();
                gain.gain().set_value_at_time(vol * 0.3, start).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, start + 0.2)
                    .ok();
                osc.start().ok();
                osc.stop_with_when(start + 0.22).ok();
            }
        }

        /// One march note, held for most of the step
        fn play_music_note(&self, ctx: &AudioContext, freq: f32, at: f64, step: f64) {
            let Some((osc, gain)) = self.create_osc(ctx, freq, OscillatorType::Square) else {
                return;
            };
            let vol = self.volume * 0.3;
            let end = at + step * 0.6;

            gain.gain().set_value_at_time(0.0, ctx.current_time()).ok();
            gain.gain().set_value_at_time(vol * 0.25, at).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, end)
                .ok();

            osc.start_with_when(at).ok();
            osc.stop_with_when(end + 0.02).ok();
        }

        /// Slow descending wail
        fn play_game_over(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 440.0, OscillatorType::Sawtooth) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.3, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 1.2)
                .ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(55.0, t + 1.2)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 1.25).ok();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::GameOverReason;

    #[test]
    fn test_event_cues() {
        assert_eq!(
            SoundEffect::for_event(&GameEvent::InvaderDestroyed {
                invader_id: 1,
                points: 10
            }),
            Some(SoundEffect::Explosion)
        );
        assert_eq!(
            SoundEffect::for_event(&GameEvent::GameOver {
                reason: GameOverReason::Invaded,
                score: 0
            }),
            Some(SoundEffect::GameOver)
        );
        assert_eq!(SoundEffect::for_event(&GameEvent::Paused), None);
    }

    #[test]
    fn test_unlock_follows_context_state() {
        let mut control = AudioControl::new(false);
        assert!(control.needs_unlock());
        assert!(!control.should_play());

        // Resume refused: stays locked and the next gesture retries
        control.note_unlock_failed("NotAllowedError");
        assert!(control.needs_unlock());

        // Resume promise created but context still suspended
        control.note_context_state(false);
        assert!(control.needs_unlock());
        assert!(!control.should_play());

        control.note_context_state(true);
        assert!(!control.needs_unlock());
        assert!(control.should_play());

        // Browser suspended it again
        control.note_context_state(false);
        assert!(control.needs_unlock());
        assert!(!control.should_play());
    }

    #[test]
    fn test_mute_toggle() {
        let mut control = AudioControl::new(true);
        control.note_context_state(true);
        assert!(!control.should_play());
        assert!(!control.toggle_mute());
        assert!(control.should_play());
        assert!(control.toggle_mute());
        assert!(control.is_muted());
    }

    #[test]
    fn test_music_only_while_playing_unmuted_unlocked() {
        let mut control = AudioControl::new(false);
        control.note_context_state(true);
        assert!(!control.music_should_play());

        control.note_event(&GameEvent::Resumed);
        assert!(control.music_should_play());

        control.toggle_mute();
        assert!(!control.music_should_play());
        control.toggle_mute();
        assert!(control.music_should_play());

        control.note_event(&GameEvent::Paused);
        assert!(!control.music_should_play());

        control.note_event(&GameEvent::Restarted);
        assert!(control.music_should_play());

        control.note_context_state(false);
        assert!(!control.music_should_play());
        control.note_context_state(true);

        control.note_event(&GameEvent::GameOver {
            reason: GameOverReason::LivesExhausted,
            score: 40,
        });
        assert!(!control.music_should_play());
    }

    #[test]
    fn test_music_quickens_with_level() {
        let mut control = AudioControl::new(false);
        assert!((control.music_step_secs() - 0.5).abs() < 1e-9);

        control.note_event(&GameEvent::LevelStarted { level: 5 });
        assert!((control.music_step_secs() - 0.34).abs() < 1e-9);

        control.note_event(&GameEvent::LevelStarted { level: 40 });
        assert!((control.music_step_secs() - 0.2).abs() < 1e-9);

        control.note_event(&GameEvent::Restarted);
        assert!((control.music_step_secs() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_music_loop_repeats() {
        assert_eq!(music_note(0), music_note(4));
        assert!(music_note(0) > music_note(3));
    }
}
