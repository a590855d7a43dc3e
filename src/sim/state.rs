//! Game state and combat state machine
//!
//! `GameState` is the whole session: score, lives, level, difficulty, the
//! formation, bullets and pending UI timers. The host owns one and feeds it
//! through `tick`; nothing here reads a clock or touches the page.
//!
//! Phases: `Ready -> Playing <-> Paused`, `Playing -> LevelTransition -> Playing`,
//! `Playing -> GameOver`. Restart goes back to `Playing` from any phase.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::bullet::Bullet;
use super::collision::{Aabb, Collision};
use super::difficulty::Difficulty;
use super::formation::{Formation, Invader};
use super::level::spawn_positions;
use super::timer::{TimerKind, Timers};
use crate::consts::*;
use crate::settings::Settings;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the first Play press
    Ready,
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Formation cleared, next level spawns on the following tick
    LevelTransition,
    /// Run ended
    GameOver,
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverReason {
    LivesExhausted,
    /// An invader reached the player's zone
    Invaded,
}

/// Something the host may want to react to (sound, HUD, messages)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    PlayerFired { bullet_id: u32, pos: Vec2 },
    EnemyFired { invader_id: u32, bullet_id: u32, pos: Vec2 },
    InvaderDestroyed { invader_id: u32, points: u64 },
    PlayerHit { lives: i32 },
    FormationDropped,
    LevelCleared { level: u32 },
    LevelStarted { level: u32 },
    BannerFading { level: u32 },
    BannerDismissed { level: u32 },
    GameOver { reason: GameOverReason, score: u64 },
    Paused,
    Resumed,
    DifficultyChanged(Difficulty),
    Restarted,
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    /// Red tint after being hit
    pub hit_flash: bool,
}

impl Player {
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos, Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT))
    }
}

/// "LEVEL n" message shown after a level transition
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Banner {
    pub level: u32,
    pub fading: bool,
}

/// Read-only values for the HUD
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Hud {
    pub score: u64,
    pub level: u32,
    pub lives: i32,
    pub phase: GamePhase,
    pub difficulty: Difficulty,
}

/// Complete game session (deterministic for a given seed and input stream)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub settings: Settings,
    /// Run seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
    /// Bumped on every restart; timers from older sessions never fire
    pub session: u32,
    pub phase: GamePhase,
    pub score: u64,
    /// Starts at 1
    pub level: u32,
    pub lives: i32,
    pub difficulty: Difficulty,
    /// Current invader tuning (difficulty profile plus level progression)
    pub invader_speed: f32,
    pub drop_distance: f32,
    pub shoot_delay_ms: f64,
    /// Game time, excluding time spent paused or over
    pub active_ms: f64,
    last_enemy_shot_ms: f64,
    last_player_shot_ms: Option<f64>,
    pub player: Player,
    pub formation: Formation,
    pub player_bullets: Vec<Bullet>,
    pub enemy_bullets: Vec<Bullet>,
    pub banner: Option<Banner>,
    pub timers: Timers,
    /// Undrained events, oldest first
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a new session with the level-1 formation spawned
    pub fn new(settings: &Settings, seed: u64) -> Self {
        let profile = settings.difficulty.profile();
        let mut state = Self {
            settings: settings.clone(),
            seed,
            rng: Pcg32::seed_from_u64(seed),
            session: 1,
            phase: if settings.start_paused {
                GamePhase::Ready
            } else {
                GamePhase::Playing
            },
            score: 0,
            level: 1,
            lives: STARTING_LIVES,
            difficulty: settings.difficulty,
            invader_speed: profile.speed,
            drop_distance: profile.drop_distance,
            shoot_delay_ms: profile.shoot_delay_ms,
            active_ms: 0.0,
            last_enemy_shot_ms: 0.0,
            last_player_shot_ms: None,
            player: Player {
                pos: settings.field.player_start(),
                hit_flash: false,
            },
            formation: Formation::empty(),
            player_bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            banner: None,
            timers: Timers::new(),
            events: Vec::new(),
            next_id: 1,
        };

        state.spawn_formation();
        log::info!(
            "New game: seed={}, difficulty={}, layout={}",
            seed,
            state.difficulty.as_str(),
            state.settings.layout.as_str()
        );
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn hud(&self) -> Hud {
        Hud {
            score: self.score,
            level: self.level,
            lives: self.lives,
            phase: self.phase,
            difficulty: self.difficulty,
        }
    }

    pub fn is_paused(&self) -> bool {
        matches!(self.phase, GamePhase::Ready | GamePhase::Paused)
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Replace the formation with the layout for the current level
    pub fn spawn_formation(&mut self) {
        let positions = spawn_positions(self.level, self.settings.layout, &self.settings.field);
        let invaders = positions
            .into_iter()
            .map(|pos| {
                let id = self.next_entity_id();
                Invader::new(id, pos)
            })
            .collect();
        self.formation = Formation::new(
            invaders,
            self.invader_speed,
            self.drop_distance,
            self.settings.drop_settle_ms,
        );
        log::debug!(
            "Level {}: spawned {} invaders",
            self.level,
            self.formation.invaders.len()
        );
    }

    // === Controls ===

    /// Play/pause button
    ///
    /// Ignored once the game is over.
    pub fn toggle_pause(&mut self) {
        match self.phase {
            GamePhase::Ready | GamePhase::Paused => {
                self.phase = GamePhase::Playing;
                self.events.push(GameEvent::Resumed);
            }
            GamePhase::Playing => {
                self.phase = GamePhase::Paused;
                self.events.push(GameEvent::Paused);
            }
            GamePhase::LevelTransition => {
                self.finish_level_transition();
                self.phase = GamePhase::Paused;
                self.events.push(GameEvent::Paused);
            }
            GamePhase::GameOver => {}
        }
    }

    /// Difficulty select changed
    ///
    /// Pauses an active round, then applies the new profile to the session
    /// and the live formation. Score, level and lives are untouched; play
    /// resumes only on an explicit toggle.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        if matches!(self.phase, GamePhase::Playing | GamePhase::LevelTransition) {
            self.toggle_pause();
        }

        let profile = difficulty.profile();
        self.difficulty = difficulty;
        self.invader_speed = profile.speed;
        self.drop_distance = profile.drop_distance;
        self.shoot_delay_ms = profile.shoot_delay_ms;
        self.formation.apply_profile(profile.speed, profile.drop_distance);
        self.events.push(GameEvent::DifficultyChanged(difficulty));
        log::info!("Difficulty set to {}", difficulty.as_str());
    }

    /// Start over at level 1 with the selected difficulty
    pub fn restart(&mut self) {
        let profile = self.difficulty.profile();
        self.session += 1;
        self.phase = GamePhase::Playing;
        self.score = 0;
        self.level = 1;
        self.lives = STARTING_LIVES;
        self.invader_speed = profile.speed;
        self.drop_distance = profile.drop_distance;
        self.shoot_delay_ms = profile.shoot_delay_ms;
        self.active_ms = 0.0;
        self.last_enemy_shot_ms = 0.0;
        self.last_player_shot_ms = None;
        self.player = Player {
            pos: self.settings.field.player_start(),
            hit_flash: false,
        };
        self.player_bullets.clear();
        self.enemy_bullets.clear();
        self.banner = None;
        self.spawn_formation();
        self.events.push(GameEvent::Restarted);
        log::info!("Game restarted (session {})", self.session);
    }

    // === Firing ===

    /// Fire from the player's ship, at most once per cooldown
    pub fn fire_player(&mut self) -> Option<u32> {
        if self.phase != GamePhase::Playing {
            return None;
        }
        if let Some(last) = self.last_player_shot_ms
            && self.active_ms <= last + PLAYER_FIRE_COOLDOWN_MS
        {
            return None;
        }

        let id = self.next_entity_id();
        let bullet = Bullet::player(id, self.player.pos);
        self.events.push(GameEvent::PlayerFired {
            bullet_id: id,
            pos: bullet.pos,
        });
        self.player_bullets.push(bullet);
        self.last_player_shot_ms = Some(self.active_ms);
        Some(id)
    }

    /// Fire from a random live invader once the enemy delay has elapsed
    pub fn try_enemy_fire(&mut self) -> Option<u32> {
        if self.active_ms <= self.last_enemy_shot_ms + self.shoot_delay_ms {
            return None;
        }
        let (invader_id, shooter) = self
            .formation
            .pick_shooter(&mut self.rng)
            .map(|i| (i.id, i.pos))?;

        let id = self.next_entity_id();
        let bullet = Bullet::enemy(id, shooter);
        self.events.push(GameEvent::EnemyFired {
            invader_id,
            bullet_id: id,
            pos: bullet.pos,
        });
        self.enemy_bullets.push(bullet);
        self.last_enemy_shot_ms = self.active_ms;
        Some(id)
    }

    // === Collisions ===

    /// Apply a reported collision if every entity it names is still live
    ///
    /// Returns false (and changes nothing) for stale or duplicate reports.
    pub fn dispatch_collision(&mut self, collision: Collision) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        match collision {
            Collision::PlayerBulletInvader {
                bullet_id,
                invader_id,
            } => {
                let bullet_live = self
                    .player_bullets
                    .iter()
                    .any(|b| b.id == bullet_id && b.alive);
                let invader_live = self
                    .formation
                    .get(invader_id)
                    .is_some_and(|i| i.alive);
                if !bullet_live || !invader_live {
                    return false;
                }
                self.on_invader_hit(bullet_id, invader_id);
            }
            Collision::EnemyBulletPlayer { bullet_id } => {
                let bullet_live = self
                    .enemy_bullets
                    .iter()
                    .any(|b| b.id == bullet_id && b.alive);
                if !bullet_live {
                    return false;
                }
                self.on_player_hit(bullet_id);
            }
        }
        true
    }

    fn on_invader_hit(&mut self, bullet_id: u32, invader_id: u32) {
        if let Some(bullet) = self.player_bullets.iter_mut().find(|b| b.id == bullet_id) {
            bullet.alive = false;
        }
        self.formation.destroy(invader_id);

        let points = POINTS_PER_INVADER * self.level as u64;
        self.score += points;
        self.events.push(GameEvent::InvaderDestroyed { invader_id, points });
    }

    fn on_player_hit(&mut self, bullet_id: u32) {
        if let Some(bullet) = self.enemy_bullets.iter_mut().find(|b| b.id == bullet_id) {
            bullet.alive = false;
        }

        self.lives -= 1;
        self.events.push(GameEvent::PlayerHit {
            lives: self.lives.max(0),
        });

        if self.lives <= 0 {
            self.game_over(GameOverReason::LivesExhausted);
        } else {
            self.player.hit_flash = true;
            self.timers.schedule(
                self.session,
                self.active_ms,
                HIT_FLASH_MS,
                TimerKind::ClearHitFlash,
            );
        }
    }

    /// End the run (only the first call has any effect)
    pub fn game_over(&mut self, reason: GameOverReason) {
        if self.phase == GamePhase::GameOver {
            return;
        }
        self.phase = GamePhase::GameOver;
        self.lives = self.lives.max(0);
        self.player.hit_flash = false;
        self.events.push(GameEvent::GameOver {
            reason,
            score: self.score,
        });
        log::info!(
            "Game over ({:?}) at level {} with score {}",
            reason,
            self.level,
            self.score
        );
    }

    // === Level progression ===

    /// Enter the level transition if the formation is empty
    ///
    /// Returns true only on the call that starts the transition.
    pub fn check_level_cleared(&mut self) -> bool {
        if self.phase != GamePhase::Playing || !self.formation.is_cleared() {
            return false;
        }

        let cleared = self.level;
        self.phase = GamePhase::LevelTransition;
        self.level += 1;
        let progression = self.settings.progression;
        self.invader_speed = progression.next_speed(self.invader_speed);
        self.shoot_delay_ms = progression.next_shoot_delay(self.shoot_delay_ms);
        self.events.push(GameEvent::LevelCleared { level: cleared });
        log::info!(
            "Level {} cleared: speed={}, shoot delay={}ms",
            cleared,
            self.invader_speed,
            self.shoot_delay_ms
        );
        true
    }

    /// Spawn the next level's formation and resume play
    pub fn finish_level_transition(&mut self) {
        if self.phase != GamePhase::LevelTransition {
            return;
        }
        self.spawn_formation();
        self.phase = GamePhase::Playing;
        self.banner = Some(Banner {
            level: self.level,
            fading: false,
        });
        let level = self.level;
        self.timers.schedule(
            self.session,
            self.active_ms,
            LEVEL_BANNER_MS,
            TimerKind::FadeBanner { level },
        );
        self.timers.schedule(
            self.session,
            self.active_ms,
            LEVEL_BANNER_MS + BANNER_FADE_MS,
            TimerKind::DismissBanner { level },
        );
        self.events.push(GameEvent::LevelStarted { level });
    }

    // === Housekeeping ===

    /// Fire due timers for this session
    pub fn run_timers(&mut self) {
        for kind in self.timers.take_due(self.session, self.active_ms) {
            match kind {
                TimerKind::ClearHitFlash => self.player.hit_flash = false,
                TimerKind::FadeBanner { level } => {
                    if let Some(banner) = self.banner.as_mut().filter(|b| b.level == level) {
                        banner.fading = true;
                        self.events.push(GameEvent::BannerFading { level });
                    }
                }
                TimerKind::DismissBanner { level } => {
                    if self.banner.is_some_and(|b| b.level == level) {
                        self.banner = None;
                        self.events.push(GameEvent::BannerDismissed { level });
                    }
                }
            }
        }
    }

    /// Retire bullets that left the field, then drop everything consumed
    ///
    /// Bullets already consumed by a hit are skipped by the off-field check.
    pub fn sweep(&mut self) {
        let field = self.settings.field;
        for bullet in self
            .player_bullets
            .iter_mut()
            .chain(self.enemy_bullets.iter_mut())
            .filter(|b| b.alive)
        {
            if bullet.off_field(&field) {
                bullet.alive = false;
            }
        }
        self.player_bullets.retain(|b| b.alive);
        self.enemy_bullets.retain(|b| b.alive);
        self.formation.reap();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::bullet::BulletOwner;
    use proptest::prelude::*;

    fn playing() -> GameState {
        let settings = Settings {
            start_paused: false,
            ..Default::default()
        };
        GameState::new(&settings, 12345)
    }

    /// Put a live player bullet on an invader and return the pair
    fn aim_at(state: &mut GameState, invader_id: u32) -> Collision {
        let pos = state.formation.get(invader_id).map(|i| i.pos).unwrap();
        let bullet_id = state.next_entity_id();
        let mut bullet = Bullet::player(bullet_id, pos);
        bullet.pos = pos;
        state.player_bullets.push(bullet);
        Collision::PlayerBulletInvader {
            bullet_id,
            invader_id,
        }
    }

    fn enemy_shot(state: &mut GameState) -> Collision {
        let bullet_id = state.next_entity_id();
        let mut bullet = Bullet::enemy(bullet_id, state.player.pos);
        bullet.pos = state.player.pos;
        state.enemy_bullets.push(bullet);
        Collision::EnemyBulletPlayer { bullet_id }
    }

    #[test]
    fn test_new_game() {
        let state = GameState::new(&Settings::default(), 1);
        assert_eq!(state.phase, GamePhase::Ready);
        assert_eq!(state.level, 1);
        assert_eq!(state.lives, 3);
        assert_eq!(state.score, 0);
        assert_eq!(state.formation.live_count(), 10);
        assert_eq!(state.invader_speed, 50.0);
    }

    #[test]
    fn test_pause_toggle() {
        let mut state = GameState::new(&Settings::default(), 1);
        state.toggle_pause();
        assert_eq!(state.phase, GamePhase::Playing);
        state.toggle_pause();
        assert_eq!(state.phase, GamePhase::Paused);
        state.toggle_pause();
        assert_eq!(state.phase, GamePhase::Playing);

        state.game_over(GameOverReason::Invaded);
        state.toggle_pause();
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_hit_invader_scores_once() {
        let mut state = playing();
        state.level = 3;
        let id = state.formation.invaders[0].id;
        let hit = aim_at(&mut state, id);

        assert!(state.dispatch_collision(hit));
        assert!(!state.dispatch_collision(hit));
        assert_eq!(state.score, 30);
        assert!(!state.formation.get(id).unwrap().alive);
    }

    #[test]
    fn test_one_bullet_two_invaders() {
        let mut state = playing();
        let a = state.formation.invaders[0].id;
        let b = state.formation.invaders[1].id;
        let Collision::PlayerBulletInvader { bullet_id, .. } = aim_at(&mut state, a) else {
            unreachable!()
        };

        assert!(state.dispatch_collision(Collision::PlayerBulletInvader {
            bullet_id,
            invader_id: a
        }));
        assert!(!state.dispatch_collision(Collision::PlayerBulletInvader {
            bullet_id,
            invader_id: b
        }));
        assert_eq!(state.formation.live_count(), 9);
        assert_eq!(state.score, 10);
    }

    #[test]
    fn test_lives_and_game_over() {
        let mut state = playing();
        let shot = enemy_shot(&mut state);
        assert!(state.dispatch_collision(shot));
        assert_eq!(state.lives, 2);
        assert!(state.player.hit_flash);
        assert!(!state.dispatch_collision(shot));
        assert_eq!(state.lives, 2);

        let shot = enemy_shot(&mut state);
        state.dispatch_collision(shot);
        let shot = enemy_shot(&mut state);
        state.dispatch_collision(shot);
        assert_eq!(state.lives, 0);
        assert_eq!(state.phase, GamePhase::GameOver);

        // Already over: further hits change nothing
        let shot = enemy_shot(&mut state);
        assert!(!state.dispatch_collision(shot));
        assert_eq!(state.lives, 0);

        let game_overs = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(game_overs, 1);
    }

    #[test]
    fn test_game_over_once() {
        let mut state = playing();
        state.game_over(GameOverReason::Invaded);
        state.game_over(GameOverReason::Invaded);
        state.game_over(GameOverReason::LivesExhausted);
        let count = state
            .drain_events()
            .iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_level_transition_once() {
        let mut state = playing();
        let ids: Vec<u32> = state.formation.live().map(|i| i.id).collect();
        for id in ids {
            state.formation.destroy(id);
        }

        assert!(state.check_level_cleared());
        assert!(!state.check_level_cleared());
        assert!(state.formation.is_cleared());
        assert_eq!(state.level, 2);
        assert_eq!(state.invader_speed, 60.0);
        assert_eq!(state.shoot_delay_ms, 1900.0);

        state.finish_level_transition();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.formation.live_count(), 12);
        assert_eq!(state.formation.speed(), 60.0);
        assert_eq!(state.banner, Some(Banner { level: 2, fading: false }));
    }

    #[test]
    fn test_difficulty_change_mid_round() {
        let mut state = playing();
        state.score = 120;
        state.level = 2;
        state.lives = 2;

        state.set_difficulty(Difficulty::Hard);
        assert_eq!(state.phase, GamePhase::Paused);
        assert_eq!(state.formation.speed(), 70.0);
        assert_eq!(state.formation.drop_distance(), 25.0);
        assert_eq!(state.shoot_delay_ms, 1000.0);
        assert_eq!((state.score, state.level, state.lives), (120, 2, 2));

        // Stays paused until toggled
        state.set_difficulty(Difficulty::Easy);
        assert_eq!(state.phase, GamePhase::Paused);
        assert_eq!(state.formation.speed(), 30.0);
    }

    #[test]
    fn test_player_fire_cooldown() {
        let mut state = playing();
        assert!(state.fire_player().is_some());
        assert!(state.fire_player().is_none());
        state.active_ms = 500.0;
        assert!(state.fire_player().is_none());
        state.active_ms = 501.0;
        assert!(state.fire_player().is_some());
        assert_eq!(state.player_bullets.len(), 2);
        assert!(state.player_bullets.iter().all(|b| b.owner == BulletOwner::Player));
    }

    #[test]
    fn test_enemy_fire_waits_for_delay() {
        let mut state = playing();
        state.active_ms = 2000.0;
        assert!(state.try_enemy_fire().is_none());
        state.active_ms = 2001.0;
        assert!(state.try_enemy_fire().is_some());
        assert!(state.try_enemy_fire().is_none());
        assert_eq!(state.enemy_bullets.len(), 1);
    }

    #[test]
    fn test_sweep_skips_consumed_bullets() {
        let mut state = playing();
        let id = state.formation.invaders[0].id;
        let hit = aim_at(&mut state, id);
        // Consumed bullet also sits off the field
        state.player_bullets[0].pos.y = -50.0;
        assert!(state.dispatch_collision(hit));

        let stray = state.next_entity_id();
        let mut bullet = Bullet::player(stray, Vec2::new(100.0, 10.0));
        bullet.pos.y = -5.0;
        state.player_bullets.push(bullet);

        state.sweep();
        assert!(state.player_bullets.is_empty());
        assert_eq!(state.formation.invaders.len(), 9);
        assert_eq!(state.score, 10);
    }

    #[test]
    fn test_restart_resets() {
        let mut state = playing();
        state.score = 250;
        state.level = 4;
        state.lives = 0;
        state.game_over(GameOverReason::LivesExhausted);

        state.restart();
        assert_eq!(state.score, 0);
        assert_eq!(state.level, 1);
        assert_eq!(state.lives, 3);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.session, 2);
        assert_eq!(state.formation.live_count(), 10);
    }

    #[test]
    fn test_stale_flash_timer_after_restart() {
        let mut state = playing();
        state.active_ms = 5000.0;
        let shot = enemy_shot(&mut state);
        state.dispatch_collision(shot);
        assert!(state.player.hit_flash);

        state.restart();
        state.active_ms = 5100.0;
        let shot = enemy_shot(&mut state);
        state.dispatch_collision(shot);
        assert!(state.player.hit_flash);

        // The old session's timer is due now but must not clear the new flash
        state.active_ms = 5250.0;
        state.run_timers();
        assert!(state.player.hit_flash);

        state.active_ms = 5300.0;
        state.run_timers();
        assert!(!state.player.hit_flash);
    }

    #[test]
    fn test_banner_timers() {
        let mut state = playing();
        state.phase = GamePhase::LevelTransition;
        state.level = 2;
        state.finish_level_transition();

        state.active_ms = LEVEL_BANNER_MS;
        state.run_timers();
        assert_eq!(state.banner, Some(Banner { level: 2, fading: true }));

        state.active_ms = LEVEL_BANNER_MS + BANNER_FADE_MS;
        state.run_timers();
        assert_eq!(state.banner, None);
        assert!(state.events.contains(&GameEvent::BannerDismissed { level: 2 }));
    }

    proptest! {
        #[test]
        fn prop_score_is_ten_per_level(level in 1u32..50, repeats in 1usize..4) {
            let mut state = playing();
            state.level = level;
            let id = state.formation.invaders[0].id;
            let hit = aim_at(&mut state, id);
            for _ in 0..repeats {
                state.dispatch_collision(hit);
            }
            prop_assert_eq!(state.score, 10 * level as u64);
        }

        #[test]
        fn prop_lives_never_negative(hits in 1usize..10) {
            let mut state = playing();
            for _ in 0..hits {
                let shot = enemy_shot(&mut state);
                state.dispatch_collision(shot);
                prop_assert!(state.lives >= 0);
            }
            prop_assert_eq!(state.lives, (3 - hits as i32).max(0));
            prop_assert_eq!(state.is_game_over(), hits >= 3);
        }
    }
}
