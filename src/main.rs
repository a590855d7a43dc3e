//! Invader Rush entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlSelectElement, KeyboardEvent,
        MouseEvent,
    };

    use invader_rush::audio::AudioManager;
    use invader_rush::consts::*;
    use invader_rush::settings::Settings;
    use invader_rush::sim::{
        BulletOwner, Difficulty, GameEvent, GamePhase, GameState, Hud, TickInput, tick,
    };

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    /// Game instance holding all state
    struct Game {
        state: GameState,
        audio: AudioManager,
        ctx: CanvasRenderingContext2d,
        accumulator: f32,
        last_time: f64,
        input: TickInput,
        // Held keys
        left: bool,
        right: bool,
        fire: bool,
        // Last values pushed to the DOM
        last_hud: Option<Hud>,
    }

    impl Game {
        fn new(settings: &Settings, seed: u64, ctx: CanvasRenderingContext2d) -> Self {
            Self {
                state: GameState::new(settings, seed),
                audio: AudioManager::new(settings.muted),
                ctx,
                accumulator: 0.0,
                last_time: 0.0,
                input: TickInput::default(),
                left: false,
                right: false,
                fire: false,
                last_hud: None,
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt_ms: f32) {
            let dt_ms = dt_ms.min(100.0);
            self.accumulator += dt_ms;

            self.input.move_x = match (self.left, self.right) {
                (true, false) => -1.0,
                (false, true) => 1.0,
                _ => 0.0,
            };
            self.input.fire = self.fire;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT_MS && substeps < MAX_SUBSTEPS {
                let input = self.input.clone();
                tick(&mut self.state, &input, SIM_DT_MS);
                self.accumulator -= SIM_DT_MS;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input.pause = false;
                self.input.restart = false;
                self.input.difficulty = None;
            }

            let events = self.state.drain_events();
            self.audio.play_events(&events);
            self.audio.update_music();
            for event in &events {
                match event {
                    GameEvent::LevelStarted { level } => log::info!("Level {}", level),
                    GameEvent::GameOver { reason, score } => {
                        log::info!("Game over ({:?}), score {}", reason, score)
                    }
                    _ => {}
                }
            }
        }

        /// Draw the current frame
        fn render(&self) {
            let ctx = &self.ctx;
            let field = self.state.settings.field;

            ctx.set_global_alpha(1.0);
            ctx.set_fill_style_str("#000000");
            ctx.fill_rect(0.0, 0.0, field.width as f64, field.height as f64);

            // Invaders
            ctx.set_fill_style_str("#33ff66");
            for invader in self.state.formation.live() {
                fill_centered(ctx, invader.pos.x, invader.pos.y, INVADER_WIDTH, INVADER_HEIGHT);
            }

            // Player
            let player = &self.state.player;
            ctx.set_fill_style_str(if player.hit_flash { "#ff3333" } else { "#33ccff" });
            fill_centered(ctx, player.pos.x, player.pos.y, PLAYER_WIDTH, PLAYER_HEIGHT);

            // Bullets
            for bullet in self
                .state
                .player_bullets
                .iter()
                .chain(self.state.enemy_bullets.iter())
                .filter(|b| b.alive)
            {
                ctx.set_fill_style_str(match bullet.owner {
                    BulletOwner::Player => "#ffff66",
                    BulletOwner::Enemy => "#ff6666",
                });
                fill_centered(ctx, bullet.pos.x, bullet.pos.y, BULLET_WIDTH, BULLET_HEIGHT);
            }

            let cx = field.width as f64 / 2.0;
            let cy = field.height as f64 / 2.0;
            ctx.set_text_align("center");

            if let Some(banner) = self.state.banner {
                ctx.set_global_alpha(if banner.fading { 0.4 } else { 1.0 });
                ctx.set_font("bold 32px monospace");
                ctx.set_fill_style_str("#ffffff");
                ctx.fill_text(&format!("LEVEL {}", banner.level), cx, cy).ok();
                ctx.set_global_alpha(1.0);
            }

            match self.state.phase {
                GamePhase::Ready => {
                    ctx.set_font("20px monospace");
                    ctx.set_fill_style_str("#ffffff");
                    ctx.fill_text("Press Play to start", cx, cy + 40.0).ok();
                }
                GamePhase::Paused => {
                    ctx.set_font("bold 28px monospace");
                    ctx.set_fill_style_str("#ffffff");
                    ctx.fill_text("PAUSED", cx, cy + 40.0).ok();
                }
                GamePhase::GameOver => {
                    ctx.set_global_alpha(0.7);
                    ctx.set_fill_style_str("#000000");
                    ctx.fill_rect(cx - 150.0, cy - 60.0, 300.0, 120.0);
                    ctx.set_global_alpha(1.0);
                    ctx.set_font("bold 40px monospace");
                    ctx.set_fill_style_str("#ff0000");
                    ctx.fill_text("GAME OVER", cx, cy - 5.0).ok();
                    ctx.set_font("20px monospace");
                    ctx.set_fill_style_str("#ffffff");
                    ctx.fill_text("Click to Restart", cx, cy + 35.0).ok();
                }
                GamePhase::Playing | GamePhase::LevelTransition => {}
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&mut self) {
            let hud = self.state.hud();
            if self.last_hud == Some(hud) {
                return;
            }
            self.last_hud = Some(hud);

            let Some(document) = document() else { return };

            if let Some(el) = document.get_element_by_id("score") {
                el.set_text_content(Some(&hud.score.to_string()));
            }
            if let Some(el) = document.get_element_by_id("level") {
                el.set_text_content(Some(&hud.level.to_string()));
            }
            if let Some(el) = document.get_element_by_id("lives") {
                el.set_text_content(Some(&hud.lives.to_string()));
            }

            if let Some(btn) = document.get_element_by_id("playPauseBtn") {
                let label = match hud.phase {
                    GamePhase::Ready | GamePhase::Paused => "Play",
                    _ => "Pause",
                };
                btn.set_text_content(Some(label));
            }
        }

        fn update_mute_button(&self) {
            let Some(document) = document() else { return };
            let muted = self.audio.control.is_muted();

            if let Some(icon) = document.get_element_by_id("muteIcon") {
                // Speaker with and without sound waves
                icon.set_text_content(Some(if muted { "\u{1F50A}" } else { "\u{1F508}" }));
            }
            if let Some(btn) = document.get_element_by_id("muteBtn") {
                let _ = btn.set_attribute(
                    "aria-label",
                    if muted { "Unmute sound" } else { "Mute sound" },
                );
                let _ = btn.class_list().toggle_with_force("muted", muted);
            }
        }
    }

    fn fill_centered(ctx: &CanvasRenderingContext2d, x: f32, y: f32, w: f32, h: f32) {
        ctx.fill_rect(
            (x - w / 2.0) as f64,
            (y - h / 2.0) as f64,
            w as f64,
            h as f64,
        );
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Failed to init logger: {}", e).into());
        }

        log::info!("Invader Rush starting...");

        let Some(document) = document() else {
            log::error!("No document");
            return;
        };

        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No #canvas element");
            return;
        };

        let settings = Settings::load();
        canvas.set_width(settings.field.width as u32);
        canvas.set_height(settings.field.height as u32);

        let Some(ctx) = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
        else {
            log::error!("Canvas 2D context unavailable");
            return;
        };

        // Initialize game
        let seed = settings.seed.unwrap_or_else(|| js_sys::Date::now() as u64);
        let game = Rc::new(RefCell::new(Game::new(&settings, seed, ctx)));
        {
            let mut g = game.borrow_mut();
            let playing = g.state.phase == GamePhase::Playing;
            g.audio.control.set_in_play(playing);
            g.update_mute_button();
        }

        log::info!(
            "Game initialized with seed {} ({} difficulty)",
            seed,
            settings.difficulty.as_str()
        );

        setup_keyboard(game.clone());
        setup_canvas_click(&canvas, game.clone());
        setup_buttons(&document, game.clone());
        setup_difficulty_select(&document, game.clone(), settings.difficulty);
        setup_auto_pause(&document, game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("Invader Rush running!");
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                g.audio.on_user_gesture();
                match event.key().as_str() {
                    "ArrowLeft" | "a" | "A" => g.left = true,
                    "ArrowRight" | "d" | "D" => g.right = true,
                    " " => {
                        event.prevent_default();
                        g.fire = true;
                    }
                    "p" | "P" | "Escape" => g.input.pause = true,
                    "i" | "I" => {
                        g.input.idle_mode = !g.input.idle_mode;
                        log::info!("Idle mode: {}", g.input.idle_mode);
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" | "a" | "A" => g.left = false,
                    "ArrowRight" | "d" | "D" => g.right = false,
                    " " => g.fire = false,
                    _ => {}
                }
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Clicking the field after game over restarts
    fn setup_canvas_click(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            let mut g = game.borrow_mut();
            g.audio.on_user_gesture();
            if g.state.is_game_over() {
                g.input.restart = true;
            }
        });
        let _ = canvas.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        if let Some(btn) = document.get_element_by_id("playPauseBtn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.audio.on_user_gesture();
                g.input.pause = true;
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("restartBtn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.audio.on_user_gesture();
                g.input.restart = true;
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("muteBtn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.audio.on_user_gesture();
                g.audio.toggle_mute();
                g.update_mute_button();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_difficulty_select(document: &Document, game: Rc<RefCell<Game>>, initial: Difficulty) {
        let Some(select) = document
            .get_element_by_id("difficulty")
            .and_then(|el| el.dyn_into::<HtmlSelectElement>().ok())
        else {
            return;
        };
        select.set_value(initial.as_str());

        let select_clone = select.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let mut g = game.borrow_mut();
            g.audio.on_user_gesture();
            let value = select_clone.value();
            match Difficulty::from_str(&value) {
                Some(difficulty) => g.input.difficulty = Some(difficulty),
                None => log::warn!("Unknown difficulty '{}'", value),
            }
        });
        let _ = select.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_auto_pause(document: &Document, game: Rc<RefCell<Game>>) {
        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    if g.state.phase == GamePhase::Playing && !g.input.pause {
                        g.input.pause = true;
                        log::info!("Auto-paused (tab hidden)");
                    }
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        if let Some(window) = web_sys::window() {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                // Keys released while unfocused never arrive
                g.left = false;
                g.right = false;
                g.fire = false;
                if g.state.phase == GamePhase::Playing && !g.input.pause {
                    g.input.pause = true;
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt_ms = if g.last_time > 0.0 {
                (time - g.last_time) as f32
            } else {
                SIM_DT_MS
            };
            g.last_time = time;

            g.update(dt_ms);
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Native: headless autopilot run, logging events until game over
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use invader_rush::consts::SIM_DT_MS;
    use invader_rush::sim::{GameEvent, GamePhase, GameState, TickInput, tick};
    use invader_rush::Settings;

    // Ten minutes of game time
    const MAX_TICKS: u32 = 60 * 60 * 10;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Invader Rush (native) starting...");
    log::info!("Native mode runs a headless autopilot demo - use a wasm build to play");

    let settings = Settings::load();
    let seed = settings.seed.unwrap_or_else(|| {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default()
    });
    log::debug!("Settings: {}", settings.to_json());
    let mut state = GameState::new(&settings, seed);
    log::info!(
        "Seed {} | {} difficulty | {} layout | field {}x{}",
        seed,
        settings.difficulty.as_str(),
        settings.layout.as_str(),
        settings.field.width,
        settings.field.height
    );

    let mut input = TickInput {
        idle_mode: true,
        pause: state.phase == GamePhase::Ready,
        ..Default::default()
    };

    let mut ticks = 0;
    while ticks < MAX_TICKS && !state.is_game_over() {
        tick(&mut state, &input, SIM_DT_MS);
        input.pause = false;
        ticks += 1;

        for event in state.drain_events() {
            match event {
                GameEvent::PlayerFired { .. }
                | GameEvent::EnemyFired { .. }
                | GameEvent::FormationDropped
                | GameEvent::BannerFading { .. }
                | GameEvent::BannerDismissed { .. } => log::trace!("{:?}", event),
                GameEvent::InvaderDestroyed { .. } => log::debug!("{:?}", event),
                _ => log::info!("{:?}", event),
            }
        }
    }

    match serde_json::to_string(&state.hud()) {
        Ok(json) => log::info!("Finished after {} ticks: {}", ticks, json),
        Err(e) => log::error!("Could not serialize HUD: {}", e),
    }
}
