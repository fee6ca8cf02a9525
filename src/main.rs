//! Neon Rush entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlInputElement, KeyboardEvent, PointerEvent};

    use neon_rush::audio::AudioManager;
    use neon_rush::consts::*;
    use neon_rush::hud::{self, Panels};
    use neon_rush::profile::today;
    use neon_rush::sim::{GameEvent, ObstacleKind, ParticleKind, RenderSnapshot, RunConfig, UpgradeKind, tick};
    use neon_rush::{InputMapper, Intent, IntentQueue, Profile, RunPhase, RunSession, Skin};

    /// Game instance holding all state
    struct Game {
        session: RunSession,
        profile: Profile,
        queue: IntentQueue,
        input: InputMapper,
        audio: AudioManager,
        ctx: CanvasRenderingContext2d,
        accumulator: f32,
        last_time: f64,
        /// Profile changed since the last save
        dirty: bool,
        /// Board list needs rebuilding
        board_stale: bool,
    }

    impl Game {
        fn new(seed: u64, ctx: CanvasRenderingContext2d) -> Self {
            let profile = Profile::load();
            let mut audio = AudioManager::new();
            audio.apply_settings(&profile.settings);
            Self {
                session: RunSession::new(seed, RunConfig::default()),
                profile,
                queue: IntentQueue::new(),
                input: InputMapper::new(),
                audio,
                ctx,
                accumulator: 0.0,
                last_time: 0.0,
                dirty: false,
                board_stale: true,
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32, now_ms: f64) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut events: Vec<GameEvent> = Vec::new();
            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let intents = self.queue.drain();
                tick(&mut self.session, &intents, &mut self.profile, &mut events);
                self.accumulator -= SIM_DT;
                substeps += 1;
            }
            // Drop backlog we could not simulate instead of spiralling
            if substeps == MAX_SUBSTEPS {
                self.accumulator = self.accumulator.min(SIM_DT);
            }

            for event in events {
                self.audio.handle_event(&event);
                match event {
                    GameEvent::RunEnded {
                        score,
                        reward,
                        new_highscore,
                        ..
                    } => {
                        show_result(score, reward, new_highscore);
                        self.dirty = true;
                        self.board_stale = true;
                    }
                    GameEvent::CoinCollected { .. } | GameEvent::Revived => self.dirty = true,
                    _ => {}
                }
            }

            self.audio.on_frame(now_ms, self.session.phase);

            if self.dirty {
                self.profile.save();
                self.dirty = false;
            }
        }

        /// Render the current frame
        fn render(&self) {
            draw(&self.ctx, &self.session.snapshot(), &self.session.config, self.profile.selected_skin);
        }

        /// Update HUD elements in DOM
        fn update_hud(&mut self) {
            let Some(document) = document() else { return };
            let phase = self.session.phase;

            set_text(&document, "hud-score", &self.session.score.to_string());
            set_text(&document, "hud-coins", &self.session.run_coins.to_string());
            set_text(&document, "wallet-coins", &self.profile.wallet.coins.to_string());
            set_text(&document, "wallet-gems", &self.profile.wallet.gems.to_string());
            set_text(&document, "best-score", &self.profile.best.highscore.to_string());

            let boost = &self.session.boost;
            let boost_label = if boost.active {
                "BOOST!".to_string()
            } else if boost.cooldown > 0 {
                format!("{:.1}s", boost.cooldown as f32 * SIM_DT)
            } else {
                "READY".to_string()
            };
            set_text(&document, "hud-boost", &boost_label);

            for kind in UpgradeKind::ALL {
                let level = self.profile.upgrades.level(kind);
                let label = match self.profile.upgrade_cost(kind) {
                    Some(cost) => format!("Lv {} - {} coins", level, cost),
                    None => format!("Lv {} - MAX", level),
                };
                set_text(&document, &format!("cost-{}", kind.as_str()), &label);
            }

            set_text(&document, "revive-btn", &hud::revive_label(self.profile.wallet.gems));

            for (id, visible) in Panels::for_phase(phase).by_id() {
                set_hidden(&document, id, !visible);
            }

            if self.board_stale {
                render_board(&document, &self.profile);
                self.board_stale = false;
            }
        }

        /// Apply a settings form change
        fn apply_settings(&mut self) {
            self.audio.apply_settings(&self.profile.settings);
            self.dirty = true;
        }
    }

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            if el.text_content().as_deref() != Some(text) {
                el.set_text_content(Some(text));
            }
        }
    }

    fn set_hidden(document: &Document, id: &str, hidden: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force("hidden", hidden);
        }
    }

    fn show_result(score: u64, reward: u64, new_highscore: bool) {
        let Some(document) = document() else { return };
        set_text(&document, "final-score", &score.to_string());
        set_text(&document, "final-reward", &format!("+{}", reward));
        set_hidden(&document, "new-best", !new_highscore);
        set_text(&document, "revive-msg", "");
    }

    /// Rebuild the local board list. Rows are text nodes so nicknames never parse as markup.
    fn render_board(document: &Document, profile: &Profile) {
        let Some(list) = document.get_element_by_id("board-list") else { return };
        list.set_text_content(None);

        let mut lines = hud::board_lines(&profile.local_board);
        if lines.is_empty() {
            lines.push(hud::EMPTY_BOARD.to_string());
        }
        for line in lines {
            if let Ok(row) = document.create_element("li") {
                row.set_text_content(Some(&line));
                let _ = list.append_child(&row);
            }
        }
    }

    fn shop_message(text: &str) {
        if let Some(document) = document() {
            set_text(&document, "shop-msg", text);
        }
    }

    // === Canvas drawing ===

    const ROAD_TOP: &str = "#0b0f1c";
    const LANE_LINE: &str = "rgba(120, 180, 255, 0.18)";
    const DASH: &str = "rgba(255, 255, 255, 0.35)";
    const OBSTACLE: &str = "#ff4d4d";
    const OBSTACLE_FAST: &str = "#ff7a3d";
    const COIN: &str = "#ffd54a";
    const DASH_LENGTH: f32 = 40.0;
    const DASH_GAP: f32 = 80.0;

    fn draw(ctx: &CanvasRenderingContext2d, snap: &RenderSnapshot<'_>, config: &RunConfig, skin: Skin) {
        let w = config.width as f64;
        let h = config.height as f64;

        ctx.save();
        if snap.screen_shake > 0.0 {
            let s = snap.screen_shake as f64;
            let dx = (js_sys::Math::random() - 0.5) * s;
            let dy = (js_sys::Math::random() - 0.5) * s;
            let _ = ctx.translate(dx, dy);
        }

        ctx.set_fill_style_str(ROAD_TOP);
        ctx.fill_rect(-20.0, -20.0, w + 40.0, h + 40.0);

        // Lane separators with scrolling dashes
        let lane_width = config.width / config.lane_count.max(1) as f32;
        for i in 1..config.lane_count {
            let x = (lane_width * i as f32) as f64;
            ctx.set_fill_style_str(LANE_LINE);
            ctx.fill_rect(x - 1.0, 0.0, 2.0, h);

            ctx.set_fill_style_str(DASH);
            let mut y = snap.road_offset % DASH_GAP - DASH_GAP;
            while y < config.height {
                ctx.fill_rect(x - 2.0, y as f64, 4.0, DASH_LENGTH as f64);
                y += DASH_GAP;
            }
        }

        for coin in snap.coins {
            ctx.set_fill_style_str(COIN);
            ctx.begin_path();
            let _ = ctx.arc(coin.pos.x as f64, coin.pos.y as f64, coin.radius as f64, 0.0, std::f64::consts::TAU);
            ctx.fill();
        }

        for obstacle in snap.obstacles {
            let color = match obstacle.kind {
                ObstacleKind::Normal => OBSTACLE,
                ObstacleKind::Fast => OBSTACLE_FAST,
            };
            fill_box(ctx, obstacle.pos, obstacle.half_size, color);
        }

        let (body, glass) = skin.colors();
        let player = snap.player;
        if snap.boost_active {
            ctx.set_global_alpha(0.35);
            fill_box(ctx, player.pos, player.half_size * 1.25, "#66ccff");
            ctx.set_global_alpha(1.0);
        }
        fill_box(ctx, player.pos, player.half_size, body);
        let glass_center = player.pos - glam::Vec2::new(0.0, player.half_size.y * 0.35);
        fill_box(ctx, glass_center, player.half_size * glam::Vec2::new(0.7, 0.25), glass);

        for p in snap.particles {
            let color = match p.kind {
                ParticleKind::Coin => COIN,
                ParticleKind::Boost => "#66ccff",
                ParticleKind::Crash => OBSTACLE,
            };
            ctx.set_global_alpha((p.life / 60.0).clamp(0.0, 1.0) as f64);
            ctx.set_fill_style_str(color);
            ctx.fill_rect(p.pos.x as f64 - 2.0, p.pos.y as f64 - 2.0, 4.0, 4.0);
        }
        ctx.set_global_alpha(1.0);

        if snap.phase == RunPhase::Paused {
            ctx.set_fill_style_str("rgba(0, 0, 0, 0.55)");
            ctx.fill_rect(0.0, 0.0, w, h);
            ctx.set_fill_style_str("#ffffff");
            ctx.set_font("bold 36px sans-serif");
            ctx.set_text_align("center");
            let _ = ctx.fill_text("PAUSED", w / 2.0, h / 2.0);
        }

        ctx.restore();
    }

    fn fill_box(ctx: &CanvasRenderingContext2d, center: glam::Vec2, half: glam::Vec2, color: &str) {
        ctx.set_fill_style_str(color);
        let min = center - half;
        let size = half * 2.0;
        ctx.fill_rect(min.x as f64, min.y as f64, size.x as f64, size.y as f64);
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Neon Rush starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.class_list().add_1("hidden");
        }

        let canvas: HtmlCanvasElement = document.get_element_by_id("canvas").ok_or("no canvas")?.dyn_into()?;

        // Backing store at device resolution, drawing in field coordinates
        let dpr = window.device_pixel_ratio();
        canvas.set_width((FIELD_WIDTH as f64 * dpr) as u32);
        canvas.set_height((FIELD_HEIGHT as f64 * dpr) as u32);
        let ctx: CanvasRenderingContext2d = canvas.get_context("2d")?.ok_or("no 2d context")?.dyn_into()?;
        ctx.scale(dpr, dpr)?;

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, ctx)));
        log::info!("Game initialized with seed: {}", seed);

        sync_settings_form(&document, &game.borrow().profile);

        setup_input_handlers(&canvas, game.clone());
        setup_buttons(&document, game.clone());
        setup_shop(&document, game.clone());
        setup_settings_form(&document, game.clone());
        setup_auto_pause(&document, game.clone());

        request_animation_frame(game);

        log::info!("Neon Rush running!");
        Ok(())
    }

    /// Register `handler` for `event` on the element with `id`, if present
    fn listen<E, F>(document: &Document, id: &str, event: &str, handler: F)
    where
        E: wasm_bindgen::convert::FromWasmAbi + 'static,
        F: FnMut(E) + 'static,
    {
        if let Some(el) = document.get_element_by_id(id) {
            let closure = Closure::<dyn FnMut(E)>::new(handler);
            let _ = el.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Pointer positions in field coordinates
        let to_field = {
            let canvas = canvas.clone();
            move |event: &PointerEvent| {
                let width = canvas.client_width().max(1) as f32;
                event.offset_x() as f32 * FIELD_WIDTH / width
            }
        };

        {
            let game = game.clone();
            let to_field = to_field.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                g.audio.resume();
                g.input.pointer_down(to_field(&event));
            });
            let _ = canvas.add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                event.prevent_default();
                let now = web_sys::window()
                    .and_then(|w| w.performance())
                    .map(|p| p.now())
                    .unwrap_or_default();
                let mut g = game.borrow_mut();
                let g = &mut *g;
                let phase = g.session.phase;
                g.input
                    .pointer_up(to_field(&event), FIELD_WIDTH, now, phase, &mut g.queue);
            });
            let _ = canvas.add_event_listener_with_callback("pointerup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        for name in ["pointercancel", "pointerleave"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: PointerEvent| {
                game.borrow_mut().input.pointer_cancel();
            });
            let _ = canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        if let Some(window) = web_sys::window() {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.repeat() {
                    return;
                }
                let mut g = game.borrow_mut();
                g.audio.resume();
                let phase = g.session.phase;
                if let Some(intent) = g.input.key_down(&event.code(), phase) {
                    event.prevent_default();
                    g.queue.push(intent);
                }
            });
            let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
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

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt, time);
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }

    /// Run control buttons just queue intents for the next tick
    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        let buttons = [
            ("play-btn", Intent::Start),
            ("pause-btn", Intent::Pause),
            ("resume-btn", Intent::Resume),
            ("retry-btn", Intent::Retry),
        ];
        for (id, intent) in buttons {
            let game = game.clone();
            listen(document, id, "click", move |_event: web_sys::MouseEvent| {
                let mut g = game.borrow_mut();
                g.audio.resume();
                g.queue.push(intent);
            });
        }

        // A continue the wallet cannot pay for is explained instead of queued
        let doc = document.clone();
        listen(document, "revive-btn", "click", move |_event: web_sys::MouseEvent| {
            let mut g = game.borrow_mut();
            g.audio.resume();
            match hud::check_revive(&g.profile) {
                Ok(()) => {
                    set_text(&doc, "revive-msg", "");
                    g.queue.push(Intent::Revive);
                }
                Err(e) => set_text(&doc, "revive-msg", &e.to_string()),
            }
        });
    }

    fn setup_shop(document: &Document, game: Rc<RefCell<Game>>) {
        for kind in UpgradeKind::ALL {
            let game = game.clone();
            listen(document, &format!("buy-{}", kind.as_str()), "click", move |_event: web_sys::MouseEvent| {
                let mut g = game.borrow_mut();
                match g.profile.buy_upgrade(kind) {
                    Ok(level) => {
                        shop_message(&format!("{} upgraded to level {}", kind.as_str(), level));
                        g.dirty = true;
                    }
                    Err(e) => shop_message(&e.to_string()),
                }
            });
        }

        for item in ["skin_classic", "skin_neon", "skin_stealth", "noads"] {
            let game = game.clone();
            listen(document, &format!("buy-{}", item), "click", move |_event: web_sys::MouseEvent| {
                let mut g = game.borrow_mut();
                match g.profile.purchase(item) {
                    Ok(()) => {
                        shop_message("Purchased!");
                        g.dirty = true;
                    }
                    Err(e) => shop_message(&e.to_string()),
                }
            });
        }

        listen(document, "daily-btn", "click", move |_event: web_sys::MouseEvent| {
            let mut g = game.borrow_mut();
            match g.profile.claim_daily(&today()) {
                Ok(()) => {
                    shop_message(&format!("+{} gems, +{} coins", neon_rush::profile::DAILY_GEMS, neon_rush::profile::DAILY_COINS));
                    g.dirty = true;
                }
                Err(e) => shop_message(&e.to_string()),
            }
        });
    }

    fn input_element(document: &Document, id: &str) -> Option<HtmlInputElement> {
        document.get_element_by_id(id)?.dyn_into().ok()
    }

    /// Push stored preferences into the settings panel
    fn sync_settings_form(document: &Document, profile: &Profile) {
        let settings = &profile.settings;
        if let Some(el) = input_element(document, "music-volume") {
            el.set_value(&settings.music_volume.to_string());
        }
        if let Some(el) = input_element(document, "sfx-volume") {
            el.set_value(&settings.sfx_volume.to_string());
        }
        if let Some(el) = input_element(document, "vibrate-toggle") {
            el.set_checked(settings.vibrate);
        }
        if let Some(el) = input_element(document, "particles-toggle") {
            el.set_checked(settings.particles);
        }
        if let Some(el) = input_element(document, "nickname") {
            el.set_value(&profile.nickname);
        }
    }

    fn setup_settings_form(document: &Document, game: Rc<RefCell<Game>>) {
        {
            let game = game.clone();
            let doc = document.clone();
            listen(document, "settings", "change", move |_event: web_sys::Event| {
                let mut g = game.borrow_mut();
                let settings = &mut g.profile.settings;
                if let Some(el) = input_element(&doc, "music-volume") {
                    settings.set_music_volume(el.value().parse().unwrap_or(0));
                }
                if let Some(el) = input_element(&doc, "sfx-volume") {
                    settings.set_sfx_volume(el.value().parse().unwrap_or(0));
                }
                if let Some(el) = input_element(&doc, "vibrate-toggle") {
                    settings.vibrate = el.checked();
                }
                if let Some(el) = input_element(&doc, "particles-toggle") {
                    settings.particles = el.checked();
                }
                g.apply_settings();
            });
        }

        {
            let game = game.clone();
            let doc = document.clone();
            listen(document, "nickname", "change", move |_event: web_sys::Event| {
                let Some(el) = input_element(&doc, "nickname") else { return };
                let mut g = game.borrow_mut();
                if g.profile.set_nickname(&el.value()) {
                    g.dirty = true;
                }
                el.set_value(&g.profile.nickname);
            });
        }

        {
            let game = game.clone();
            let doc = document.clone();
            listen(document, "mute-toggle", "change", move |_event: web_sys::Event| {
                let Some(el) = input_element(&doc, "mute-toggle") else { return };
                game.borrow_mut().audio.set_muted(el.checked());
            });
        }

        let doc = document.clone();
        listen(document, "reset-btn", "click", move |_event: web_sys::MouseEvent| {
            let confirmed = web_sys::window()
                .and_then(|w| w.confirm_with_message("Reset all progress? This cannot be undone.").ok())
                .unwrap_or(false);
            if !confirmed {
                return;
            }
            let mut g = game.borrow_mut();
            g.profile = Profile::reset();
            g.apply_settings();
            g.board_stale = true;
            sync_settings_form(&doc, &g.profile);
            shop_message("Progress reset");
        });
    }

    fn setup_auto_pause(document: &Document, game: Rc<RefCell<Game>>) {
        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    if g.session.phase == RunPhase::Running {
                        g.queue.push(Intent::Pause);
                        log::info!("Auto-paused (tab hidden)");
                    }
                }
            });
            let _ = document.add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window blur (click outside)
        if let Some(window) = web_sys::window() {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut g = game.borrow_mut();
                if g.session.phase == RunPhase::Running {
                    g.queue.push(Intent::Pause);
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use neon_rush::sim::{NullSink, RunConfig, tick};
    use neon_rush::{Intent, Profile, RunPhase, RunSession, autopilot};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Neon Rush (native) starting...");
    log::info!("The playable game is the web build - run with `trunk serve`");

    let seed = std::env::args().nth(1).and_then(|s| s.parse().ok()).unwrap_or(42);
    // Ten simulated minutes
    const MAX_TICKS: u64 = 60 * 60 * 10;

    let mut profile = Profile::load();
    let mut session = RunSession::new(seed, RunConfig::default());
    // Nobody listens headless; the engine logs run start and end itself
    let mut events = NullSink;

    tick(&mut session, &[Intent::Start], &mut profile, &mut events);
    while session.phase == RunPhase::Running && session.time_ticks < MAX_TICKS {
        let intents: Vec<Intent> = autopilot::steer(&session).into_iter().collect();
        tick(&mut session, &intents, &mut profile, &mut events);
    }

    if session.phase == RunPhase::GameOver {
        log::info!(
            "Seed {}: crashed at score {} with {} coins (reward {})",
            seed,
            session.score,
            session.run_coins,
            session.reward()
        );
    } else {
        log::info!(
            "Seed {}: still running after {} ticks, score {}",
            seed,
            session.time_ticks,
            session.score
        );
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
