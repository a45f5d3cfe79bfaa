//! Multiplication Rain entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::fmt::Write as _;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, KeyboardEvent, MouseEvent};

    use multiplication_rain::audio::{AudioManager, SoundEffect};
    use multiplication_rain::consts::*;
    use multiplication_rain::persistence::LocalStorage;
    use multiplication_rain::sim::{FeedbackKind, GameEvent, GameState, TickInput};
    use multiplication_rain::tuning::{DifficultyLevel, MAX_LIVES};
    use multiplication_rain::{App, Screen, platform};

    /// Game instance holding all state
    struct Game {
        app: App,
        audio: AudioManager,
        accumulator: f64,
        last_time: f64,
        input: TickInput,
        /// Tab hidden and pause-on-hidden enabled
        suspended: bool,
        /// Screen markup must be rebuilt on the next frame
        dirty: bool,
        drawn_screen: Screen,
        drawn_buttons: DrawnButtons,
    }

    /// Answer buttons currently in the DOM
    #[derive(Default)]
    struct DrawnButtons {
        values: Vec<u32>,
        enabled: bool,
    }

    impl Game {
        fn new() -> Self {
            let app = App::new(Box::new(LocalStorage));
            let mut audio = AudioManager::new();
            audio.set_volume(app.settings.effective_volume());
            Self {
                app,
                audio,
                accumulator: 0.0,
                last_time: 0.0,
                input: TickInput::default(),
                suspended: false,
                dirty: true,
                drawn_screen: Screen::Menu,
                drawn_buttons: DrawnButtons::default(),
            }
        }

        fn start(&mut self, level: DifficultyLevel) {
            self.app.start_game(level, platform::seed());
            self.reset_loop();
            self.audio.play(SoundEffect::Start);
        }

        fn restart(&mut self) {
            self.app.restart(platform::seed());
            self.reset_loop();
            self.audio.play(SoundEffect::Start);
        }

        fn main_menu(&mut self) {
            self.app.main_menu();
            self.reset_loop();
        }

        fn reset_loop(&mut self) {
            self.accumulator = 0.0;
            self.input = TickInput::default();
            self.dirty = true;
        }

        fn toggle_mute(&mut self) {
            self.app.update_settings(|s| s.toggle_mute());
            self.audio.set_volume(self.app.settings.effective_volume());
            self.dirty = true;
        }

        /// Run simulation ticks
        fn update(&mut self, dt_ms: f64) {
            if self.app.screen != Screen::Playing || self.suspended {
                self.accumulator = 0.0;
                return;
            }

            self.accumulator += dt_ms.min(100.0);

            let mut substeps = 0;
            while self.accumulator >= FRAME_MS && substeps < MAX_SUBSTEPS {
                let input = self.input.clone();
                let events = self.app.update(&input, FRAME_MS);
                self.accumulator -= FRAME_MS;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input.answer = None;

                self.play_sounds(&events);

                if self.app.screen != Screen::Playing {
                    if self.app.results.as_ref().is_some_and(|r| r.is_new_high_score) {
                        self.audio.play(SoundEffect::HighScore);
                    }
                    self.dirty = true;
                    break;
                }
            }
        }

        fn play_sounds(&self, events: &[GameEvent]) {
            for event in events {
                if let Some(effect) = SoundEffect::for_event(event) {
                    self.audio.play(effect);
                }
            }
        }

        /// Render the current screen into `#app`
        fn render(&mut self, document: &Document) {
            let Some(root) = document.get_element_by_id("app") else {
                return;
            };

            if self.dirty || self.drawn_screen != self.app.screen {
                let html = match self.app.screen {
                    Screen::Menu => menu_html(&self.app),
                    Screen::Playing => PLAY_HTML.to_string(),
                    Screen::GameOver => results_html(&self.app),
                };
                root.set_inner_html(&html);
                self.drawn_screen = self.app.screen;
                self.drawn_buttons = DrawnButtons::default();
                self.dirty = false;
            }

            if let Some(session) = self.app.session.as_ref() {
                update_hud(
                    document,
                    session,
                    self.app.settings.reduced_motion,
                    &mut self.drawn_buttons,
                );
            }
        }

        /// Dispatch a click on an element carrying `data-action`
        fn handle_action(&mut self, action: &str, target: &Element) {
            match action {
                "select" => {
                    if let Some(level) = target
                        .get_attribute("data-level")
                        .and_then(|s| DifficultyLevel::from_str(&s))
                    {
                        self.app.select(level);
                        self.dirty = true;
                    }
                }
                "start" => self.start(self.app.selected),
                "instructions" => {
                    self.app.toggle_instructions();
                    self.dirty = true;
                }
                "answer" => {
                    if let Some(value) = target
                        .get_attribute("data-value")
                        .and_then(|s| s.parse::<u32>().ok())
                    {
                        self.input.answer = Some(value);
                    }
                }
                "restart" => self.restart(),
                "menu" => self.main_menu(),
                "mute" => self.toggle_mute(),
                other => log::warn!("Unknown action: {}", other),
            }
        }
    }

    /// Update play screen elements in DOM
    fn update_hud(
        document: &Document,
        session: &GameState,
        reduced_motion: bool,
        drawn: &mut DrawnButtons,
    ) {
        let stats = &session.stats;

        set_text(document, "score-value", &stats.score.to_string());
        set_text(document, "timer", &format!("⏱ {}s", stats.time_remaining));

        let hearts: String = (0..MAX_LIVES)
            .map(|i| if i < stats.lives { "❤️" } else { "🖤" })
            .collect();
        set_text(document, "lives", &hearts);

        // Combo banner from 3 in a row
        if let Some(el) = document.get_element_by_id("combo-display") {
            if stats.combo >= 3 {
                el.set_text_content(Some(&format!("{} in a row! 🔥", stats.combo)));
                let _ = el.set_attribute("class", "combo-display");
            } else {
                let _ = el.set_attribute("class", "combo-display hidden");
            }
        }

        if let Some(el) = document.get_element_by_id("feedback") {
            match &session.feedback {
                Some(feedback) => {
                    let kind = match feedback.kind {
                        FeedbackKind::Correct => "correct",
                        FeedbackKind::Wrong | FeedbackKind::Missed => "wrong",
                    };
                    el.set_text_content(Some(&feedback.text));
                    let _ = el.set_attribute("class", &format!("feedback {kind}"));
                }
                None => {
                    let _ = el.set_attribute("class", "feedback hidden");
                }
            }
        }

        if let Some(area) = document.get_element_by_id("game-area") {
            area.set_inner_html(&drops_html(session, reduced_motion));
        }

        let enabled = session.is_playing();
        if session.answer_buttons != drawn.values || enabled != drawn.enabled {
            if let Some(el) = document.get_element_by_id("answer-buttons") {
                el.set_inner_html(&buttons_html(&session.answer_buttons, enabled));
            }
            drawn.values = session.answer_buttons.clone();
            drawn.enabled = enabled;
        }
    }

    const PLAY_HTML: &str = r#"<div class="game-play">
  <div class="info-bar">
    <div class="score">Score: <span id="score-value" class="score-value">0</span></div>
    <div id="lives" class="lives"></div>
    <div id="timer" class="timer"></div>
  </div>
  <div id="combo-display" class="combo-display hidden"></div>
  <div id="feedback" class="feedback hidden"></div>
  <div id="game-area" class="game-area"></div>
  <div class="answer-area"><div id="answer-buttons" class="answer-buttons"></div></div>
</div>"#;

    fn menu_html(app: &App) -> String {
        let mut html = String::from(
            r#"<div class="main-menu"><div class="menu-container">
<h1 class="game-title">🌧️ Multiplication Rain ⚡</h1>
<p class="game-subtitle">Learn your times tables while the problems fall!</p>
<div class="difficulty-section"><h2>Choose a difficulty</h2><div class="difficulty-buttons">"#,
        );

        for level in DifficultyLevel::ALL {
            let config = level.config();
            let selected = if level == app.selected { " selected" } else { "" };
            let _ = write!(
                html,
                r#"<button class="difficulty-btn{selected}" data-action="select" data-level="{}"><div class="difficulty-name">{}</div><div class="difficulty-info">Tables {}</div>"#,
                level.as_str(),
                config.display_name,
                config.table_range_label(),
            );
            let best = app.save.high_score(level);
            if best > 0 {
                let _ = write!(html, r#"<div class="high-score">Best: {best}</div>"#);
            }
            html.push_str("</button>");
        }

        let _ = write!(
            html,
            r#"</div></div>
<div class="menu-actions">
<button class="start-btn" data-action="start">Start! 🚀</button>
<button class="instructions-btn" data-action="instructions">{}</button>
<button class="mute-btn" data-action="mute">{}</button>
</div>"#,
            if app.show_instructions { "Close" } else { "How to play 📖" },
            if app.settings.muted { "🔇 Sound off" } else { "🔊 Sound on" },
        );

        if app.show_instructions {
            html.push_str(
                r#"<div class="instructions"><h3>🎮 How to play</h3><ol class="instruction-list">
<li>Multiplication problems fall from the top!</li>
<li>Tap the answer button with the right product.</li>
<li>Each correct answer is worth 10 points.</li>
<li>If a problem reaches the bottom you lose a heart! ❤️</li>
<li>Answer in a row for bonus points! ⭐</li>
</ol></div>"#,
            );
        }

        html.push_str("</div></div>");
        html
    }

    fn drops_html(session: &GameState, reduced_motion: bool) -> String {
        let mut html = String::new();
        for drop in &session.drops {
            let _ = write!(
                html,
                r#"<div class="drop" style="top: {:.1}%; left: {:.1}%"><div class="drop-content">{}</div></div>"#,
                drop.pos.y,
                drop.pos.x,
                drop.problem.label(),
            );
        }

        // Highlight the problem that was just answered while its feedback shows
        if !reduced_motion {
            if let Some(answered) = session.feedback.as_ref().and_then(|f| f.answered.as_ref()) {
                let _ = write!(
                    html,
                    r#"<div class="drop selected" style="top: {:.1}%; left: {:.1}%"><div class="drop-content">{} = {}</div></div>"#,
                    answered.pos.y,
                    answered.pos.x,
                    answered.problem.label(),
                    answered.answer(),
                );
            }
        }
        html
    }

    fn buttons_html(answers: &[u32], enabled: bool) -> String {
        let disabled = if enabled { "" } else { " disabled" };
        answers
            .iter()
            .map(|a| {
                format!(r#"<button class="answer-btn" data-action="answer" data-value="{a}"{disabled}>{a}</button>"#)
            })
            .collect()
    }

    fn results_html(app: &App) -> String {
        let Some(results) = app.results.as_ref() else {
            return String::new();
        };
        let stats = &results.stats;

        let mut html = String::from(
            r#"<div class="game-over"><div class="game-over-container"><h1 class="game-over-title">Game over!</h1>"#,
        );
        if results.is_new_high_score {
            html.push_str(r#"<div class="new-high-score">🎉 New high score! 🎉</div>"#);
        }

        let _ = write!(
            html,
            r#"<div class="final-stats">
<div class="stat-row main-stat"><span class="stat-label">Final score</span><span class="stat-value final-score">{}</span></div>
<div class="stat-row"><span class="stat-label">Difficulty</span><span class="stat-value">{}</span></div>
<div class="stat-divider"></div>
<div class="stat-row"><span class="stat-label">Correct</span><span class="stat-value correct">{}</span></div>
<div class="stat-row"><span class="stat-label">Wrong</span><span class="stat-value wrong">{}</span></div>
<div class="stat-row"><span class="stat-label">Accuracy</span><span class="stat-value">{}%</span></div>
<div class="stat-row"><span class="stat-label">Best combo</span><span class="stat-value combo">{} in a row</span></div>
<div class="stat-divider"></div>
<div class="stat-row"><span class="stat-label">High score</span><span class="stat-value high-score">{}</span></div>
</div>
<div class="encouragement-message">{}</div>
<div class="performance-badges">"#,
            stats.score,
            results.level.display_name(),
            stats.correct_answers,
            stats.wrong_answers,
            results.accuracy,
            stats.best_combo,
            results.high_score,
            results.encouragement.message(),
        );

        for badge in &results.badges {
            let _ = write!(
                html,
                r#"<div class="badge"><span class="badge-text">{}</span></div>"#,
                badge.label()
            );
        }

        html.push_str(
            r#"</div><div class="game-over-actions">
<button class="restart-btn" data-action="restart">Play again 🔄</button>
<button class="menu-btn" data-action="menu">Main menu 🏠</button>
</div></div></div>"#,
        );
        html
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    pub fn run() {
        platform::init_logging();

        log::info!("Multiplication Rain starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let game = Rc::new(RefCell::new(Game::new()));

        setup_click_handler(&document, game.clone());
        setup_keyboard(game.clone());
        setup_auto_pause(&document, game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("Multiplication Rain running!");
    }

    /// One delegated click listener for every `data-action` button
    fn setup_click_handler(document: &Document, game: Rc<RefCell<Game>>) {
        let Some(root) = document.get_element_by_id("app") else {
            log::error!("Missing #app element");
            return;
        };

        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            let Some(target) = event
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .and_then(|el| el.closest("[data-action]").ok().flatten())
            else {
                return;
            };
            if let Some(action) = target.get_attribute("data-action") {
                game.borrow_mut().handle_action(&action, &target);
            }
        });
        let _ = root.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let mut g = game.borrow_mut();
            match (g.app.screen, event.key().as_str()) {
                // Keep the browser from also clicking the focused button
                (Screen::Menu, "Enter") => {
                    event.prevent_default();
                    let level = g.app.selected;
                    g.start(level);
                }
                (Screen::GameOver, "Enter") => {
                    event.prevent_default();
                    g.restart();
                }
                (Screen::GameOver, "Escape") => {
                    event.prevent_default();
                    g.main_menu();
                }
                (_, "m") | (_, "M") => g.toggle_mute(),
                _ => {}
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_auto_pause(document: &Document, game: Rc<RefCell<Game>>) {
        let document_clone = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let hidden = document_clone.visibility_state() == web_sys::VisibilityState::Hidden;
            let mut g = game.borrow_mut();
            if !g.app.settings.pause_on_hidden {
                return;
            }
            g.suspended = hidden;
            // Don't count the hidden time as one huge frame
            g.last_time = 0.0;
            log::info!("Play {} (tab visibility)", if hidden { "suspended" } else { "resumed" });
        });
        let _ = document
            .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
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
            let dt = if g.last_time > 0.0 {
                time - g.last_time
            } else {
                FRAME_MS
            };
            g.last_time = time;

            g.update(dt);
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                g.render(&document);
            }
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use multiplication_rain::persistence::MemoryStorage;
    use multiplication_rain::{App, DifficultyLevel, platform};

    platform::init_logging();
    log::info!("Multiplication Rain (native) starting...");
    log::info!("Native mode plays headless demo rounds - run with `trunk serve` for the web version");

    let mut app = App::new(Box::new(MemoryStorage::new()));
    for level in DifficultyLevel::ALL {
        let seed = platform::seed();
        app.start_game(level, seed);
        demo::autoplay(&mut app, seed.rotate_left(17));

        if let Some(results) = &app.results {
            let stats = &results.stats;
            println!(
                "{:<8} score {:>4}  correct {:>3}  wrong {:>2}  best combo {:>2}  accuracy {:>3}%  {}",
                level.display_name(),
                stats.score,
                stats.correct_answers,
                stats.wrong_answers,
                stats.best_combo,
                results.accuracy,
                results.encouragement.message(),
            );
        }
    }

    app.main_menu();
    for level in DifficultyLevel::ALL {
        log::info!("Best {}: {}", level.as_str(), app.save.high_score(level));
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::collections::HashMap;

    use multiplication_rain::consts::FRAME_MS;
    use multiplication_rain::sim::TickInput;
    use multiplication_rain::{App, Screen};
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    /// Chance per unit of fall speed that a problem is never answered
    const MISS_CHANCE_PER_SPEED: f64 = 0.04;
    /// Chance per unit of fall speed that a press hits a neighbouring button
    const FUMBLE_CHANCE_PER_SPEED: f64 = 0.02;

    /// How the auto-player deals with one falling problem
    struct Plan {
        /// Press once the problem falls past this line (percent)
        answer_at_y: f32,
        let_fall: bool,
    }

    /// Play the active session to the end
    ///
    /// Answers the oldest problem somewhere along its fall. Faster levels make
    /// the player slip more often, so results differ per level and per seed.
    pub fn autoplay(app: &mut App, seed: u64) {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut plans: HashMap<u32, Plan> = HashMap::new();

        while app.screen == Screen::Playing {
            let Some(session) = app.session.as_ref() else {
                break;
            };
            let speed = f64::from(session.config.fall_speed);
            let oldest = session.drops.first().map(|d| (d.id, d.pos.y, d.answer()));

            let answer = oldest.and_then(|(id, y, value)| {
                let plan = plans.entry(id).or_insert_with(|| Plan {
                    answer_at_y: rng.random_range(-60.0..70.0),
                    let_fall: rng.random_bool((MISS_CHANCE_PER_SPEED * speed).min(1.0)),
                });
                if plan.let_fall || y <= plan.answer_at_y {
                    return None;
                }
                let fumble = rng.random_bool((FUMBLE_CHANCE_PER_SPEED * speed).min(1.0));
                Some(if fumble { value + 1 } else { value })
            });

            app.update(&TickInput { answer }, FRAME_MS);
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use multiplication_rain::DifficultyLevel;
        use multiplication_rain::persistence::MemoryStorage;

        #[test]
        fn test_autoplay_finishes_every_level() {
            let mut app = App::new(Box::new(MemoryStorage::new()));
            for level in DifficultyLevel::ALL {
                app.start_game(level, 11);
                autoplay(&mut app, 11);
                assert_eq!(app.screen, Screen::GameOver);
                let results = app.results.as_ref().unwrap();
                assert_eq!(results.level, level);
                assert!(results.stats.correct_answers > 0);
            }
        }

        #[test]
        fn test_autoplay_results_vary() {
            let mut app = App::new(Box::new(MemoryStorage::new()));
            let mut outcomes = Vec::new();
            for level in DifficultyLevel::ALL {
                app.start_game(level, 5);
                autoplay(&mut app, 5);
                outcomes.push(app.results.as_ref().map(|r| r.stats.clone()));
            }
            assert!(outcomes.iter().any(|o| o != &outcomes[0]));
        }
    }
}
