//! Mathstorm entry point
//!
//! Handles platform-specific initialization and runs the game loop. All
//! gameplay lives in `mathstorm::sim`; this file only wires the browser (or
//! a native headless demo) to it.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CustomEvent, CustomEventInit, KeyboardEvent};

    use mathstorm::driver::GameLoop;
    use mathstorm::sim::{GamePhase, GameState};
    use mathstorm::theme::Theme;

    /// Game instance holding all state
    struct Game {
        state: GameState,
        game_loop: GameLoop,
    }

    impl Game {
        fn new(seed: u64, theme: &Theme) -> Self {
            Self {
                state: GameState::new(seed, theme.tuning.clone()),
                game_loop: GameLoop::new(),
            }
        }

        /// Run simulation ticks for one animation frame
        fn update(&mut self, time_ms: f64) {
            self.game_loop.frame(&mut self.state, time_ms / 1000.0);
        }

        /// Forward this frame's notifications to the theme runtime as DOM
        /// events; the audio/narrative layer listens for them.
        fn dispatch_events(&mut self) {
            let Some(window) = web_sys::window() else {
                return;
            };
            for event in self.state.drain_events() {
                let init = CustomEventInit::new();
                init.set_detail(&JsValue::from_str(event.as_str()));
                if let Ok(dom_event) =
                    CustomEvent::new_with_event_init_dict("mathstorm:notify", &init)
                {
                    let _ = window.dispatch_event(&dom_event);
                }
            }
        }

        /// Push state into the HUD; layout is the theme's problem
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            if let Some(el) = document.get_element_by_id("problem") {
                el.set_text_content(Some(&self.state.problem_text));
            }
            if let Some(el) = document.get_element_by_id("score") {
                el.set_text_content(Some(&self.state.score.to_string()));
            }
            if let Some(el) = document.get_element_by_id("level") {
                el.set_text_content(Some(&self.state.level.to_string()));
            }
            if let Some(el) = document.get_element_by_id("boss-hp") {
                let text = match &self.state.world.boss {
                    Some(boss) => boss.hp.to_string(),
                    None => String::new(),
                };
                el.set_text_content(Some(&text));
            }
        }
    }

    /// Theme JSON embedded by the page, if any
    fn load_theme() -> Theme {
        let embedded = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("theme-data"))
            .and_then(|el| el.text_content());
        match embedded {
            Some(json) => Theme::from_json(&json).unwrap_or_else(|e| {
                log::warn!("theme parse failed, using default: {e}");
                Theme::default()
            }),
            None => Theme::default(),
        }
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let mut g = game.borrow_mut();
            let key = event.key();
            match key.as_str() {
                "1" | "2" | "3" | "4" | "5" | "6" | "7" | "8" | "9" => {
                    if let Ok(d) = key.parse::<u8>() {
                        g.game_loop.input.digit = Some(d);
                    }
                }
                " " | "Enter" => match g.state.phase {
                    GamePhase::Menu => g.game_loop.input.start = true,
                    GamePhase::Opening => g.game_loop.input.opening_complete = true,
                    GamePhase::GameOver => {
                        g.game_loop.input.restart = Some(js_sys::Date::now() as u64)
                    }
                    _ => {}
                },
                "Escape" | "p" => g.game_loop.input.pause = true,
                _ => {}
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };
        let document_clone = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                let mut g = game.borrow_mut();
                if g.state.phase == GamePhase::Playing {
                    g.game_loop.input.pause = true;
                    log::info!("Auto-paused (tab hidden)");
                }
            }
        });
        let _ = document
            .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        let theme = load_theme();
        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, &theme)));
        log::info!("Mathstorm starting (seed: {seed}, theme: {})", theme.name);

        setup_keyboard(game.clone());
        setup_auto_pause(game.clone());

        // requestAnimationFrame loop
        let f: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
        let g = f.clone();
        *g.borrow_mut() = Some(Closure::new(move |time_ms: f64| {
            {
                let mut game = game.borrow_mut();
                game.update(time_ms);
                game.dispatch_events();
                game.update_hud();
            }
            request_animation_frame(f.borrow().as_ref().unwrap());
        }));
        request_animation_frame(g.borrow().as_ref().unwrap());
    }

    fn request_animation_frame(f: &Closure<dyn FnMut(f64)>) {
        if let Some(window) = web_sys::window() {
            let _ = window.request_animation_frame(f.as_ref().unchecked_ref());
        }
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

/// Headless scripted demo: drives the core with synthetic frame times and
/// attract-mode answers, printing the run as it goes.
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use mathstorm::driver::GameLoop;
    use mathstorm::sim::{GamePhase, GameState};
    use mathstorm::theme::Theme;

    env_logger::init();
    let theme = Theme::default();
    let mut state = GameState::new(0xC0FFEE, theme.tuning.clone());
    let mut game_loop = GameLoop::new();

    state.start_game();

    let frame = 1.0 / 60.0;
    let mut now = 0.0;
    let mut last_level = state.level;
    for i in 0..(60 * 120) {
        now += frame;
        // Answer the displayed problem every three quarters of a second
        if i % 45 == 0 {
            game_loop.input.digit = state.current_answer;
        }
        game_loop.frame(&mut state, now);
        for event in state.drain_events() {
            log::debug!("event: {}", event.as_str());
        }
        if state.level != last_level {
            last_level = state.level;
            println!("level {} at score {}", state.level, state.score);
        }
        if state.phase == GamePhase::GameOver {
            break;
        }
    }
    println!(
        "demo finished: score {}, level {}, boss engaged: {}",
        state.score, state.level, state.boss_active
    );
}
