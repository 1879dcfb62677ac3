pub mod runner;

pub use runner::{GameRunner, LaunchParams};

/// Generate all `#[wasm_bindgen]` exports for a game.
///
/// Generates:
/// - `thread_local!` storage for the GameRunner and a pending JSON config
/// - `with_runner()` helper function
/// - All wasm-bindgen exports (game_init, game_tick, input handlers, data accessors)
///
/// # Usage
///
/// ```ignore
/// use wasm_bindgen::prelude::*;
/// use merge_engine::*;
///
/// mod game;
/// use game::MyGame;
///
/// merge_web::export_game!(MyGame, "my-game", MyGame::launch);
/// ```
///
/// # Arguments
///
/// - `$game_type`: The game struct type that implements `merge_engine::Game`
/// - `$game_name`: A string literal used in the initialization log message
/// - `$ctor`: A function `fn(&merge_web::LaunchParams) -> $game_type`
#[macro_export]
macro_rules! export_game {
    ($game_type:ty, $game_name:literal, $ctor:path) => {
        use std::cell::RefCell;

        thread_local! {
            static RUNNER: RefCell<Option<$crate::GameRunner<$game_type>>> = RefCell::new(None);
            static PENDING_CONFIG: RefCell<Option<String>> = RefCell::new(None);
        }

        fn with_runner<R>(f: impl FnOnce(&mut $crate::GameRunner<$game_type>) -> R) -> R {
            RUNNER.with(|cell| {
                let mut borrow = cell.borrow_mut();
                let runner = borrow.as_mut().expect("Game not initialized. Call game_init() first.");
                f(runner)
            })
        }

        /// Stash a JSON config to be applied by the next `game_init`.
        #[wasm_bindgen]
        pub fn game_load_config(json: &str) {
            PENDING_CONFIG.with(|cell| *cell.borrow_mut() = Some(json.to_owned()));
        }

        /// Start the game with the viewport measured once by the page.
        #[wasm_bindgen]
        pub fn game_init(width: f32, height: f32, seed: f64) {
            console_error_panic_hook::set_once();
            let _ = console_log::init_with_level(log::Level::Info);

            let params = $crate::LaunchParams {
                width,
                height,
                seed: seed as u64,
                config_json: PENDING_CONFIG.with(|cell| cell.borrow_mut().take()),
            };
            let game: $game_type = $ctor(&params);
            let runner = $crate::GameRunner::new(game);

            RUNNER.with(|cell| {
                *cell.borrow_mut() = Some(runner);
            });

            with_runner(|r| r.init());
            log::info!("{}: initialized ({}x{})", $game_name, width, height);
        }

        #[wasm_bindgen]
        pub fn game_tick(dt: f32) {
            with_runner(|r| r.tick(dt));
        }

        #[wasm_bindgen]
        pub fn game_pointer_down(x: f32, y: f32) {
            with_runner(|r| r.push_input(InputEvent::PointerDown { x, y }));
        }

        #[wasm_bindgen]
        pub fn game_pointer_up(x: f32, y: f32) {
            with_runner(|r| r.push_input(InputEvent::PointerUp { x, y }));
        }

        #[wasm_bindgen]
        pub fn game_pointer_move(x: f32, y: f32) {
            with_runner(|r| r.push_input(InputEvent::PointerMove { x, y }));
        }

        #[wasm_bindgen]
        pub fn game_key_down(key_code: u32) {
            with_runner(|r| r.push_input(InputEvent::KeyDown { key_code }));
        }

        // ---- Data accessors ----

        #[wasm_bindgen]
        pub fn get_header_ptr() -> *const f32 {
            with_runner(|r| r.header_ptr())
        }

        #[wasm_bindgen]
        pub fn get_sdf_instances_ptr() -> *const f32 {
            with_runner(|r| r.sdf_instances_ptr())
        }

        #[wasm_bindgen]
        pub fn get_sdf_instance_count() -> u32 {
            with_runner(|r| r.sdf_instance_count())
        }

        #[wasm_bindgen]
        pub fn get_sound_events_ptr() -> *const u8 {
            with_runner(|r| r.sound_events_ptr())
        }

        #[wasm_bindgen]
        pub fn get_sound_events_len() -> u32 {
            with_runner(|r| r.sound_events_len())
        }

        #[wasm_bindgen]
        pub fn get_game_events_ptr() -> *const f32 {
            with_runner(|r| r.game_events_ptr())
        }

        #[wasm_bindgen]
        pub fn get_game_events_len() -> u32 {
            with_runner(|r| r.game_events_len())
        }

        #[wasm_bindgen]
        pub fn get_world_width() -> f32 {
            with_runner(|r| r.world_width())
        }

        #[wasm_bindgen]
        pub fn get_world_height() -> f32 {
            with_runner(|r| r.world_height())
        }

        // ---- Capacity accessors ----

        #[wasm_bindgen]
        pub fn get_max_sdf_instances() -> u32 {
            with_runner(|r| r.max_sdf_instances())
        }

        #[wasm_bindgen]
        pub fn get_max_sounds() -> u32 {
            with_runner(|r| r.max_sounds())
        }

        #[wasm_bindgen]
        pub fn get_max_events() -> u32 {
            with_runner(|r| r.max_events())
        }

        #[wasm_bindgen]
        pub fn get_buffer_total_floats() -> u32 {
            with_runner(|r| r.buffer_total_floats())
        }
    };
}
