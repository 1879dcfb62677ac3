use wasm_bindgen::prelude::*;
use merge_engine::InputEvent;

pub mod config;
pub mod game;
pub mod tiers;

use game::MergeBalls;

merge_web::export_game!(MergeBalls, "merge-balls", MergeBalls::launch);
