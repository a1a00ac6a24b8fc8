pub mod binding;
pub mod config;
pub mod dom;
pub mod error;
pub mod models;
pub mod selector;
pub mod services;
pub mod utils;

#[cfg(target_arch = "wasm32")]
mod app;
#[cfg(target_arch = "wasm32")]
pub mod components;
#[cfg(target_arch = "wasm32")]
pub mod plugin;

pub use binding::{FormBinding, Runtime};
pub use config::{Options, Settings};
pub use error::{FormError, StorageError};
pub use models::{Command, FieldKind, FieldValue};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    utils::set_panic_hook();
    utils::init_logging();
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(js_name = runDemo)]
pub fn run_demo() {
    yew::Renderer::<app::App>::new().render();
}
