#![forbid(unsafe_code)]

pub mod app;
pub mod config;
pub mod events;
pub mod host;
pub mod module;

pub use app::App;
pub use module::EmoteModule;
