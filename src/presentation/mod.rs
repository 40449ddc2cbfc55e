pub mod config;
pub mod handlers;
pub mod router;
pub mod state;
pub mod tool;

pub use config::{ConfigError, Environment, Settings};
pub use router::create_router;
pub use state::AppState;
