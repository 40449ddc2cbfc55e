mod health;
mod tools;
mod transcribe;

pub use health::health_handler;
pub use tools::list_tools_handler;
pub use transcribe::transcribe_handler;
