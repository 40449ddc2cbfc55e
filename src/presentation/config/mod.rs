mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    AudioSettings, ConfigError, LoggingSettings, RecognitionSettings, RetrySettings,
    ServerSettings, Settings,
};
