mod settings;

pub use settings::{Config, ConfigError, Settings, UsageSettings, WebSettings};
