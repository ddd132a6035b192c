mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    DatabaseSettings, LlmSettings, ProcessingLimits, QueueSettings, Settings, SettingsError,
    StorageProviderSetting, StorageSettings,
};
