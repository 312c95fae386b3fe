mod app_config;
mod file_config;
mod loader;

pub use app_config::{
    AppConfig, AssistantConfig, AuthConfig, LogConfig, StorageConfig, UiConfig,
};
pub use loader::load;
