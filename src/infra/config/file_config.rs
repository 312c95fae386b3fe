use std::path::PathBuf;

use serde::Deserialize;

use crate::infra::config::{
    AppConfig, AssistantConfig, AuthConfig, LogConfig, StorageConfig, UiConfig,
};

#[derive(Debug, Deserialize, Default)]
pub struct FileConfig {
    pub logging: Option<FileLogConfig>,
    pub storage: Option<FileStorageConfig>,
    pub assistant: Option<FileAssistantConfig>,
    pub auth: Option<FileAuthConfig>,
    pub ui: Option<FileUiConfig>,
}

impl FileConfig {
    pub fn merge_into(self, config: &mut AppConfig) {
        if let Some(logging) = self.logging {
            logging.merge_into(&mut config.logging);
        }

        if let Some(storage) = self.storage {
            storage.merge_into(&mut config.storage);
        }

        if let Some(assistant) = self.assistant {
            assistant.merge_into(&mut config.assistant);
        }

        if let Some(auth) = self.auth {
            auth.merge_into(&mut config.auth);
        }

        if let Some(ui) = self.ui {
            ui.merge_into(&mut config.ui);
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileLogConfig {
    pub level: Option<String>,
}

impl FileLogConfig {
    fn merge_into(self, config: &mut LogConfig) {
        if let Some(level) = self.level {
            config.level = level;
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileStorageConfig {
    pub data_dir: Option<PathBuf>,
}

impl FileStorageConfig {
    fn merge_into(self, config: &mut StorageConfig) {
        if let Some(data_dir) = self.data_dir {
            config.data_dir = Some(data_dir);
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileAssistantConfig {
    pub min_delay_ms: Option<u64>,
    pub max_delay_ms: Option<u64>,
}

impl FileAssistantConfig {
    fn merge_into(self, config: &mut AssistantConfig) {
        if let Some(min_delay_ms) = self.min_delay_ms {
            config.min_delay_ms = min_delay_ms;
        }

        if let Some(max_delay_ms) = self.max_delay_ms {
            config.max_delay_ms = max_delay_ms;
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileAuthConfig {
    pub otp_send_delay_ms: Option<u64>,
    pub otp_verify_delay_ms: Option<u64>,
    pub countries_file: Option<PathBuf>,
}

impl FileAuthConfig {
    fn merge_into(self, config: &mut AuthConfig) {
        if let Some(delay) = self.otp_send_delay_ms {
            config.otp_send_delay_ms = delay;
        }

        if let Some(delay) = self.otp_verify_delay_ms {
            config.otp_verify_delay_ms = delay;
        }

        if let Some(path) = self.countries_file {
            config.countries_file = Some(path);
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileUiConfig {
    pub prefer_dark: Option<bool>,
}

impl FileUiConfig {
    fn merge_into(self, config: &mut UiConfig) {
        if let Some(prefer_dark) = self.prefer_dark {
            config.prefer_dark = prefer_dark;
        }
    }
}
