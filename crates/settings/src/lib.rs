//! Persistent configuration: the account list and the slip layout.
//! 設定儲存：帳戶清單與存款單版面。

pub mod config;
mod document;

pub use config::{
    default_config_path, ConfigError, Configuration, ConfigurationStore, CONFIG_DIR, CONFIG_FILE,
};
