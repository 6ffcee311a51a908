use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use depositslip_core::{Account, AccountError, AccountList};
use depositslip_printing::LayoutConfiguration;
use thiserror::Error;

use crate::document::{AccountRecord, ConfigDocument, LayoutRecord};

/// Directory under the workspace that holds the configuration file.
pub const CONFIG_DIR: &str = ".depositslip";
pub const CONFIG_FILE: &str = "config.json";

/// 工作區預設的設定檔路徑。 / Default configuration path inside `workspace`.
pub fn default_config_path(workspace: impl AsRef<Path>) -> PathBuf {
    workspace.as_ref().join(CONFIG_DIR).join(CONFIG_FILE)
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required field `{field}`")]
    MissingField { field: String },
    #[error("invalid value for `{field}`: expected {expected}")]
    InvalidField {
        field: String,
        expected: &'static str,
    },
    #[error("failed to read configuration {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse configuration {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize configuration {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write configuration {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to prepare directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to import accounts from {path}: {source}")]
    Import {
        path: PathBuf,
        #[source]
        source: AccountError,
    },
    #[error(transparent)]
    Account(#[from] AccountError),
}

/// Accounts and slip layout as persisted together in one file.
/// 帳戶清單與存款單版面，存放於同一設定檔。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Configuration {
    pub accounts: AccountList,
    pub layout: LayoutConfiguration,
}

impl Configuration {
    fn from_json(path: &Path, contents: &str) -> Result<Self, ConfigError> {
        let document: ConfigDocument =
            serde_json::from_str(contents).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        let accounts = document
            .accounts
            .into_iter()
            .enumerate()
            .map(|(index, record)| record.into_account(index))
            .collect::<Result<Vec<_>, _>>()?;
        let layout = document
            .configuration
            .ok_or_else(|| ConfigError::MissingField {
                field: "configuration".to_string(),
            })?
            .into_layout()?;
        Ok(Self {
            accounts: AccountList::from_accounts(accounts)?,
            layout,
        })
    }

    fn to_json(&self, path: &Path) -> Result<String, ConfigError> {
        let document = ConfigDocument {
            accounts: self
                .accounts
                .iter()
                .map(AccountRecord::from_account)
                .collect(),
            configuration: Some(LayoutRecord::from_layout(&self.layout)),
        };
        serde_json::to_string_pretty(&document).map_err(|source| ConfigError::Serialize {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// 設定檔的讀寫管理。 / Loads, edits and persists the configuration file.
#[derive(Debug)]
pub struct ConfigurationStore {
    path: PathBuf,
    data: Configuration,
}

impl ConfigurationStore {
    pub fn new(path: impl Into<PathBuf>, configuration: Configuration) -> Self {
        Self {
            path: path.into(),
            data: configuration,
        }
    }

    /// 載入設定；檔案不存在時使用預設值。 / Loads the file, falling back to defaults when it is absent.
    ///
    /// A file that exists but lacks a required field fails with
    /// [`ConfigError::MissingField`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no configuration file, using defaults");
            return Ok(Self {
                path,
                data: Configuration::default(),
            });
        }

        let contents = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        let data = Configuration::from_json(&path, &contents)?;
        tracing::debug!(
            path = %path.display(),
            accounts = data.accounts.len(),
            "loaded configuration"
        );
        Ok(Self { path, data })
    }

    pub fn configuration(&self) -> &Configuration {
        &self.data
    }

    pub fn accounts(&self) -> &AccountList {
        &self.data.accounts
    }

    pub fn layout(&self) -> &LayoutConfiguration {
        &self.data.layout
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 新增帳戶並儲存。 / Adds an account and persists the change.
    pub fn add_account(&mut self, account: Account) -> Result<(), ConfigError> {
        self.data.accounts.add(account)?;
        self.save()
    }

    /// 移除帳戶並儲存。 / Removes an account by number and persists the change.
    pub fn remove_account(&mut self, number: &str) -> Result<Account, ConfigError> {
        let removed = self.data.accounts.remove(number)?;
        self.save()?;
        Ok(removed)
    }

    pub fn set_layout(&mut self, layout: LayoutConfiguration) -> Result<(), ConfigError> {
        self.data.layout = layout;
        self.save()
    }

    /// 將版面還原為預設值。 / Restores the built-in layout, keeping accounts.
    pub fn reset_layout(&mut self) -> Result<(), ConfigError> {
        self.set_layout(LayoutConfiguration::default())
    }

    /// Merges accounts from a tab-separated legacy file. Numbers already present
    /// are skipped. Returns how many accounts were added.
    pub fn import_accounts_tsv(&mut self, source: impl AsRef<Path>) -> Result<usize, ConfigError> {
        let source = source.as_ref().to_path_buf();
        let contents = fs::read_to_string(&source).map_err(|err| ConfigError::Read {
            path: source.clone(),
            source: err,
        })?;
        let imported = AccountList::from_tsv(&contents).map_err(|err| ConfigError::Import {
            path: source.clone(),
            source: err,
        })?;

        let mut added = 0;
        for account in imported.iter() {
            if self.data.accounts.get(&account.number).is_some() {
                tracing::warn!(number = %account.number, "skipping duplicate account from import");
                continue;
            }
            self.data.accounts.add(account.clone())?;
            added += 1;
        }
        if added > 0 {
            self.save()?;
        }
        Ok(added)
    }

    /// 以原子方式寫回設定檔。 / Writes the file atomically through a `.tmp` sibling.
    pub fn save(&self) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let payload = self.data.to_json(&self.path)?;

        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, payload.as_bytes()).map_err(|source| ConfigError::Write {
            path: tmp_path.clone(),
            source,
        })?;
        fs::rename(&tmp_path, &self.path).map_err(|source| ConfigError::Write {
            path: self.path.clone(),
            source,
        })?;
        tracing::info!(path = %self.path.display(), "saved configuration");
        Ok(())
    }

    pub fn export_to(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let payload = self.data.to_json(&path)?;
        fs::write(&path, payload.as_bytes()).map_err(|source| ConfigError::Write { path, source })
    }

    /// 匯入完整設定檔，先備份現有檔案。 / Replaces the configuration with `source`, backing up the current file to `.bak`.
    pub fn import_from(&mut self, source: impl AsRef<Path>) -> Result<(), ConfigError> {
        let source = source.as_ref().to_path_buf();
        let contents = fs::read_to_string(&source).map_err(|err| ConfigError::Read {
            path: source.clone(),
            source: err,
        })?;
        let data = Configuration::from_json(&source, &contents)?;
        self.backup_existing()?;
        self.data = data;
        self.save()
    }

    fn backup_existing(&self) -> Result<(), ConfigError> {
        if self.path.exists() {
            let backup = self.path.with_extension("bak");
            fs::copy(&self.path, &backup).map_err(|source| ConfigError::Write {
                path: backup,
                source,
            })?;
        }
        Ok(())
    }
}
