//! Store settings resolution.
//!
//! Options come from three layers, highest priority first: command-line
//! flags, `AWS_*` environment variables, then an INI config file with one
//! section per group id (falling back to `[default]`). Each layer only fills
//! what is still missing, and every step returns a new [`Settings`].
//!
//! ```ini
//! [default]
//! aws_access_key_id = AKIA...
//! aws_secret_access_key = ...
//! bucket = build-artifacts
//! region = us-east-1
//!
//! [com.example.tools]
//! local_root = /srv/artifacts
//! ```
//!
//! A path ending in `.yaml` or `.yml` is read as YAML with the same
//! sections as top-level keys.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Result;
use art_store::{ObjectStoreDriver, S3Config};
use clap::Args;
use config::{FileFormat, Format};
use serde::Deserialize;

use crate::error::OperationError;

/// Default location of the config file.
pub const DEFAULT_CONFIG_PATH: &str = "~/.artifact-cli";

/// Global store options accepted on the command line.
#[derive(Args, Debug, Clone, Default)]
pub struct StoreArgs {
    /// Path to the configuration file.
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// AWS access key id.
    #[arg(long, global = true)]
    pub access_key: Option<String>,

    /// AWS secret access key.
    #[arg(long, global = true)]
    pub secret_key: Option<String>,

    /// Bucket holding the repository.
    #[arg(long, global = true)]
    pub bucket: Option<String>,

    /// AWS region.
    #[arg(long, global = true)]
    pub region: Option<String>,

    /// Endpoint of an S3-compatible service.
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// Keep the repository in a local directory instead of S3.
    #[arg(long, global = true)]
    pub local_root: Option<PathBuf>,
}

/// One section of the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigSection {
    pub aws_access_key_id: Option<String>,
    pub aws_secret_access_key: Option<String>,
    pub bucket: Option<String>,
    pub region: Option<String>,
    pub endpoint: Option<String>,
    pub local_root: Option<PathBuf>,
}

/// Syntax of the config file, chosen by its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Ini,
    Yaml,
}

impl ConfigFormat {
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml" | "yml") => Self::Yaml,
            _ => Self::Ini,
        }
    }
}

/// Where the repository lives once settings are complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    S3(S3Config),
    Local(PathBuf),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub bucket: Option<String>,
    pub region: Option<String>,
    pub endpoint: Option<String>,
    pub local_root: Option<PathBuf>,
    pub config_path: PathBuf,
}

impl Settings {
    pub fn from_args(args: &StoreArgs) -> Self {
        Self {
            access_key: args.access_key.clone(),
            secret_key: args.secret_key.clone(),
            bucket: args.bucket.clone(),
            region: args.region.clone(),
            endpoint: args.endpoint.clone(),
            local_root: args.local_root.clone(),
            config_path: expand_home(&args.config),
        }
    }

    /// Fill credentials and region from `AWS_*` variables.
    pub fn with_environ<I, K, V>(self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let env: HashMap<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .filter(|(_, v)| !v.is_empty())
            .collect();
        Self {
            access_key: self
                .access_key
                .or_else(|| env.get("AWS_ACCESS_KEY_ID").cloned()),
            secret_key: self
                .secret_key
                .or_else(|| env.get("AWS_SECRET_ACCESS_KEY").cloned()),
            region: self
                .region
                .or_else(|| env.get("AWS_DEFAULT_REGION").cloned()),
            ..self
        }
    }

    /// True when the config file has nothing left to contribute.
    pub fn is_complete(&self) -> bool {
        self.local_root.is_some()
            || (self.access_key.is_some() && self.secret_key.is_some() && self.bucket.is_some())
    }

    /// Fill remaining gaps from the config file section for `group_id`.
    ///
    /// The file is only read when something required is still missing; a
    /// missing file is not an error here, [`Settings::backend`] reports
    /// whatever is still absent.
    pub fn with_config_file(self, group_id: &str) -> Result<Self> {
        if self.is_complete() {
            return Ok(self);
        }
        let text = match std::fs::read_to_string(&self.config_path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.config_path.display(), "no configuration file");
                return Ok(self);
            }
            Err(e) => {
                return Err(anyhow::Error::new(e).context(format!(
                    "cannot read configuration file {}",
                    self.config_path.display()
                )))
            }
        };
        let format = ConfigFormat::for_path(&self.config_path);
        let section = parse_section(&text, group_id, format).map_err(|reason| {
            OperationError::InvalidConfig {
                path: self.config_path.clone(),
                reason,
            }
        })?;
        Ok(self.with_section(section))
    }

    /// Fill missing options from one config section.
    pub fn with_section(self, section: ConfigSection) -> Self {
        Self {
            access_key: self.access_key.or(section.aws_access_key_id),
            secret_key: self.secret_key.or(section.aws_secret_access_key),
            bucket: self.bucket.or(section.bucket),
            region: self.region.or(section.region),
            endpoint: self.endpoint.or(section.endpoint),
            local_root: self.local_root.or(section.local_root.map(|p| expand_home(&p))),
            ..self
        }
    }

    /// Decide the backend, failing on the first missing required option.
    pub fn backend(&self) -> Result<Backend, OperationError> {
        if let Some(root) = &self.local_root {
            return Ok(Backend::Local(root.clone()));
        }
        let access_key = self.require(&self.access_key, "aws_access_key_id", "--access-key")?;
        let secret_key =
            self.require(&self.secret_key, "aws_secret_access_key", "--secret-key")?;
        let bucket = self.require(&self.bucket, "bucket", "--bucket")?;
        Ok(Backend::S3(S3Config {
            bucket,
            access_key,
            secret_key,
            region: self.region.clone(),
            endpoint: self.endpoint.clone(),
        }))
    }

    /// Build the driver for the resolved backend.
    pub fn connect(&self) -> Result<ObjectStoreDriver> {
        let driver = match self.backend()? {
            Backend::Local(root) => ObjectStoreDriver::local(&root)?,
            Backend::S3(config) => ObjectStoreDriver::s3(&config)?,
        };
        tracing::debug!(location = driver.location(), "connected to store");
        Ok(driver)
    }

    fn require(
        &self,
        value: &Option<String>,
        setting: &'static str,
        flag: &'static str,
    ) -> Result<String, OperationError> {
        value.clone().ok_or_else(|| OperationError::MissingSetting {
            setting,
            flag,
            config: self.config_path.clone(),
        })
    }
}

/// Pick the section for `group_id`, else `default`, else an empty section.
fn parse_section(
    text: &str,
    group_id: &str,
    format: ConfigFormat,
) -> Result<ConfigSection, String> {
    if text.trim().is_empty() {
        return Ok(ConfigSection::default());
    }
    match format {
        ConfigFormat::Ini => {
            // Parsed without a `Config` builder: section names contain dots.
            let mut sections = FileFormat::Ini
                .parse(None, text)
                .map_err(|e| e.to_string())?;
            match sections
                .remove(group_id)
                .or_else(|| sections.remove("default"))
            {
                Some(section) => section.try_deserialize().map_err(|e| e.to_string()),
                None => Ok(ConfigSection::default()),
            }
        }
        ConfigFormat::Yaml => {
            let mut sections: HashMap<String, ConfigSection> =
                serde_yaml::from_str(text).map_err(|e| e.to_string())?;
            Ok(sections
                .remove(group_id)
                .or_else(|| sections.remove("default"))
                .unwrap_or_default())
        }
    }
}

/// Replace a leading `~` with the home directory.
fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}
