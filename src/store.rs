//
// store.rs
// Distributed under terms of the MIT license.
//

use crate::error::NofanError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONSUMER_KEY: &str = "13456aa784cdf7688af69e85d482e011";
pub const DEFAULT_CONSUMER_SECRET: &str = "f75c02df373232732b69354ecfbcabea";

// On-disk key names keep the historical config.json/account.json format.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
    #[serde(rename = "USER", default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(rename = "CONSUMER_KEY", default = "default_consumer_key")]
    pub consumer_key: String,
    #[serde(rename = "CONSUMER_SECRET", default = "default_consumer_secret")]
    pub consumer_secret: String,
    #[serde(rename = "DISPLAY_COUNT", default = "default_display_count")]
    pub display_count: u32,
    #[serde(rename = "TIME_TAG", default = "default_true")]
    pub time_tag: bool,
    #[serde(rename = "PHOTO_TAG", default = "default_true")]
    pub photo_tag: bool,
    #[serde(rename = "SSL", default = "default_true")]
    pub ssl: bool,
    #[serde(rename = "VERBOSE", default)]
    pub verbose: bool,
    #[serde(rename = "API_DOMAIN", default = "default_api_domain")]
    pub api_domain: String,
    #[serde(rename = "OAUTH_DOMAIN", default = "default_oauth_domain")]
    pub oauth_domain: String,
    #[serde(rename = "COLORS", default)]
    pub colors: ColorScheme,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ColorScheme {
    #[serde(default = "default_name_color")]
    pub name: String,
    #[serde(default = "default_text_color")]
    pub text: String,
    #[serde(default = "default_at_color")]
    pub at: String,
    #[serde(default = "default_link_color")]
    pub link: String,
    #[serde(default = "default_tag_color")]
    pub tag: String,
    #[serde(default = "default_photo_color")]
    pub photo: String,
    #[serde(default = "default_timeago_color")]
    pub timeago: String,
    #[serde(default = "default_highlight_color")]
    pub highlight: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Credential {
    #[serde(rename = "CONSUMER_KEY")]
    pub consumer_key: String,
    #[serde(rename = "CONSUMER_SECRET")]
    pub consumer_secret: String,
    #[serde(rename = "OAUTH_TOKEN")]
    pub oauth_token: String,
    #[serde(rename = "OAUTH_TOKEN_SECRET")]
    pub oauth_token_secret: String,
}

// Sorted map keeps "first account" fallback selection deterministic.
pub type AccountMap = BTreeMap<String, Credential>;

fn default_consumer_key() -> String {
    DEFAULT_CONSUMER_KEY.to_string()
}

fn default_consumer_secret() -> String {
    DEFAULT_CONSUMER_SECRET.to_string()
}

fn default_display_count() -> u32 {
    10
}

fn default_true() -> bool {
    true
}

fn default_api_domain() -> String {
    "api.fanfou.com".to_string()
}

fn default_oauth_domain() -> String {
    "fanfou.com".to_string()
}

fn default_name_color() -> String {
    "green".to_string()
}

fn default_text_color() -> String {
    "#cccccc".to_string()
}

fn default_at_color() -> String {
    "cyan".to_string()
}

fn default_link_color() -> String {
    "cyan.underline".to_string()
}

fn default_tag_color() -> String {
    "orange.bold".to_string()
}

fn default_photo_color() -> String {
    "grey".to_string()
}

fn default_timeago_color() -> String {
    "dim.green.italic".to_string()
}

fn default_highlight_color() -> String {
    "bgYellow.black".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            user: None,
            consumer_key: default_consumer_key(),
            consumer_secret: default_consumer_secret(),
            display_count: default_display_count(),
            time_tag: true,
            photo_tag: true,
            ssl: true,
            verbose: false,
            api_domain: default_api_domain(),
            oauth_domain: default_oauth_domain(),
            colors: ColorScheme::default(),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        ColorScheme {
            name: default_name_color(),
            text: default_text_color(),
            at: default_at_color(),
            link: default_link_color(),
            tag: default_tag_color(),
            photo: default_photo_color(),
            timeago: default_timeago_color(),
            highlight: default_highlight_color(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Store {
    base: PathBuf,
}

impl Store {
    pub fn new(base: PathBuf) -> Self {
        Store { base }
    }

    // ~/.nofan, or ~/.nofan-test so test runs never clobber real state.
    pub fn open_default() -> Result<Self, NofanError> {
        let home = dirs::home_dir()
            .ok_or_else(|| NofanError::IoError("cannot locate the home directory".to_string()))?;
        let dir = if env::var_os("NOFAN_TEST").is_some() {
            ".nofan-test"
        } else {
            ".nofan"
        };
        Ok(Store::new(home.join(dir)))
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn ensure_dir(&self) -> Result<(), NofanError> {
        fs::create_dir_all(&self.base)
            .map_err(|e| NofanError::IoError(format!("{}: {}", self.base.display(), e)))
    }

    pub fn load_config(&self) -> Result<Config, NofanError> {
        Ok(self.read_json("config")?.unwrap_or_default())
    }

    pub fn save_config(&self, config: &Config) -> Result<(), NofanError> {
        self.write_json("config", config)
    }

    pub fn load_accounts(&self) -> Result<AccountMap, NofanError> {
        Ok(self.read_json("account")?.unwrap_or_default())
    }

    pub fn save_accounts(&self, accounts: &AccountMap) -> Result<(), NofanError> {
        self.write_json("account", accounts)
    }

    // A missing file is not an error; an unreadable or unparsable one is.
    fn read_json<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, NofanError> {
        let path = self.base.join(format!("{}.json", name));
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(NofanError::IoError(format!("{}: {}", path.display(), e))),
        };
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|_| NofanError::CorruptState(path.display().to_string()))
    }

    fn write_json<T: Serialize>(&self, name: &str, value: &T) -> Result<(), NofanError> {
        self.ensure_dir()?;
        let path = self.base.join(format!("{}.json", name));
        let text = serde_json::to_string_pretty(value)
            .map_err(|e| NofanError::ParseError(e.to_string()))?;
        fs::write(&path, text)
            .map_err(|e| NofanError::IoError(format!("{}: {}", path.display(), e)))
    }
}
