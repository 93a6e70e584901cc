// src/config/model.rs

use serde::Deserialize;

use crate::config::validate::validate_config;
use crate::errors::HeraldError;

/// A handler list that may be written as one string or an array of strings.
///
/// ```toml
/// reporter = "mail-report ops@example.com"
/// noticer = ["notify-start", "ruby /path/to/noticer.rb"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "HandlerListRepr")]
pub struct HandlerList(pub Vec<String>);

#[derive(Deserialize)]
#[serde(untagged)]
enum HandlerListRepr {
    One(String),
    Many(Vec<String>),
}

impl From<HandlerListRepr> for HandlerList {
    fn from(repr: HandlerListRepr) -> Self {
        match repr {
            HandlerListRepr::One(handler) => HandlerList(vec![handler]),
            HandlerListRepr::Many(handlers) => HandlerList(handlers),
        }
    }
}

/// Configuration as read from a TOML file, before validation.
///
/// ```toml
/// reporter = ["report-to-chat"]
/// noticer = "notify-start"
/// timestamp = true
/// tag = "nightly-backup"
/// override_status = false
/// log = "/var/log/backup-%Y%m%d.log"
/// ```
///
/// Every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub reporter: HandlerList,

    #[serde(default)]
    pub noticer: HandlerList,

    /// Prefix merged output lines with the capture time.
    #[serde(default)]
    pub timestamp: bool,

    #[serde(default)]
    pub tag: Option<String>,

    /// Always exit 0, whatever the command returned.
    #[serde(default)]
    pub override_status: bool,

    /// strftime pattern of the log file to append merged output to.
    #[serde(default)]
    pub log: Option<String>,
}

/// Validated configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFile {
    pub reporter: Vec<String>,
    pub noticer: Vec<String>,
    pub timestamp: bool,
    pub tag: Option<String>,
    pub override_status: bool,
    pub log: Option<String>,
}

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = HeraldError;

    fn try_from(raw: RawConfigFile) -> Result<Self, Self::Error> {
        let config = ConfigFile {
            reporter: raw.reporter.0,
            noticer: raw.noticer.0,
            timestamp: raw.timestamp,
            tag: raw.tag.filter(|t| !t.is_empty()),
            override_status: raw.override_status,
            log: raw.log.filter(|l| !l.is_empty()),
        };
        validate_config(&config)?;
        Ok(config)
    }
}
