// src/settings.rs

//! Effective run options: CLI flags merged with the optional config file.

use tracing::{debug, warn};

use crate::cli::CliArgs;
use crate::config::{CONFIG_ENV, ConfigFile, load_and_validate, resolve_config_path};

/// Everything the supervisor needs to know besides the command itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub reporters: Vec<String>,
    pub noticers: Vec<String>,
    pub timestamp: bool,
    /// Empty means no tag.
    pub tag: String,
    pub override_status: bool,
    /// strftime pattern of the log file.
    pub log: Option<String>,
}

impl Settings {
    /// Settings from the command line alone.
    pub fn from_cli(args: &CliArgs) -> Self {
        Self {
            reporters: args.reporters.clone(),
            noticers: args.noticers.clone(),
            timestamp: args.timestamp,
            tag: args.tag.clone().unwrap_or_default(),
            override_status: args.override_status,
            log: args.log.clone().filter(|l| !l.is_empty()),
        }
    }

    /// Fold a config file in.
    ///
    /// Handler lists are concatenated (CLI first), flags are OR-ed, and
    /// `tag`/`log` from the config only fill values the CLI left empty.
    pub fn merge_config(&mut self, cfg: &ConfigFile) {
        self.reporters.extend(cfg.reporter.iter().cloned());
        self.noticers.extend(cfg.noticer.iter().cloned());
        self.timestamp |= cfg.timestamp;
        self.override_status |= cfg.override_status;
        if self.tag.is_empty() {
            if let Some(tag) = &cfg.tag {
                self.tag = tag.clone();
            }
        }
        if self.log.is_none() {
            self.log = cfg.log.clone();
        }
    }

    /// CLI settings plus whatever config file `--config` or `HERALD_CONFIG`
    /// points at.
    ///
    /// A config that cannot be loaded is reported and skipped; the job runs
    /// with the CLI settings.
    pub fn resolve(args: &CliArgs) -> Self {
        let env = std::env::var(CONFIG_ENV).ok();
        Self::resolve_with_env(args, env.as_deref())
    }

    pub fn resolve_with_env(args: &CliArgs, env_config: Option<&str>) -> Self {
        let mut settings = Self::from_cli(args);

        let Some(path) = resolve_config_path(args.config.as_deref(), env_config) else {
            return settings;
        };
        match load_and_validate(&path) {
            Ok(cfg) => {
                debug!(path = ?path, "loaded config file");
                settings.merge_config(&cfg);
            }
            Err(e) => warn!(path = ?path, error = %e, "failed to load config"),
        }
        settings
    }
}
