#![allow(dead_code)]

use herald::settings::Settings;

/// Builder for `Settings` to simplify test setup.
#[derive(Default)]
pub struct SettingsBuilder {
    settings: Settings,
}

impl SettingsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reporter(mut self, handler: &str) -> Self {
        self.settings.reporters.push(handler.to_string());
        self
    }

    pub fn noticer(mut self, handler: &str) -> Self {
        self.settings.noticers.push(handler.to_string());
        self
    }

    pub fn tag(mut self, tag: &str) -> Self {
        self.settings.tag = tag.to_string();
        self
    }

    pub fn timestamp(mut self, val: bool) -> Self {
        self.settings.timestamp = val;
        self
    }

    pub fn override_status(mut self, val: bool) -> Self {
        self.settings.override_status = val;
        self
    }

    pub fn log(mut self, pattern: &str) -> Self {
        self.settings.log = Some(pattern.to_string());
        self
    }

    pub fn build(self) -> Settings {
        self.settings
    }
}
