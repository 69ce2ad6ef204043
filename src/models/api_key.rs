//! API keys for the AI services
//!
//! Keys live only in process memory; "saved" is a UI flag and nothing is
//! transmitted or written to disk.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// AI services that take an API key
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiService {
    /// Caption generation and writing assistance
    Gemini,
    /// Image generation
    Imagen,
}

impl ApiService {
    /// Get all services
    pub const fn all() -> &'static [Self] {
        &[Self::Gemini, Self::Imagen]
    }

    /// Display name
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Gemini => "Google Gemini",
            Self::Imagen => "Google Imagen",
        }
    }

    /// What the key is used for
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Gemini => "For generating engaging social media captions and improving text",
            Self::Imagen => "For generating stunning images from text descriptions",
        }
    }

    /// Where to obtain a key
    pub const fn instructions_url(&self) -> &'static str {
        match self {
            Self::Gemini => "https://makersuite.google.com/app/apikey",
            Self::Imagen => "https://console.cloud.google.com/apis/library",
        }
    }
}

/// Client-local record for one key
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiKeyRecord {
    /// Current value
    pub value: String,
    /// Whether the current value has been saved
    pub saved: bool,
    /// Whether the value is shown in clear text
    pub visible: bool,
}

impl ApiKeyRecord {
    /// Value as displayed, masked unless visible
    pub fn display(&self) -> String {
        if self.visible {
            self.value.clone()
        } else {
            "•".repeat(self.value.chars().count())
        }
    }
}

/// Key records for every service
#[derive(Debug, Clone)]
pub struct ApiKeyVault {
    records: BTreeMap<ApiService, ApiKeyRecord>,
}

impl Default for ApiKeyVault {
    fn default() -> Self {
        Self {
            records: ApiService::all()
                .iter()
                .map(|s| (*s, ApiKeyRecord::default()))
                .collect(),
        }
    }
}

impl ApiKeyVault {
    /// Record for a service
    pub fn record(&self, service: ApiService) -> &ApiKeyRecord {
        &self.records[&service]
    }

    fn record_mut(&mut self, service: ApiService) -> &mut ApiKeyRecord {
        self.records.entry(service).or_default()
    }

    /// Replace the value; an edited value is no longer saved
    pub fn set_value(&mut self, service: ApiService, value: impl Into<String>) {
        let record = self.record_mut(service);
        record.value = value.into();
        record.saved = false;
    }

    /// Append a character to the value
    pub fn push_char(&mut self, service: ApiService, c: char) {
        let record = self.record_mut(service);
        record.value.push(c);
        record.saved = false;
    }

    /// Remove the last character of the value
    pub fn pop_char(&mut self, service: ApiService) {
        let record = self.record_mut(service);
        record.value.pop();
        record.saved = false;
    }

    /// Mark the current value saved
    pub fn save(&mut self, service: ApiService) -> Result<(), ValidationError> {
        let record = self.record_mut(service);
        if record.value.trim().is_empty() {
            return Err(ValidationError::MissingApiKey);
        }
        record.saved = true;
        Ok(())
    }

    /// Clear the value
    pub fn delete(&mut self, service: ApiService) {
        let record = self.record_mut(service);
        record.value.clear();
        record.saved = false;
    }

    /// Show or hide the value
    pub fn toggle_visibility(&mut self, service: ApiService) {
        let record = self.record_mut(service);
        record.visible = !record.visible;
    }
}
