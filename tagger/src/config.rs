use std::{collections::HashMap, env};

use crate::error::ConfigError;

/// Environment variable holding the tag key
pub const TAG_KEY_VAR: &str = "BUSINESS_TAG_KEY";
/// Environment variable holding the tag value
pub const TAG_VALUE_VAR: &str = "BUSINESS_TAG_VALUE";

pub(crate) const MAX_TAG_KEY_LEN: usize = 128;
pub(crate) const MAX_TAG_VALUE_LEN: usize = 256;

/// The business tag applied to every non compliant resource.
///
/// Built once at start-up and shared by every invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagConfig {
    tag_key: String,
    tag_value: String,
}

impl TagConfig {
    /// Validates a key/value pair against the tagging API limits.
    ///
    /// An empty value is accepted, the tagging API allows it.
    pub fn new(tag_key: impl Into<String>, tag_value: impl Into<String>) -> Result<Self, ConfigError> {
        let tag_key = tag_key.into();
        let tag_value = tag_value.into();

        if tag_key.trim().is_empty() {
            return Err(ConfigError::Empty(TAG_KEY_VAR));
        }
        let key_len = tag_key.chars().count();
        if key_len > MAX_TAG_KEY_LEN {
            return Err(ConfigError::KeyTooLong(key_len));
        }
        if tag_key.to_ascii_lowercase().starts_with("aws:") {
            return Err(ConfigError::ReservedPrefix(tag_key));
        }
        let value_len = tag_value.chars().count();
        if value_len > MAX_TAG_VALUE_LEN {
            return Err(ConfigError::ValueTooLong(value_len));
        }

        Ok(Self { tag_key, tag_value })
    }

    /// Reads `BUSINESS_TAG_KEY` and `BUSINESS_TAG_VALUE` from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let tag_key = lookup(TAG_KEY_VAR).ok_or(ConfigError::Missing(TAG_KEY_VAR))?;
        let tag_value = lookup(TAG_VALUE_VAR).ok_or(ConfigError::Missing(TAG_VALUE_VAR))?;
        Self::new(tag_key, tag_value)
    }

    pub fn tag_key(&self) -> &str {
        &self.tag_key
    }

    pub fn tag_value(&self) -> &str {
        &self.tag_value
    }

    /// The tag set sent with every tagging request
    pub fn tags(&self) -> HashMap<String, String> {
        let mut tags = HashMap::with_capacity(1);
        tags.insert(self.tag_key.clone(), self.tag_value.clone());
        tags
    }
}
