//! User settings: a flat map from a closed set of names to typed values.

use super::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Names of the settings the site understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SettingKey {
    /// Show 3D models alongside the document.
    #[serde(rename = "SET_3D")]
    Set3d,
    /// Show images related to the current document.
    #[serde(rename = "SET_RELATED_IMAGES")]
    SetRelatedImages,
}

impl SettingKey {
    pub const ALL: [SettingKey; 2] = [SettingKey::Set3d, SettingKey::SetRelatedImages];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Set3d => "SET_3D",
            Self::SetRelatedImages => "SET_RELATED_IMAGES",
        }
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettingKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().replace('-', "_").as_str() {
            "SET_3D" | "3D" => Ok(Self::Set3d),
            "SET_RELATED_IMAGES" | "RELATED_IMAGES" => Ok(Self::SetRelatedImages),
            _ => Err(ConfigError::InvalidSetting(s.to_string())),
        }
    }
}

/// Value of a single setting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Flag(bool),
    Number(f64),
    Text(String),
}

impl SettingValue {
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Flag(flag) => Some(*flag),
            _ => None,
        }
    }

    /// Parses command-line input: booleans and numbers first, text otherwise.
    pub fn parse(raw: &str) -> Self {
        if let Ok(flag) = raw.parse::<bool>() {
            return Self::Flag(flag);
        }
        if let Ok(number) = raw.parse::<f64>() {
            return Self::Number(number);
        }
        Self::Text(raw.to_string())
    }
}

impl From<bool> for SettingValue {
    fn from(flag: bool) -> Self {
        Self::Flag(flag)
    }
}

/// Settings slice of the root state.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Settings {
    values: BTreeMap<SettingKey, SettingValue>,
}

impl Settings {
    pub fn get(&self, key: SettingKey) -> Option<&SettingValue> {
        self.values.get(&key)
    }

    /// Reads a boolean setting, treating anything unset or non-boolean as off.
    pub fn is_enabled(&self, key: SettingKey) -> bool {
        self.get(key).and_then(SettingValue::as_flag).unwrap_or(false)
    }

    /// Replaces the value of `key`. Returns false when the value was already set.
    pub fn set(&mut self, key: SettingKey, value: SettingValue) -> bool {
        if self.values.get(&key) == Some(&value) {
            return false;
        }
        self.values.insert(key, value);
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = (SettingKey, &SettingValue)> {
        self.values.iter().map(|(key, value)| (*key, value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Partial settings carried by a hydration snapshot.
///
/// Names are kept as strings so an unknown name is reported and skipped
/// instead of rejecting the whole snapshot.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SettingsPatch {
    pub values: BTreeMap<String, SettingValue>,
}

impl SettingsPatch {
    pub fn with(mut self, key: SettingKey, value: impl Into<SettingValue>) -> Self {
        self.values.insert(key.as_str().to_string(), value.into());
        self
    }

    /// Validated entries of the patch. Unknown names are logged and dropped.
    pub fn entries(&self) -> Vec<(SettingKey, SettingValue)> {
        self.values
            .iter()
            .filter_map(|(name, value)| match name.parse::<SettingKey>() {
                Ok(key) => Some((key, value.clone())),
                Err(err) => {
                    log::warn!("Ignoring setting in snapshot: {err}");
                    None
                }
            })
            .collect()
    }
}
