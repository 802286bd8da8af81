//! Personalization store: reader preferences proposed to the owning context.
//!
//! The store does not persist anything. Every edit is reported through the
//! change callback with the full preference set; the owner decides what to
//! keep and may push new values back with [`PersonalizationStore::sync`].

use serde::{Deserialize, Serialize};
use tracing::debug;

/// A preference key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PreferenceField {
    TechnicalBackground,
    HardwareSpecs,
    ContentLevel,
    ExamplesPreference,
}

impl PreferenceField {
    pub const ALL: [PreferenceField; 4] = [
        PreferenceField::TechnicalBackground,
        PreferenceField::HardwareSpecs,
        PreferenceField::ContentLevel,
        PreferenceField::ExamplesPreference,
    ];

    /// Wire name of the key.
    pub fn key(&self) -> &'static str {
        match self {
            Self::TechnicalBackground => "technicalBackground",
            Self::HardwareSpecs => "hardwareSpecs",
            Self::ContentLevel => "contentLevel",
            Self::ExamplesPreference => "examplesPreference",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::TechnicalBackground => "Your Technical Background",
            Self::HardwareSpecs => "Your Hardware Specs",
            Self::ContentLevel => "Content Detail Level",
            Self::ExamplesPreference => "Preferred Examples",
        }
    }

    /// Allowed values with their display labels. The empty value means unset.
    pub fn options(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::TechnicalBackground => &[
                ("beginner", "Beginner"),
                ("intermediate", "Intermediate"),
                ("advanced", "Advanced"),
            ],
            Self::HardwareSpecs => &[
                ("low-end", "Low-end"),
                ("mid-range", "Mid-range"),
                ("high-end", "High-end"),
            ],
            Self::ContentLevel => &[
                ("simplified", "Simplified"),
                ("detailed", "Detailed"),
                ("technical", "Technical"),
            ],
            Self::ExamplesPreference => &[
                ("practical", "Practical Applications"),
                ("theoretical", "Theoretical Concepts"),
            ],
        }
    }

    pub fn accepts(&self, value: &str) -> bool {
        value.is_empty() || self.options().iter().any(|(v, _)| *v == value)
    }
}

impl std::fmt::Display for PreferenceField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl std::str::FromStr for PreferenceField {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.key() == s)
            .ok_or_else(|| format!("Unknown preference: {}", s))
    }
}

/// Full preference set. All four keys are always serialized; empty is unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    #[serde(default)]
    pub technical_background: String,
    #[serde(default)]
    pub hardware_specs: String,
    #[serde(default)]
    pub content_level: String,
    #[serde(default)]
    pub examples_preference: String,
}

impl UserPreferences {
    pub fn get(&self, field: PreferenceField) -> &str {
        match field {
            PreferenceField::TechnicalBackground => &self.technical_background,
            PreferenceField::HardwareSpecs => &self.hardware_specs,
            PreferenceField::ContentLevel => &self.content_level,
            PreferenceField::ExamplesPreference => &self.examples_preference,
        }
    }

    /// Copy with one field replaced.
    pub fn with(&self, field: PreferenceField, value: impl Into<String>) -> Self {
        let mut next = self.clone();
        let slot = match field {
            PreferenceField::TechnicalBackground => &mut next.technical_background,
            PreferenceField::HardwareSpecs => &mut next.hardware_specs,
            PreferenceField::ContentLevel => &mut next.content_level,
            PreferenceField::ExamplesPreference => &mut next.examples_preference,
        };
        *slot = value.into();
        next
    }
}

/// Preferences as handed down by the owner, where any key may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesInput {
    pub technical_background: Option<String>,
    pub hardware_specs: Option<String>,
    pub content_level: Option<String>,
    pub examples_preference: Option<String>,
}

impl From<&PreferencesInput> for UserPreferences {
    fn from(input: &PreferencesInput) -> Self {
        Self {
            technical_background: input.technical_background.clone().unwrap_or_default(),
            hardware_specs: input.hardware_specs.clone().unwrap_or_default(),
            content_level: input.content_level.clone().unwrap_or_default(),
            examples_preference: input.examples_preference.clone().unwrap_or_default(),
        }
    }
}

/// Callback invoked with the full preference set after every edit.
pub type ChangeListener = Box<dyn FnMut(&UserPreferences) + Send>;

/// Local view of the reader's preferences.
pub struct PersonalizationStore {
    preferences: UserPreferences,
    on_change: ChangeListener,
}

impl PersonalizationStore {
    pub fn new<F>(current: &PreferencesInput, on_change: F) -> Self
    where
        F: FnMut(&UserPreferences) + Send + 'static,
    {
        Self {
            preferences: current.into(),
            on_change: Box::new(on_change),
        }
    }

    pub fn preferences(&self) -> &UserPreferences {
        &self.preferences
    }

    /// Replace one field and notify the listener immediately.
    pub fn set_field(&mut self, field: PreferenceField, value: &str) -> UserPreferences {
        self.preferences = self.preferences.with(field, value);
        debug!(field = %field, value, "Preference changed");
        (self.on_change)(&self.preferences);
        self.preferences.clone()
    }

    /// Adopt preferences pushed down by the owner, discarding local edits.
    ///
    /// Does not notify the listener.
    pub fn sync(&mut self, current: &PreferencesInput) {
        self.preferences = current.into();
    }
}
