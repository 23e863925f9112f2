//! Dictionary definition record as returned by the lookup service.

use serde::{Deserialize, Serialize};

/// Placeholder used for any missing definition field.
pub const NOT_AVAILABLE: &str = "N/A";
/// Placeholder used when the meanings field is missing.
pub const NO_MEANINGS: &str = "No definition available.";

/// One dictionary entry keyed by a single word.
///
/// Every field is optional; the service omits fields it has no data for.
/// Field names follow the service payload (`Title`, `Topik`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DefinitionRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topik: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub importance: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hanja: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endef: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pronun: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_speech: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meanings: Option<String>,
}

impl DefinitionRecord {
    /// Returns the field when it holds a non-empty value.
    ///
    /// Empty strings are treated exactly like absent fields.
    pub fn present(value: &Option<String>) -> Option<&str> {
        value.as_deref().filter(|text| !text.is_empty())
    }

    /// Returns the field or `N/A`.
    pub fn or_not_available(value: &Option<String>) -> &str {
        Self::present(value).unwrap_or(NOT_AVAILABLE)
    }

    /// Returns the Hanja field unless it is missing or the `N/A` marker.
    pub fn hanja_text(&self) -> Option<&str> {
        Self::present(&self.hanja).filter(|text| *text != NOT_AVAILABLE)
    }

    /// Whether the service returned no data at all.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Body shape of a successful lookup: `{"message": DefinitionRecord}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefinitionEnvelope {
    #[serde(default)]
    pub message: DefinitionRecord,
}
