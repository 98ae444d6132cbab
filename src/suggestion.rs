//! Suggestion records
//!
//! The same record shape is used by the remote payload, the cache and the
//! JSON output, serialized in camelCase.

use serde::{Deserialize, Serialize};

use crate::query::normalize::normalize;

/// One candidate entity returned for a query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    /// External identifier, possibly a version-qualified accession ("ABC123.2")
    pub id: String,
    pub primary_common_name: String,
    #[serde(default)]
    pub scientific_name: String,
    #[serde(default)]
    pub additional_common_names: Vec<String>,
    /// Category tag (e.g. "species")
    #[serde(rename = "type", default)]
    pub kind: String,
}

impl Suggestion {
    pub fn new(
        id: impl Into<String>,
        primary_common_name: impl Into<String>,
        scientific_name: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            primary_common_name: primary_common_name.into(),
            scientific_name: scientific_name.into(),
            additional_common_names: Vec::new(),
            kind: kind.into(),
        }
    }

    pub fn with_additional_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.additional_common_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Identifier with any trailing version suffix removed
    pub fn bare_id(&self) -> &str {
        strip_accession_version(&self.id)
    }
}

/// Item handed downstream when the user picks a suggestion
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedItem {
    #[serde(rename = "type")]
    pub kind: String,
    pub label: String,
    pub id: String,
    pub search_term: String,
}

impl SelectedItem {
    pub fn from_suggestion(suggestion: &Suggestion, kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
            label: suggestion.primary_common_name.clone(),
            id: suggestion.bare_id().to_string(),
            search_term: normalize(&suggestion.primary_common_name).into_string(),
        }
    }
}

/// Reduce a version-qualified accession to its bare form.
///
/// `"ABC123.2"` becomes `"ABC123"`; identifiers without a version are
/// returned unchanged.
pub fn strip_accession_version(accession: &str) -> &str {
    match accession.split_once('.') {
        Some((bare, _version)) => bare,
        None => accession,
    }
}
