use serde::{Deserialize, Serialize};

/// A flattened recipe record, as indexed in the vector store and returned as
/// search payload.
///
/// `ingredients` holds the dataset's ingredient list joined by ", ".
/// Immutable once loaded: its identity is its position in the sampled
/// sequence, which becomes the vector store point id.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Recipe {
    pub title: String,
    pub ingredients: String,
    pub instructions: String,
}

impl Recipe {
    /// Sentinel returned when a search matches nothing.
    ///
    /// A miss is a normal outcome: callers receive this record instead of an
    /// error or an empty sequence.
    pub fn not_found() -> Self {
        Self {
            title: "no recipe found".into(),
            ingredients: "".into(),
            instructions: "no recipes matched these ingredients".into(),
        }
    }
}
