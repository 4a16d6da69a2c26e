use thiserror::Error as ThisError;

///
/// IndexError
///
/// Failures surfaced by index construction and named lookup.
/// Adding or removing entities never fails.
///

#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum IndexError {
    /// Two indexes were registered under the same name.
    #[error("duplicate index name '{name}'")]
    DuplicateName { name: String },

    #[error("unknown index '{name}'")]
    UnknownIndex { name: String },

    #[error("index '{index}' is keyed by {expected}")]
    KeyTypeMismatch {
        index: String,
        expected: &'static str,
    },
}

impl IndexError {
    pub(crate) fn unknown_index(name: &str) -> Self {
        Self::UnknownIndex {
            name: name.to_string(),
        }
    }
}
