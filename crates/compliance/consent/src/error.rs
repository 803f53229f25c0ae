use thiserror::Error;

use crate::category::CategoryId;

/// Errors building or addressing a consent catalog.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConsentError {
    #[error("consent catalog has no required category")]
    NoRequiredCategory,

    #[error("consent category `{0}` declared twice")]
    DuplicateCategory(CategoryId),

    #[error("consent category id must not be empty")]
    EmptyCategoryId,

    #[error("unknown consent category: {0}")]
    UnknownCategory(String),
}

/// Errors from the destructive-action confirmation gate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationError {
    #[error("confirmation dialog is not open")]
    DialogClosed,

    #[error("confirmation not given")]
    NotSatisfied,

    #[error("exact-text confirmation needs a non-empty expected text")]
    EmptyExpectedText,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_category() {
        let err = ConsentError::DuplicateCategory(CategoryId::from("analytics"));
        assert_eq!(err.to_string(), "consent category `analytics` declared twice");
        assert_eq!(
            ConsentError::UnknownCategory("ads".into()).to_string(),
            "unknown consent category: ads"
        );
    }
}
