use thiserror::Error;

use crate::types::SnippetMode;

/// Coarse classification of every [`DtgeError`].
///
/// None of these are fatal: a rejected operation leaves the touched state
/// exactly as it was before the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    CapacityExceeded,
    InvalidModeOperation,
    UnsetFact,
    Io,
    Format,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DtgeError {
    #[error("Scene \"{scene_id}\" is not registered.")]
    SceneNotFound { scene_id: String },
    #[error("Scene \"{scene_id}\" has no subscene \"{subscene}\".")]
    SubsceneNotFound { scene_id: String, subscene: String },
    #[error("Scene \"{scene_id}\" has no subscene at index {index}.")]
    SubsceneIndexOutOfRange { scene_id: String, index: usize },
    #[error("Scene \"{scene_id}\" has no current subscene selected.")]
    NoCurrentSubscene { scene_id: String },
    #[error("Snippet has no variation {key} in {mode} mode.")]
    VariationNotFound { mode: SnippetMode, key: String },
    #[error("Scene \"{scene_id}\" has no snippet at index {index}.")]
    SnippetNotFound { scene_id: String, index: usize },
    #[error("Scene \"{scene_id}\" has no option in slot {slot}.")]
    OptionNotFound { scene_id: String, slot: usize },
    #[error("Option \"{option_id}\" in scene \"{scene_id}\" is disabled.")]
    OptionDisabled { scene_id: String, option_id: String },
    #[error("Scene \"{scene_id}\" already holds the maximum of {capacity} options.")]
    OptionCapacityExceeded { scene_id: String, capacity: usize },
    #[error("Cannot {operation} in {mode} mode.")]
    InvalidModeOperation {
        mode: SnippetMode,
        operation: &'static str,
    },
    #[error("{mode} mode requires at least {minimum} variations.")]
    VariationMinimum { mode: SnippetMode, minimum: usize },
    #[error("Subscene mode requires the scene to define at least one subscene.")]
    NoSubscenesAvailable,
    #[error("Scene \"{scene_id}\" does not allow the null subscene.")]
    NullSubsceneNotAllowed { scene_id: String },
    #[error("The null subscene cannot be {operation}.")]
    ReservedSubscene { operation: &'static str },
    #[error("Fact \"{name}\" has not been set.")]
    UnsetFact { name: String },
    #[error("I/O failure for {path}: {message}")]
    Io { path: String, message: String },
    #[error("Malformed {context}: {message}")]
    Format { context: String, message: String },
}

impl DtgeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::SceneNotFound { .. }
            | Self::SubsceneNotFound { .. }
            | Self::SubsceneIndexOutOfRange { .. }
            | Self::NoCurrentSubscene { .. }
            | Self::VariationNotFound { .. }
            | Self::SnippetNotFound { .. }
            | Self::OptionNotFound { .. } => ErrorKind::NotFound,
            Self::OptionCapacityExceeded { .. } => ErrorKind::CapacityExceeded,
            Self::OptionDisabled { .. }
            | Self::InvalidModeOperation { .. }
            | Self::VariationMinimum { .. }
            | Self::NoSubscenesAvailable
            | Self::NullSubsceneNotAllowed { .. }
            | Self::ReservedSubscene { .. } => ErrorKind::InvalidModeOperation,
            Self::UnsetFact { .. } => ErrorKind::UnsetFact,
            Self::Io { .. } => ErrorKind::Io,
            Self::Format { .. } => ErrorKind::Format,
        }
    }

    /// Stable machine-readable code, printed by the CLI as `ERROR_CODE:`.
    pub fn code(&self) -> &'static str {
        match self {
            Self::SceneNotFound { .. } => "SCENE_NOT_FOUND",
            Self::SubsceneNotFound { .. } => "SUBSCENE_NOT_FOUND",
            Self::SubsceneIndexOutOfRange { .. } => "SUBSCENE_INDEX_OUT_OF_RANGE",
            Self::NoCurrentSubscene { .. } => "NO_CURRENT_SUBSCENE",
            Self::VariationNotFound { .. } => "VARIATION_NOT_FOUND",
            Self::SnippetNotFound { .. } => "SNIPPET_NOT_FOUND",
            Self::OptionNotFound { .. } => "OPTION_NOT_FOUND",
            Self::OptionDisabled { .. } => "OPTION_DISABLED",
            Self::OptionCapacityExceeded { .. } => "OPTION_CAPACITY_EXCEEDED",
            Self::InvalidModeOperation { .. } => "INVALID_MODE_OPERATION",
            Self::VariationMinimum { .. } => "VARIATION_MINIMUM",
            Self::NoSubscenesAvailable => "NO_SUBSCENES_AVAILABLE",
            Self::NullSubsceneNotAllowed { .. } => "NULL_SUBSCENE_NOT_ALLOWED",
            Self::ReservedSubscene { .. } => "RESERVED_SUBSCENE",
            Self::UnsetFact { .. } => "UNSET_FACT",
            Self::Io { .. } => "IO",
            Self::Format { .. } => "FORMAT",
        }
    }

    pub fn io(path: impl std::fmt::Display, error: impl std::fmt::Display) -> Self {
        Self::Io {
            path: path.to_string(),
            message: error.to_string(),
        }
    }

    pub fn format(context: impl Into<String>, error: impl std::fmt::Display) -> Self {
        Self::Format {
            context: context.into(),
            message: error.to_string(),
        }
    }
}

#[cfg(test)]
mod error_tests {
    use super::*;

    #[test]
    fn kinds_follow_error_taxonomy() {
        assert_eq!(
            DtgeError::SceneNotFound {
                scene_id: "x".to_string()
            }
            .kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            DtgeError::OptionCapacityExceeded {
                scene_id: "x".to_string(),
                capacity: 15
            }
            .kind(),
            ErrorKind::CapacityExceeded
        );
        assert_eq!(
            DtgeError::NoSubscenesAvailable.kind(),
            ErrorKind::InvalidModeOperation
        );
        assert_eq!(
            DtgeError::UnsetFact {
                name: "flag".to_string()
            }
            .kind(),
            ErrorKind::UnsetFact
        );
    }

    #[test]
    fn display_and_code_are_stable() {
        let error = DtgeError::InvalidModeOperation {
            mode: SnippetMode::Simple,
            operation: "add a variation",
        };
        assert_eq!(error.code(), "INVALID_MODE_OPERATION");
        assert_eq!(error.to_string(), "Cannot add a variation in Simple mode.");

        let io = DtgeError::io("scenes/a.dscn", std::io::Error::other("denied"));
        assert_eq!(io.code(), "IO");
        assert!(io.to_string().contains("scenes/a.dscn"));
    }
}
