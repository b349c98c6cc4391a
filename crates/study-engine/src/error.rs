//! Error types for the Study Buddy engine.
//!
//! This module defines the error hierarchy for every engine operation:
//! quiz interaction, topic generation, progress persistence, and
//! configuration loading.

use std::path::PathBuf;

/// A specialized `Result` type for Study Buddy operations.
pub type Result<T> = std::result::Result<T, StudyError>;

/// Errors that can occur while driving a study session.
///
/// Quiz and topic errors are local and recoverable: shells report them as
/// status text and keep running. Configuration and persistence errors carry
/// actionable suggestions.
#[derive(Debug, thiserror::Error)]
pub enum StudyError {
    // ========================================================================
    // Quiz Errors
    // ========================================================================
    /// A question index outside the quiz, or an option index outside that
    /// question's options.
    ///
    /// This is a programmer error from the integrating shell. The engine
    /// reports it and leaves its state untouched.
    #[error("{}", invalid_selection_message(.question, .option))]
    InvalidSelection {
        /// The requested question index.
        question: usize,
        /// The requested option index, if the question itself exists.
        option: Option<usize>,
    },

    /// Submit was called before any option was selected.
    #[error("Select an option first.")]
    NotSelected {
        /// The question that has no selection.
        question: usize,
    },

    // ========================================================================
    // Topic Errors
    // ========================================================================
    /// The topic text was empty or whitespace only.
    #[error("Please enter a topic.")]
    EmptyTopic,

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Invalid JSON syntax in configuration file.
    #[error("Invalid JSON in config file '{path}': {message}\n\nSuggestion: Validate your study.json with a JSON linter")]
    ConfigParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Description of the parse error.
        message: String,
    },

    /// Configuration validation failed.
    #[error("Invalid configuration: {message}\n\nSuggestion: {suggestion}")]
    ConfigValidationError {
        /// Description of the validation failure.
        message: String,
        /// Actionable suggestion for the user.
        suggestion: String,
    },

    // ========================================================================
    // Progress Persistence Errors
    // ========================================================================
    /// Progress file contains malformed JSON.
    #[error("Corrupted progress file '{path}': {message}\n\nSuggestion: Remove the progress file to start today's count fresh")]
    ProgressFileCorrupted {
        /// Path to the corrupted progress file.
        path: PathBuf,
        /// Description of the corruption.
        message: String,
    },

    // ========================================================================
    // General I/O Errors
    // ========================================================================
    /// General I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[allow(clippy::trivially_copy_pass_by_ref, clippy::ref_option)]
fn invalid_selection_message(question: &usize, option: &Option<usize>) -> String {
    match option {
        Some(option) => format!("Invalid selection: option {option} does not exist for question {question}"),
        None => format!("Invalid selection: question {question} does not exist in this quiz"),
    }
}

impl StudyError {
    /// Creates an `InvalidSelection` error for a question index outside the quiz.
    #[must_use]
    pub const fn unknown_question(question: usize) -> Self {
        Self::InvalidSelection {
            question,
            option: None,
        }
    }

    /// Creates an `InvalidSelection` error for an option index outside a question.
    #[must_use]
    pub const fn unknown_option(question: usize, option: usize) -> Self {
        Self::InvalidSelection {
            question,
            option: Some(option),
        }
    }

    /// Creates a new `ConfigParseError` with the given path and message.
    #[must_use]
    pub fn config_parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ConfigParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new `ConfigValidationError` with the given message and suggestion.
    #[must_use]
    pub fn config_validation(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::ConfigValidationError {
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }

    /// Creates a new `ProgressFileCorrupted` error.
    #[must_use]
    pub fn progress_corrupted(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ProgressFileCorrupted {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Returns `true` if this error is a normal user mistake that should be
    /// shown as a status prompt rather than reported as a failure.
    #[must_use]
    pub const fn is_user_recoverable(&self) -> bool {
        matches!(self, Self::NotSelected { .. } | Self::EmptyTopic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_facing_messages() {
        assert_eq!(
            StudyError::NotSelected { question: 0 }.to_string(),
            "Select an option first."
        );
        assert_eq!(StudyError::EmptyTopic.to_string(), "Please enter a topic.");
    }

    #[test]
    fn test_invalid_selection_messages() {
        let msg = StudyError::unknown_question(7).to_string();
        assert!(msg.contains("question 7"));
        assert!(msg.contains("does not exist"));

        let msg = StudyError::unknown_option(1, 9).to_string();
        assert!(msg.contains("option 9"));
        assert!(msg.contains("question 1"));
    }

    #[test]
    fn test_is_user_recoverable() {
        assert!(StudyError::EmptyTopic.is_user_recoverable());
        assert!(StudyError::NotSelected { question: 2 }.is_user_recoverable());
        assert!(!StudyError::unknown_question(3).is_user_recoverable());
        assert!(!StudyError::progress_corrupted("p.json", "bad").is_user_recoverable());
    }

    #[test]
    fn test_progress_corrupted_display() {
        let err = StudyError::progress_corrupted("/tmp/progress.json", "expected value");
        let msg = err.to_string();
        assert!(msg.contains("/tmp/progress.json"));
        assert!(msg.contains("expected value"));
        assert!(msg.contains("Suggestion"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: StudyError = io_err.into();
        assert!(matches!(err, StudyError::Io(_)));
    }
}
