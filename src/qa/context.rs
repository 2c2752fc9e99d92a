//! Effective context resolution for a Q&A submission.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::AskRequest;
use crate::error::ValidationError;

/// Where a turn's context came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnSource {
    File,
    Text,
}

impl std::fmt::Display for TurnSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File => write!(f, "file"),
            Self::Text => write!(f, "text"),
        }
    }
}

/// The request to send plus the provenance to record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedContext {
    pub request: AskRequest,
    pub source: TurnSource,
}

/// Applies the file-over-text precedence rule.
///
/// A selected file always wins: the text payload is emptied and the file id
/// forwarded, and the backend substitutes the stored extracted text. The
/// free-text buffer is inert until the selection is cleared.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextSelector;

impl ContextSelector {
    pub fn resolve(
        question: &str,
        free_text: &str,
        selected_file: Option<&str>,
    ) -> Result<ResolvedContext, ValidationError> {
        if question.trim().is_empty() {
            return Err(ValidationError::EmptyQuestion);
        }

        let selected_file = selected_file.filter(|id| !id.is_empty());
        let resolved = match selected_file {
            Some(file_id) => ResolvedContext {
                request: AskRequest {
                    text: String::new(),
                    question: question.to_string(),
                    file_id: Some(file_id.to_string()),
                },
                source: TurnSource::File,
            },
            None if free_text.trim().is_empty() => return Err(ValidationError::MissingContext),
            None => ResolvedContext {
                request: AskRequest {
                    text: free_text.to_string(),
                    question: question.to_string(),
                    file_id: None,
                },
                source: TurnSource::Text,
            },
        };

        debug!(source = %resolved.source, "Context resolved");
        Ok(resolved)
    }
}
