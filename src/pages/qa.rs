//! Interactive Q&A page: context selection, uploads, conversation history.

use tracing::{debug, error};

use super::{LoadingGuard, PageContext};
use crate::error::Result;
use crate::files::{FileRegistry, FileUpload, UploadOutcome};
use crate::qa::{ContextSelector, ConversationLog, ConversationTurn, TurnSource};

/// Prompts offered as one-click questions.
pub const SUGGESTED_QUESTIONS: [&str; 5] = [
    "What is the main argument or thesis?",
    "Can you summarize the key points?",
    "What are the most important takeaways?",
    "Are there any specific examples mentioned?",
    "What conclusions can be drawn from this?",
];

/// Longest locally derived context snippet kept on a turn.
const CONTEXT_SNIPPET_CHARS: usize = 500;

pub struct QaPage {
    ctx: PageContext,
    /// Free-text context buffer. Inert while a file is selected.
    pub context_text: String,
    pub question: String,
    files: FileRegistry,
    log: ConversationLog,
    loading: bool,
    uploading: bool,
}

impl QaPage {
    pub fn new(ctx: PageContext) -> Self {
        Self::with_log(ctx, ConversationLog::new())
    }

    pub fn with_log(ctx: PageContext, log: ConversationLog) -> Self {
        Self {
            ctx,
            context_text: String::new(),
            question: String::new(),
            files: FileRegistry::new(),
            log,
            loading: false,
            uploading: false,
        }
    }

    /// Submit the current question against the effective context.
    ///
    /// The question buffer is cleared on dispatch and restored if the
    /// backend call fails.
    pub async fn ask(&mut self) -> Result<&ConversationTurn> {
        let resolved = match ContextSelector::resolve(
            &self.question,
            &self.context_text,
            self.files.selected_id(),
        ) {
            Ok(resolved) => resolved,
            Err(e) => return self.ctx.report(Err(e.into()), ""),
        };

        let current_question = std::mem::take(&mut self.question);
        let gateway = self.ctx.gateway.clone();
        let result = {
            let _loading = LoadingGuard::raise(&mut self.loading);
            gateway.ask_question(&resolved.request).await
        };

        let response = match self.ctx.report(result, "Question answered successfully!") {
            Ok(response) => response,
            Err(e) => {
                error!(error = %e, "Q&A failed");
                self.question = current_question;
                return Err(e);
            }
        };

        let context_used = if response.context_used.is_empty() {
            self.local_context(resolved.request.file_id.as_deref(), resolved.source)
        } else {
            response.context_used
        };
        debug!(source = %resolved.source, "Answer received");

        Ok(self.log.record(ConversationTurn::new(
            current_question,
            response.answer,
            context_used,
            resolved.source,
        )))
    }

    /// Snippet of the context this page supplied, for when the backend echoes none.
    fn local_context(&self, file_id: Option<&str>, source: TurnSource) -> String {
        let text = match (source, file_id) {
            (TurnSource::File, Some(id)) => self
                .files
                .get(id)
                .map(|f| f.extracted_text.as_str())
                .unwrap_or_default(),
            _ => self.context_text.as_str(),
        };
        text.chars().take(CONTEXT_SNIPPET_CHARS).collect()
    }

    /// Upload files for use as context. Each file succeeds or fails on its own.
    pub async fn upload_files(&mut self, uploads: &[FileUpload]) -> Vec<UploadOutcome> {
        let gateway = self.ctx.gateway.clone();
        let outcomes = {
            let _uploading = LoadingGuard::raise(&mut self.uploading);
            self.files.upload_batch(gateway.as_ref(), uploads).await
        };
        for outcome in &outcomes {
            match &outcome.result {
                Ok(_) => self
                    .ctx
                    .notifier
                    .success(&format!("{} uploaded and ready for Q&A!", outcome.file_name)),
                Err(e) => self.ctx.notifier.error(&e.to_string()),
            }
        }
        outcomes
    }

    /// Use an uploaded file as the context for following questions.
    pub fn select_file(&mut self, file_id: &str) -> Result<()> {
        self.files.select(file_id)?;
        Ok(())
    }

    /// Return to free-text context.
    pub fn clear_file_selection(&mut self) {
        self.files.clear_selection();
    }

    /// Delete an uploaded file; clears the selection if it was selected.
    pub async fn delete_file(&mut self, file_id: &str) -> Result<()> {
        let gateway = self.ctx.gateway.clone();
        match self.files.remove(gateway.as_ref(), file_id).await {
            Ok(_) => {
                self.ctx.notifier.success("File deleted successfully");
                Ok(())
            }
            Err(e) => {
                error!(file_id, error = %e, "Delete failed");
                self.ctx.notifier.error("Failed to delete file");
                Err(e)
            }
        }
    }

    /// Put a suggested question into the question buffer.
    pub fn use_suggestion(&mut self, index: usize) -> Option<&'static str> {
        let suggestion = SUGGESTED_QUESTIONS.get(index).copied()?;
        self.question = suggestion.to_string();
        Some(suggestion)
    }

    pub fn clear_history(&mut self) {
        self.log.clear();
        self.ctx.notifier.success("Conversation history cleared");
    }

    /// Whether submission is currently possible.
    pub fn can_submit(&self) -> bool {
        !self.loading
            && !self.question.trim().is_empty()
            && (!self.context_text.trim().is_empty() || self.files.selected_id().is_some())
    }

    pub fn files(&self) -> &FileRegistry {
        &self.files
    }

    pub fn history(&self) -> &ConversationLog {
        &self.log
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading
    }
}
