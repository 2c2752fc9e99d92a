//! Tone & style rewriter page.

use std::path::Path;

use tracing::error;

use super::{LoadingGuard, PageContext};
use crate::api::{Tone, ToneOption, TransformRequest};
use crate::error::{Result, ValidationError};

pub struct TransformPage {
    ctx: PageContext,
    pub input_text: String,
    pub tone: Tone,
    pub additional_instructions: String,
    transformed_text: String,
    tones: Vec<ToneOption>,
    loading: bool,
}

impl TransformPage {
    pub fn new(ctx: PageContext) -> Self {
        Self {
            ctx,
            input_text: String::new(),
            tone: Tone::default(),
            additional_instructions: String::new(),
            transformed_text: String::new(),
            tones: Vec::new(),
            loading: false,
        }
    }

    /// Fetch the tone options offered by the backend.
    pub async fn load_tones(&mut self) -> Result<&[ToneOption]> {
        match self.ctx.gateway.supported_tones().await {
            Ok(tones) => {
                self.tones = tones;
                Ok(&self.tones)
            }
            Err(e) => {
                error!(error = %e, "Failed to load supported tones");
                self.ctx.notifier.error("Failed to load tone options");
                Err(e)
            }
        }
    }

    /// Rewrite the input in the selected tone. Blank instructions are sent as null.
    pub async fn transform(&mut self) -> Result<&str> {
        let request = TransformRequest::new(
            self.input_text.clone(),
            self.tone,
            Some(self.additional_instructions.clone()),
        );
        if let Err(e) = request.validate() {
            return self.ctx.report(Err(e.into()), "");
        }

        let gateway = self.ctx.gateway.clone();
        let result = {
            let _loading = LoadingGuard::raise(&mut self.loading);
            gateway.transform_text(&request).await
        };

        let response = self
            .ctx
            .report(result, "Text transformed successfully!")?;
        self.transformed_text = response.transformed_text;
        Ok(&self.transformed_text)
    }

    /// Write the transformed text to a local file.
    pub async fn export(&self, path: impl AsRef<Path>) -> Result<()> {
        if self.transformed_text.is_empty() {
            return self.ctx.report(Err(ValidationError::NothingToDownload.into()), "");
        }
        let result = tokio::fs::write(path.as_ref(), &self.transformed_text)
            .await
            .map_err(Into::into);
        self.ctx.report(result, "File downloaded!")
    }

    /// Back to initial state. No network call.
    pub fn reset(&mut self) {
        self.input_text.clear();
        self.transformed_text.clear();
        self.additional_instructions.clear();
        self.tone = Tone::default();
    }

    pub fn transformed_text(&self) -> &str {
        &self.transformed_text
    }

    pub fn tones(&self) -> &[ToneOption] {
        &self.tones
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::stub::StubGateway;
    use crate::error::RemoteServiceError;
    use crate::pages::testing::{Notice, context};

    #[tokio::test]
    async fn transform_success_updates_result() {
        let (ctx, stub, notes) = context(StubGateway::new());
        let mut page = TransformPage::new(ctx);
        page.input_text = "hey, send the report".into();
        page.tone = Tone::Formal;

        let out = page.transform().await.unwrap().to_string();
        assert_eq!(out, "[formal] hey, send the report");
        assert!(!page.is_loading());
        assert_eq!(stub.call_count(), 1);
        assert_eq!(
            notes.last(),
            Some(Notice::Success("Text transformed successfully!".into()))
        );
    }

    #[tokio::test]
    async fn empty_input_never_reaches_network() {
        let (ctx, stub, notes) = context(StubGateway::new());
        let mut page = TransformPage::new(ctx);
        page.input_text = "   ".into();

        let err = page.transform().await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(stub.call_count(), 0);
        assert_eq!(
            notes.last(),
            Some(Notice::Error("Please enter some text to transform".into()))
        );
    }

    #[tokio::test]
    async fn failure_keeps_previous_result() {
        let (ctx, stub, notes) = context(StubGateway::new());
        let mut page = TransformPage::new(ctx);
        page.input_text = "first".into();
        page.transform().await.unwrap();

        stub.set_failure(Some(RemoteServiceError::new("Gemini quota exceeded", Some(500))));
        page.input_text = "second".into();
        assert!(page.transform().await.is_err());

        assert_eq!(page.transformed_text(), "[formal] first");
        assert!(!page.is_loading());
        assert_eq!(
            notes.last(),
            Some(Notice::Error("Gemini quota exceeded".into()))
        );
    }

    #[tokio::test]
    async fn tone_load_failure_uses_fixed_message() {
        let (ctx, _stub, notes) =
            context(StubGateway::failing(RemoteServiceError::transport("x")));
        let mut page = TransformPage::new(ctx);
        assert!(page.load_tones().await.is_err());
        assert!(page.tones().is_empty());
        assert_eq!(
            notes.last(),
            Some(Notice::Error("Failed to load tone options".into()))
        );
    }

    #[tokio::test]
    async fn export_and_reset() {
        let (ctx, stub, _notes) = context(StubGateway::new());
        let mut page = TransformPage::new(ctx);
        assert!(page.export("/tmp/unused.txt").await.unwrap_err().is_validation());

        page.load_tones().await.unwrap();
        assert_eq!(page.tones().len(), 5);

        page.input_text = "draft".into();
        page.tone = Tone::Casual;
        page.additional_instructions = "keep it short".into();
        page.transform().await.unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transformed.txt");
        page.export(&path).await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[casual] draft");

        let calls_before = stub.call_count();
        page.reset();
        assert_eq!(page.tone, Tone::Formal);
        assert!(page.input_text.is_empty());
        assert!(page.transformed_text().is_empty());
        assert!(page.additional_instructions.is_empty());
        assert_eq!(stub.call_count(), calls_before);
    }
}
