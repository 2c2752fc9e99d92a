//! Presentation generator page.

use std::path::{Path, PathBuf};

use tracing::info;

use super::{LoadingGuard, PageContext};
use crate::api::{DEFAULT_SLIDES, GeneratedPresentation, PresentationRequest};
use crate::error::{Error, Result, ValidationError};

const FALLBACK_FILE_NAME: &str = "presentation.pptx";

pub struct PresentationPage {
    ctx: PageContext,
    pub input_text: String,
    pub title: String,
    pub slide_count: u32,
    pub include_speaker_notes: bool,
    generated: Option<GeneratedPresentation>,
    loading: bool,
}

impl PresentationPage {
    pub fn new(ctx: PageContext) -> Self {
        Self {
            ctx,
            input_text: String::new(),
            title: String::new(),
            slide_count: DEFAULT_SLIDES,
            include_speaker_notes: true,
            generated: None,
            loading: false,
        }
    }

    fn request(&self) -> PresentationRequest {
        let title = self.title.trim();
        PresentationRequest {
            text: self.input_text.clone(),
            title: (!title.is_empty()).then(|| title.to_string()),
            slide_count: self.slide_count,
            include_speaker_notes: self.include_speaker_notes,
        }
    }

    /// Generate a deck. Replaces the previous one only on success.
    pub async fn generate(&mut self) -> Result<&GeneratedPresentation> {
        let request = self.request();
        if let Err(e) = request.validate() {
            return self.ctx.report(Err(e.into()), "");
        }

        let gateway = self.ctx.gateway.clone();
        let result = {
            let _loading = LoadingGuard::raise(&mut self.loading);
            gateway.generate_presentation(&request).await
        };

        let deck = self
            .ctx
            .report(result, "Presentation generated successfully!")?;
        info!(title = %deck.title, slides = deck.slide_count, "Presentation generated");
        Ok(self.generated.insert(deck))
    }

    /// Fetch the generated deck and write it into `dir`. Returns the written path.
    pub async fn download(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let Some(deck) = &self.generated else {
            return self.ctx.report(Err(ValidationError::NothingToDownload.into()), "");
        };

        let file_name = match deck.file_name() {
            "" | "." | ".." => FALLBACK_FILE_NAME,
            name => name,
        };
        let target = dir.as_ref().join(file_name);

        let result = async {
            let bytes = self.ctx.gateway.download_presentation(file_name).await?;
            tokio::fs::write(&target, &bytes).await?;
            info!(path = %target.display(), bytes = bytes.len(), "Presentation saved");
            Ok::<_, Error>(target)
        }
        .await;
        self.ctx
            .report(result, "Presentation downloaded successfully!")
    }

    /// Backend metadata about the generated deck.
    pub async fn info(&self) -> Result<serde_json::Value> {
        let Some(deck) = &self.generated else {
            return Err(ValidationError::NothingToDownload.into());
        };
        self.ctx.gateway.presentation_info(deck.file_name()).await
    }

    /// Back to initial state. No network call.
    pub fn reset(&mut self) {
        self.input_text.clear();
        self.title.clear();
        self.slide_count = DEFAULT_SLIDES;
        self.include_speaker_notes = true;
        self.generated = None;
    }

    pub fn generated(&self) -> Option<&GeneratedPresentation> {
        self.generated.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }
}
