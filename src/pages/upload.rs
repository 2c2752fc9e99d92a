//! Smart file processing page: upload, preview, delete.

use tracing::error;

use super::{LoadingGuard, PageContext};
use crate::api::{FileContent, FileInfo, SupportedFileTypes};
use crate::error::Result;
use crate::files::{FileRegistry, FileUpload, UploadOutcome, UploadedFile};

/// Shown when the backend has not reported its limit.
const DEFAULT_MAX_FILE_SIZE_MB: f64 = 10.0;

pub struct UploadPage {
    ctx: PageContext,
    files: FileRegistry,
    supported: Option<SupportedFileTypes>,
    uploading: bool,
}

impl UploadPage {
    pub fn new(ctx: PageContext) -> Self {
        Self {
            ctx,
            files: FileRegistry::new(),
            supported: None,
            uploading: false,
        }
    }

    /// Load accepted file types. Failure is logged only.
    pub async fn load_supported_types(&mut self) -> Option<&SupportedFileTypes> {
        match self.ctx.gateway.supported_file_types().await {
            Ok(types) => Some(self.supported.insert(types)),
            Err(e) => {
                error!(error = %e, "Failed to load supported types");
                None
            }
        }
    }

    /// Upload every file concurrently; each is recorded when it finishes.
    pub async fn upload(&mut self, uploads: &[FileUpload]) -> Vec<UploadOutcome> {
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
                    .success(&format!("{} uploaded successfully!", outcome.file_name)),
                Err(e) => self.ctx.notifier.error(&e.to_string()),
            }
        }
        outcomes
    }

    /// Show a file's extracted text.
    pub fn view(&mut self, file_id: &str) -> Result<&UploadedFile> {
        self.files.select(file_id)
    }

    pub fn close_preview(&mut self) {
        self.files.clear_selection();
    }

    /// File being previewed, if any.
    pub fn preview(&self) -> Option<&UploadedFile> {
        self.files.selected()
    }

    /// Delete a file; closes the preview if it showed that file.
    pub async fn delete(&mut self, file_id: &str) -> Result<()> {
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

    /// Full text the backend stored for a file.
    pub async fn stored_content(&self, file_id: &str) -> Result<FileContent> {
        let result = self.ctx.gateway.file_content(file_id).await;
        if let Err(e) = &result {
            self.ctx.notifier.error(&e.to_string());
        }
        result
    }

    /// Backend metadata; `exists` turns false once the server lost the file.
    pub async fn info(&self, file_id: &str) -> Result<FileInfo> {
        self.ctx.gateway.file_info(file_id).await
    }

    pub fn files(&self) -> &FileRegistry {
        &self.files
    }

    pub fn supported_types(&self) -> Option<&SupportedFileTypes> {
        self.supported.as_ref()
    }

    pub fn max_file_size_mb(&self) -> f64 {
        self.supported
            .as_ref()
            .map(|s| s.max_file_size_mb)
            .filter(|mb| *mb > 0.0)
            .unwrap_or(DEFAULT_MAX_FILE_SIZE_MB)
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading
    }
}
