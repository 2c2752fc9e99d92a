//! File registry: uploaded file descriptors held by one page.

use chrono::{DateTime, Local, Utc};
use futures::stream::{FuturesUnordered, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::FileUpload;
use crate::api::{ApiGateway, UploadResponse};
use crate::error::{Result, ValidationError};

/// A successfully uploaded file. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    /// Backend-issued identifier.
    pub file_id: String,
    /// Name of the local file as picked by the user.
    pub original_name: String,
    /// Name the backend stored it under.
    pub stored_name: String,
    pub extracted_text: String,
    pub file_size: u64,
    pub file_type: String,
    pub uploaded_at: DateTime<Utc>,
}

impl UploadedFile {
    pub fn from_response(original_name: impl Into<String>, response: UploadResponse) -> Self {
        Self {
            file_id: response.file_id,
            original_name: original_name.into(),
            stored_name: response.filename,
            extracted_text: response.extracted_text.unwrap_or_default(),
            file_size: response.file_size,
            file_type: response.file_type,
            uploaded_at: Utc::now(),
        }
    }

    /// Name to show in lists; the picked name wins over the stored one.
    pub fn display_name(&self) -> &str {
        if self.original_name.is_empty() {
            &self.stored_name
        } else {
            &self.original_name
        }
    }

    /// Upload time in local time, for display.
    pub fn upload_time(&self) -> String {
        self.uploaded_at
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
    }
}

/// Outcome of one file in a batch upload.
#[derive(Debug)]
pub struct UploadOutcome {
    pub file_name: String,
    pub result: Result<UploadedFile>,
}

/// Most-recent-first list of uploads plus at most one selected file.
///
/// File ids are unique within the registry. No deduplication by name or
/// content.
#[derive(Debug, Default)]
pub struct FileRegistry {
    files: Vec<UploadedFile>,
    selected: Option<String>,
}

impl FileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend a record. A record with the same id is replaced.
    pub fn record(&mut self, file: UploadedFile) {
        if let Some(pos) = self.files.iter().position(|f| f.file_id == file.file_id) {
            warn!(file_id = %file.file_id, "Replacing record with duplicate file id");
            self.files.remove(pos);
        }
        info!(
            file_id = %file.file_id,
            name = %file.original_name,
            size = file.file_size,
            "File recorded"
        );
        self.files.insert(0, file);
    }

    /// Upload one file and record it. Failure leaves the registry untouched.
    pub async fn upload(
        &mut self,
        gateway: &dyn ApiGateway,
        file: &FileUpload,
    ) -> Result<UploadedFile> {
        let response = gateway.upload_file(file).await?;
        let uploaded = UploadedFile::from_response(&file.file_name, response);
        self.record(uploaded.clone());
        Ok(uploaded)
    }

    /// Upload several files concurrently.
    ///
    /// Each success is recorded when it completes, so the list reflects
    /// completion order. Failures are per file. Outcomes are returned in
    /// completion order.
    pub async fn upload_batch(
        &mut self,
        gateway: &dyn ApiGateway,
        files: &[FileUpload],
    ) -> Vec<UploadOutcome> {
        let mut pending: FuturesUnordered<_> = files
            .iter()
            .map(|file| async move { (file, gateway.upload_file(file).await) })
            .collect();

        let mut outcomes = Vec::with_capacity(files.len());
        while let Some((file, result)) = pending.next().await {
            let result = result.map(|response| {
                let uploaded = UploadedFile::from_response(&file.file_name, response);
                self.record(uploaded.clone());
                uploaded
            });
            if let Err(e) = &result {
                warn!(name = %file.file_name, error = %e, "Upload failed");
            }
            outcomes.push(UploadOutcome {
                file_name: file.file_name.clone(),
                result,
            });
        }
        outcomes
    }

    /// Delete remotely, then drop the local record. Clears the selection if
    /// it pointed at this file. A remote failure leaves everything as is.
    pub async fn remove(
        &mut self,
        gateway: &dyn ApiGateway,
        file_id: &str,
    ) -> Result<Option<UploadedFile>> {
        gateway.delete_file(file_id).await?;

        let position = self.files.iter().position(|f| f.file_id == file_id);
        let removed = position.map(|pos| self.files.remove(pos));

        if self.selected.as_deref() == Some(file_id) {
            self.selected = None;
            info!(file_id, "Selection cleared by delete");
        }

        info!(file_id, found = removed.is_some(), "File deleted");
        Ok(removed)
    }

    /// Local lookup only.
    pub fn get(&self, file_id: &str) -> Option<&UploadedFile> {
        self.files.iter().find(|f| f.file_id == file_id)
    }

    /// Select a recorded file.
    pub fn select(&mut self, file_id: &str) -> Result<&UploadedFile> {
        let file = self
            .files
            .iter()
            .find(|f| f.file_id == file_id)
            .ok_or_else(|| ValidationError::UnknownFile {
                file_id: file_id.to_string(),
            })?;
        self.selected = Some(file.file_id.clone());
        Ok(file)
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn selected(&self) -> Option<&UploadedFile> {
        self.selected.as_deref().and_then(|id| self.get(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &UploadedFile> {
        self.files.iter()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
