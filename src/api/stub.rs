//! Scripted in-memory gateway for unit tests (no network).

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use super::types::*;
use super::ApiGateway;
use crate::error::{RemoteServiceError, Result};
use crate::files::FileUpload;

#[derive(Default)]
pub(crate) struct StubGateway {
    /// Operation names, in call order.
    pub calls: Mutex<Vec<&'static str>>,
    pub asked: Mutex<Vec<AskRequest>>,
    /// When set, every call fails with this error.
    pub fail_with: Mutex<Option<RemoteServiceError>>,
    /// Uploads by file name that should fail.
    pub failing_uploads: HashSet<String>,
    /// Artificial latency per uploaded file name.
    pub upload_delays: HashMap<String, Duration>,
    stored_text: Mutex<HashMap<String, String>>,
    next_id: AtomicUsize,
}

impl StubGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(error: RemoteServiceError) -> Self {
        let stub = Self::default();
        *stub.fail_with.lock().unwrap() = Some(error);
        stub
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn last_ask(&self) -> Option<AskRequest> {
        self.asked.lock().unwrap().last().cloned()
    }

    pub fn set_failure(&self, error: Option<RemoteServiceError>) {
        *self.fail_with.lock().unwrap() = error;
    }

    fn enter(&self, op: &'static str) -> Result<()> {
        self.calls.lock().unwrap().push(op);
        match self.fail_with.lock().unwrap().clone() {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ApiGateway for StubGateway {
    async fn transform_text(&self, request: &TransformRequest) -> Result<TransformResponse> {
        self.enter("transform_text")?;
        Ok(TransformResponse {
            original_text: request.text.clone(),
            transformed_text: format!("[{}] {}", request.tone, request.text),
            tone: Some(request.tone),
        })
    }

    async fn supported_tones(&self) -> Result<Vec<ToneOption>> {
        self.enter("supported_tones")?;
        Ok(Tone::ALL
            .iter()
            .map(|t| ToneOption {
                value: t.as_str().to_string(),
                label: t.as_str().to_uppercase(),
                description: format!("{t} tone"),
            })
            .collect())
    }

    async fn ask_question(&self, request: &AskRequest) -> Result<AnswerResponse> {
        self.enter("ask_question")?;
        self.asked.lock().unwrap().push(request.clone());
        let context_used = match &request.file_id {
            Some(id) => self
                .stored_text
                .lock()
                .unwrap()
                .get(id)
                .cloned()
                .unwrap_or_default(),
            None => request.text.clone(),
        };
        Ok(AnswerResponse {
            question: request.question.clone(),
            answer: format!("answer to {}", request.question),
            context_used,
        })
    }

    async fn file_content(&self, file_id: &str) -> Result<FileContent> {
        self.enter("file_content")?;
        let content = self
            .stored_text
            .lock()
            .unwrap()
            .get(file_id)
            .cloned()
            .unwrap_or_default();
        Ok(FileContent {
            file_id: file_id.to_string(),
            full_length: content.len(),
            content,
        })
    }

    async fn generate_presentation(
        &self,
        request: &PresentationRequest,
    ) -> Result<GeneratedPresentation> {
        self.enter("generate_presentation")?;
        let title = request.title.clone().unwrap_or_else(|| "Untitled".into());
        Ok(GeneratedPresentation {
            file_path: format!("uploads/presentations/{}.pptx", title.to_lowercase()),
            title,
            slide_count: request.slide_count,
        })
    }

    async fn download_presentation(&self, filename: &str) -> Result<Vec<u8>> {
        self.enter("download_presentation")?;
        Ok(format!("PPTX:{filename}").into_bytes())
    }

    async fn presentation_info(&self, filename: &str) -> Result<serde_json::Value> {
        self.enter("presentation_info")?;
        Ok(serde_json::json!({ "filename": filename, "exists": true }))
    }

    async fn upload_file(&self, file: &FileUpload) -> Result<UploadResponse> {
        self.calls.lock().unwrap().push("upload_file");
        if let Some(delay) = self.upload_delays.get(&file.file_name) {
            tokio::time::sleep(*delay).await;
        }
        if let Some(err) = self.fail_with.lock().unwrap().clone() {
            return Err(err.into());
        }
        if self.failing_uploads.contains(&file.file_name) {
            return Err(RemoteServiceError::new("Unsupported file type", Some(400)).into());
        }

        let n = self.next_id.fetch_add(1, Ordering::SeqCst);
        let file_id = format!("file-{n}");
        let text = String::from_utf8_lossy(&file.bytes).to_string();
        self.stored_text
            .lock()
            .unwrap()
            .insert(file_id.clone(), text.clone());
        Ok(UploadResponse {
            file_id: file_id.clone(),
            filename: format!("{file_id}_{}", file.file_name),
            extracted_text: Some(text),
            file_size: file.bytes.len() as u64,
            file_type: file
                .file_name
                .rsplit_once('.')
                .map(|(_, ext)| format!(".{ext}"))
                .unwrap_or_default(),
        })
    }

    async fn file_info(&self, file_id: &str) -> Result<FileInfo> {
        self.enter("file_info")?;
        Ok(FileInfo {
            file_id: file_id.to_string(),
            filename: file_id.to_string(),
            file_type: ".txt".into(),
            file_size: 0,
            exists: true,
        })
    }

    async fn delete_file(&self, file_id: &str) -> Result<()> {
        self.enter("delete_file")?;
        self.stored_text.lock().unwrap().remove(file_id);
        Ok(())
    }

    async fn supported_file_types(&self) -> Result<SupportedFileTypes> {
        self.enter("supported_file_types")?;
        Ok(SupportedFileTypes {
            supported_types: vec![FileTypeInfo {
                extension: ".txt".into(),
                description: "Plain text files".into(),
                mime_type: "text/plain".into(),
            }],
            max_file_size: 10_485_760,
            max_file_size_mb: 10.0,
        })
    }

    async fn health(&self) -> Result<HealthStatus> {
        self.enter("health")?;
        Ok(HealthStatus {
            status: "healthy".into(),
        })
    }
}
