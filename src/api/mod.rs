//! Gateway to the TextIQ backend.
//!
//! One method per backend capability. Callers hold an `Arc<dyn ApiGateway>`
//! built once at startup; `HttpGateway` is the reqwest implementation.

pub mod http;
#[cfg(test)]
pub(crate) mod stub;
pub mod types;

pub use http::HttpGateway;
pub use types::*;

use async_trait::async_trait;

use crate::error::Result;
use crate::files::FileUpload;

/// Request/response contract with the backend. No retries, no caching.
#[async_trait]
pub trait ApiGateway: Send + Sync {
    /// `POST /transform-text`
    async fn transform_text(&self, request: &TransformRequest) -> Result<TransformResponse>;

    /// `GET /supported-tones`
    async fn supported_tones(&self) -> Result<Vec<ToneOption>>;

    /// `POST /ask-question`
    async fn ask_question(&self, request: &AskRequest) -> Result<AnswerResponse>;

    /// `GET /file-content/{file_id}`
    async fn file_content(&self, file_id: &str) -> Result<FileContent>;

    /// `POST /generate-presentation`
    async fn generate_presentation(
        &self,
        request: &PresentationRequest,
    ) -> Result<GeneratedPresentation>;

    /// `GET /download-presentation/{filename}`, raw bytes.
    async fn download_presentation(&self, filename: &str) -> Result<Vec<u8>>;

    /// `GET /presentation-info/{filename}`. Shape is backend-defined.
    async fn presentation_info(&self, filename: &str) -> Result<serde_json::Value>;

    /// `POST /upload-file` as multipart field `file`.
    async fn upload_file(&self, file: &FileUpload) -> Result<UploadResponse>;

    /// `GET /file-info/{file_id}`
    async fn file_info(&self, file_id: &str) -> Result<FileInfo>;

    /// `DELETE /delete-file/{file_id}`
    async fn delete_file(&self, file_id: &str) -> Result<()>;

    /// `GET /supported-file-types`
    async fn supported_file_types(&self) -> Result<SupportedFileTypes>;

    /// `GET /health`
    async fn health(&self) -> Result<HealthStatus>;
}
