//! reqwest-backed gateway.

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, error, info};

use super::ApiGateway;
use super::types::{
    AnswerResponse, AskRequest, FileContent, FileInfo, GeneratedPresentation, HealthStatus,
    PresentationRequest, SupportedFileTypes, ToneList, ToneOption, TransformRequest,
    TransformResponse, UploadResponse,
};
use crate::config::ClientConfig;
use crate::error::{ConfigError, Error, RemoteServiceError, Result};
use crate::files::FileUpload;

/// HTTPS client for the TextIQ backend.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: Url,
}

impl HttpGateway {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| ConfigError::InvalidValue {
            key: "base_url".into(),
            message: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidValue {
                key: "base_url".into(),
                message: format!("{} cannot carry a path", config.base_url),
            }
            .into());
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| ConfigError::InvalidValue {
                key: "http_client".into(),
                message: format!("Could not build reqwest client: {e}"),
            })?;

        info!(base_url = %base_url, timeout = ?config.timeout, "Gateway client ready");
        Ok(Self { client, base_url })
    }

    /// Base URL plus percent-encoded path segments.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Checked in `new`: the base URL can carry a path.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        self.client.request(method, self.endpoint(segments))
    }

    /// Send a request; any non-2xx status becomes a `RemoteServiceError`.
    async fn dispatch(&self, builder: RequestBuilder, fallback: &str) -> Result<Response> {
        let request = builder.build().map_err(|e| {
            error!(error = %e, "Failed to build request");
            RemoteServiceError::transport(fallback)
        })?;

        let method = request.method().clone();
        let path = request.url().path().to_string();
        debug!(%method, %path, "Making request");

        let response = self.client.execute(request).await.map_err(|e| {
            error!(%method, %path, error = %e, "API transport error");
            RemoteServiceError::transport(fallback)
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let detail = extract_detail(&body);
        error!(
            %method,
            %path,
            status = status.as_u16(),
            detail = detail.as_deref().unwrap_or(body.as_str()),
            "API error"
        );
        Err(RemoteServiceError::from_response(status.as_u16(), detail, fallback).into())
    }

    async fn json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        fallback: &str,
    ) -> Result<T> {
        let response = self.dispatch(builder, fallback).await?;
        let status = response.status().as_u16();
        response.json::<T>().await.map_err(|e| {
            error!(status, error = %e, "Malformed response body");
            Error::from(RemoteServiceError::new(fallback, Some(status)))
        })
    }
}

/// The string `detail` field of a FastAPI error body, if there is one.
///
/// Request-validation failures carry an array there; those fall back to
/// the caller's generic message.
pub(crate) fn extract_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("detail")?
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[async_trait]
impl ApiGateway for HttpGateway {
    async fn transform_text(&self, request: &TransformRequest) -> Result<TransformResponse> {
        request.validate()?;
        let builder = self.request(Method::POST, &["transform-text"]).json(request);
        self.json(builder, "Failed to transform text").await
    }

    async fn supported_tones(&self) -> Result<Vec<ToneOption>> {
        let builder = self.request(Method::GET, &["supported-tones"]);
        let list: ToneList = self.json(builder, "Failed to load tone options").await?;
        Ok(list.tones)
    }

    async fn ask_question(&self, request: &AskRequest) -> Result<AnswerResponse> {
        request.validate()?;
        let builder = self.request(Method::POST, &["ask-question"]).json(request);
        self.json(builder, "Failed to get answer").await
    }

    async fn file_content(&self, file_id: &str) -> Result<FileContent> {
        let builder = self.request(Method::GET, &["file-content", file_id]);
        self.json(builder, "Failed to load file content").await
    }

    async fn generate_presentation(
        &self,
        request: &PresentationRequest,
    ) -> Result<GeneratedPresentation> {
        request.validate()?;
        let builder = self
            .request(Method::POST, &["generate-presentation"])
            .json(request);
        self.json(builder, "Failed to generate presentation").await
    }

    async fn download_presentation(&self, filename: &str) -> Result<Vec<u8>> {
        const FALLBACK: &str = "Failed to download presentation";
        let builder = self.request(Method::GET, &["download-presentation", filename]);
        let response = self.dispatch(builder, FALLBACK).await?;
        let bytes = response.bytes().await.map_err(|e| {
            error!(filename, error = %e, "Download interrupted");
            RemoteServiceError::transport(FALLBACK)
        })?;
        Ok(bytes.to_vec())
    }

    async fn presentation_info(&self, filename: &str) -> Result<serde_json::Value> {
        let builder = self.request(Method::GET, &["presentation-info", filename]);
        self.json(builder, "Failed to get presentation info").await
    }

    async fn upload_file(&self, file: &FileUpload) -> Result<UploadResponse> {
        file.validate()?;
        let fallback = format!("Failed to upload {}", file.file_name);

        let part = Part::bytes(file.bytes.clone())
            .file_name(file.file_name.clone())
            .mime_str(&file.mime_type)
            .map_err(|e| {
                error!(mime = %file.mime_type, error = %e, "Invalid MIME type");
                RemoteServiceError::transport(&fallback)
            })?;
        let form = Form::new().part("file", part);

        let builder = self.request(Method::POST, &["upload-file"]).multipart(form);
        self.json(builder, &fallback).await
    }

    async fn file_info(&self, file_id: &str) -> Result<FileInfo> {
        let builder = self.request(Method::GET, &["file-info", file_id]);
        self.json(builder, "Failed to get file info").await
    }

    async fn delete_file(&self, file_id: &str) -> Result<()> {
        let builder = self.request(Method::DELETE, &["delete-file", file_id]);
        self.dispatch(builder, "Failed to delete file").await?;
        Ok(())
    }

    async fn supported_file_types(&self) -> Result<SupportedFileTypes> {
        let builder = self.request(Method::GET, &["supported-file-types"]);
        self.json(builder, "Failed to load supported file types").await
    }

    async fn health(&self) -> Result<HealthStatus> {
        let builder = self.request(Method::GET, &["health"]);
        self.json(builder, "Backend health check failed").await
    }
}
