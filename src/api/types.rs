//! Request and response bodies exchanged with the backend.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{EmptyTextKind, ValidationError};

/// Target tone for a rewrite.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Formal,
    Casual,
    Persuasive,
    Academic,
    Friendly,
}

impl Tone {
    pub const ALL: [Tone; 5] = [
        Tone::Formal,
        Tone::Casual,
        Tone::Persuasive,
        Tone::Academic,
        Tone::Friendly,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Formal => "formal",
            Self::Casual => "casual",
            Self::Persuasive => "persuasive",
            Self::Academic => "academic",
            Self::Friendly => "friendly",
        }
    }
}

impl std::fmt::Display for Tone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Tone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Tone::ALL
            .into_iter()
            .find(|t| t.as_str() == lower)
            .ok_or_else(|| format!("unknown tone {s:?}"))
    }
}

/// One entry of `GET /supported-tones`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToneOption {
    pub value: String,
    pub label: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct ToneList {
    pub tones: Vec<ToneOption>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformRequest {
    pub text: String,
    pub tone: Tone,
    pub additional_instructions: Option<String>,
}

impl TransformRequest {
    pub fn new(
        text: impl Into<String>,
        tone: Tone,
        additional_instructions: Option<String>,
    ) -> Self {
        Self {
            text: text.into(),
            tone,
            additional_instructions: additional_instructions.filter(|s| !s.trim().is_empty()),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.text.trim().is_empty() {
            return Err(ValidationError::EmptyText(EmptyTextKind::Transform));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformResponse {
    #[serde(default)]
    pub original_text: String,
    pub transformed_text: String,
    #[serde(default)]
    pub tone: Option<Tone>,
}

/// Body of `POST /ask-question`. Build through [`crate::qa::ContextSelector`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AskRequest {
    pub text: String,
    pub question: String,
    pub file_id: Option<String>,
}

impl AskRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.question.trim().is_empty() {
            return Err(ValidationError::EmptyQuestion);
        }
        if self.text.trim().is_empty() && self.file_id.is_none() {
            return Err(ValidationError::MissingContext);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerResponse {
    #[serde(default)]
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub context_used: String,
}

/// Stored text preview from `GET /file-content/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileContent {
    pub file_id: String,
    pub content: String,
    #[serde(default)]
    pub full_length: usize,
}

pub const MIN_SLIDES: u32 = 1;
pub const MAX_SLIDES: u32 = 20;
pub const DEFAULT_SLIDES: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresentationRequest {
    pub text: String,
    pub title: Option<String>,
    pub slide_count: u32,
    pub include_speaker_notes: bool,
}

impl PresentationRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.text.trim().is_empty() {
            return Err(ValidationError::EmptyText(EmptyTextKind::Presentation));
        }
        if !(MIN_SLIDES..=MAX_SLIDES).contains(&self.slide_count) {
            return Err(ValidationError::SlideCountOutOfRange {
                count: self.slide_count,
            });
        }
        Ok(())
    }
}

/// A generated deck. Superseded by the next generation, never merged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedPresentation {
    pub title: String,
    pub slide_count: u32,
    /// Server-side path; may use either separator.
    pub file_path: String,
}

impl GeneratedPresentation {
    /// Last component of `file_path`, splitting on `/` and `\`.
    pub fn file_name(&self) -> &str {
        self.file_path
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(&self.file_path)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub file_id: String,
    pub filename: String,
    #[serde(default)]
    pub extracted_text: Option<String>,
    pub file_size: u64,
    pub file_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    pub file_id: String,
    pub filename: String,
    pub file_type: String,
    pub file_size: u64,
    #[serde(default)]
    pub exists: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileTypeInfo {
    pub extension: String,
    pub description: String,
    pub mime_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupportedFileTypes {
    pub supported_types: Vec<FileTypeInfo>,
    #[serde(default)]
    pub max_file_size: u64,
    #[serde(default)]
    pub max_file_size_mb: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tone_parses_case_insensitively() {
        assert_eq!("Academic".parse::<Tone>().unwrap(), Tone::Academic);
        assert!("sarcastic".parse::<Tone>().is_err());
        assert_eq!(serde_json::to_value(Tone::Friendly).unwrap(), "friendly");
    }

    #[test]
    fn absent_optionals_serialize_as_null() {
        let req = TransformRequest::new("hi", Tone::Casual, Some("   ".into()));
        let json = serde_json::to_value(&req).unwrap();
        assert!(json["additional_instructions"].is_null());

        let ask = AskRequest {
            text: "ctx".into(),
            question: "q".into(),
            file_id: None,
        };
        let json = serde_json::to_value(&ask).unwrap();
        assert!(json.get("file_id").unwrap().is_null());
    }

    #[test]
    fn ask_validation_order() {
        let mut ask = AskRequest {
            text: String::new(),
            question: "  ".into(),
            file_id: None,
        };
        assert_eq!(ask.validate(), Err(ValidationError::EmptyQuestion));
        ask.question = "Why?".into();
        assert_eq!(ask.validate(), Err(ValidationError::MissingContext));
        ask.file_id = Some("f1".into());
        assert!(ask.validate().is_ok());
    }

    #[test]
    fn slide_count_bounds() {
        let mut req = PresentationRequest {
            text: "Quarterly results".into(),
            title: None,
            slide_count: 0,
            include_speaker_notes: true,
        };
        assert_eq!(
            req.validate(),
            Err(ValidationError::SlideCountOutOfRange { count: 0 })
        );
        req.slide_count = 20;
        assert!(req.validate().is_ok());
        req.slide_count = 21;
        assert!(req.validate().is_err());
    }

    #[test]
    fn presentation_file_name_handles_both_separators() {
        let mut deck = GeneratedPresentation {
            title: "Q3".into(),
            slide_count: 5,
            file_path: "uploads/presentations/q3.pptx".into(),
        };
        assert_eq!(deck.file_name(), "q3.pptx");
        deck.file_path = r"uploads\presentations\q4.pptx".into();
        assert_eq!(deck.file_name(), "q4.pptx");
        deck.file_path = "bare.pptx".into();
        assert_eq!(deck.file_name(), "bare.pptx");
    }

    #[test]
    fn upload_response_tolerates_missing_text() {
        let json = r#"{"file_id":"abc","filename":"a.pdf","file_size":10,"file_type":".pdf","success":true}"#;
        let resp: UploadResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.extracted_text, None);
    }
}
