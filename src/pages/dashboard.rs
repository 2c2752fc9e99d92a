//! Landing page: tool catalogue and backend health.

use serde::Serialize;
use tracing::warn;

use super::PageContext;
use crate::api::HealthStatus;
use crate::error::Result;

/// A tool offered on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Feature {
    pub title: &'static str,
    pub description: &'static str,
    pub route: &'static str,
    pub examples: [&'static str; 3],
}

pub const FEATURES: [Feature; 3] = [
    Feature {
        title: "Tone & Style Rewriter",
        description: "Transform your text into any tone - formal, casual, persuasive, academic, or friendly.",
        route: "/transform",
        examples: ["Business emails", "Academic papers", "Social media posts"],
    },
    Feature {
        title: "Interactive Q&A",
        description: "Ask questions about your content and get intelligent, contextual answers.",
        route: "/qa",
        examples: ["Document analysis", "Content summarization", "Key insights"],
    },
    Feature {
        title: "Presentation Generator",
        description: "Convert text into polished PowerPoint presentations with layouts and speaker notes.",
        route: "/presentation",
        examples: ["Meeting slides", "Training materials", "Project reports"],
    },
];

pub struct Dashboard {
    ctx: PageContext,
}

impl Dashboard {
    pub fn new(ctx: PageContext) -> Self {
        Self { ctx }
    }

    pub fn features(&self) -> &'static [Feature] {
        &FEATURES
    }

    /// Probe `GET /health`. An unhealthy answer is logged but not an error.
    pub async fn check_health(&self) -> Result<HealthStatus> {
        let status = self.ctx.gateway.health().await?;
        if !status.is_healthy() {
            warn!(status = %status.status, "Backend reports degraded health");
        }
        Ok(status)
    }
}
