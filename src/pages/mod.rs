//! Per-tool page controllers.
//!
//! Each page owns its transient input state and a loading flag, and is the
//! only place user actions originate. Outcomes are reported through a
//! [`Notifier`]; failures never discard previously displayed results.

pub mod dashboard;
pub mod presentation;
pub mod qa;
pub mod transform;
pub mod upload;

pub use dashboard::{Dashboard, Feature};
pub use presentation::PresentationPage;
pub use qa::QaPage;
pub use transform::TransformPage;
pub use upload::UploadPage;

use std::sync::Arc;

use tracing::debug;

use crate::api::ApiGateway;
use crate::error::Result;

/// Transient user-facing notifications.
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}

/// Logs notifications and echoes them to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn success(&self, message: &str) {
        debug!(message, "notify success");
        eprintln!("✅ {message}");
    }

    fn error(&self, message: &str) {
        debug!(message, "notify error");
        eprintln!("❌ {message}");
    }
}

/// Shared collaborators handed to every page.
#[derive(Clone)]
pub struct PageContext {
    pub gateway: Arc<dyn ApiGateway>,
    pub notifier: Arc<dyn Notifier>,
}

impl PageContext {
    pub fn new(gateway: Arc<dyn ApiGateway>, notifier: Arc<dyn Notifier>) -> Self {
        Self { gateway, notifier }
    }

    /// Notify the outcome and pass it through.
    fn report<T>(&self, result: Result<T>, success: &str) -> Result<T> {
        match &result {
            Ok(_) => self.notifier.success(success),
            Err(e) => self.notifier.error(&e.to_string()),
        }
        result
    }
}

/// Raises a loading flag; lowers it on drop, whatever the outcome.
struct LoadingGuard<'a>(&'a mut bool);

impl<'a> LoadingGuard<'a> {
    fn raise(flag: &'a mut bool) -> Self {
        *flag = true;
        Self(flag)
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}
