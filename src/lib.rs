//! TextIQ client: typed gateway to the TextIQ backend, uploaded-file
//! registry, Q&A context selection and conversation log, and per-tool
//! page controllers.

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod files;
pub mod pages;
pub mod qa;
