//! Uploaded files: local payloads, the per-page registry, size display.

pub mod registry;
pub mod upload;

pub use registry::{FileRegistry, UploadOutcome, UploadedFile};
pub use upload::FileUpload;

const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Human-readable size: base 1024, at most two decimals, trailing zeros dropped.
pub fn format_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let k = 1024_f64;
    let exp = ((bytes as f64).ln() / k.ln()).floor() as usize;
    let exp = exp.min(SIZE_UNITS.len() - 1);
    let value = bytes as f64 / k.powi(exp as i32);
    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", rounded, SIZE_UNITS[exp])
}
