//! Asset import: Wavefront `.obj` models and a content-addressed model store.
//!
//! Models are parsed once, registered by the SHA-256 of their source text,
//! and instantiated into kernel Things on demand.

mod obj;
mod store;

pub use obj::{ObjFace, ObjFaceVertex, ObjFile, ObjModel};
pub use store::{ModelId, ModelStore};

use thingview_kernel::KernelError;

/// Errors from asset operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("line {line}: index {index} out of range ({len} declared)")]
    IndexOutOfRange { line: usize, index: i64, len: usize },
    #[error("invalid model geometry: {0}")]
    Kernel(#[from] KernelError),
    #[error("model contains no geometry")]
    NoGeometry,
    #[error("model not found: {0:?}")]
    NotFound(ModelId),
}

pub fn crate_info() -> &'static str {
    "thingview-assets v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("assets"));
    }
}
