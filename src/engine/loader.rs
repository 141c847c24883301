//! Model and tokenizer file probing.
//!
//! Checks the resources a session needs before engine initialization and
//! extracts lightweight metadata for logging and the probe tool. The engine
//! itself owns the real parse; this layer only answers "is there something
//! readable here" with a precise diagnostic when there is not.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{BridgeError, Result};

/// Metadata gathered from the model and tokenizer files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Model file size in bytes.
    pub model_bytes: u64,

    /// Tokenizer file size in bytes.
    pub tokenizer_bytes: u64,

    /// Model format inferred from the file extension.
    pub format: String,
}

/// Infer a model format name from the file extension.
fn infer_format(path: &Path) -> String {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => ext.to_lowercase(),
        None => "unknown".to_string(),
    }
}

/// Probe the model and tokenizer paths.
///
/// Fails with a distinct error per resource: missing/unreadable paths map to
/// not-found, an empty model file maps to an initialization failure (the
/// engine cannot parse zero bytes, so surfacing it before engine init gives
/// the host a clearer message).
pub fn probe(model_path: &Path, tokenizer_path: &Path) -> Result<ModelInfo> {
    if !model_path.is_file() {
        return Err(BridgeError::ModelNotFound(model_path.to_path_buf()));
    }
    if !tokenizer_path.is_file() {
        return Err(BridgeError::TokenizerNotFound(tokenizer_path.to_path_buf()));
    }

    let model_meta = std::fs::metadata(model_path)?;
    let tokenizer_meta = std::fs::metadata(tokenizer_path)?;

    if model_meta.len() == 0 {
        return Err(BridgeError::model_init(format!(
            "model file is empty: {}",
            model_path.display()
        )));
    }

    let info = ModelInfo {
        model_bytes: model_meta.len(),
        tokenizer_bytes: tokenizer_meta.len(),
        format: infer_format(model_path),
    };

    info!(
        model = %model_path.display(),
        model_bytes = info.model_bytes,
        tokenizer_bytes = info.tokenizer_bytes,
        format = info.format,
        "Probed model resources"
    );

    Ok(info)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn fixture(dir: &tempfile::TempDir, name: &str, contents: &[u8]) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(contents).unwrap();
        path
    }

    #[test]
    fn test_probe_valid_files() {
        let dir = tempfile::tempdir().unwrap();
        let model = fixture(&dir, "model.pte", b"weights");
        let tok = fixture(&dir, "tokenizer.bin", b"vocab");

        let info = probe(&model, &tok).unwrap();
        assert_eq!(info.model_bytes, 7);
        assert_eq!(info.tokenizer_bytes, 5);
        assert_eq!(info.format, "pte");
    }

    #[test]
    fn test_probe_missing_model() {
        let dir = tempfile::tempdir().unwrap();
        let tok = fixture(&dir, "tokenizer.bin", b"vocab");

        let err = probe(&dir.path().join("missing.pte"), &tok).unwrap_err();
        assert!(err.to_string().starts_with("model file not found"));
    }

    #[test]
    fn test_probe_missing_tokenizer() {
        let dir = tempfile::tempdir().unwrap();
        let model = fixture(&dir, "model.pte", b"weights");

        let err = probe(&model, &dir.path().join("missing.bin")).unwrap_err();
        assert!(err.to_string().starts_with("tokenizer file not found"));
    }

    #[test]
    fn test_probe_empty_model_is_init_failure() {
        let dir = tempfile::tempdir().unwrap();
        let model = fixture(&dir, "model.pte", b"");
        let tok = fixture(&dir, "tokenizer.bin", b"vocab");

        let err = probe(&model, &tok).unwrap_err();
        assert!(err.to_string().starts_with("model initialization failed"));
    }

    #[test]
    fn test_format_without_extension() {
        let dir = tempfile::tempdir().unwrap();
        let model = fixture(&dir, "model", b"weights");
        let tok = fixture(&dir, "tokenizer.bin", b"vocab");

        let info = probe(&model, &tok).unwrap();
        assert_eq!(info.format, "unknown");
    }
}
