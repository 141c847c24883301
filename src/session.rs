//! Model session lifecycle and the safe inference entry point.
//!
//! A [`ModelSession`] is the state behind the opaque handle the host holds:
//! the engine session, the resolved preset, and a non-reentrant guard. The
//! FFI layer and the probe binary both drive this API; nothing here is
//! boundary-specific.

use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Instant;

use tracing::{info, warn};
use uuid::Uuid;

use crate::config::Preset;
use crate::engine::executor::{EngineError, EngineSession};
use crate::engine::labels;
use crate::engine::loader;
use crate::engine::output::{Alternative, Recognition};
use crate::error::{BridgeError, Result};
use crate::tensor::FrameView;

/// Magic tag stamped on live sessions. Checked under debug assertions when a
/// raw pointer re-enters the boundary, and poisoned on destroy, so
/// use-after-destroy trips in non-release builds. Best-effort only.
pub const SESSION_TAG: u32 = 0xB71D_6E5A;

/// Tag value written into a session as it is destroyed.
pub const SESSION_POISON: u32 = 0xDEAD_D0DE;

/// Count of sessions currently alive. Paired create/drop accounting for
/// leak checks in tests.
static LIVE_SESSIONS: AtomicUsize = AtomicUsize::new(0);

/// Number of sessions that have been created and not yet dropped.
pub fn live_session_count() -> usize {
    LIVE_SESSIONS.load(Ordering::SeqCst)
}

/// A loaded model + tokenizer + preset, exclusively owned by one host reference.
#[derive(Debug)]
pub struct ModelSession {
    /// Liveness tag, see [`SESSION_TAG`].
    pub(crate) tag: u32,

    engine: EngineSession,
    preset: Preset,

    /// Set while an inference call is in flight on this session.
    busy: AtomicBool,
}

/// Clears the busy flag when an inference call leaves scope, error or not.
struct InflightGuard<'a>(&'a AtomicBool);

impl Drop for InflightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl ModelSession {
    /// Load model and tokenizer under the named preset.
    ///
    /// Every failure path returns before any partially initialized session
    /// escapes, so there is nothing for the caller to clean up on error.
    pub fn create(model_path: &Path, tokenizer_path: &Path, preset_name: &str) -> Result<Self> {
        let preset = Preset::resolve(preset_name)?;
        let model_info = loader::probe(model_path, tokenizer_path)?;

        let engine = EngineSession::load(model_info, &preset)
            .map_err(|e| BridgeError::model_init(e.to_string()))?;

        LIVE_SESSIONS.fetch_add(1, Ordering::SeqCst);
        info!(
            model = %model_path.display(),
            preset = preset.name,
            "Model session created"
        );

        Ok(Self {
            tag: SESSION_TAG,
            engine,
            preset,
            busy: AtomicBool::new(false),
        })
    }

    /// The preset this session was created with.
    pub fn preset(&self) -> &Preset {
        &self.preset
    }

    /// Run one synchronous inference pass.
    ///
    /// The buffer is borrowed for the duration of the call and validated
    /// against `width * height * channels` before any element is read. A
    /// second call arriving while one is in flight fails with a busy error
    /// instead of corrupting engine state.
    pub fn infer(
        &self,
        data: &[f32],
        width: i32,
        height: i32,
        label_hint: Option<&str>,
    ) -> Result<Recognition> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            warn!("Rejected concurrent inference on one session");
            return Err(BridgeError::HandleBusy);
        }
        let _inflight = InflightGuard(&self.busy);

        let frame = FrameView::new(data, width, height, self.preset.channels)?;
        let hint = label_hint.map(str::trim).filter(|h| !h.is_empty());

        let request_id = Uuid::new_v4();
        let started = Instant::now();

        let output = self.engine.infer(frame, hint).map_err(|e| match e {
            EngineError::Init(msg) => BridgeError::model_init(msg),
            EngineError::Execution(msg) => BridgeError::inference(msg),
        })?;

        let latency_ms = started.elapsed().as_secs_f64() * 1000.0;
        let recognition = self.rank(output.scores, latency_ms);

        info!(
            %request_id,
            label = recognition.label,
            confidence = recognition.confidence,
            latency_ms,
            width,
            height,
            hinted = hint.is_some(),
            "Inference complete"
        );

        Ok(recognition)
    }

    /// Select the top label and up to `top_k - 1` alternatives from raw scores.
    fn rank(&self, scores: Vec<f32>, latency_ms: f64) -> Recognition {
        let mut order: Vec<usize> = (0..scores.len()).collect();
        order.sort_by(|&a, &b| {
            scores[b]
                .partial_cmp(&scores[a])
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let top = order[0];
        let alternatives = order[1..]
            .iter()
            .take(self.preset.top_k.saturating_sub(1))
            .map(|&i| Alternative {
                label: labels::label_at(i).to_string(),
                confidence: Recognition::clamp_confidence(scores[i] as f64),
            })
            .collect();

        Recognition {
            label: labels::label_at(top).to_string(),
            confidence: Recognition::clamp_confidence(scores[top] as f64),
            preset: self.preset.name.clone(),
            latency_ms,
            alternatives,
        }
    }
}

impl Drop for ModelSession {
    fn drop(&mut self) {
        LIVE_SESSIONS.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn fixtures(dir: &tempfile::TempDir) -> (std::path::PathBuf, std::path::PathBuf) {
        let model = dir.path().join("model.pte");
        let tok = dir.path().join("tokenizer.bin");
        std::fs::File::create(&model)
            .unwrap()
            .write_all(b"weights")
            .unwrap();
        std::fs::File::create(&tok)
            .unwrap()
            .write_all(b"vocab")
            .unwrap();
        (model, tok)
    }

    #[test]
    fn test_create_and_infer() {
        let dir = tempfile::tempdir().unwrap();
        let (model, tok) = fixtures(&dir);

        let session = ModelSession::create(&model, &tok, "fast").unwrap();
        let buf = vec![0.5f32; 224 * 224 * 3];
        let rec = session.infer(&buf, 224, 224, None).unwrap();

        assert!(!rec.label.is_empty());
        assert!((0.0..=1.0).contains(&rec.confidence));
        assert_eq!(rec.preset, "fast");
        // top_k = 3 for "fast": top label plus at most two alternatives.
        assert!(rec.alternatives.len() <= 2);
    }

    #[test]
    fn test_create_unknown_preset() {
        let dir = tempfile::tempdir().unwrap();
        let (model, tok) = fixtures(&dir);

        let err = ModelSession::create(&model, &tok, "warp").unwrap_err();
        assert!(matches!(err, BridgeError::UnknownPreset { .. }));
    }

    #[test]
    fn test_infer_size_mismatch_before_read() {
        let dir = tempfile::tempdir().unwrap();
        let (model, tok) = fixtures(&dir);

        let session = ModelSession::create(&model, &tok, "fast").unwrap();
        let buf = vec![0.5f32; 100];
        let err = session.infer(&buf, 224, 224, None).unwrap_err();
        assert_eq!(
            err.to_string(),
            "input size mismatch: expected 150528, got 100"
        );
    }

    #[test]
    fn test_hint_steers_top_label() {
        let dir = tempfile::tempdir().unwrap();
        let (model, tok) = fixtures(&dir);

        let session = ModelSession::create(&model, &tok, "accurate").unwrap();
        let buf = vec![0.01f32; 8 * 8 * 3];
        let rec = session.infer(&buf, 8, 8, Some("toothbrush")).unwrap();
        assert_eq!(rec.label, "toothbrush");
    }

    #[test]
    fn test_busy_flag_clears_after_error() {
        let dir = tempfile::tempdir().unwrap();
        let (model, tok) = fixtures(&dir);

        let session = ModelSession::create(&model, &tok, "fast").unwrap();
        let bad = vec![0.5f32; 10];
        assert!(session.infer(&bad, 224, 224, None).is_err());

        // The in-flight guard must release even on the error path.
        let good = vec![0.5f32; 224 * 224 * 3];
        assert!(session.infer(&good, 224, 224, None).is_ok());
    }
}
