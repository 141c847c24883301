//! The engine session: load/infer over the vendor inference runtime.
//!
//! This module defines the contract the real on-device runtime presents and
//! the session type the rest of the crate drives. The actual runtime is
//! compiled and linked by build.rs.
//!
//! For the initial implementation, the executor is a deterministic stand-in
//! that scores frames from their sample statistics, so every boundary
//! property is testable without shipping model weights.

use half::f16;
use thiserror::Error;
use tracing::debug;

use crate::config::{Precision, Preset};
use crate::engine::labels;
use crate::engine::loader::ModelInfo;
use crate::tensor::FrameView;

/// Failures raised by the engine itself.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The runtime rejected the model/tokenizer/preset combination.
    #[error("{0}")]
    Init(String),

    /// Inference started but did not complete.
    #[error("{0}")]
    Execution(String),
}

/// Raw engine output: one activation per vocabulary label, each in [0, 1].
#[derive(Debug, Clone)]
pub struct EngineOutput {
    /// Activation per label, indexed like [`labels::VOCABULARY`].
    pub scores: Vec<f32>,
}

/// A loaded model + tokenizer + preset, ready to serve inference.
///
/// In a real build this wraps the runtime's opaque session pointer; the
/// deterministic executor keeps only the probed metadata.
#[derive(Debug)]
pub struct EngineSession {
    info: ModelInfo,
    precision: Precision,
}

impl EngineSession {
    /// Initialize the runtime session for probed model resources.
    pub fn load(info: ModelInfo, preset: &Preset) -> Result<Self, EngineError> {
        // The real runtime parses the model graph here and fails on
        // incompatible formats or unavailable acceleration backends.
        debug!(
            format = info.format,
            precision = %preset.precision,
            backend = %preset.backend,
            "Engine session initialized"
        );
        Ok(Self {
            info,
            precision: preset.precision,
        })
    }

    /// Metadata the session was loaded from.
    pub fn info(&self) -> &ModelInfo {
        &self.info
    }

    /// Run one synchronous inference pass over a frame.
    ///
    /// The frame is borrowed for the duration of this call only; nothing is
    /// retained. A matching hint biases the corresponding label's activation.
    pub fn infer(
        &self,
        frame: FrameView<'_>,
        label_hint: Option<&str>,
    ) -> Result<EngineOutput, EngineError> {
        let (mean, energy) = self.accumulate(frame)?;

        let n = labels::VOCABULARY.len();
        let mut scores = Vec::with_capacity(n);
        for i in 0..n {
            // Deterministic pseudo-activation from the frame statistics.
            let phase = mean * 7.3 + energy * 3.1 + (i as f32) * 0.61;
            scores.push(phase.sin() * 0.5 + 0.5);
        }

        if let Some(hint) = label_hint {
            if let Some(idx) = labels::match_hint(hint) {
                // A matched hint narrows the search: the hinted label is
                // pulled toward full activation and the rest are damped
                // below it.
                for (i, score) in scores.iter_mut().enumerate() {
                    if i == idx {
                        *score = *score * 0.3 + 0.7;
                    } else {
                        *score *= 0.5;
                    }
                }
                debug!(hint, label = labels::label_at(idx), "Hint matched vocabulary");
            } else {
                debug!(hint, "Hint matched no vocabulary entry");
            }
        }

        Ok(EngineOutput { scores })
    }

    /// Accumulate mean and energy over the frame at the session's precision.
    fn accumulate(&self, frame: FrameView<'_>) -> Result<(f32, f32), EngineError> {
        let mut sum = 0.0f64;
        let mut sum_sq = 0.0f64;
        for &sample in frame.data() {
            if !sample.is_finite() {
                return Err(EngineError::Execution(
                    "non-finite sample in input frame".to_string(),
                ));
            }
            let v = match self.precision {
                Precision::Fp32 => sample,
                Precision::Fp16 => f16::from_f32(sample).to_f32(),
            };
            sum += v as f64;
            sum_sq += (v as f64) * (v as f64);
        }
        let len = frame.data().len() as f64;
        let mean = sum / len;
        let energy = (sum_sq / len).sqrt();
        Ok((mean as f32, energy as f32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::loader::ModelInfo;

    fn session(preset_name: &str) -> EngineSession {
        let info = ModelInfo {
            model_bytes: 1024,
            tokenizer_bytes: 64,
            format: "pte".to_string(),
        };
        let preset = Preset::resolve(preset_name).unwrap();
        EngineSession::load(info, &preset).unwrap()
    }

    #[test]
    fn test_infer_is_deterministic() {
        let session = session("accurate");
        let buf = vec![0.25f32; 8 * 8 * 3];
        let frame = FrameView::new(&buf, 8, 8, 3).unwrap();

        let a = session.infer(frame, None).unwrap();
        let b = session.infer(frame, None).unwrap();
        assert_eq!(a.scores, b.scores);
        assert_eq!(a.scores.len(), labels::VOCABULARY.len());
    }

    #[test]
    fn test_scores_are_activations() {
        let session = session("fast");
        let buf: Vec<f32> = (0..4 * 4 * 3).map(|i| (i as f32) / 48.0).collect();
        let frame = FrameView::new(&buf, 4, 4, 3).unwrap();

        let out = session.infer(frame, None).unwrap();
        assert!(out.scores.iter().all(|&s| (0.0..=1.0).contains(&s)));
    }

    #[test]
    fn test_hint_lifts_label() {
        let session = session("balanced");
        let buf = vec![0.5f32; 4 * 4 * 3];
        let frame = FrameView::new(&buf, 4, 4, 3).unwrap();

        let plain = session.infer(frame, None).unwrap();
        let hinted = session.infer(frame, Some("coffee cup")).unwrap();

        let idx = labels::match_hint("coffee cup").unwrap();
        assert!(hinted.scores[idx] > plain.scores[idx]);
        assert!(hinted.scores[idx] >= 0.7);
    }

    #[test]
    fn test_unmatched_hint_changes_nothing() {
        let session = session("balanced");
        let buf = vec![0.5f32; 4 * 4 * 3];
        let frame = FrameView::new(&buf, 4, 4, 3).unwrap();

        let plain = session.infer(frame, None).unwrap();
        let hinted = session.infer(frame, Some("submarine")).unwrap();
        assert_eq!(plain.scores, hinted.scores);
    }

    #[test]
    fn test_non_finite_input_is_execution_error() {
        let session = session("fast");
        let mut buf = vec![0.5f32; 4 * 4 * 3];
        buf[7] = f32::NAN;
        let frame = FrameView::new(&buf, 4, 4, 3).unwrap();

        let err = session.infer(frame, None).unwrap_err();
        assert!(matches!(err, EngineError::Execution(_)));
    }

    #[test]
    fn test_fp16_differs_from_fp32() {
        // Precision must actually flow through accumulation.
        let buf: Vec<f32> = (0..4 * 4 * 3).map(|i| 0.1 + (i as f32) * 1e-4).collect();
        let frame = FrameView::new(&buf, 4, 4, 3).unwrap();

        let fp32 = session("accurate").infer(frame, None).unwrap();
        let fp16 = session("balanced").infer(frame, None).unwrap();
        assert_ne!(fp32.scores, fp16.scores);
    }
}
