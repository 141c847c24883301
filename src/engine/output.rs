//! Recognition result payload.
//!
//! The success string returned across the boundary is the JSON encoding of
//! [`Recognition`]. The host parses `confidence` to decide whether to accept
//! the on-device result, so it must always be a finite value in [0, 1].

use serde::{Deserialize, Serialize};

/// A single labeled alternative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alternative {
    /// Canonical label.
    pub label: String,

    /// Confidence in [0, 1].
    pub confidence: f64,
}

/// The full recognition result for one frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recognition {
    /// Top label.
    pub label: String,

    /// Confidence of the top label, in [0, 1].
    pub confidence: f64,

    /// Preset the session was created with.
    pub preset: String,

    /// Wall-clock inference latency in milliseconds.
    pub latency_ms: f64,

    /// Runner-up labels, best first. At most `top_k - 1` entries.
    pub alternatives: Vec<Alternative>,
}

impl Recognition {
    /// Clamp a raw score into a valid confidence.
    pub fn clamp_confidence(raw: f64) -> f64 {
        if raw.is_finite() {
            raw.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Encode as the JSON string handed to the host.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
