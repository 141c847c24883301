//! Preset configuration for the inference engine.
//!
//! A preset is a named profile selecting precision, acceleration backend, and
//! output shaping. The set of names is fixed by the engine; resolution is
//! strict: an unrecognized name fails instead of silently falling back.

use serde::{Deserialize, Serialize};

use crate::error::{BridgeError, Result};

/// Numeric precision the engine runs at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Precision {
    /// Full 32-bit floats.
    Fp32,
    /// Half precision, trades accuracy for speed and memory.
    Fp16,
}

impl std::fmt::Display for Precision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Precision::Fp32 => write!(f, "fp32"),
            Precision::Fp16 => write!(f, "fp16"),
        }
    }
}

/// Acceleration backend preference passed through to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Backend {
    /// Portable CPU execution.
    Cpu,
    /// Platform accelerator (Metal/CoreML on iOS, NNAPI on Android) when present.
    Accelerated,
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Backend::Cpu => write!(f, "cpu"),
            Backend::Accelerated => write!(f, "accelerated"),
        }
    }
}

/// A resolved engine configuration profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preset {
    /// Preset name as the host passed it.
    pub name: String,

    /// Numeric precision.
    pub precision: Precision,

    /// Backend preference.
    pub backend: Backend,

    /// Channels per pixel the engine expects (RGB = 3).
    pub channels: usize,

    /// Number of alternative labels reported alongside the top result.
    pub top_k: usize,

    /// Results below this confidence are still reported; the host decides
    /// whether to fall back to another recognizer.
    pub confidence_floor: f64,
}

/// Names accepted by [`Preset::resolve`].
pub const KNOWN_PRESETS: [&str; 3] = ["fast", "balanced", "accurate"];

impl Preset {
    /// Resolve a preset name to its profile.
    ///
    /// Unrecognized names fail with an error listing the accepted names.
    pub fn resolve(name: &str) -> Result<Preset> {
        match name {
            "fast" => Ok(Preset {
                name: name.to_string(),
                precision: Precision::Fp16,
                backend: Backend::Accelerated,
                channels: 3,
                top_k: 3,
                confidence_floor: 0.45,
            }),
            "balanced" => Ok(Preset {
                name: name.to_string(),
                precision: Precision::Fp16,
                backend: Backend::Cpu,
                channels: 3,
                top_k: 5,
                confidence_floor: 0.45,
            }),
            "accurate" => Ok(Preset {
                name: name.to_string(),
                precision: Precision::Fp32,
                backend: Backend::Cpu,
                channels: 3,
                top_k: 5,
                confidence_floor: 0.30,
            }),
            other => Err(BridgeError::UnknownPreset {
                name: other.to_string(),
                known: KNOWN_PRESETS.join(", "),
            }),
        }
    }

    /// Expected element count for a frame of the given geometry.
    pub fn expected_elements(&self, width: i64, height: i64) -> Option<i64> {
        width
            .checked_mul(height)
            .and_then(|px| px.checked_mul(self.channels as i64))
    }
}
