//! Model descriptor parsing and validation.
//!
//! Descriptors are RTNeural-style JSON documents as produced by the usual
//! amp-capture training pipelines: an `in_shape` array whose last element is
//! the network input width, optional skip/gain/sample-rate fields, and a
//! `layers` array consumed later by architecture selection.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};

/// Widest network input the runtime accepts: the audio sample plus up to two
/// smoothed parameter inputs.
pub const MAX_INPUT_SIZE: usize = 3;

const DEFAULT_SAMPLERATE: f32 = 48000.0;

/// Validated model descriptor.
///
/// Gains are linear multipliers (the document carries decibels); the raw
/// `layers` array is kept verbatim for the architecture selector.
#[derive(Debug, Clone)]
pub struct Descriptor {
    pub input_size: usize,
    pub input_skip: bool,
    pub input_gain: f32,
    pub output_gain: f32,
    pub samplerate: f32,
    pub layers: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct RawDescriptor {
    in_shape: Vec<Option<i64>>,
    #[serde(default)]
    in_skip: Option<Value>,
    #[serde(default)]
    in_gain: Option<Value>,
    #[serde(default)]
    out_gain: Option<Value>,
    #[serde(default)]
    metadata: Option<Value>,
    #[serde(default)]
    samplerate: Option<Value>,
    #[serde(default)]
    layers: Vec<Value>,
}

impl Descriptor {
    /// Parses and validates a descriptor document.
    ///
    /// Every malformed-structure or out-of-bound condition collapses into
    /// [`Error::Descriptor`]; callers never see finer-grained causes.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let raw: RawDescriptor = serde_json::from_slice(bytes)?;

        let input_size = match raw.in_shape.last() {
            Some(&Some(n)) if n >= 1 => n as usize,
            _ => return Err(Error::Descriptor("in_shape has no usable input width".into())),
        };
        if input_size > MAX_INPUT_SIZE {
            return Err(Error::Descriptor("value for input_size not supported".into()));
        }

        let input_skip = match raw.in_skip.as_ref().and_then(Value::as_f64) {
            Some(skip) if skip > 1.0 => {
                return Err(Error::Descriptor("values for in_skip > 1 are not supported".into()))
            }
            Some(skip) => skip != 0.0,
            None => false,
        };

        let input_gain = gain_or_unity(raw.in_gain.as_ref());
        let output_gain = gain_or_unity(raw.out_gain.as_ref());

        // Resolution order: metadata-scoped rate, then top-level, then default.
        let samplerate = raw
            .metadata
            .as_ref()
            .and_then(|m| m.get("samplerate"))
            .and_then(Value::as_f64)
            .or_else(|| raw.samplerate.as_ref().and_then(Value::as_f64))
            .map(|sr| sr as f32)
            .unwrap_or(DEFAULT_SAMPLERATE);
        if samplerate <= 0.0 {
            return Err(Error::Descriptor(format!("invalid samplerate {samplerate}")));
        }

        Ok(Self {
            input_size,
            input_skip,
            input_gain,
            output_gain,
            samplerate,
            layers: raw.layers,
        })
    }
}

fn gain_or_unity(field: Option<&Value>) -> f32 {
    match field.and_then(Value::as_f64) {
        Some(db) => db_to_linear(db as f32),
        None => 1.0,
    }
}

#[inline]
pub(crate) fn db_to_linear(db: f32) -> f32 {
    10.0f32.powf(db * 0.05)
}
