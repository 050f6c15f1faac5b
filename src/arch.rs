//! Architecture selection over the closed set of supported topologies.
//!
//! A descriptor either matches exactly one variant or selection fails; there
//! is no "unknown but usable" outcome. The [`Network::Null`] sentinel marks
//! "no model selected" and is handled explicitly everywhere the enum is
//! matched, so the audio path never dereferences an unselected variant.

use serde::Deserialize;
use serde_json::Value;

use crate::descriptor::Descriptor;
use crate::error::{Error, Result};
use crate::nn::{Dense, Gru, Lstm};

/// Largest supported recurrent width. Bounds worst-case per-sample cost on
/// the audio thread.
pub const MAX_HIDDEN_SIZE: usize = 32;

/// Closed set of supported network topologies.
#[derive(Debug, Clone)]
pub enum Network {
    /// No model selected. The audio path treats this as a pass-through.
    Null,
    Lstm(LstmNetwork),
    Gru(GruNetwork),
}

/// Single LSTM layer feeding a width-1 dense head.
#[derive(Debug, Clone)]
pub struct LstmNetwork {
    cell: Lstm,
    head: Dense,
}

/// Single GRU layer feeding a width-1 dense head.
#[derive(Debug, Clone)]
pub struct GruNetwork {
    cell: Gru,
    head: Dense,
}

#[derive(Debug, Deserialize)]
struct RawLayer {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    shape: Vec<Option<i64>>,
    #[serde(default)]
    weights: Vec<Value>,
}

impl Network {
    /// Matches the descriptor's layer stack against the supported topologies
    /// and populates the winning variant's weights. Recurrent state of the
    /// returned network is zeroed.
    pub fn select(descriptor: &Descriptor) -> Result<Self> {
        let [recurrent_layer, dense_layer] = match descriptor.layers.as_slice() {
            [a, b] => [raw_layer(a)?, raw_layer(b)?],
            _ => return Err(Error::Architecture("no known model architecture".into())),
        };

        let hidden = layer_width(&recurrent_layer)?;
        if hidden > MAX_HIDDEN_SIZE {
            return Err(Error::Architecture("no known model architecture".into()));
        }
        if dense_layer.kind != "dense" || layer_width(&dense_layer)? != 1 {
            return Err(Error::Architecture("no known model architecture".into()));
        }

        let head = {
            let [kernel, bias] = two_weights(&dense_layer)?;
            Dense::new(hidden, 1, matrix(kernel)?, vector(bias)?)?
        };

        let network = match recurrent_layer.kind.as_str() {
            "lstm" => {
                let [kernel, recurrent, bias] = three_weights(&recurrent_layer)?;
                let cell = Lstm::new(
                    descriptor.input_size,
                    hidden,
                    matrix(kernel)?,
                    matrix(recurrent)?,
                    vector(bias)?,
                )?;
                Network::Lstm(LstmNetwork { cell, head })
            }
            "gru" => {
                let [kernel, recurrent, bias] = three_weights(&recurrent_layer)?;
                let cell = Gru::new(
                    descriptor.input_size,
                    hidden,
                    matrix(kernel)?,
                    matrix(recurrent)?,
                    matrix(bias)?,
                )?;
                Network::Gru(GruNetwork { cell, head })
            }
            _ => return Err(Error::Architecture("no known model architecture".into())),
        };

        Ok(network)
    }

    /// Zeroes all recurrent state.
    pub fn reset(&mut self) {
        match self {
            Network::Null => {}
            Network::Lstm(net) => net.cell.reset(),
            Network::Gru(net) => net.cell.reset(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Network::Null)
    }
}

impl LstmNetwork {
    #[inline]
    pub(crate) fn forward(&mut self, frame: &[f32]) -> f32 {
        self.cell.forward(frame);
        let mut out = [0.0f32];
        self.head.forward(self.cell.state(), &mut out);
        out[0]
    }
}

impl GruNetwork {
    #[inline]
    pub(crate) fn forward(&mut self, frame: &[f32]) -> f32 {
        self.cell.forward(frame);
        let mut out = [0.0f32];
        self.head.forward(self.cell.state(), &mut out);
        out[0]
    }
}

fn raw_layer(value: &Value) -> Result<RawLayer> {
    serde_json::from_value(value.clone())
        .map_err(|e| Error::Architecture(format!("malformed layer: {e}")))
}

fn layer_width(layer: &RawLayer) -> Result<usize> {
    match layer.shape.last() {
        Some(&Some(n)) if n >= 1 => Ok(n as usize),
        _ => Err(Error::Architecture(format!(
            "layer '{}' has no usable output width",
            layer.kind
        ))),
    }
}

fn two_weights(layer: &RawLayer) -> Result<[&Value; 2]> {
    match layer.weights.as_slice() {
        [a, b] => Ok([a, b]),
        _ => Err(Error::Architecture(format!(
            "layer '{}' carries {} weight arrays, expected 2",
            layer.kind,
            layer.weights.len()
        ))),
    }
}

fn three_weights(layer: &RawLayer) -> Result<[&Value; 3]> {
    match layer.weights.as_slice() {
        [a, b, c] => Ok([a, b, c]),
        _ => Err(Error::Architecture(format!(
            "layer '{}' carries {} weight arrays, expected 3",
            layer.kind,
            layer.weights.len()
        ))),
    }
}

fn matrix(value: &Value) -> Result<Vec<Vec<f32>>> {
    serde_json::from_value(value.clone())
        .map_err(|e| Error::Architecture(format!("malformed weight matrix: {e}")))
}

fn vector(value: &Value) -> Result<Vec<f32>> {
    serde_json::from_value(value.clone())
        .map_err(|e| Error::Architecture(format!("malformed weight vector: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(json: &str) -> Descriptor {
        Descriptor::parse(json.as_bytes()).unwrap()
    }

    fn lstm_doc() -> String {
        // H=1 LSTM plus width-1 dense head
        r#"{
            "in_shape": [null, null, 1],
            "layers": [
                {"type": "lstm", "shape": [null, null, 1],
                 "weights": [[[0.0, 0.0, 1.0, 0.0]], [[0.0, 0.0, 0.0, 0.0]], [0.0, 0.0, 0.0, 0.0]]},
                {"type": "dense", "shape": [null, null, 1], "weights": [[[1.0]], [0.0]]}
            ]
        }"#
        .to_string()
    }

    #[test]
    fn test_selects_lstm() {
        let net = Network::select(&descriptor(&lstm_doc())).unwrap();
        assert!(matches!(net, Network::Lstm(_)));
        assert!(!net.is_null());
    }

    #[test]
    fn test_selects_gru() {
        let doc = r#"{
            "in_shape": [null, null, 1],
            "layers": [
                {"type": "gru", "shape": [null, null, 1],
                 "weights": [[[0.0, 0.0, 1.0]], [[0.0, 0.0, 0.0]], [[0.0, 0.0, 0.0], [0.0, 0.0, 0.0]]]},
                {"type": "dense", "shape": [null, null, 1], "weights": [[[1.0]], [0.0]]}
            ]
        }"#;
        assert!(matches!(
            Network::select(&descriptor(doc)).unwrap(),
            Network::Gru(_)
        ));
    }

    #[test]
    fn test_rejects_unknown_layer_type() {
        let doc = lstm_doc().replace("\"lstm\"", "\"conv1d\"");
        assert!(matches!(
            Network::select(&descriptor(&doc)).unwrap_err(),
            Error::Architecture(_)
        ));
    }

    #[test]
    fn test_rejects_empty_layer_stack() {
        let err = Network::select(&descriptor(r#"{"in_shape": [1]}"#)).unwrap_err();
        assert!(matches!(err, Error::Architecture(_)));
    }

    #[test]
    fn test_rejects_truncated_weights() {
        // Drop the LSTM bias array
        let doc = lstm_doc().replace(", [0.0, 0.0, 0.0, 0.0]]", "]");
        assert!(matches!(
            Network::select(&descriptor(&doc)).unwrap_err(),
            Error::Architecture(_)
        ));
    }

    #[test]
    fn test_rejects_oversized_hidden_width() {
        let doc = r#"{
            "in_shape": [null, null, 1],
            "layers": [
                {"type": "lstm", "shape": [null, null, 99],
                 "weights": [[[0.0, 0.0, 1.0, 0.0]], [[0.0, 0.0, 0.0, 0.0]], [0.0, 0.0, 0.0, 0.0]]},
                {"type": "dense", "shape": [null, null, 1], "weights": [[[1.0]], [0.0]]}
            ]
        }"#;
        assert!(matches!(
            Network::select(&descriptor(doc)).unwrap_err(),
            Error::Architecture(_)
        ));
    }

    #[test]
    fn test_forward_matches_cell_plus_head() {
        let mut net = Network::select(&descriptor(&lstm_doc())).unwrap();
        if let Network::Lstm(net) = &mut net {
            let y = net.forward(&[1.0]);
            assert!((y - 0.181_700).abs() < 1e-5);
        } else {
            panic!("expected lstm variant");
        }
    }
}
