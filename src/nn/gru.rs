//! Single-layer GRU cell, keras `reset_after` weight layout.

use super::sigmoid;
use crate::error::{Error, Result};

/// GRU cell advancing one sample at a time.
///
/// Gate blocks follow keras column order `z, r, h`, each of width `hidden`.
/// The bias carries two rows (input-side and recurrent-side), matching keras
/// `reset_after=True` exports.
#[derive(Debug, Clone)]
pub(crate) struct Gru {
    in_size: usize,
    hidden: usize,
    kernel: Vec<f32>,    // [in][3*hidden]
    recurrent: Vec<f32>, // [hidden][3*hidden]
    bias_in: Vec<f32>,   // [3*hidden]
    bias_rec: Vec<f32>,  // [3*hidden]
    h: Vec<f32>,
    gates_in: Vec<f32>,  // scratch, [3*hidden]
    gates_rec: Vec<f32>, // scratch, [3*hidden]
}

impl Gru {
    pub fn new(
        in_size: usize,
        hidden: usize,
        kernel: Vec<Vec<f32>>,
        recurrent: Vec<Vec<f32>>,
        bias: Vec<Vec<f32>>,
    ) -> Result<Self> {
        let gates = 3 * hidden;
        if kernel.len() != in_size || kernel.iter().any(|row| row.len() != gates) {
            return Err(Error::Architecture(format!(
                "gru kernel shape mismatch, expected {}x{}",
                in_size, gates
            )));
        }
        if recurrent.len() != hidden || recurrent.iter().any(|row| row.len() != gates) {
            return Err(Error::Architecture(format!(
                "gru recurrent shape mismatch, expected {}x{}",
                hidden, gates
            )));
        }
        if bias.len() != 2 || bias.iter().any(|row| row.len() != gates) {
            return Err(Error::Architecture(format!(
                "gru bias shape mismatch, expected 2x{}",
                gates
            )));
        }
        let mut bias = bias.into_iter();
        let bias_in = bias.next().unwrap_or_default();
        let bias_rec = bias.next().unwrap_or_default();
        Ok(Self {
            in_size,
            hidden,
            kernel: kernel.into_iter().flatten().collect(),
            recurrent: recurrent.into_iter().flatten().collect(),
            bias_in,
            bias_rec,
            h: vec![0.0; hidden],
            gates_in: vec![0.0; gates],
            gates_rec: vec![0.0; gates],
        })
    }

    pub fn reset(&mut self) {
        self.h.fill(0.0);
    }

    /// Advances one sample; the new hidden state is readable via
    /// [`state`](Gru::state).
    #[inline]
    pub fn forward(&mut self, input: &[f32]) {
        debug_assert_eq!(input.len(), self.in_size);
        let n = 3 * self.hidden;

        self.gates_in.copy_from_slice(&self.bias_in);
        for (i, &x) in input.iter().take(self.in_size).enumerate() {
            let row = &self.kernel[i * n..(i + 1) * n];
            for (g, &w) in self.gates_in.iter_mut().zip(row) {
                *g += x * w;
            }
        }
        self.gates_rec.copy_from_slice(&self.bias_rec);
        for (k, &hk) in self.h.iter().enumerate() {
            let row = &self.recurrent[k * n..(k + 1) * n];
            for (g, &w) in self.gates_rec.iter_mut().zip(row) {
                *g += hk * w;
            }
        }

        let hidden = self.hidden;
        for u in 0..hidden {
            let z = sigmoid(self.gates_in[u] + self.gates_rec[u]);
            let r = sigmoid(self.gates_in[hidden + u] + self.gates_rec[hidden + u]);
            let cand = (self.gates_in[2 * hidden + u] + r * self.gates_rec[2 * hidden + u]).tanh();
            self.h[u] = z * self.h[u] + (1.0 - z) * cand;
        }
    }

    #[inline]
    pub fn state(&self) -> &[f32] {
        &self.h
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_cell() -> Gru {
        // H=1, in=1, gate order z,r,h; only the candidate weight is nonzero
        Gru::new(
            1,
            1,
            vec![vec![0.0, 0.0, 1.0]],
            vec![vec![0.0, 0.0, 0.0]],
            vec![vec![0.0; 3], vec![0.0; 3]],
        )
        .unwrap()
    }

    #[test]
    fn test_single_step() {
        // z = 0.5, candidate = tanh(1), h = (1 - z) * tanh(1) = 0.380797
        let mut cell = unit_cell();
        cell.forward(&[1.0]);
        assert_relative_eq!(cell.state()[0], 0.380_797, epsilon = 1e-5);
    }

    #[test]
    fn test_reset_zeroes_state() {
        let mut cell = unit_cell();
        cell.forward(&[1.0]);
        cell.reset();
        assert_eq!(cell.state()[0], 0.0);
    }

    #[test]
    fn test_quiescent_on_silence() {
        let mut cell = unit_cell();
        for _ in 0..64 {
            cell.forward(&[0.0]);
        }
        assert_eq!(cell.state()[0], 0.0);
    }

    #[test]
    fn test_rejects_single_row_bias() {
        assert!(Gru::new(1, 1, vec![vec![0.0; 3]], vec![vec![0.0; 3]], vec![vec![0.0; 3]]).is_err());
    }
}
