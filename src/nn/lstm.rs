//! Single-layer LSTM cell, keras weight layout.

use super::sigmoid;
use crate::error::{Error, Result};

/// LSTM cell advancing one sample at a time.
///
/// Gate blocks follow keras column order `i, f, g, o`, each of width
/// `hidden`. Recurrent state (`h`, `c`) starts zeroed and is reset to zero by
/// [`reset`](Lstm::reset).
#[derive(Debug, Clone)]
pub(crate) struct Lstm {
    in_size: usize,
    hidden: usize,
    kernel: Vec<f32>,    // [in][4*hidden]
    recurrent: Vec<f32>, // [hidden][4*hidden]
    bias: Vec<f32>,      // [4*hidden]
    h: Vec<f32>,
    c: Vec<f32>,
    gates: Vec<f32>, // scratch, [4*hidden]
}

impl Lstm {
    pub fn new(
        in_size: usize,
        hidden: usize,
        kernel: Vec<Vec<f32>>,
        recurrent: Vec<Vec<f32>>,
        bias: Vec<f32>,
    ) -> Result<Self> {
        let gates = 4 * hidden;
        if kernel.len() != in_size || kernel.iter().any(|row| row.len() != gates) {
            return Err(Error::Architecture(format!(
                "lstm kernel shape mismatch, expected {}x{}",
                in_size, gates
            )));
        }
        if recurrent.len() != hidden || recurrent.iter().any(|row| row.len() != gates) {
            return Err(Error::Architecture(format!(
                "lstm recurrent shape mismatch, expected {}x{}",
                hidden, gates
            )));
        }
        if bias.len() != gates {
            return Err(Error::Architecture(format!(
                "lstm bias length {} != {}",
                bias.len(),
                gates
            )));
        }
        Ok(Self {
            in_size,
            hidden,
            kernel: kernel.into_iter().flatten().collect(),
            recurrent: recurrent.into_iter().flatten().collect(),
            bias,
            h: vec![0.0; hidden],
            c: vec![0.0; hidden],
            gates: vec![0.0; gates],
        })
    }

    pub fn reset(&mut self) {
        self.h.fill(0.0);
        self.c.fill(0.0);
    }

    /// Advances one sample; the new hidden state is readable via
    /// [`state`](Lstm::state).
    #[inline]
    pub fn forward(&mut self, input: &[f32]) {
        debug_assert_eq!(input.len(), self.in_size);
        let n = 4 * self.hidden;

        self.gates.copy_from_slice(&self.bias);
        for (i, &x) in input.iter().take(self.in_size).enumerate() {
            let row = &self.kernel[i * n..(i + 1) * n];
            for (g, &w) in self.gates.iter_mut().zip(row) {
                *g += x * w;
            }
        }
        for (k, &hk) in self.h.iter().enumerate() {
            let row = &self.recurrent[k * n..(k + 1) * n];
            for (g, &w) in self.gates.iter_mut().zip(row) {
                *g += hk * w;
            }
        }

        let hidden = self.hidden;
        for u in 0..hidden {
            let i = sigmoid(self.gates[u]);
            let f = sigmoid(self.gates[hidden + u]);
            let g = self.gates[2 * hidden + u].tanh();
            let o = sigmoid(self.gates[3 * hidden + u]);
            self.c[u] = f * self.c[u] + i * g;
            self.h[u] = o * self.c[u].tanh();
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

    fn unit_cell() -> Lstm {
        // H=1, in=1, gate order i,f,g,o; only the candidate weight is nonzero
        Lstm::new(
            1,
            1,
            vec![vec![0.0, 0.0, 1.0, 0.0]],
            vec![vec![0.0, 0.0, 0.0, 0.0]],
            vec![0.0; 4],
        )
        .unwrap()
    }

    #[test]
    fn test_single_step() {
        // i = f = o = sigmoid(0) = 0.5, g = tanh(1)
        // c = 0.5 * tanh(1) = 0.380797, h = 0.5 * tanh(c) = 0.181700
        let mut cell = unit_cell();
        cell.forward(&[1.0]);
        assert_relative_eq!(cell.state()[0], 0.181_700, epsilon = 1e-5);
    }

    #[test]
    fn test_reset_zeroes_state() {
        let mut cell = unit_cell();
        cell.forward(&[1.0]);
        assert!(cell.state()[0] != 0.0);
        cell.reset();
        assert_eq!(cell.state()[0], 0.0);
    }

    #[test]
    fn test_quiescent_on_silence() {
        // Zero candidate bias keeps the cell exactly at rest for zero input.
        let mut cell = unit_cell();
        for _ in 0..64 {
            cell.forward(&[0.0]);
        }
        assert_eq!(cell.state()[0], 0.0);
    }

    #[test]
    fn test_rejects_truncated_weights() {
        assert!(Lstm::new(1, 1, vec![vec![0.0; 3]], vec![vec![0.0; 4]], vec![0.0; 4]).is_err());
        assert!(Lstm::new(1, 1, vec![vec![0.0; 4]], vec![], vec![0.0; 4]).is_err());
        assert!(Lstm::new(1, 1, vec![vec![0.0; 4]], vec![vec![0.0; 4]], vec![0.0; 3]).is_err());
    }
}
