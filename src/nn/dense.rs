//! Fully-connected output head.

use crate::error::{Error, Result};

/// Dense layer with keras kernel layout `[in][out]`, flattened row-major.
#[derive(Debug, Clone)]
pub(crate) struct Dense {
    in_size: usize,
    out_size: usize,
    kernel: Vec<f32>,
    bias: Vec<f32>,
}

impl Dense {
    pub fn new(in_size: usize, out_size: usize, kernel: Vec<Vec<f32>>, bias: Vec<f32>) -> Result<Self> {
        if kernel.len() != in_size || kernel.iter().any(|row| row.len() != out_size) {
            return Err(Error::Architecture(format!(
                "dense kernel shape mismatch, expected {}x{}",
                in_size, out_size
            )));
        }
        if bias.len() != out_size {
            return Err(Error::Architecture(format!(
                "dense bias length {} != {}",
                bias.len(),
                out_size
            )));
        }
        Ok(Self {
            in_size,
            out_size,
            kernel: kernel.into_iter().flatten().collect(),
            bias,
        })
    }

    #[inline]
    pub fn forward(&self, input: &[f32], output: &mut [f32]) {
        debug_assert_eq!(input.len(), self.in_size);
        debug_assert_eq!(output.len(), self.out_size);
        output.copy_from_slice(&self.bias);
        for (i, &x) in input.iter().take(self.in_size).enumerate() {
            let row = &self.kernel[i * self.out_size..(i + 1) * self.out_size];
            for (o, &w) in row.iter().enumerate() {
                output[o] += x * w;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_forward() {
        let dense = Dense::new(2, 1, vec![vec![0.5], vec![-0.25]], vec![0.1]).unwrap();
        let mut out = [0.0f32];
        dense.forward(&[1.0, 2.0], &mut out);
        assert_relative_eq!(out[0], 0.1, epsilon = 1e-6);
    }

    #[test]
    fn test_rejects_bad_kernel_shape() {
        assert!(Dense::new(2, 1, vec![vec![0.5]], vec![0.1]).is_err());
        assert!(Dense::new(1, 1, vec![vec![0.5, 0.5]], vec![0.1]).is_err());
    }

    #[test]
    fn test_rejects_bad_bias_length() {
        assert!(Dense::new(1, 1, vec![vec![0.5]], vec![0.1, 0.2]).is_err());
    }
}
