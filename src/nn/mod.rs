//! Per-sample inference kernels.
//!
//! Plain `f32` matrix-vector loops over flattened weight arrays in keras
//! layout (kernel `[in][gates*hidden]`, recurrent `[hidden][gates*hidden]`).
//! All scratch space is allocated at construction; the forward paths are
//! allocation-free so they can run inside the audio callback.

mod dense;
mod gru;
mod lstm;

pub(crate) use dense::Dense;
pub(crate) use gru::Gru;
pub(crate) use lstm::Lstm;

#[inline]
pub(crate) fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}
