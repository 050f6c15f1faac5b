//! Real-time neural amp model runtime.
//!
//! Loads serialized neural-network audio effect descriptors, builds runtime
//! models from a closed set of supported topologies, and processes audio
//! through them inside a hard real-time callback.
//!
//! The crate splits cleanly across the real-time boundary:
//!
//! - **Control path** ([`load_model_from_index`], [`RuntimeModel::from_bytes`]):
//!   catalog lookup, descriptor parsing, architecture selection, weight
//!   population, smoother setup, and a discarded silent warm-up pass. May
//!   allocate and log; runs off the audio thread.
//! - **Audio path** ([`apply`]): zero allocation, zero I/O, no locks, bounded
//!   time. Only ever sees models the loader finished.
//!
//! # Example
//!
//! ```
//! use neural_amp_rt::{apply, load_model_from_index};
//!
//! // Control thread: build the model, then publish it to the audio thread.
//! let mut model = load_model_from_index(1).expect("built-in model");
//!
//! // Audio callback: process in place.
//! let mut buffer = [0.0f32; 128];
//! apply(&mut model, &mut buffer);
//! ```

mod error;
pub use error::{Error, Result};

pub mod catalog;

mod descriptor;
pub use descriptor::{Descriptor, MAX_INPUT_SIZE};

mod nn;

mod arch;
pub use arch::{GruNetwork, LstmNetwork, Network, MAX_HIDDEN_SIZE};

mod smooth;
pub use smooth::ParamSmoother;

mod model;
pub use model::{load_model_from_index, RuntimeModel};

mod process;
pub use process::apply;
