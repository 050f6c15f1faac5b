//! Runtime model assembly and the loading pipeline.
//!
//! Loading runs entirely on a control thread: fetch the descriptor bytes,
//! parse, select an architecture, attach scalar metadata and smoothers, then
//! warm the network up with a discarded silent pass. Only a fully-ready model
//! is ever returned; every failure is logged and collapses to `None` with
//! nothing partially constructed left behind.

use crate::arch::Network;
use crate::catalog;
use crate::descriptor::Descriptor;
use crate::error::Result;
use crate::process;
use crate::smooth::ParamSmoother;

/// Length of the discarded silent pass run at load time.
const WARMUP_SAMPLES: usize = 2048;

/// Time constant for both parameter smoothers, in seconds.
const PARAM_SMOOTH_SECS: f32 = 0.1;

/// A fully-populated, warmed-up model ready for the real-time path.
///
/// Constructed exclusively by the loader; ownership transfers to the caller,
/// which publishes it to the audio thread. After publication the audio thread
/// has exclusive access to the recurrent and smoother state.
#[derive(Debug, Clone)]
pub struct RuntimeModel {
    pub(crate) network: Network,
    pub(crate) input_skip: bool,
    pub(crate) input_gain: f32,
    pub(crate) output_gain: f32,
    pub(crate) samplerate: f32,
    pub(crate) input_size: usize,
    pub(crate) param1: ParamSmoother,
    pub(crate) param2: ParamSmoother,
}

impl RuntimeModel {
    /// Builds a model from raw descriptor bytes.
    ///
    /// Parse, selection, and population failures surface as errors; on
    /// success the returned model has zeroed recurrent state and has already
    /// been warmed up.
    pub fn from_bytes(bytes: &[u8]) -> Result<Box<Self>> {
        let descriptor = Descriptor::parse(bytes)?;
        tracing::debug!(
            input_size = descriptor.input_size,
            samplerate = descriptor.samplerate,
            "descriptor parsed"
        );

        let mut network = Network::select(&descriptor)?;
        network.reset();

        let mut param1 = ParamSmoother::new(descriptor.samplerate, PARAM_SMOOTH_SECS);
        param1.set_target(0.0);
        param1.snap_to_target();
        let mut param2 = ParamSmoother::new(descriptor.samplerate, PARAM_SMOOTH_SECS);
        param2.set_target(0.0);
        param2.snap_to_target();

        let mut model = Box::new(Self {
            network,
            input_skip: descriptor.input_skip,
            input_gain: descriptor.input_gain,
            output_gain: descriptor.output_gain,
            samplerate: descriptor.samplerate,
            input_size: descriptor.input_size,
            param1,
            param2,
        });

        model.warm_up();
        Ok(model)
    }

    /// A model with no network selected. The audio path passes input through
    /// untouched.
    pub fn bypass() -> Self {
        Self {
            network: Network::Null,
            input_skip: false,
            input_gain: 1.0,
            output_gain: 1.0,
            samplerate: 48000.0,
            input_size: 1,
            param1: ParamSmoother::new(48000.0, PARAM_SMOOTH_SECS),
            param2: ParamSmoother::new(48000.0, PARAM_SMOOTH_SECS),
        }
    }

    /// Runs a discarded silent pass so stateful internals settle before the
    /// first real audio, avoiding an audible click on first use.
    fn warm_up(&mut self) {
        let mut scratch = vec![0.0f32; WARMUP_SAMPLES];
        process::apply(self, &mut scratch);
    }

    pub fn input_size(&self) -> usize {
        self.input_size
    }

    pub fn samplerate(&self) -> f32 {
        self.samplerate
    }

    pub fn input_skip(&self) -> bool {
        self.input_skip
    }

    pub fn input_gain(&self) -> f32 {
        self.input_gain
    }

    pub fn output_gain(&self) -> f32 {
        self.output_gain
    }

    pub fn is_bypass(&self) -> bool {
        self.network.is_null()
    }

    /// Sets the first parameter target; ramped by the smoother on the audio
    /// thread.
    pub fn set_param1_target(&mut self, value: f32) {
        self.param1.set_target(value);
    }

    /// Sets the second parameter target; ramped by the smoother on the audio
    /// thread.
    pub fn set_param2_target(&mut self, value: f32) {
        self.param2.set_target(value);
    }

    pub fn param1(&self) -> &ParamSmoother {
        &self.param1
    }

    pub fn param2(&self) -> &ParamSmoother {
        &self.param2
    }
}

/// Loads a built-in model by 1-based catalog index.
///
/// Index 0 and indices past the catalog are defined "no model" outcomes and
/// return `None` without logging. Load failures are logged and also return
/// `None`; repeated calls with the same index are deterministic. Ownership of
/// the returned model transfers to the caller.
pub fn load_model_from_index(model_index: usize) -> Option<Box<RuntimeModel>> {
    let bytes = catalog::lookup(model_index)?;

    match RuntimeModel::from_bytes(bytes) {
        Ok(model) => {
            tracing::info!(
                model_index,
                input_size = model.input_size(),
                "successfully loaded built-in model"
            );
            Some(model)
        }
        Err(e) => {
            tracing::error!(model_index, "unable to load model: {e}");
            None
        }
    }
}
