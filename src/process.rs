//! Real-time entry point.
//!
//! [`apply`] is the boundary the audio callback crosses: no allocation, no
//! locking, no logging, no panicking paths. The caller owns the model
//! exclusively while processing.

use crate::arch::Network;
use crate::descriptor::MAX_INPUT_SIZE;
use crate::model::RuntimeModel;

/// Runs the model over `buffer` in place.
///
/// Per sample: input gain, network inference (with the smoothed parameter
/// values as extra network inputs when the model expects them), optional dry
/// signal add, output gain. A bypass model leaves the buffer untouched.
pub fn apply(model: &mut RuntimeModel, buffer: &mut [f32]) {
    let input_gain = model.input_gain;
    let output_gain = model.output_gain;
    let input_skip = model.input_skip;
    let input_size = model.input_size;

    for sample in buffer.iter_mut() {
        let x = *sample * input_gain;

        let mut frame = [0.0f32; MAX_INPUT_SIZE];
        frame[0] = x;
        if input_size > 1 {
            frame[1] = model.param1.next_sample();
        }
        if input_size > 2 {
            frame[2] = model.param2.next_sample();
        }

        let y = match &mut model.network {
            // No network selected: leave the whole buffer untouched.
            Network::Null => return,
            Network::Lstm(net) => net.forward(&frame[..input_size]),
            Network::Gru(net) => net.forward(&frame[..input_size]),
        };

        *sample = if input_skip { (y + x) * output_gain } else { y * output_gain };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::load_model_from_index;

    fn peak(buffer: &[f32]) -> f32 {
        buffer.iter().fold(0.0f32, |acc, &s| acc.max(s.abs()))
    }

    #[test]
    fn test_bypass_is_passthrough() {
        let mut model = RuntimeModel::bypass();
        let mut buffer = [0.25f32, -0.5, 1.0, 0.0];
        let expected = buffer;
        apply(&mut model, &mut buffer);
        assert_eq!(buffer, expected);
    }

    #[test]
    fn test_silent_input_stays_silent_after_warmup() {
        // Loaded models are warmed up; a silent pass must stay at the
        // steady-state floor.
        for index in [1, 12, 16] {
            let mut model = load_model_from_index(index).unwrap();
            let mut buffer = vec![0.0f32; 512];
            apply(&mut model, &mut buffer);
            assert!(
                peak(&buffer) <= 1e-4,
                "index {index} produced {} on silence",
                peak(&buffer)
            );
        }
    }

    #[test]
    fn test_nonsilent_input_produces_output() {
        let mut model = load_model_from_index(1).unwrap();
        let mut buffer: Vec<f32> = (0..256).map(|i| (i as f32 * 0.05).sin() * 0.5).collect();
        apply(&mut model, &mut buffer);
        assert!(peak(&buffer) > 0.0);
        assert!(buffer.iter().all(|s| s.is_finite()));
    }

    #[test]
    fn test_empty_buffer_is_fine() {
        let mut model = load_model_from_index(1).unwrap();
        apply(&mut model, &mut []);
    }

    #[test]
    fn test_smoothers_advance_for_conditioned_models() {
        // Index 10 is a 3-input model; both parameter smoothers feed it.
        let mut model = load_model_from_index(10).unwrap();
        model.set_param1_target(1.0);
        let mut buffer = vec![0.0f32; 64];
        apply(&mut model, &mut buffer);
        let current = model.param1().current();
        assert!(current > 0.0 && current < 1.0);
    }
}
