//! Embedded catalog of built-in model descriptors.
//!
//! The table is generated by `build.rs` from `assets/models/` and baked into
//! the binary, so lookup allocates nothing and touches no I/O. Entries are
//! addressed by 1-based index; index 0 is the reserved bypass sentinel.

include!(concat!(env!("OUT_DIR"), "/catalog_data.rs"));

/// Number of built-in models.
pub const MODEL_COUNT: usize = 20;

/// Returns the descriptor bytes for a 1-based catalog index.
///
/// Index 0 and indices past the table return `None`; both are defined
/// "no model" outcomes, not errors.
pub fn lookup(index: usize) -> Option<&'static [u8]> {
    if index == 0 || index > MODELS.len() {
        return None;
    }
    Some(MODELS[index - 1])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_table_size() {
        assert_eq!(MODELS.len(), MODEL_COUNT);
    }

    #[test]
    fn test_sentinel_and_out_of_range_absent() {
        assert!(lookup(0).is_none());
        assert!(lookup(MODEL_COUNT + 1).is_none());
        assert!(lookup(usize::MAX).is_none());
    }

    #[test]
    fn test_all_entries_present_and_nonempty() {
        for index in 1..=MODEL_COUNT {
            let data = lookup(index).expect("catalog entry missing");
            assert!(!data.is_empty());
        }
    }
}
