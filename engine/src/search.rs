//! Best-index search bounded by a hinted position.
//!
//! The hint is an externally predicted position of the best value; the scan
//! trusts it as an upper bound and never looks past it. A hint beyond the
//! end of the sequence clamps to the last index, so an overshooting
//! prediction costs nothing.

use tracing::{debug, instrument};

use corelib::error::DecisionError;

#[derive(Clone, Debug)]
pub struct Search {
    /// Upper bound every value must respect.
    max_value: u64,
}

impl Search {
    pub fn new(max_value: u64) -> Self {
        Self { max_value }
    }

    /// Index of the largest value within `values[0..=min(hint, len - 1)]`;
    /// ties go to the earliest index.
    #[instrument(
        skip(self, values),
        target = "search",
        fields(max_value = self.max_value, len = values.len())
    )]
    pub fn decide(&self, values: &[u64], hint_index: usize) -> Result<usize, DecisionError> {
        if values.is_empty() {
            return Err(DecisionError::InvalidArgument(
                "values must not be empty".to_string(),
            ));
        }

        if let Some(oversized) = values.iter().find(|&&value| value > self.max_value) {
            return Err(DecisionError::InvalidArgument(format!(
                "value {oversized} exceeds max_value {}",
                self.max_value
            )));
        }

        let end = hint_index.min(values.len() - 1);

        let mut best = 0;
        for idx in 1..=end {
            if values[idx] > values[best] {
                best = idx;
            }
        }

        debug!(hint_index, end, best, "prefix scanned");
        Ok(best)
    }
}
