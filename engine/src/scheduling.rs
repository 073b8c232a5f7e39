//! List scheduling onto identical machines, ordered by predicted length.
//!
//! Jobs are placed in order of predicted length onto whichever machine is
//! currently least loaded, while the loads accumulate the *actual* lengths.
//! A wrong prediction therefore only costs balance quality: every job is
//! still placed greedily against the true loads, so degradation in the
//! prediction error is gradual rather than a cliff.

use tracing::{debug, instrument};

use corelib::error::DecisionError;

#[derive(Clone, Debug)]
pub struct Scheduling {
    num_machines: usize,
}

impl Scheduling {
    pub fn new(num_machines: usize) -> Result<Self, DecisionError> {
        if num_machines == 0 {
            return Err(DecisionError::InvalidArgument(
                "num_machines must be at least 1, got 0".to_string(),
            ));
        }

        Ok(Self { num_machines })
    }

    /// Assign every job to a machine; the result is indexed by original job
    /// position and every value lies in `0..num_machines`.
    ///
    /// Jobs are processed in predicted-length order (ties keep the original
    /// job order); each goes to the least-loaded machine, ties to the lowest
    /// machine index.
    #[instrument(
        skip(self, actual_lengths, predicted_lengths),
        target = "scheduling",
        fields(num_machines = self.num_machines, jobs = actual_lengths.len())
    )]
    pub fn decide(
        &self,
        actual_lengths: &[u64],
        predicted_lengths: &[u64],
    ) -> Result<Vec<usize>, DecisionError> {
        if actual_lengths.len() != predicted_lengths.len() {
            return Err(DecisionError::InvalidArgument(format!(
                "job_lengths has {} entries but prediction_job_lengths has {}",
                actual_lengths.len(),
                predicted_lengths.len()
            )));
        }

        let mut order: Vec<usize> = (0..actual_lengths.len()).collect();
        order.sort_by_key(|&job| predicted_lengths[job]);

        let mut loads = vec![0u64; self.num_machines];
        let mut assignments = vec![0usize; actual_lengths.len()];

        for job in order {
            let machine = argmin_load(&loads);
            loads[machine] = loads[machine].saturating_add(actual_lengths[job]);
            assignments[job] = machine;
        }

        debug!(
            makespan = loads.iter().copied().max().unwrap_or(0),
            "jobs assigned"
        );
        Ok(assignments)
    }
}

/// Lowest-indexed machine among those with minimal load.
fn argmin_load(loads: &[u64]) -> usize {
    let mut best = 0;

    for (machine, &load) in loads.iter().enumerate().skip(1) {
        if load < loads[best] {
            best = machine;
        }
    }

    best
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(1000))]
        #[test]
        fn assignment_invariants_hold(
            num_machines in 1usize..6,
            jobs in prop::collection::vec((0u64..100, 0u64..100), 0..20),
        ) {
            let actual: Vec<u64> = jobs.iter().map(|(a, _)| *a).collect();
            let predicted: Vec<u64> = jobs.iter().map(|(_, p)| *p).collect();

            let scheduling = Scheduling::new(num_machines).unwrap();
            let assignments = scheduling.decide(&actual, &predicted).unwrap();

            // --- INVARIANT 1: one assignment per job, all in range ---
            prop_assert_eq!(assignments.len(), actual.len());
            for &machine in &assignments {
                prop_assert!(machine < num_machines);
            }

            // --- INVARIANT 2: replaying the predicted order greedily
            //     reproduces the exact placement ---
            let mut order: Vec<usize> = (0..actual.len()).collect();
            order.sort_by_key(|&job| predicted[job]);

            let mut loads = vec![0u64; num_machines];
            for job in order {
                let expected = loads
                    .iter()
                    .enumerate()
                    .min_by_key(|&(machine, &load)| (load, machine))
                    .map(|(machine, _)| machine)
                    .unwrap();

                prop_assert_eq!(assignments[job], expected);
                loads[expected] += actual[job];
            }
        }

        /// The decision is a pure function of its inputs.
        #[test]
        fn decide_is_deterministic(
            num_machines in 1usize..6,
            jobs in prop::collection::vec((0u64..100, 0u64..100), 0..20),
        ) {
            let actual: Vec<u64> = jobs.iter().map(|(a, _)| *a).collect();
            let predicted: Vec<u64> = jobs.iter().map(|(_, p)| *p).collect();

            let scheduling = Scheduling::new(num_machines).unwrap();

            prop_assert_eq!(
                scheduling.decide(&actual, &predicted).unwrap(),
                scheduling.decide(&actual, &predicted).unwrap()
            );
        }
    }
}
