//! Rent-or-buy decisions with a trust-weighted threshold.
//!
//! The classical break-even rule rents until the accumulated rent would have
//! paid for the skis, then buys; that rule is 2-competitive no matter how
//! long the season runs. Blending a predicted season length into the
//! threshold buys earlier or later as the prediction warrants, and the
//! threshold moves continuously in the trust weight, so a slightly wrong
//! prediction only shifts the buy day slightly.

use rand::Rng;
use tracing::{debug, instrument};

use corelib::error::DecisionError;
use corelib::numeric::{ensure_non_negative, ensure_positive, ensure_trust, trust_blend};

/// Deterministic rent-or-buy policy.
///
/// `decide` is a pure function of its arguments and `buy_cost`; callers
/// re-invoke it each day with the current day index.
#[derive(Clone, Debug)]
pub struct SkiRental {
    buy_cost: f64,
}

impl SkiRental {
    pub fn new(buy_cost: f64) -> Result<Self, DecisionError> {
        ensure_positive("buy_cost", buy_cost)?;
        Ok(Self { buy_cost })
    }

    /// True means buy today; false means rent one more day.
    ///
    /// The buy threshold is `trust * predicted_days + (1 - trust) * buy_cost`:
    /// full trust buys exactly when the predicted season would make buying
    /// worthwhile, zero trust falls back to the classical break-even day.
    #[instrument(skip(self), target = "ski_rental", fields(buy_cost = self.buy_cost))]
    pub fn decide(
        &self,
        current_day: u32,
        predicted_days: f64,
        trust: f64,
    ) -> Result<bool, DecisionError> {
        check_day(current_day)?;
        ensure_non_negative("prediction_days", predicted_days)?;
        ensure_trust(trust)?;

        let threshold = trust_blend(trust, predicted_days, self.buy_cost);
        let buy = f64::from(current_day) >= threshold;

        debug!(current_day, threshold, buy, "threshold decision");
        Ok(buy)
    }
}

/// Rent-or-buy with a threshold sampled fresh on every invocation.
///
/// The threshold is drawn uniformly from
/// `[min(y, B) * (1 - trust), max(y, B)]` where `y` is the predicted season
/// length and `B` the buy cost. Rising trust shrinks the lower end of the
/// support toward zero weight on the classical day, so an accurate, fully
/// trusted prediction concentrates the buy day near `y` while zero trust
/// keeps the classical break-even day inside the support.
#[derive(Clone, Debug)]
pub struct RandomizedSkiRental {
    buy_cost: f64,
}

impl RandomizedSkiRental {
    pub fn new(buy_cost: f64) -> Result<Self, DecisionError> {
        ensure_positive("buy_cost", buy_cost)?;
        Ok(Self { buy_cost })
    }

    /// Samples the process RNG. Use [`RandomizedSkiRental::decide_with_rng`]
    /// when reproducibility matters.
    pub fn decide(
        &self,
        current_day: u32,
        predicted_days: f64,
        trust: f64,
    ) -> Result<bool, DecisionError> {
        self.decide_with_rng(&mut rand::thread_rng(), current_day, predicted_days, trust)
    }

    /// Same decision with a caller-supplied randomness source. Identical
    /// seeds give identical outcomes.
    #[instrument(
        skip(self, rng),
        target = "ski_rental",
        fields(buy_cost = self.buy_cost)
    )]
    pub fn decide_with_rng<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        current_day: u32,
        predicted_days: f64,
        trust: f64,
    ) -> Result<bool, DecisionError> {
        check_day(current_day)?;
        ensure_non_negative("prediction_days", predicted_days)?;
        ensure_trust(trust)?;

        let low = predicted_days.min(self.buy_cost) * (1.0 - trust);
        let high = predicted_days.max(self.buy_cost);

        let threshold = if low < high {
            rng.gen_range(low..=high)
        } else {
            low
        };

        let buy = f64::from(current_day) >= threshold;

        debug!(current_day, threshold, buy, "sampled threshold decision");
        Ok(buy)
    }
}

fn check_day(current_day: u32) -> Result<(), DecisionError> {
    if current_day == 0 {
        return Err(DecisionError::InvalidArgument(
            "current_day must be at least 1, got 0".to_string(),
        ));
    }

    Ok(())
}
