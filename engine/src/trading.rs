//! One-way conversion triggered by a trust-blended reservation price.
//!
//! The caller watches a price stream and treats the first `true` as an
//! irrevocable commitment; the primitive itself is stateless and judges one
//! tick at a time.

use tracing::{debug, instrument};

use corelib::error::DecisionError;
use corelib::numeric::{ensure_non_negative, ensure_positive, ensure_trust, trust_blend};

#[derive(Clone, Debug)]
pub struct OnewayTrading {
    /// Classical reservation floor: with zero trust, any price at or above
    /// this converts immediately.
    buy_price: f64,
}

impl OnewayTrading {
    pub fn new(buy_price: f64) -> Result<Self, DecisionError> {
        ensure_positive("buy_price", buy_price)?;
        Ok(Self { buy_price })
    }

    /// True means convert at the current price; false means keep waiting.
    ///
    /// The reservation threshold is
    /// `trust * predicted_peak + (1 - trust) * buy_price`: full trust holds
    /// out for the predicted peak, zero trust takes the configured floor.
    #[instrument(skip(self), target = "trading", fields(buy_price = self.buy_price))]
    pub fn decide(
        &self,
        current_price: f64,
        predicted_peak: f64,
        trust: f64,
    ) -> Result<bool, DecisionError> {
        ensure_non_negative("current_price", current_price)?;
        ensure_non_negative("prediction_price", predicted_peak)?;
        ensure_trust(trust)?;

        let reservation = trust_blend(trust, predicted_peak, self.buy_price);
        let convert = current_price >= reservation;

        debug!(current_price, reservation, convert, "reservation decision");
        Ok(convert)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_floor() {
        assert!(OnewayTrading::new(0.0).is_err());
        assert!(OnewayTrading::new(-5.0).is_err());
    }

    #[test]
    fn full_trust_holds_out_for_the_predicted_peak() {
        let ot = OnewayTrading::new(100.0).unwrap();

        assert!(ot.decide(110.0, 110.0, 1.0).unwrap());
        assert!(!ot.decide(109.0, 110.0, 1.0).unwrap());
    }

    #[test]
    fn zero_trust_converts_at_the_floor() {
        let ot = OnewayTrading::new(100.0).unwrap();

        // The predicted peak is ignored entirely.
        assert!(ot.decide(100.0, 500.0, 0.0).unwrap());
        assert!(!ot.decide(99.9, 500.0, 0.0).unwrap());
    }

    #[test]
    fn partial_trust_blends_the_threshold() {
        let ot = OnewayTrading::new(100.0).unwrap();

        // Threshold = 0.5 * 120 + 0.5 * 100 = 110.
        assert!(ot.decide(110.0, 120.0, 0.5).unwrap());
        assert!(!ot.decide(109.0, 120.0, 0.5).unwrap());
    }

    #[test]
    fn invalid_inputs_are_reported() {
        let ot = OnewayTrading::new(100.0).unwrap();

        assert!(ot.decide(-1.0, 110.0, 0.5).is_err());
        assert!(ot.decide(110.0, -1.0, 0.5).is_err());
        assert!(ot.decide(110.0, 110.0, 1.1).is_err());
        assert!(ot.decide(f64::NAN, 110.0, 0.5).is_err());
    }
}
