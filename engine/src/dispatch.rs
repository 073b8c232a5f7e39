//! Name-keyed dispatch over the decision primitives.
//!
//! Front-ends (HTTP, SDK, UI) address a primitive by its wire name and hand
//! over a payload; this module is the single point where each name is bound
//! to a payload shape and routed. Validation lives in the primitives; the
//! dispatch layer adds nothing and loses nothing on the way through.

use std::collections::HashMap;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use corelib::error::DecisionError;

use crate::caching::{Caching, ItemId};
use crate::scheduling::Scheduling;
use crate::search::Search;
use crate::ski_rental::{RandomizedSkiRental, SkiRental};
use crate::trading::OnewayTrading;

/// Closed set of primitives addressable over the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Algorithm {
    SkiRental,
    RandomizedSkiRental,
    Caching,
    OnewayTrading,
    Scheduling,
    Search,
}

impl Algorithm {
    pub const ALL: [Algorithm; 6] = [
        Algorithm::SkiRental,
        Algorithm::RandomizedSkiRental,
        Algorithm::Caching,
        Algorithm::OnewayTrading,
        Algorithm::Scheduling,
        Algorithm::Search,
    ];

    pub fn wire_name(self) -> &'static str {
        match self {
            Algorithm::SkiRental => "ski_rental",
            Algorithm::RandomizedSkiRental => "randomized_ski_rental",
            Algorithm::Caching => "caching",
            Algorithm::OnewayTrading => "oneway_trading",
            Algorithm::Scheduling => "scheduling",
            Algorithm::Search => "search",
        }
    }
}

impl FromStr for Algorithm {
    type Err = DecisionError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Algorithm::ALL
            .into_iter()
            .find(|algorithm| algorithm.wire_name() == name)
            .ok_or_else(|| DecisionError::UnknownAlgorithm(name.to_string()))
    }
}

/// One decision request, tagged by algorithm name.
///
/// The field names are the boundary contract; front-ends marshal into these
/// shapes verbatim.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "algorithm", rename_all = "snake_case")]
pub enum DecisionRequest {
    SkiRental {
        buy_cost: f64,
        current_day: u32,
        prediction_days: f64,
        trust: f64,
    },
    RandomizedSkiRental {
        buy_cost: f64,
        current_day: u32,
        prediction_days: f64,
        trust: f64,
    },
    Caching {
        cache_size: usize,
        /// JSON object keys arrive as strings; they are parsed into item ids
        /// at dispatch time.
        predictions: HashMap<String, u64>,
        item: ItemId,
        cache: Vec<ItemId>,
    },
    OnewayTrading {
        buy_price: f64,
        current_price: f64,
        prediction_price: f64,
        trust: f64,
    },
    Scheduling {
        num_machines: usize,
        job_lengths: Vec<u64>,
        prediction_job_lengths: Vec<u64>,
    },
    Search {
        max_value: u64,
        values: Vec<u64>,
        prediction_value: u64,
    },
}

impl DecisionRequest {
    pub fn algorithm(&self) -> Algorithm {
        match self {
            DecisionRequest::SkiRental { .. } => Algorithm::SkiRental,
            DecisionRequest::RandomizedSkiRental { .. } => Algorithm::RandomizedSkiRental,
            DecisionRequest::Caching { .. } => Algorithm::Caching,
            DecisionRequest::OnewayTrading { .. } => Algorithm::OnewayTrading,
            DecisionRequest::Scheduling { .. } => Algorithm::Scheduling,
            DecisionRequest::Search { .. } => Algorithm::Search,
        }
    }
}

/// Wire-shaped outcome of one decision.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DecisionResponse {
    /// Ski rental ("buy"/"rent") and one-way trading ("buy"/"wait").
    Threshold {
        decision: &'static str,
        algorithm: &'static str,
        trust_parameter: f64,
    },
    Caching {
        decision: &'static str,
        new_cache: Vec<ItemId>,
        algorithm: &'static str,
    },
    Scheduling {
        assignments: Vec<usize>,
        algorithm: &'static str,
    },
    Search {
        best_index: usize,
        algorithm: &'static str,
    },
}

impl DecisionResponse {
    fn threshold(algorithm: Algorithm, buy: bool, hold_word: &'static str, trust: f64) -> Self {
        DecisionResponse::Threshold {
            decision: if buy { "buy" } else { hold_word },
            algorithm: algorithm.wire_name(),
            trust_parameter: trust,
        }
    }
}

/// Route a request to its primitive, sampling the process RNG where the
/// primitive is randomized.
pub fn dispatch(request: &DecisionRequest) -> Result<DecisionResponse, DecisionError> {
    dispatch_with_rng(&mut rand::thread_rng(), request)
}

/// Route a request to its primitive with a caller-supplied randomness
/// source, so randomized decisions replay under a fixed seed.
#[instrument(
    skip(rng, request),
    target = "dispatch",
    fields(algorithm = request.algorithm().wire_name())
)]
pub fn dispatch_with_rng<R: Rng + ?Sized>(
    rng: &mut R,
    request: &DecisionRequest,
) -> Result<DecisionResponse, DecisionError> {
    debug!("dispatching decision request");

    match request {
        DecisionRequest::SkiRental {
            buy_cost,
            current_day,
            prediction_days,
            trust,
        } => {
            let buy = SkiRental::new(*buy_cost)?.decide(*current_day, *prediction_days, *trust)?;
            Ok(DecisionResponse::threshold(
                Algorithm::SkiRental,
                buy,
                "rent",
                *trust,
            ))
        }

        DecisionRequest::RandomizedSkiRental {
            buy_cost,
            current_day,
            prediction_days,
            trust,
        } => {
            let buy = RandomizedSkiRental::new(*buy_cost)?.decide_with_rng(
                rng,
                *current_day,
                *prediction_days,
                *trust,
            )?;
            Ok(DecisionResponse::threshold(
                Algorithm::RandomizedSkiRental,
                buy,
                "rent",
                *trust,
            ))
        }

        DecisionRequest::Caching {
            cache_size,
            predictions,
            item,
            cache,
        } => {
            let predictions = parse_prediction_keys(predictions)?;
            let (hit, new_cache) = Caching::new(*cache_size, predictions).decide(*item, cache)?;
            Ok(DecisionResponse::Caching {
                decision: if hit { "hit" } else { "miss" },
                new_cache,
                algorithm: Algorithm::Caching.wire_name(),
            })
        }

        DecisionRequest::OnewayTrading {
            buy_price,
            current_price,
            prediction_price,
            trust,
        } => {
            let convert =
                OnewayTrading::new(*buy_price)?.decide(*current_price, *prediction_price, *trust)?;
            Ok(DecisionResponse::threshold(
                Algorithm::OnewayTrading,
                convert,
                "wait",
                *trust,
            ))
        }

        DecisionRequest::Scheduling {
            num_machines,
            job_lengths,
            prediction_job_lengths,
        } => {
            let assignments =
                Scheduling::new(*num_machines)?.decide(job_lengths, prediction_job_lengths)?;
            Ok(DecisionResponse::Scheduling {
                assignments,
                algorithm: Algorithm::Scheduling.wire_name(),
            })
        }

        DecisionRequest::Search {
            max_value,
            values,
            prediction_value,
        } => {
            let hint = usize::try_from(*prediction_value).unwrap_or(usize::MAX);
            let best_index = Search::new(*max_value).decide(values, hint)?;
            Ok(DecisionResponse::Search {
                best_index,
                algorithm: Algorithm::Search.wire_name(),
            })
        }
    }
}

fn parse_prediction_keys(
    raw: &HashMap<String, u64>,
) -> Result<HashMap<ItemId, u64>, DecisionError> {
    raw.iter()
        .map(|(key, &next_access)| {
            key.parse::<ItemId>().map(|id| (id, next_access)).map_err(|_| {
                DecisionError::InvalidArgument(format!("prediction key {key:?} is not an item id"))
            })
        })
        .collect()
}

/// Dispatch from an algorithm name carried out-of-band plus a raw JSON
/// payload of that primitive's input fields.
///
/// Unrecognized names surface as [`DecisionError::UnknownAlgorithm`];
/// payloads that do not match the named primitive's input shape surface as
/// [`DecisionError::InvalidArgument`].
pub fn dispatch_named(
    name: &str,
    payload: serde_json::Value,
) -> Result<DecisionResponse, DecisionError> {
    let algorithm = Algorithm::from_str(name)?;

    let serde_json::Value::Object(mut fields) = payload else {
        return Err(DecisionError::InvalidArgument(
            "payload must be a JSON object".to_string(),
        ));
    };

    fields.insert(
        "algorithm".to_string(),
        serde_json::Value::String(algorithm.wire_name().to_string()),
    );

    let request: DecisionRequest = serde_json::from_value(serde_json::Value::Object(fields))
        .map_err(|source| DecisionError::InvalidArgument(source.to_string()))?;

    dispatch(&request)
}

/// Liveness probe payload; touches no primitive.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub version: &'static str,
}

pub fn health() -> Health {
    Health {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    }
}
