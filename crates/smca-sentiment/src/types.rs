//! Sentiment service request/response types.

use serde::{Deserialize, Serialize};

/// Batch scoring request.
#[derive(Debug, Clone, Serialize)]
pub struct BatchRequest<'a> {
    pub texts: Vec<&'a str>,
}

/// One model prediction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    /// Raw model label, e.g. `positive`, `LABEL_2`, `NEG`
    pub label: String,
    pub score: f32,
}

/// Batch scoring response, one prediction per request text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResponse {
    pub results: Vec<Prediction>,
}
