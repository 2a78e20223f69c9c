//! HTTP Protocol
//!
//! Endpoint paths and the JSON bodies exchanged with clients.

use serde::{Deserialize, Serialize};

// --- API Endpoints ---

/// Liveness check, answers with a fixed JSON string.
pub const ENDPOINT_ROOT: &str = "/";
/// Ranked completions for the `p` query parameter.
pub const ENDPOINT_SUGGEST: &str = "/suggest";
/// Records one occurrence of the posted word.
pub const ENDPOINT_INSERT: &str = "/insert";
/// Service state, index size and persistence counters.
pub const ENDPOINT_STATS: &str = "/stats";

pub const ROOT_MESSAGE: &str = "API is working";

// --- Data Transfer Objects ---

/// Query string of the suggest endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct SuggestParams {
    /// The prefix typed so far.
    pub p: Option<String>,
}

/// Body of the insert endpoint.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct InsertRequest {
    #[serde(default)]
    pub word: Option<String>,
}

/// Plain acknowledgment or error message.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
