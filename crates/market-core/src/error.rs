use thiserror::Error;

/// Errors at the ingestion boundary.
///
/// The computation core itself never fails: absence of information is
/// modeled as `None` on the affected field. Only the adapter that turns
/// loosely-shaped upstream payloads into typed observations can reject its
/// input outright.
#[derive(Error, Debug)]
pub enum MarketError {
    #[error("Malformed payload: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unexpected payload shape: {0}")]
    Shape(String),
}
