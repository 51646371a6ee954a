use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Requested outcome of a simulated card authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardOutcome {
    Approve,
    Decline,
}

/// Per-call knobs for an authorization attempt. A real reader would ignore
/// the simulation fields.
#[derive(Debug, Clone, Default)]
pub struct AuthorizationOptions {
    pub simulate_outcome: Option<CardOutcome>,
    pub error_code: Option<String>,
}

/// Result of a completed authorization call. A decline is a normal outcome
/// of a successful call, distinct from a transport or reader fault (which is
/// an `Err` from [`CardAuthorizer::authorize`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationOutcome {
    Approved { message: String },
    Declined { error_code: String, message: String },
}

/// Port for the card reader. The production implementation simulates a timed
/// approve/decline; tests substitute a zero-delay one.
#[async_trait]
pub trait CardAuthorizer: Send + Sync {
    async fn authorize(&self, amount: u32, options: AuthorizationOptions)
        -> Result<AuthorizationOutcome>;
}

pub type CardAuthorizerBox = Box<dyn CardAuthorizer>;
