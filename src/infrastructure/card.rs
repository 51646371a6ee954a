use crate::domain::money::format_won;
use crate::domain::ports::{
    AuthorizationOptions, AuthorizationOutcome, CardAuthorizer, CardOutcome,
};
use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Card reader simulation: waits for the authorization delay, then resolves
/// to the requested outcome (or its own default when the call carries none).
pub struct SimulatedCardReader {
    delay: Duration,
    default_outcome: CardOutcome,
}

impl SimulatedCardReader {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            default_outcome: CardOutcome::Approve,
        }
    }

    pub fn with_default_outcome(mut self, outcome: CardOutcome) -> Self {
        self.default_outcome = outcome;
        self
    }
}

#[async_trait]
impl CardAuthorizer for SimulatedCardReader {
    async fn authorize(
        &self,
        amount: u32,
        options: AuthorizationOptions,
    ) -> Result<AuthorizationOutcome> {
        tokio::time::sleep(self.delay).await;

        let outcome = options.simulate_outcome.unwrap_or(self.default_outcome);
        Ok(match outcome {
            CardOutcome::Approve => AuthorizationOutcome::Approved {
                message: format!("Payment approved for {}", format_won(amount)),
            },
            CardOutcome::Decline => AuthorizationOutcome::Declined {
                error_code: options.error_code.unwrap_or_else(|| "DECLINED".to_string()),
                message: "Card declined. Please try again or choose another payment method."
                    .to_string(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_approve_by_default() {
        let reader = SimulatedCardReader::new(Duration::ZERO);
        let outcome = reader
            .authorize(700, AuthorizationOptions::default())
            .await
            .unwrap();
        assert!(matches!(outcome, AuthorizationOutcome::Approved { .. }));
    }

    #[tokio::test]
    async fn test_decline_is_an_outcome_not_an_error() {
        let reader = SimulatedCardReader::new(Duration::ZERO);
        let outcome = reader
            .authorize(
                700,
                AuthorizationOptions {
                    simulate_outcome: Some(CardOutcome::Decline),
                    error_code: None,
                },
            )
            .await
            .unwrap();
        match outcome {
            AuthorizationOutcome::Declined { error_code, .. } => {
                assert_eq!(error_code, "DECLINED");
            }
            other => panic!("expected decline, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_custom_error_code_passes_through() {
        let reader = SimulatedCardReader::new(Duration::ZERO);
        let outcome = reader
            .authorize(
                700,
                AuthorizationOptions {
                    simulate_outcome: Some(CardOutcome::Decline),
                    error_code: Some("INSUFFICIENT_FUNDS".to_string()),
                },
            )
            .await
            .unwrap();
        match outcome {
            AuthorizationOutcome::Declined { error_code, .. } => {
                assert_eq!(error_code, "INSUFFICIENT_FUNDS");
            }
            other => panic!("expected decline, got {other:?}"),
        }
    }
}
