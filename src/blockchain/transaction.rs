//! Confirmation monitoring for submitted transactions.
//!
//! # Responsibilities
//! - Poll for the receipt of a broadcast transaction
//! - Count confirmations against the configured depth
//! - Turn on-chain reverts (status 0) into errors

use tokio::time::{interval, timeout, MissedTickBehavior};

use crate::blockchain::client::ChainClient;
use crate::blockchain::types::{CallOutcome, ChainError, ChainResult, ConfirmationStatus};
use alloy::primitives::TxHash;

/// Classify a transaction from one receipt poll.
///
/// The inclusion block counts as the first confirmation.
pub fn confirmation_status(
    mined: Option<(bool, Option<u64>)>,
    current_block: u64,
    required: u64,
) -> ConfirmationStatus {
    let Some((success, tx_block)) = mined else {
        return ConfirmationStatus::Pending;
    };
    if !success {
        return ConfirmationStatus::Failed("status 0".to_string());
    }

    let tx_block = tx_block.unwrap_or(current_block);
    let confirmations = current_block.saturating_sub(tx_block) + 1;
    if confirmations >= required {
        ConfirmationStatus::Confirmed {
            block_number: tx_block,
        }
    } else {
        ConfirmationStatus::Confirming {
            current: confirmations,
            required,
        }
    }
}

/// Wait for a transaction to be confirmed.
///
/// Polls every `network.poll_interval_ms` until the receipt has
/// `network.confirmation_blocks` confirmations or
/// `network.confirmation_timeout_secs` elapses.
pub async fn wait_for_confirmation(
    client: &ChainClient,
    tx_hash: TxHash,
) -> ChainResult<CallOutcome> {
    let config = client.config();
    let required = client.confirmation_blocks();

    let result = timeout(config.confirmation_timeout(), async {
        let mut ticker = interval(config.poll_interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            let receipt = match client.get_transaction_receipt(tx_hash).await? {
                Some(r) => r,
                None => {
                    tracing::debug!(tx_hash = %tx_hash, "Transaction pending");
                    continue;
                }
            };

            let current_block = client.get_block_number().await?;
            let mined = Some((receipt.status(), receipt.block_number));
            match confirmation_status(mined, current_block, required) {
                ConfirmationStatus::Confirmed { block_number } => {
                    tracing::debug!(tx_hash = %tx_hash, block_number, "Transaction confirmed");
                    return Ok(CallOutcome::from(&receipt));
                }
                ConfirmationStatus::Failed(_) => {
                    return Err(ChainError::Reverted(format!(
                        "transaction {} reverted in block {}",
                        tx_hash,
                        receipt.block_number.unwrap_or_default()
                    )));
                }
                ConfirmationStatus::Confirming { current, required } => {
                    tracing::debug!(
                        tx_hash = %tx_hash,
                        confirmations = current,
                        required = required,
                        "Waiting for confirmations"
                    );
                }
                ConfirmationStatus::Pending => {}
            }
        }
    })
    .await;

    match result {
        Ok(outcome) => outcome,
        Err(_) => Err(ChainError::ConfirmationTimeout(tx_hash)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_without_receipt() {
        assert_eq!(confirmation_status(None, 10, 1), ConfirmationStatus::Pending);
    }

    #[test]
    fn test_inclusion_counts_as_one() {
        assert_eq!(
            confirmation_status(Some((true, Some(10))), 10, 1),
            ConfirmationStatus::Confirmed { block_number: 10 }
        );
    }

    #[test]
    fn test_confirming_until_depth() {
        assert_eq!(
            confirmation_status(Some((true, Some(10))), 11, 3),
            ConfirmationStatus::Confirming {
                current: 2,
                required: 3
            }
        );
        assert_eq!(
            confirmation_status(Some((true, Some(10))), 12, 3),
            ConfirmationStatus::Confirmed { block_number: 10 }
        );
    }

    #[test]
    fn test_reverted_receipt() {
        assert!(matches!(
            confirmation_status(Some((false, Some(10))), 20, 1),
            ConfirmationStatus::Failed(_)
        ));
    }
}
