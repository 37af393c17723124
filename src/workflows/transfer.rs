//! Token transfer.

use alloy::primitives::{Address, U256};

use crate::blockchain::types::CallOutcome;
use crate::blockchain::wallet::Wallet;
use crate::contract::handle::Target;
use crate::orchestrator::{CallRequest, Orchestrator, OrchestratorError};

/// `transfer(to, amount)` with the recipient shown in the accounts log.
pub fn transfer_request(recipient: Address, amount: U256) -> CallRequest {
    CallRequest::new("transfer")
        .arg("to", recipient)
        .arg("amount", amount)
        .counterpart(recipient, "recipient")
}

/// Transfer `amount` tokens from `signer` to `recipient`.
pub async fn transfer(
    orchestrator: &Orchestrator,
    target: &Target,
    signer: &Wallet,
    recipient: Address,
    amount: U256,
) -> Result<CallOutcome, OrchestratorError> {
    orchestrator
        .execute(target, signer, &transfer_request(recipient, amount))
        .await
}
