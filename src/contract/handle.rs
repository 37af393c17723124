//! The remote procedure interface the orchestrator depends on.

use std::sync::Arc;

use alloy::dyn_abi::DynSolValue;
use alloy::primitives::{Address, TxHash};
use async_trait::async_trait;

use crate::blockchain::types::{CallOutcome, ChainResult};
use crate::blockchain::wallet::Wallet;
use crate::contract::args::CallArg;

/// A deployed contract reachable by method name with positional arguments.
#[async_trait]
pub trait ContractHandle: Send + Sync {
    /// Deployed address.
    fn address(&self) -> Address;

    /// Check that `method` accepts `args` without touching the network.
    fn check_call(&self, method: &str, args: &[CallArg]) -> ChainResult<()>;

    /// Read-only call; no state change.
    async fn read(&self, method: &str, args: &[CallArg]) -> ChainResult<Vec<DynSolValue>>;

    /// Submit a state-mutating call originated by `signer`.
    async fn submit(&self, signer: &Wallet, method: &str, args: &[CallArg]) -> ChainResult<TxHash>;

    /// Block until `tx_hash` is confirmed. A reverted receipt is an error.
    async fn confirm(&self, tx_hash: TxHash) -> ChainResult<CallOutcome>;
}

/// A contract handle tagged with whether it exposes a `name()` accessor.
///
/// Decided once when the target is built, never by probing at call time.
#[derive(Clone)]
pub enum Target {
    Named(Arc<dyn ContractHandle>),
    Anonymous(Arc<dyn ContractHandle>),
}

impl Target {
    pub fn named(handle: impl ContractHandle + 'static) -> Self {
        Target::Named(Arc::new(handle))
    }

    pub fn anonymous(handle: impl ContractHandle + 'static) -> Self {
        Target::Anonymous(Arc::new(handle))
    }

    pub fn handle(&self) -> &dyn ContractHandle {
        match self {
            Target::Named(h) | Target::Anonymous(h) => h.as_ref(),
        }
    }

    pub fn address(&self) -> Address {
        self.handle().address()
    }

    pub fn is_named(&self) -> bool {
        matches!(self, Target::Named(_))
    }
}

impl std::fmt::Debug for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = if self.is_named() { "Named" } else { "Anonymous" };
        f.debug_tuple(kind).field(&self.address()).finish()
    }
}
