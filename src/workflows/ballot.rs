//! Ballot voting contract: chairperson grants voting rights, voters vote or
//! delegate, anyone can query the winning proposal.

use alloy::dyn_abi::DynSolValue;
use alloy::primitives::{Address, B256, U256};

use crate::blockchain::client::ChainClient;
use crate::blockchain::types::{CallOutcome, ChainError, ChainResult};
use crate::blockchain::wallet::Wallet;
use crate::contract::args::{format_bytes32_string, parse_bytes32_string, CallArg};
use crate::contract::artifact::ContractArtifact;
use crate::contract::evm::EvmContract;
use crate::contract::handle::{ContractHandle, Target};
use crate::orchestrator::{CallRequest, Orchestrator, OrchestratorError};

/// A proposal as stored by the contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proposal {
    pub name: String,
    pub vote_count: U256,
}

/// A voter record as stored by the contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Voter {
    pub weight: U256,
    pub voted: bool,
    pub delegate: Address,
    pub vote: U256,
}

pub fn give_right_to_vote_request(voter: Address) -> CallRequest {
    CallRequest::new("giveRightToVote")
        .arg("voter", voter)
        .counterpart(voter, "voter")
}

pub fn vote_request(proposal: U256) -> CallRequest {
    CallRequest::new("vote").arg("proposal", proposal)
}

pub fn delegate_request(to: Address) -> CallRequest {
    CallRequest::new("delegate")
        .arg("to", to)
        .counterpart(to, "delegate")
}

/// Chairperson grants `voter` the right to vote.
pub async fn give_right_to_vote(
    orchestrator: &Orchestrator,
    target: &Target,
    chairperson: &Wallet,
    voter: Address,
) -> Result<CallOutcome, OrchestratorError> {
    orchestrator
        .execute(target, chairperson, &give_right_to_vote_request(voter))
        .await
}

/// `voter` casts its vote for proposal index `proposal`.
pub async fn vote(
    orchestrator: &Orchestrator,
    target: &Target,
    voter: &Wallet,
    proposal: U256,
) -> Result<CallOutcome, OrchestratorError> {
    orchestrator
        .execute(target, voter, &vote_request(proposal))
        .await
}

/// `voter` delegates its vote to `to`.
pub async fn delegate(
    orchestrator: &Orchestrator,
    target: &Target,
    voter: &Wallet,
    to: Address,
) -> Result<CallOutcome, OrchestratorError> {
    orchestrator
        .execute(target, voter, &delegate_request(to))
        .await
}

/// Encode proposal names as the constructor's `bytes32[]`.
pub fn proposal_names_arg(proposals: &[String]) -> ChainResult<CallArg> {
    if proposals.is_empty() {
        return Err(ChainError::Abi("at least one proposal is required".to_string()));
    }
    proposals
        .iter()
        .map(|name| format_bytes32_string(name).map(CallArg::Bytes32))
        .collect::<ChainResult<Vec<_>>>()
        .map(CallArg::Array)
}

/// Deploy a Ballot with the given proposal names; the signer becomes chairperson.
pub async fn deploy(
    client: ChainClient,
    chairperson: &Wallet,
    artifact: ContractArtifact,
    proposals: &[String],
) -> ChainResult<(EvmContract, CallOutcome)> {
    let names = proposal_names_arg(proposals)?;
    EvmContract::deploy(client, chairperson, artifact, &[names]).await
}

/// Index of the proposal with the most votes.
pub async fn winning_proposal(contract: &dyn ContractHandle) -> ChainResult<U256> {
    let values = contract.read("winningProposal", &[]).await?;
    uint_at(&values, 0, "winningProposal")
}

/// Name of the proposal with the most votes.
pub async fn winner_name(contract: &dyn ContractHandle) -> ChainResult<String> {
    let values = contract.read("winnerName", &[]).await?;
    parse_bytes32_string(&bytes32_at(&values, 0, "winnerName")?)
}

/// Address that deployed the ballot.
pub async fn chairperson(contract: &dyn ContractHandle) -> ChainResult<Address> {
    let values = contract.read("chairperson", &[]).await?;
    match values.first() {
        Some(DynSolValue::Address(a)) => Ok(*a),
        other => Err(unexpected("chairperson", other)),
    }
}

/// Proposal at `index`.
pub async fn proposal(contract: &dyn ContractHandle, index: U256) -> ChainResult<Proposal> {
    let values = contract.read("proposals", &[CallArg::Uint(index)]).await?;
    Ok(Proposal {
        name: parse_bytes32_string(&bytes32_at(&values, 0, "proposals")?)?,
        vote_count: uint_at(&values, 1, "proposals")?,
    })
}

/// Voter record of `address`.
pub async fn voter(contract: &dyn ContractHandle, address: Address) -> ChainResult<Voter> {
    let values = contract.read("voters", &[CallArg::Address(address)]).await?;
    let voted = match values.get(1) {
        Some(DynSolValue::Bool(b)) => *b,
        other => return Err(unexpected("voters", other)),
    };
    let delegate = match values.get(2) {
        Some(DynSolValue::Address(a)) => *a,
        other => return Err(unexpected("voters", other)),
    };
    Ok(Voter {
        weight: uint_at(&values, 0, "voters")?,
        voted,
        delegate,
        vote: uint_at(&values, 3, "voters")?,
    })
}

fn uint_at(values: &[DynSolValue], index: usize, method: &str) -> ChainResult<U256> {
    match values.get(index) {
        Some(DynSolValue::Uint(v, _)) => Ok(*v),
        other => Err(unexpected(method, other)),
    }
}

fn bytes32_at(values: &[DynSolValue], index: usize, method: &str) -> ChainResult<B256> {
    match values.get(index) {
        Some(DynSolValue::FixedBytes(word, 32)) => Ok(*word),
        other => Err(unexpected(method, other)),
    }
}

fn unexpected(method: &str, value: Option<&DynSolValue>) -> ChainError {
    ChainError::Abi(format!("{}() returned unexpected value {:?}", method, value))
}
