//! Contract orchestrator CLI.
//!
//! # Flow
//!
//! ```text
//!   config.toml ──▶ ScriptConfig ──▶ ChainClient ──▶ EvmContract ──▶ Target
//!   PRIVATE_KEY ──▶ Wallet ───────────────────────────────┐            │
//!                                                          ▼            ▼
//!                                  Orchestrator (TracingReporter + Pacer)
//!                                                          │
//!                                                          ▼
//!                                 workflows::{transfer, ballot}
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use alloy::primitives::{Address, U256};
use clap::{Parser, Subcommand};

use contract_orchestrator::blockchain::{ChainClient, Wallet};
use contract_orchestrator::config::{load_config, ContractEntry, ScriptConfig};
use contract_orchestrator::contract::{ContractArtifact, ContractHandle, EvmContract};
use contract_orchestrator::observability::{logging, metrics};
use contract_orchestrator::orchestrator::Orchestrator;
use contract_orchestrator::pacing::pacer_from_config;
use contract_orchestrator::report::TracingReporter;
use contract_orchestrator::workflows::{ballot, transfer};

#[derive(Parser)]
#[command(name = "contract-orchestrator")]
#[command(about = "Run paced, logged contract calls against an EVM network", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check RPC connectivity and chain id
    Check,
    /// Show the winning proposal
    Winner {
        #[arg(long)]
        contract: Option<Address>,
    },
    #[command(flatten)]
    Call(CallCommands),
}

/// Commands that need a signer.
#[derive(Subcommand)]
enum CallCommands {
    /// Transfer tokens to a recipient
    Transfer {
        recipient: Address,
        amount: U256,
        /// Token contract address, overriding the config entry
        #[arg(long)]
        contract: Option<Address>,
    },
    /// Grant a voter the right to vote (chairperson only)
    GiveRightToVote {
        voter: Address,
        #[arg(long)]
        contract: Option<Address>,
    },
    /// Vote for a proposal by index
    Vote {
        proposal: U256,
        #[arg(long)]
        contract: Option<Address>,
    },
    /// Delegate the signer's vote
    Delegate {
        to: Address,
        #[arg(long)]
        contract: Option<Address>,
    },
    /// Deploy a Ballot with the given proposal names
    DeployBallot {
        #[arg(required = true)]
        proposals: Vec<String>,
        /// Ballot artifact, overriding the config entry
        #[arg(long)]
        artifact: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ScriptConfig::default(),
    };

    logging::init_logging(&config.observability.log_level);
    tracing::info!(network = %config.network.name, "contract-orchestrator v0.1.0 starting");

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let client = ChainClient::new(config.network.clone())?;

    match cli.command {
        Commands::Check => {
            client.verify_chain_id().await?;
            let block = client.get_block_number().await?;
            tracing::info!(chain_id = config.network.chain_id, block, "RPC endpoint healthy");
        }
        Commands::Winner { contract } => {
            let ballot_contract = attach(&client, config.contracts.ballot.as_ref(), contract, "ballot")?;
            let index = ballot::winning_proposal(&ballot_contract).await?;
            let name = ballot::winner_name(&ballot_contract).await?;
            tracing::info!(proposal = %index, winner = %name, "Winning proposal");
        }
        Commands::Call(call) => run_call(call, &config, client).await?,
    }

    Ok(())
}

/// Load the signer, build the orchestrator and run one signed command.
async fn run_call(
    call: CallCommands,
    config: &ScriptConfig,
    client: ChainClient,
) -> Result<(), Box<dyn std::error::Error>> {
    let wallet = Wallet::from_env(config.network.chain_id)?;
    client.verify_chain_id().await?;

    let orchestrator = Orchestrator::new(
        Arc::new(TracingReporter::new(client.clone())),
        pacer_from_config(&config.timing),
        config.network.name.clone(),
    );

    match call {
        CallCommands::Transfer {
            recipient,
            amount,
            contract,
        } => {
            let token = attach(&client, config.contracts.token.as_ref(), contract, "token")?;
            let outcome =
                transfer::transfer(&orchestrator, &token.into_target(), &wallet, recipient, amount)
                    .await?;
            tracing::info!(tx_hash = %outcome.tx_hash, "Transfer complete");
        }
        CallCommands::GiveRightToVote { voter, contract } => {
            let ballot_contract = attach(&client, config.contracts.ballot.as_ref(), contract, "ballot")?;
            ballot::give_right_to_vote(&orchestrator, &ballot_contract.into_target(), &wallet, voter)
                .await?;
        }
        CallCommands::Vote { proposal, contract } => {
            let ballot_contract = attach(&client, config.contracts.ballot.as_ref(), contract, "ballot")?;
            ballot::vote(&orchestrator, &ballot_contract.into_target(), &wallet, proposal).await?;
        }
        CallCommands::Delegate { to, contract } => {
            let ballot_contract = attach(&client, config.contracts.ballot.as_ref(), contract, "ballot")?;
            ballot::delegate(&orchestrator, &ballot_contract.into_target(), &wallet, to).await?;
        }
        CallCommands::DeployBallot {
            proposals,
            artifact,
        } => {
            let path = match (artifact, config.contracts.ballot.as_ref()) {
                (Some(path), _) => path,
                (None, Some(entry)) => PathBuf::from(&entry.artifact),
                (None, None) => return Err("no ballot artifact configured".into()),
            };
            let artifact = ContractArtifact::load(&path)?;
            let (contract, outcome) = ballot::deploy(client, &wallet, artifact, &proposals).await?;
            tracing::info!(
                address = %contract.address(),
                tx_hash = %outcome.tx_hash,
                gas_used = outcome.gas_used,
                "Ballot deployed"
            );
        }
    }

    Ok(())
}

/// Resolve a contract from its config entry, with an optional address override.
fn attach(
    client: &ChainClient,
    entry: Option<&ContractEntry>,
    address: Option<Address>,
    kind: &str,
) -> Result<EvmContract, Box<dyn std::error::Error>> {
    let Some(entry) = entry else {
        return Err(format!("no {} contract configured", kind).into());
    };
    let contract = match address {
        Some(address) => {
            let artifact = ContractArtifact::load(std::path::Path::new(&entry.artifact))?;
            EvmContract::new(client.clone(), address, artifact)
        }
        None => EvmContract::attach(client.clone(), entry)?,
    };
    Ok(contract)
}
