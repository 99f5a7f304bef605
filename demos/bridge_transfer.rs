// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Runs one USDC transfer against live networks and prints its events.
//!
//! ```bash
//! export PRIVATE_KEY=0x...
//! export CCTP_SANDBOX=true            # use Circle's sandbox attestation API
//! RUST_LOG=cctp_orchestrator=debug cargo run --example bridge_transfer -- 1.5
//! ```
//!
//! Testnet transfers go from Ethereum Sepolia to Base Sepolia and mint to the
//! signing account. Every `CCTP_*` variable understood by
//! `OrchestratorConfig::from_env` applies.

use std::sync::Arc;

use alloy_chains::NamedChain;
use alloy_network::EthereumWallet;
use alloy_signer_local::PrivateKeySigner;
use cctp_orchestrator::providers::{
    AlloyBlockchainProvider, IrisAttestationProvider, TokioClock,
};
use cctp_orchestrator::{
    cancellation, ChainRegistry, OrchestratorConfig, StepStatus, TransferEvent,
    TransferOrchestrator, TransferRequest,
};
use tokio::sync::mpsc::unbounded_channel;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("cctp_orchestrator=info")),
        )
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    dotenvy::dotenv().ok();
    let signer: PrivateKeySigner = dotenvy::var("PRIVATE_KEY")?.parse()?;
    let recipient = signer.address().to_string();
    let amount = std::env::args().nth(1).unwrap_or_else(|| "1".to_string());
    let sandbox = dotenvy::var("CCTP_SANDBOX").is_ok_and(|value| value == "true");

    let registry = Arc::new(ChainRegistry::builtin());
    let source = registry.get(NamedChain::Sepolia)?;
    let destination = registry.get(NamedChain::BaseSepolia)?;
    let provider = AlloyBlockchainProvider::new(EthereumWallet::from(signer), source)?
        .with_chain(destination)?;
    let attestor = if sandbox {
        IrisAttestationProvider::sandbox()?
    } else {
        IrisAttestationProvider::production()?
    };

    let (events_tx, mut events_rx) = unbounded_channel();
    let orchestrator = TransferOrchestrator::builder()
        .provider(provider)
        .attestor(attestor)
        .clock(TokioClock)
        .registry(Arc::clone(&registry))
        .config(OrchestratorConfig::from_env()?)
        .events(events_tx)
        .build();

    let printer = tokio::spawn(async move {
        while let Some(event) = events_rx.recv().await {
            match event {
                TransferEvent::Step { step, status } => match status {
                    StepStatus::Started => println!("[{step}] started"),
                    StepStatus::Progress(detail) => println!("[{step}] {detail}"),
                    StepStatus::Complete(detail) => println!("[{step}] done: {detail}"),
                    StepStatus::Failed(detail) => println!("[{step}] FAILED: {detail}"),
                },
                TransferEvent::Log(entry) => println!("  {:?}: {}", entry.level, entry.message),
            }
        }
    });

    let request = TransferRequest::from_human_amount(
        source.chain,
        destination.chain,
        &amount,
        orchestrator.config().asset_decimals,
        &recipient,
    )?;
    info!(amount = %amount, recipient = %recipient, event = "demo_transfer_requested");

    let (_handle, cancel) = cancellation();
    let outcome = orchestrator.start(request, cancel).await;
    drop(orchestrator);
    printer.await?;

    match outcome {
        Ok(state) => {
            println!("\nTransfer complete");
            println!("  burn: {:?}", state.burn_tx_hash());
            println!("  mint: {:?}", state.mint_tx_hash());
            Ok(())
        }
        Err(failure) => {
            println!("\nTransfer stopped in phase {}", failure.state.phase());
            if failure.state.can_resume() {
                println!("  the burn is on chain; resume later to finish the mint");
            }
            Err(failure.into())
        }
    }
}
