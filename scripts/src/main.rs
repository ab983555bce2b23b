//! Command line entry point for the SPL token scripts. See [`cli::Command`] for the scenarios and
//! [`load_env`] for the expected environment variables.

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use mint_client::{
    logs::log_divider,
    print_kv,
    scenarios::{
        create_mint_and_mint_to_payer,
        create_mint_and_transfer,
    },
    transactions::CustomRpcClient,
    LogColor,
    ScenarioError,
};

use crate::cli::{
    CliArgs,
    Scenario,
};

pub mod cli;
pub mod load_env;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let _ = err.print();
            return ExitCode::from(cli::parse_error_status(&err));
        }
    };

    match run(args).await {
        Ok(()) => {
            log_divider();
            print_kv!("Done", "scenario succeeded", LogColor::Header);
            ExitCode::SUCCESS
        }
        Err(err) => {
            log_divider();
            let kind = err
                .chain()
                .find_map(|cause| cause.downcast_ref::<ScenarioError>())
                .map_or_else(|| "Unexpected".to_string(), |e| e.kind().to_string());
            print_kv!(format!("{kind} error"), format!("{err:#}"), LogColor::Error);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: CliArgs) -> anyhow::Result<()> {
    // Everything that can fail without the network fails here first.
    let config = load_env::client_config(&args).context("Couldn't load configuration")?;
    let payer = config
        .signer
        .load()
        .context("Couldn't load the fee payer keypair")?;

    print_kv!("RPC endpoint", config.rpc_url);
    let rpc = CustomRpcClient::from_config(&config);

    match Scenario::from(&args.command) {
        Scenario::Mint(scenario) => {
            create_mint_and_mint_to_payer(&rpc, &payer, &config.funding, &scenario)
                .await
                .context("Mint scenario failed")?;
        }
        Scenario::Transfer(scenario) => {
            create_mint_and_transfer(&rpc, &payer, &config.funding, &scenario)
                .await
                .context("Mint and transfer scenario failed")?;
        }
    }

    Ok(())
}
