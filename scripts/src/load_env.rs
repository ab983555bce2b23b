//! Expected environment variables:
//! - `RPC_ENDPOINT`: the cluster's JSON RPC URL.
//! - `SECRET`: the fee payer's secret key, base58 or a JSON byte array. Or, instead:
//! - `PAYER_KEYPAIR`: path to a JSON keypair file.
//! - `INSUFFICIENT_FUNDS` (optional): `airdrop`, `abort` or `warn`.

use mint_client::{
    config::ClientConfig,
    ScenarioError,
};

use crate::cli::CliArgs;

/// Resolves the client configuration from the environment, then applies CLI overrides.
pub fn client_config(args: &CliArgs) -> Result<ClientConfig, ScenarioError> {
    let mut config = ClientConfig::from_env()?;
    apply_overrides(&mut config, args);
    Ok(config)
}

fn apply_overrides(config: &mut ClientConfig, args: &CliArgs) {
    if let Some(action) = args.on_insufficient {
        config.funding.on_insufficient = action;
    }
    if args.quiet {
        config.send.debug_logs = false;
    }
}
