use clap::{
    Parser,
    Subcommand,
};
use mint_client::{
    funding::InsufficientFundsAction,
    scenarios::{
        MintScenario,
        TransferScenario,
    },
};
use rust_decimal::Decimal;

#[derive(Parser, Debug)]
#[command(name = "mint-scripts")]
pub struct CliArgs {
    /// Don't print each submitted instruction and the confirmed signature.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// What to do when the fee payer's balance is below the funding threshold: `airdrop`,
    /// `abort` or `warn`. Overrides `INSUFFICIENT_FUNDS`.
    #[arg(long, global = true)]
    pub on_insufficient: Option<InsufficientFundsAction>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a mint and mint a fixed supply into the payer's associated token account, all in
    /// one transaction.
    MintSupply {
        #[arg(short, long, default_value_t = 6)]
        decimals: u8,

        /// Whole or fractional tokens, not base units.
        #[arg(short, long, default_value = "21000000")]
        amount: Decimal,
    },
    /// Create a mint, mint to the payer, and transfer part of it to a new receiver, all in one
    /// transaction.
    MintAndTransfer {
        #[arg(short, long, default_value_t = 9)]
        decimals: u8,

        #[arg(short, long, default_value = "1000")]
        minted: Decimal,

        #[arg(short, long, default_value = "100")]
        transferred: Decimal,
    },
}

pub enum Scenario {
    Mint(MintScenario),
    Transfer(TransferScenario),
}

impl From<&Command> for Scenario {
    fn from(command: &Command) -> Self {
        match *command {
            Command::MintSupply { decimals, amount } => {
                Scenario::Mint(MintScenario { decimals, amount })
            }
            Command::MintAndTransfer {
                decimals,
                minted,
                transferred,
            } => Scenario::Transfer(TransferScenario {
                decimals,
                minted,
                transferred,
            }),
        }
    }
}

/// The process exit status for a command line that failed to parse. Usage errors fail with 1
/// like every other failure; `--help` and `--version` succeed with 0.
pub fn parse_error_status(err: &clap::Error) -> u8 {
    if err.use_stderr() {
        1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use rust_decimal::dec;

    use super::*;

    #[test]
    fn verify_cli() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn defaults_match_scenario_defaults() {
        let args = CliArgs::parse_from(["mint-scripts", "mint-supply"]);
        assert!(matches!(
            Scenario::from(&args.command),
            Scenario::Mint(s) if s == MintScenario::default()
        ));

        let args = CliArgs::parse_from(["mint-scripts", "mint-and-transfer"]);
        assert!(matches!(
            Scenario::from(&args.command),
            Scenario::Transfer(s) if s == TransferScenario::default()
        ));
        assert!(!args.quiet);
        assert!(args.on_insufficient.is_none());
    }

    #[test]
    fn overrides() {
        let args = CliArgs::parse_from([
            "mint-scripts",
            "mint-and-transfer",
            "--decimals",
            "2",
            "--minted",
            "10.5",
            "--transferred",
            "0.25",
            "--on-insufficient",
            "abort",
            "--quiet",
        ]);
        assert!(args.quiet);
        assert_eq!(args.on_insufficient, Some(InsufficientFundsAction::Abort));
        assert!(matches!(
            Scenario::from(&args.command),
            Scenario::Transfer(TransferScenario {
                decimals: 2,
                minted,
                transferred,
            }) if minted == dec!(10.5) && transferred == dec!(0.25)
        ));

        assert!(CliArgs::try_parse_from([
            "mint-scripts",
            "mint-supply",
            "--on-insufficient",
            "pray"
        ])
        .is_err());
    }

    #[test]
    fn usage_errors_exit_with_failure() {
        fn status(argv: &[&str]) -> u8 {
            parse_error_status(&CliArgs::try_parse_from(argv.iter().copied()).unwrap_err())
        }

        assert_eq!(status(&["mint-scripts"]), 1);
        assert_eq!(status(&["mint-scripts", "burn"]), 1);
        assert_eq!(status(&["mint-scripts", "mint-supply", "--decimals", "many"]), 1);
        assert_eq!(status(&["mint-scripts", "--help"]), 0);
    }
}
