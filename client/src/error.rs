//! The typed failure enumeration returned by every fallible operation in this crate.
//!
//! Variants are grouped by [`ErrorKind`] so that callers can tell a configuration failure apart
//! from a ledger rejection without matching on every variant.

use std::path::PathBuf;

use solana_address::Address;
use solana_client::client_error::ClientError;
use solana_program_error::ProgramError;
use solana_sdk::signer::SignerError;
use strum_macros::Display;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ErrorKind {
    /// Missing or malformed environment/file input. Raised before any network call.
    Configuration,
    /// The RPC node or the ledger refused, dropped, or expired the transaction.
    Network,
    /// The fee payer is below the funding threshold and the policy says to stop.
    InsufficientFunds,
    /// Local input or instruction construction error.
    Invalid,
}

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("environment variable {0} must be set")]
    MissingEnv(&'static str),

    #[error("invalid keypair: {0}")]
    InvalidKeypair(String),

    #[error("couldn't read keypair file {path}: {source}")]
    KeypairFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unknown insufficient funds action `{0}`, expected one of airdrop, abort, warn")]
    InvalidFundingAction(String),

    #[error("rpc request failed: {0}")]
    Rpc(#[from] ClientError),

    #[error("transaction rejected: {0}")]
    Rejected(String),

    #[error(
        "blockhash expired: current block height {current_block_height} is past the last valid \
         block height {last_valid_block_height}"
    )]
    Expired {
        last_valid_block_height: u64,
        current_block_height: u64,
    },

    #[error("airdrop to {0} did not land")]
    AirdropNotConfirmed(Address),

    #[error("couldn't sign transaction: {0}")]
    Signing(#[from] SignerError),

    #[error("balance of {balance} lamports is below the required {threshold} lamports")]
    InsufficientFunds { balance: u64, threshold: u64 },

    #[error("{amount} with {decimals} decimals overflows a u64 of base units")]
    AmountOverflow { amount: String, decimals: u8 },

    #[error("amount {0} is negative")]
    NegativeAmount(String),

    #[error("{amount} has more fractional digits than the mint's {decimals} decimals")]
    FractionalAmount { amount: String, decimals: u8 },

    #[error("can't transfer {transferred} base units out of {minted} minted")]
    TransferExceedsMint { minted: u64, transferred: u64 },

    #[error("instruction order violated: {0}")]
    InstructionOrder(String),

    #[error("program error: {0}")]
    Instruction(#[from] ProgramError),
}

impl ScenarioError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingEnv(_)
            | Self::InvalidKeypair(_)
            | Self::KeypairFile { .. }
            | Self::InvalidFundingAction(_) => ErrorKind::Configuration,
            Self::Rpc(_)
            | Self::Rejected(_)
            | Self::Expired { .. }
            | Self::AirdropNotConfirmed(_)
            | Self::Signing(_) => ErrorKind::Network,
            Self::InsufficientFunds { .. } => ErrorKind::InsufficientFunds,
            Self::AmountOverflow { .. }
            | Self::FractionalAmount { .. }
            | Self::NegativeAmount(_)
            | Self::TransferExceedsMint { .. }
            | Self::InstructionOrder(_)
            | Self::Instruction(_) => ErrorKind::Invalid,
        }
    }
}
