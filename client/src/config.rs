//! Explicit client configuration: the RPC endpoint, the signing material and the funding policy.
//!
//! Nothing else in the crate reads the process environment. [`ClientConfig::from_lookup`] takes
//! the lookup as a closure so that callers decide where values come from.

use std::path::{
    Path,
    PathBuf,
};

use solana_commitment_config::CommitmentConfig;
use solana_sdk::{
    bs58,
    signature::Keypair,
};

use crate::{
    error::ScenarioError,
    funding::{
        FundingPolicy,
        InsufficientFundsAction,
    },
    transactions::SendTransactionConfig,
};

pub const RPC_ENDPOINT_VAR: &str = "RPC_ENDPOINT";
pub const SECRET_VAR: &str = "SECRET";
pub const KEYPAIR_PATH_VAR: &str = "PAYER_KEYPAIR";
pub const INSUFFICIENT_FUNDS_VAR: &str = "INSUFFICIENT_FUNDS";

/// Where the fee payer's signing key comes from.
#[derive(Clone, PartialEq, Eq)]
pub enum SignerSource {
    /// A base58 encoded secret key, or the JSON byte array text of one.
    Secret(String),
    /// A JSON file containing the secret key as a numeric array.
    KeypairFile(PathBuf),
}

// Keeps secrets out of `{:?}` output.
impl std::fmt::Debug for SignerSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignerSource::Secret(_) => f.write_str("Secret(..)"),
            SignerSource::KeypairFile(path) => f.debug_tuple("KeypairFile").field(path).finish(),
        }
    }
}

impl SignerSource {
    pub fn load(&self) -> Result<Keypair, ScenarioError> {
        match self {
            SignerSource::Secret(secret) => parse_keypair(secret),
            SignerSource::KeypairFile(path) => read_keypair_file(path),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub rpc_url: String,
    pub commitment: CommitmentConfig,
    pub signer: SignerSource,
    pub funding: FundingPolicy,
    pub send: SendTransactionConfig,
}

impl ClientConfig {
    pub fn new(rpc_url: impl Into<String>, signer: SignerSource) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            commitment: CommitmentConfig::confirmed(),
            signer,
            funding: FundingPolicy::default(),
            send: SendTransactionConfig::default(),
        }
    }

    /// Resolves the configuration from a key/value lookup, usually `std::env::var(..).ok()`.
    ///
    /// `SECRET` wins over `PAYER_KEYPAIR` when both are set. There is no fallback for either the
    /// endpoint or the signing material.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ScenarioError> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let rpc_url = get(RPC_ENDPOINT_VAR).ok_or(ScenarioError::MissingEnv(RPC_ENDPOINT_VAR))?;

        let signer = match (get(SECRET_VAR), get(KEYPAIR_PATH_VAR)) {
            (Some(secret), _) => SignerSource::Secret(secret),
            (None, Some(path)) => SignerSource::KeypairFile(PathBuf::from(path)),
            (None, None) => return Err(ScenarioError::MissingEnv("SECRET or PAYER_KEYPAIR")),
        };

        let mut config = Self::new(rpc_url, signer);
        if let Some(action) = get(INSUFFICIENT_FUNDS_VAR) {
            config.funding.on_insufficient = action.parse::<InsufficientFundsAction>()?;
        }

        Ok(config)
    }

    pub fn from_env() -> Result<Self, ScenarioError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }
}

/// Parses a secret key given either as a JSON byte array (`[12, 34, ...]`) or as base58.
pub fn parse_keypair(secret: &str) -> Result<Keypair, ScenarioError> {
    let secret = secret.trim();
    let bytes: Vec<u8> = if secret.starts_with('[') {
        serde_json::from_str(secret)
            .map_err(|e| ScenarioError::InvalidKeypair(format!("invalid JSON keypair: {e}")))?
    } else {
        bs58::decode(secret)
            .into_vec()
            .map_err(|e| ScenarioError::InvalidKeypair(format!("invalid base58 keypair: {e}")))?
    };

    Keypair::try_from(bytes.as_slice())
        .map_err(|e| ScenarioError::InvalidKeypair(format!("invalid keypair bytes: {e}")))
}

/// Reads a JSON numeric array keypair file.
pub fn read_keypair_file(path: &Path) -> Result<Keypair, ScenarioError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ScenarioError::KeypairFile {
        path: path.to_path_buf(),
        source,
    })?;
    parse_keypair(&contents)
}
