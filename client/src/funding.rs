//! Pre-flight fee payer balance check.
//!
//! What happens when the payer is underfunded is an explicit part of the configuration rather than
//! a side effect: request an airdrop (test clusters only), abort, or warn and carry on.

use std::str::FromStr;

use strum_macros::Display;

use crate::error::ScenarioError;

pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;
pub const DEFAULT_THRESHOLD_LAMPORTS: u64 = LAMPORTS_PER_SOL / 100;
pub const DEFAULT_AIRDROP_LAMPORTS: u64 = 10 * LAMPORTS_PER_SOL;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum InsufficientFundsAction {
    /// Ask the cluster's faucet for [`FundingPolicy::airdrop_lamports`] and wait for it to land.
    #[default]
    #[strum(serialize = "airdrop")]
    RequestAirdrop,
    /// Stop with [`ScenarioError::InsufficientFunds`] before anything is submitted.
    Abort,
    /// Log the shortfall and submit anyway.
    Warn,
}

impl FromStr for InsufficientFundsAction {
    type Err = ScenarioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "airdrop" => Ok(Self::RequestAirdrop),
            "abort" => Ok(Self::Abort),
            "warn" => Ok(Self::Warn),
            _ => Err(ScenarioError::InvalidFundingAction(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FundingPolicy {
    pub threshold_lamports: u64,
    pub airdrop_lamports: u64,
    pub on_insufficient: InsufficientFundsAction,
}

impl Default for FundingPolicy {
    fn default() -> Self {
        Self {
            threshold_lamports: DEFAULT_THRESHOLD_LAMPORTS,
            airdrop_lamports: DEFAULT_AIRDROP_LAMPORTS,
            on_insufficient: Default::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FundingDecision {
    Sufficient,
    RequestAirdrop(u64),
    ProceedUnderfunded,
}

impl FundingPolicy {
    pub fn decide(&self, balance: u64) -> Result<FundingDecision, ScenarioError> {
        if balance >= self.threshold_lamports {
            return Ok(FundingDecision::Sufficient);
        }

        match self.on_insufficient {
            InsufficientFundsAction::RequestAirdrop => {
                Ok(FundingDecision::RequestAirdrop(self.airdrop_lamports))
            }
            InsufficientFundsAction::Abort => Err(ScenarioError::InsufficientFunds {
                balance,
                threshold: self.threshold_lamports,
            }),
            InsufficientFundsAction::Warn => Ok(FundingDecision::ProceedUnderfunded),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn sufficient_balance_skips_airdrop() {
        let policy = FundingPolicy::default();
        assert_eq!(
            policy.decide(DEFAULT_THRESHOLD_LAMPORTS).unwrap(),
            FundingDecision::Sufficient
        );
        assert_eq!(
            policy.decide(5 * LAMPORTS_PER_SOL).unwrap(),
            FundingDecision::Sufficient
        );
    }

    #[test]
    fn low_balance_requests_airdrop_by_default() {
        let policy = FundingPolicy::default();
        assert_eq!(
            policy.decide(DEFAULT_THRESHOLD_LAMPORTS - 1).unwrap(),
            FundingDecision::RequestAirdrop(DEFAULT_AIRDROP_LAMPORTS)
        );
        assert_eq!(
            policy.decide(0).unwrap(),
            FundingDecision::RequestAirdrop(DEFAULT_AIRDROP_LAMPORTS)
        );
    }

    #[test]
    fn abort_and_warn() {
        let abort = FundingPolicy {
            on_insufficient: InsufficientFundsAction::Abort,
            ..Default::default()
        };
        let err = abort.decide(1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InsufficientFunds);
        assert!(matches!(
            err,
            ScenarioError::InsufficientFunds {
                balance: 1,
                threshold: DEFAULT_THRESHOLD_LAMPORTS,
            }
        ));

        let warn = FundingPolicy {
            on_insufficient: InsufficientFundsAction::Warn,
            ..Default::default()
        };
        assert_eq!(warn.decide(1).unwrap(), FundingDecision::ProceedUnderfunded);
    }

    #[test]
    fn parse_actions() {
        assert_eq!(
            "airdrop".parse::<InsufficientFundsAction>().unwrap(),
            InsufficientFundsAction::RequestAirdrop
        );
        assert_eq!(
            " Abort ".parse::<InsufficientFundsAction>().unwrap(),
            InsufficientFundsAction::Abort
        );
        assert_eq!(
            "warn".parse::<InsufficientFundsAction>().unwrap(),
            InsufficientFundsAction::Warn
        );
        assert!("retry".parse::<InsufficientFundsAction>().is_err());

        // Display round-trips through the parser.
        for action in [
            InsufficientFundsAction::RequestAirdrop,
            InsufficientFundsAction::Abort,
            InsufficientFundsAction::Warn,
        ] {
            assert_eq!(action.to_string().parse::<InsufficientFundsAction>().unwrap(), action);
        }
    }
}
