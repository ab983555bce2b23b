//! Transaction assembly and a lightweight, nonblocking RPC client for funding the fee payer,
//! submitting atomic transactions and reading balances back.

use colored::Colorize;
use itertools::Itertools;
use solana_address::Address;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_commitment_config::CommitmentConfig;
use solana_instruction::Instruction;
use solana_sdk::{
    hash::Hash,
    message::Message,
    program_pack::Pack,
    signature::{
        Keypair,
        Signature,
        Signer,
    },
    transaction::Transaction,
};
use spl_token_interface::state::{
    Account,
    Mint,
};

use crate::{
    config::ClientConfig,
    error::ScenarioError,
    funding::{
        FundingDecision,
        FundingPolicy,
    },
    print_kv,
    LogColor,
};

/// A recent blockhash and the last block height at which a transaction using it can land.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Freshness {
    pub blockhash: Hash,
    pub last_valid_block_height: u64,
}

impl Freshness {
    pub fn is_expired_at(&self, block_height: u64) -> bool {
        block_height > self.last_valid_block_height
    }

    pub fn ensure_fresh(&self, block_height: u64) -> Result<(), ScenarioError> {
        if self.is_expired_at(block_height) {
            return Err(ScenarioError::Expired {
                last_valid_block_height: self.last_valid_block_height,
                current_block_height: block_height,
            });
        }
        Ok(())
    }
}

/// A transaction bound to exactly one ordered list of instructions, one fee payer and one
/// blockhash. Once the blockhash's horizon passes it can no longer be submitted.
#[derive(Debug, Clone)]
pub struct AssembledTransaction {
    pub transaction: Transaction,
    pub freshness: Freshness,
}

impl AssembledTransaction {
    pub fn new(instructions: &[Instruction], payer: &Address, freshness: Freshness) -> Self {
        let message = Message::new_with_blockhash(instructions, Some(payer), &freshness.blockhash);
        Self {
            transaction: Transaction::new_unsigned(message),
            freshness,
        }
    }

    /// Signs with every required signer. Fails if a required signature is missing or a keypair
    /// isn't part of the transaction.
    pub fn sign(&mut self, signers: &[&Keypair]) -> Result<(), ScenarioError> {
        self.transaction
            .try_sign(signers, self.freshness.blockhash)?;
        Ok(())
    }

    pub fn fee_payer(&self) -> Option<&Address> {
        self.transaction.message.account_keys.first()
    }

    pub fn is_signed(&self) -> bool {
        self.transaction.is_signed()
    }
}

#[derive(Debug, Clone)]
pub struct SendTransactionConfig {
    /// Print the submitted instructions and the resulting signature.
    pub debug_logs: bool,
}

impl Default for SendTransactionConfig {
    fn default() -> Self {
        SendTransactionConfig { debug_logs: true }
    }
}

pub struct CustomRpcClient {
    pub client: RpcClient,
    pub config: SendTransactionConfig,
}

impl Default for CustomRpcClient {
    fn default() -> Self {
        Self::new_from_url(
            "http://localhost:8899",
            CommitmentConfig::confirmed(),
            Default::default(),
        )
    }
}

impl CustomRpcClient {
    pub fn new(client: RpcClient, config: SendTransactionConfig) -> Self {
        CustomRpcClient { client, config }
    }

    pub fn new_from_url(
        url: &str,
        commitment: CommitmentConfig,
        config: SendTransactionConfig,
    ) -> Self {
        CustomRpcClient {
            client: RpcClient::new_with_commitment(url.into(), commitment),
            config,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new_from_url(&config.rpc_url, config.commitment, config.send.clone())
    }

    /// Fetches a blockhash to assemble against. Call this immediately before assembly.
    pub async fn latest_freshness(&self) -> Result<Freshness, ScenarioError> {
        let (blockhash, last_valid_block_height) = self
            .client
            .get_latest_blockhash_with_commitment(self.client.commitment())
            .await?;
        Ok(Freshness {
            blockhash,
            last_valid_block_height,
        })
    }

    pub async fn lamport_balance(&self, address: &Address) -> Result<u64, ScenarioError> {
        Ok(self.client.get_balance(address).await?)
    }

    pub async fn minimum_balance_for_mint(&self) -> Result<u64, ScenarioError> {
        Ok(self
            .client
            .get_minimum_balance_for_rent_exemption(Mint::LEN)
            .await?)
    }

    /// The balance, in base units, of a token account.
    pub async fn token_balance(&self, token_account: &Address) -> Result<u64, ScenarioError> {
        let data = self.client.get_account_data(token_account).await?;
        let account = Account::unpack(&data)?;
        Ok(account.amount)
    }

    /// Checks the payer's balance against `policy` and carries out its decision before anything
    /// is submitted.
    pub async fn ensure_funded(
        &self,
        address: &Address,
        policy: &FundingPolicy,
    ) -> Result<FundingDecision, ScenarioError> {
        let balance = self.lamport_balance(address).await?;
        print_kv!("Payer balance (lamports)", balance);

        let decision = policy.decide(balance)?;
        match decision {
            FundingDecision::Sufficient => (),
            FundingDecision::RequestAirdrop(lamports) => {
                print_kv!(
                    "Insufficient balance, requesting airdrop",
                    lamports,
                    LogColor::Warning
                );
                self.airdrop(address, lamports).await?;
            }
            FundingDecision::ProceedUnderfunded => {
                print_kv!(
                    "Insufficient balance, continuing anyway",
                    balance,
                    LogColor::Warning
                );
            }
        }

        Ok(decision)
    }

    /// Requests an airdrop from the cluster's faucet and waits for it to land.
    pub async fn airdrop(
        &self,
        address: &Address,
        lamports: u64,
    ) -> Result<Signature, ScenarioError> {
        let airdrop_signature = self.client.request_airdrop(address, lamports).await?;

        for _ in 0..MAX_TRIES {
            if self.client.confirm_transaction(&airdrop_signature).await? {
                return Ok(airdrop_signature);
            }
            tokio::time::sleep(std::time::Duration::from_millis(500)).await;
        }

        Err(ScenarioError::AirdropNotConfirmed(*address))
    }

    /// Sends an already signed transaction and blocks until the cluster confirms or rejects it.
    /// Nothing is retried.
    pub async fn submit(
        &self,
        assembled: &AssembledTransaction,
    ) -> Result<Signature, ScenarioError> {
        let block_height = self.client.get_block_height().await?;
        assembled.freshness.ensure_fresh(block_height)?;

        if self.config.debug_logs {
            for (i, ix) in assembled.transaction.message.instructions.iter().enumerate() {
                let program_id = ix.program_id(&assembled.transaction.message.account_keys);
                print_kv!(format!("  Instruction {i}"), program_id, LogColor::Debug);
            }
        }

        match self
            .client
            .send_and_confirm_transaction(&assembled.transaction)
            .await
        {
            Ok(signature) => {
                if self.config.debug_logs {
                    print_kv!("Confirmed", signature, LogColor::Info);
                }
                Ok(signature)
            }
            Err(error) => {
                print_kv!("Failed transaction submission", error, LogColor::Error);
                if let Some(payer) = assembled.fee_payer() {
                    print_kv!("Payer", payer, LogColor::Error);
                }
                Err(ScenarioError::Rejected(error.to_string()))
            }
        }
    }

    /// Fetches a fresh blockhash, assembles `instructions` into one atomic transaction paid for by
    /// `payer`, signs it with `payer` and `signers`, and submits it.
    pub async fn send_and_confirm_txn(
        &self,
        payer: &Keypair,
        signers: &[&Keypair],
        instructions: &[Instruction],
    ) -> Result<Signature, ScenarioError> {
        let freshness = self.latest_freshness().await?;
        let mut assembled = AssembledTransaction::new(instructions, &payer.pubkey(), freshness);

        let all_signers = std::iter::once(payer)
            .chain(signers.iter().copied())
            .unique_by(|kp| kp.pubkey())
            .collect_vec();
        assembled.sign(&all_signers)?;

        self.submit(&assembled).await
    }
}

const MAX_TRIES: u8 = 20;
