//! The two end-to-end scripts, each submitted as a single atomic transaction.
//!
//! Every scenario is split into a pure `plan` step, which builds the ordered instructions for a
//! given mint and payer, and an async runner that funds the payer, fetches rent and a blockhash,
//! submits the plan, and reports back.

use colored::Colorize;
use rust_decimal::{
    dec,
    Decimal,
};
use solana_address::Address;
use solana_sdk::signature::{
    Keypair,
    Signature,
    Signer,
};

use crate::{
    context::token::TokenContext,
    error::ScenarioError,
    fmt_kv,
    funding::FundingPolicy,
    logs::log_header,
    print_kv,
    token_instructions::{
        fmt_ui_amount,
        mint_creation_plan,
        push_transfer,
        ui_amount_to_base_units,
        InstructionPlan,
    },
    transactions::CustomRpcClient,
    LogColor,
};

/// Creates a mint whose mint and freeze authority is the payer, then mints `amount` tokens into
/// the payer's associated token account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MintScenario {
    pub decimals: u8,
    pub amount: Decimal,
}

impl Default for MintScenario {
    fn default() -> Self {
        Self {
            decimals: 6,
            amount: dec!(21000000),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MintReport {
    pub mint: Address,
    pub token_account: Address,
    pub base_units: u64,
    pub signature: Signature,
}

impl MintScenario {
    /// The mint descriptor for a new mint at `mint` with the payer as both authorities.
    pub fn token(&self, mint: &Address, payer: &Address) -> TokenContext {
        TokenContext::new(
            *mint,
            spl_token_interface::ID,
            self.decimals,
            *payer,
            Some(*payer),
        )
    }

    pub fn base_units(&self) -> Result<u64, ScenarioError> {
        ui_amount_to_base_units(self.amount, self.decimals)
    }

    pub fn plan(
        &self,
        token: &TokenContext,
        payer: &Address,
        rent_lamports: u64,
    ) -> Result<InstructionPlan, ScenarioError> {
        mint_creation_plan(token, payer, rent_lamports, payer, self.base_units()?)
    }
}

/// Creates a mint, mints `minted` tokens to the payer, and transfers `transferred` of them to a
/// freshly generated receiver whose token account the payer pays for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferScenario {
    pub decimals: u8,
    pub minted: Decimal,
    pub transferred: Decimal,
}

impl Default for TransferScenario {
    fn default() -> Self {
        Self {
            decimals: 9,
            minted: dec!(1000),
            transferred: dec!(100),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TransferReport {
    pub mint: Address,
    pub payer_token_account: Address,
    pub receiver: Address,
    pub receiver_token_account: Address,
    pub signature: Signature,
    pub payer_balance: u64,
    pub receiver_balance: u64,
}

impl TransferScenario {
    pub fn token(&self, mint: &Address, payer: &Address) -> TokenContext {
        MintScenario {
            decimals: self.decimals,
            amount: self.minted,
        }
        .token(mint, payer)
    }

    /// Returns the minted and transferred amounts in base units.
    pub fn base_units(&self) -> Result<(u64, u64), ScenarioError> {
        let minted = ui_amount_to_base_units(self.minted, self.decimals)?;
        let transferred = ui_amount_to_base_units(self.transferred, self.decimals)?;
        if transferred > minted {
            return Err(ScenarioError::TransferExceedsMint {
                minted,
                transferred,
            });
        }
        Ok((minted, transferred))
    }

    pub fn plan(
        &self,
        token: &TokenContext,
        payer: &Address,
        receiver: &Address,
        rent_lamports: u64,
    ) -> Result<InstructionPlan, ScenarioError> {
        let (minted, transferred) = self.base_units()?;
        let mut plan = mint_creation_plan(token, payer, rent_lamports, payer, minted)?;
        push_transfer(&mut plan, token, payer, payer, receiver, transferred)?;
        Ok(plan)
    }
}

pub async fn create_mint_and_mint_to_payer(
    rpc: &CustomRpcClient,
    payer: &Keypair,
    funding: &FundingPolicy,
    scenario: &MintScenario,
) -> Result<MintReport, ScenarioError> {
    log_header("SPL token mint");
    // Reject bad amounts before touching the network.
    let base_units = scenario.base_units()?;

    print_kv!("Payer", payer.pubkey());
    rpc.ensure_funded(&payer.pubkey(), funding).await?;

    let mint = Keypair::new();
    let token = scenario.token(&mint.pubkey(), &payer.pubkey());
    let rent = rpc.minimum_balance_for_mint().await?;
    let plan = scenario.plan(&token, &payer.pubkey(), rent)?;

    print_kv!(
        "Minting",
        format!("{} tokens ({base_units} base units)", scenario.amount)
    );
    let signature = rpc
        .send_and_confirm_txn(payer, &[&mint], &plan.into_instructions())
        .await?;

    let report = MintReport {
        mint: mint.pubkey(),
        token_account: token.get_ata_for(&payer.pubkey()),
        base_units,
        signature,
    };
    print_kv!("Mint Address", report.mint, LogColor::Header);
    print_kv!("Token Account", report.token_account);
    print_kv!("Transaction Signature", report.signature, LogColor::Header);

    Ok(report)
}

pub async fn create_mint_and_transfer(
    rpc: &CustomRpcClient,
    payer: &Keypair,
    funding: &FundingPolicy,
    scenario: &TransferScenario,
) -> Result<TransferReport, ScenarioError> {
    log_header("SPL token mint and transfer");
    let (minted, transferred) = scenario.base_units()?;

    print_kv!("Payer", payer.pubkey());
    rpc.ensure_funded(&payer.pubkey(), funding).await?;

    let mint = Keypair::new();
    let receiver = Keypair::new();
    let token = scenario.token(&mint.pubkey(), &payer.pubkey());
    let rent = rpc.minimum_balance_for_mint().await?;
    let plan = scenario.plan(&token, &payer.pubkey(), &receiver.pubkey(), rent)?;

    print_kv!("Mint", mint.pubkey());
    print_kv!("Receiver", receiver.pubkey());
    print_kv!(
        "Minting",
        fmt_ui_amount(minted, scenario.decimals),
        LogColor::Info
    );
    print_kv!(
        "Transferring",
        fmt_ui_amount(transferred, scenario.decimals),
        LogColor::Info
    );

    // The receiver never signs: its token account is funded by the payer.
    let signature = rpc
        .send_and_confirm_txn(payer, &[&mint], &plan.into_instructions())
        .await?;

    let payer_token_account = token.get_ata_for(&payer.pubkey());
    let receiver_token_account = token.get_ata_for(&receiver.pubkey());
    let payer_balance = rpc.token_balance(&payer_token_account).await?;
    let receiver_balance = rpc.token_balance(&receiver_token_account).await?;

    println!(
        "{}\n{}",
        fmt_kv!(
            "Payer balance",
            fmt_ui_amount(payer_balance, scenario.decimals)
        ),
        fmt_kv!(
            "Receiver balance",
            fmt_ui_amount(receiver_balance, scenario.decimals)
        ),
    );
    print_kv!("Transaction Signature", signature, LogColor::Header);

    Ok(TransferReport {
        mint: mint.pubkey(),
        payer_token_account,
        receiver: receiver.pubkey(),
        receiver_token_account,
        signature,
        payer_balance,
        receiver_balance,
    })
}
