//! Token-level context: a mint's address, decimals and authorities, plus builders for every token
//! instruction the scenarios submit.

use solana_address::Address;
use solana_instruction::Instruction;
use solana_sdk::program_pack::Pack;
use spl_associated_token_account_interface::instruction::create_associated_token_account_idempotent;
use spl_token_2022_interface::instruction::{
    initialize_mint2,
    mint_to_checked,
    transfer_checked,
};
use spl_token_interface::state::Mint;

use crate::{
    error::ScenarioError,
    pda::{
        find_associated_token_address,
        TokenPrograms,
    },
};

/// Describes a mint. Decimals and authorities are fixed once the mint is initialized on-chain.
///
/// Associated token accounts always live under the canonical associated token account program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenContext {
    pub mint_address: Address,
    pub token_program: Address,
    pub mint_decimals: u8,
    pub mint_authority: Address,
    pub freeze_authority: Option<Address>,
}

impl TokenContext {
    pub const fn new(
        mint_address: Address,
        token_program: Address,
        mint_decimals: u8,
        mint_authority: Address,
        freeze_authority: Option<Address>,
    ) -> Self {
        Self {
            mint_address,
            token_program,
            mint_decimals,
            mint_authority,
            freeze_authority,
        }
    }

    pub fn token_program(&self) -> &Address {
        &self.token_program
    }

    pub fn get_ata_for(&self, owner: &Address) -> Address {
        let programs = TokenPrograms {
            token_program: self.token_program,
            ..Default::default()
        };
        find_associated_token_address(owner, &self.mint_address, &programs)
    }

    /// The system program `CreateAccount` sized for a mint and owned by the token program,
    /// followed by `InitializeMint2`.
    pub fn create_and_initialize_instructions(
        &self,
        payer: &Address,
        rent_lamports: u64,
    ) -> Result<(Instruction, Instruction), ScenarioError> {
        let create_mint_account = solana_system_interface::instruction::create_account(
            payer,
            &self.mint_address,
            rent_lamports,
            Mint::LEN as u64,
            self.token_program(),
        );

        let initialize_mint = initialize_mint2(
            self.token_program(),
            &self.mint_address,
            &self.mint_authority,
            self.freeze_authority.as_ref(),
            self.mint_decimals,
        )?;

        Ok((create_mint_account, initialize_mint))
    }

    /// Creates `owner`'s associated token account if it doesn't exist yet, paid for by `funder`.
    /// Succeeds without changes when the account already exists.
    pub fn create_ata(&self, funder: &Address, owner: &Address) -> Instruction {
        create_associated_token_account_idempotent(
            funder,
            owner,
            &self.mint_address,
            self.token_program(),
        )
    }

    /// Mints `amount` base units to `destination`, signed by the mint authority.
    pub fn mint_to(&self, destination: &Address, amount: u64) -> Result<Instruction, ScenarioError> {
        Ok(mint_to_checked(
            self.token_program(),
            &self.mint_address,
            destination,
            &self.mint_authority,
            &[],
            amount,
            self.mint_decimals,
        )?)
    }

    /// Moves `amount` base units from `source_owner`'s associated token account to `receiver`'s.
    pub fn transfer(
        &self,
        source_owner: &Address,
        receiver: &Address,
        amount: u64,
    ) -> Result<Instruction, ScenarioError> {
        Ok(transfer_checked(
            self.token_program(),
            &self.get_ata_for(source_owner),
            &self.mint_address,
            &self.get_ata_for(receiver),
            source_owner,
            &[],
            amount,
            self.mint_decimals,
        )?)
    }
}
