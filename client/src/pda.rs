//! Program-derived address helpers.

use solana_address::Address;
use solana_pubkey::Pubkey;

/// The token program and associated token account program that addresses are derived under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenPrograms {
    pub token_program: Address,
    pub associated_token_program: Address,
}

impl Default for TokenPrograms {
    fn default() -> Self {
        Self {
            token_program: spl_token_interface::ID,
            associated_token_program: spl_associated_token_account_interface::program::ID,
        }
    }
}

impl TokenPrograms {
    pub const fn new(token_program: Address, associated_token_program: Address) -> Self {
        Self {
            token_program,
            associated_token_program,
        }
    }
}

/// Finds the associated token account address and bump for an `(owner, mint)` pair.
///
/// The seeds are `[owner, token_program, mint]` under the associated token account program. The
/// account doesn't need to exist for its address to be derived, and no private key exists for it.
pub fn find_associated_token_address_and_bump(
    owner: &Address,
    mint: &Address,
    programs: &TokenPrograms,
) -> (Address, u8) {
    Pubkey::find_program_address(
        &[
            owner.as_ref(),
            programs.token_program.as_ref(),
            mint.as_ref(),
        ],
        &programs.associated_token_program,
    )
}

pub fn find_associated_token_address(
    owner: &Address,
    mint: &Address,
    programs: &TokenPrograms,
) -> Address {
    find_associated_token_address_and_bump(owner, mint, programs).0
}
