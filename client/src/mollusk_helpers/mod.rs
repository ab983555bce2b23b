//! An in-process SVM with the SPL Token and Associated Token Account programs loaded, for running
//! instruction plans without a validator.

use std::collections::HashMap;

use mollusk_svm::{
    program::keyed_account_for_system_program,
    Mollusk,
    MolluskContext,
};
use mollusk_svm_programs_token::{
    associated_token,
    token,
};
use solana_account::Account;
use solana_address::Address;
use solana_sdk::{
    program_pack::Pack,
    rent::Rent,
};
use spl_token_interface::state::Mint;

pub const MOLLUSK_DEFAULT_PAYER_LAMPORTS: u64 = 100_000_000_000;

/// Creates and returns a [`MolluskContext`] with the following created and initialized:
/// - The system program
/// - The SPL token program
/// - The associated token program
/// - The accounts passed
pub fn new_token_mollusk_context(
    accounts: Vec<(Address, Account)>,
) -> MolluskContext<HashMap<Address, Account>> {
    let mut mollusk = Mollusk::default();
    token::add_program(&mut mollusk);
    associated_token::add_program(&mut mollusk);

    let context = mollusk.with_context(HashMap::new());

    let programs = [
        keyed_account_for_system_program(),
        token::keyed_account(),
        associated_token::keyed_account(),
    ];
    for (address, account) in programs.into_iter().chain(accounts) {
        context.account_store.borrow_mut().insert(address, account);
    }

    context
}

/// A system-owned account holding `lamports`, e.g. a fee payer.
pub fn system_account(lamports: u64) -> Account {
    Account::new(lamports, 0, &solana_system_interface::program::ID)
}

/// Rent-exempt lamports for a mint under the default rent the SVM is configured with.
pub fn mint_rent() -> u64 {
    Rent::default().minimum_balance(Mint::LEN)
}

pub fn get_account(
    context: &MolluskContext<HashMap<Address, Account>>,
    address: &Address,
) -> Option<Account> {
    context.account_store.borrow().get(address).cloned()
}

/// Unpacks the mint at `address`, if it exists and is initialized.
pub fn get_mint(
    context: &MolluskContext<HashMap<Address, Account>>,
    address: &Address,
) -> Option<Mint> {
    get_account(context, address).and_then(|account| Mint::unpack(&account.data).ok())
}

/// The base unit balance of the token account at `address`, if it exists and is initialized.
pub fn get_token_balance(
    context: &MolluskContext<HashMap<Address, Account>>,
    address: &Address,
) -> Option<u64> {
    get_account(context, address)
        .and_then(|account| spl_token_interface::state::Account::unpack(&account.data).ok())
        .map(|account| account.amount)
}
