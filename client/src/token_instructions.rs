//! Amount conversion and the ordered instruction plans submitted by the scenarios.

use std::collections::HashMap;

use rust_decimal::Decimal;
use solana_address::Address;
use solana_instruction::Instruction;

use crate::{
    context::token::TokenContext,
    error::ScenarioError,
};

/// Converts a human readable amount (e.g. `1.5`) into base units.
///
/// Amounts with more fractional digits than `decimals` are rejected instead of truncated.
pub fn ui_amount_to_base_units(amount: Decimal, decimals: u8) -> Result<u64, ScenarioError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(ScenarioError::NegativeAmount(amount.to_string()));
    }

    let amount = amount.normalize();
    let scale = amount.scale();
    if scale > decimals as u32 {
        return Err(ScenarioError::FractionalAmount {
            amount: amount.to_string(),
            decimals,
        });
    }

    let overflow = || ScenarioError::AmountOverflow {
        amount: amount.to_string(),
        decimals,
    };

    // mantissa * 10^(decimals - scale) == amount * 10^decimals
    let base_units = 10i128
        .checked_pow(decimals as u32 - scale)
        .and_then(|factor| amount.mantissa().checked_mul(factor))
        .ok_or_else(overflow)?;

    u64::try_from(base_units).map_err(|_| overflow())
}

/// Formats base units as a human readable amount, e.g. `900000000000` with 9 decimals is `900`.
pub fn fmt_ui_amount(base_units: u64, decimals: u8) -> String {
    Decimal::try_from_i128_with_scale(base_units as i128, decimals as u32)
        .map(|d| d.normalize().to_string())
        .unwrap_or_else(|_| format!("{base_units} (base units)"))
}

/// What an instruction in an [`InstructionPlan`] does, with the accounts its ordering depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstructionStep {
    CreateAccount {
        account: Address,
    },
    InitializeMint {
        mint: Address,
    },
    CreateAssociatedAccount {
        address: Address,
    },
    MintTo {
        mint: Address,
        destination: Address,
    },
    Transfer {
        source: Address,
        destination: Address,
    },
}

/// An ordered batch of instructions destined for a single atomic transaction.
#[derive(Debug, Clone, Default)]
pub struct InstructionPlan {
    steps: Vec<(InstructionStep, Instruction)>,
}

impl InstructionPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, step: InstructionStep, instruction: Instruction) -> &mut Self {
        self.steps.push((step, instruction));
        self
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn steps(&self) -> impl Iterator<Item = &InstructionStep> {
        self.steps.iter().map(|(step, _)| step)
    }

    pub fn instructions(&self) -> Vec<Instruction> {
        self.steps.iter().map(|(_, ix)| ix.clone()).collect()
    }

    pub fn into_instructions(self) -> Vec<Instruction> {
        self.steps.into_iter().map(|(_, ix)| ix).collect()
    }

    /// Checks that every account is created before it's initialized, minted to, or transferred
    /// with, and that every mint is initialized before it's minted from.
    ///
    /// Accounts that no step in the plan creates are assumed to already exist on-chain, except for
    /// mints being initialized, which must be created earlier in the same plan.
    pub fn check_order(&self) -> Result<(), ScenarioError> {
        let mut created: HashMap<Address, usize> = HashMap::new();
        let mut initialized: HashMap<Address, usize> = HashMap::new();
        for (i, (step, _)) in self.steps.iter().enumerate() {
            match step {
                InstructionStep::CreateAccount { account: address }
                | InstructionStep::CreateAssociatedAccount { address } => {
                    created.entry(*address).or_insert(i);
                }
                InstructionStep::InitializeMint { mint } => {
                    initialized.entry(*mint).or_insert(i);
                }
                _ => (),
            }
        }

        let created_after = |address: &Address, i: usize| -> Result<(), ScenarioError> {
            match created.get(address) {
                Some(&j) if j > i => Err(ScenarioError::InstructionOrder(format!(
                    "step {i} uses {address} before step {j} creates it"
                ))),
                _ => Ok(()),
            }
        };

        for (i, (step, _)) in self.steps.iter().enumerate() {
            match step {
                InstructionStep::CreateAccount { .. }
                | InstructionStep::CreateAssociatedAccount { .. } => (),
                InstructionStep::InitializeMint { mint } => match created.get(mint) {
                    Some(&j) if j < i => (),
                    _ => {
                        return Err(ScenarioError::InstructionOrder(format!(
                            "step {i} initializes mint {mint} without a preceding create-account"
                        )))
                    }
                },
                InstructionStep::MintTo { mint, destination } => {
                    if let Some(&j) = initialized.get(mint) {
                        if j > i {
                            return Err(ScenarioError::InstructionOrder(format!(
                                "step {i} mints from {mint} before step {j} initializes it"
                            )));
                        }
                    }
                    created_after(destination, i)?;
                }
                InstructionStep::Transfer {
                    source,
                    destination,
                } => {
                    created_after(source, i)?;
                    created_after(destination, i)?;
                }
            }
        }

        Ok(())
    }
}

/// Builds `[create-account, initialize-mint, create-associated-account, mint-to-checked]`: a new
/// mint funded by `payer`, its associated token account for `recipient`, and `amount` base units
/// minted into it.
pub fn mint_creation_plan(
    token: &TokenContext,
    payer: &Address,
    rent_lamports: u64,
    recipient: &Address,
    amount: u64,
) -> Result<InstructionPlan, ScenarioError> {
    let (create_mint_account, initialize_mint) =
        token.create_and_initialize_instructions(payer, rent_lamports)?;
    let destination = token.get_ata_for(recipient);

    let mut plan = InstructionPlan::new();
    plan.push(
        InstructionStep::CreateAccount {
            account: token.mint_address,
        },
        create_mint_account,
    )
    .push(
        InstructionStep::InitializeMint {
            mint: token.mint_address,
        },
        initialize_mint,
    )
    .push(
        InstructionStep::CreateAssociatedAccount {
            address: destination,
        },
        token.create_ata(payer, recipient),
    )
    .push(
        InstructionStep::MintTo {
            mint: token.mint_address,
            destination,
        },
        token.mint_to(&destination, amount)?,
    );

    plan.check_order()?;
    Ok(plan)
}

/// Appends `[create-associated-account(receiver), transfer-checked]` to `plan`. The receiver's
/// account is created idempotently and funded by `funder`.
pub fn push_transfer(
    plan: &mut InstructionPlan,
    token: &TokenContext,
    funder: &Address,
    source_owner: &Address,
    receiver: &Address,
    amount: u64,
) -> Result<(), ScenarioError> {
    let source = token.get_ata_for(source_owner);
    let destination = token.get_ata_for(receiver);

    plan.push(
        InstructionStep::CreateAssociatedAccount {
            address: destination,
        },
        token.create_ata(funder, receiver),
    )
    .push(
        InstructionStep::Transfer {
            source,
            destination,
        },
        token.transfer(source_owner, receiver, amount)?,
    );

    plan.check_order()
}

#[cfg(test)]
mod tests {
    use rust_decimal::dec;

    use super::*;

    #[test]
    fn whole_tokens_to_base_units() {
        let whole =
            |amount: u64, decimals: u8| ui_amount_to_base_units(Decimal::from(amount), decimals);

        assert_eq!(whole(21_000_000, 6).unwrap(), 21_000_000 * 10u64.pow(6));
        assert_eq!(whole(1000, 9).unwrap(), 1_000_000_000_000);
        assert_eq!(whole(100, 9).unwrap(), 100 * 10u64.pow(9));
        assert_eq!(whole(7, 0).unwrap(), 7);
        assert_eq!(whole(0, 19).unwrap(), 0);
        assert_eq!(whole(1, 19).unwrap(), 10u64.pow(19));

        assert!(matches!(
            whole(2, 19),
            Err(ScenarioError::AmountOverflow { .. })
        ));
        assert!(matches!(
            whole(1, 20),
            Err(ScenarioError::AmountOverflow { .. })
        ));
    }

    #[test]
    fn ui_amounts() {
        assert_eq!(ui_amount_to_base_units(dec!(21000000), 6).unwrap(), 21_000_000_000_000);
        assert_eq!(ui_amount_to_base_units(dec!(1.5), 6).unwrap(), 1_500_000);
        assert_eq!(ui_amount_to_base_units(dec!(0.000001), 6).unwrap(), 1);
        // Trailing zeros past the mint's decimals are fine.
        assert_eq!(ui_amount_to_base_units(dec!(2.50000000), 2).unwrap(), 250);
        assert_eq!(ui_amount_to_base_units(dec!(0), 9).unwrap(), 0);
    }

    #[test]
    fn ui_amounts_rejected() {
        assert!(matches!(
            ui_amount_to_base_units(dec!(0.0000001), 6),
            Err(ScenarioError::FractionalAmount { decimals: 6, .. })
        ));
        assert!(matches!(
            ui_amount_to_base_units(dec!(1.5), 0),
            Err(ScenarioError::FractionalAmount { .. })
        ));
        assert!(matches!(
            ui_amount_to_base_units(dec!(-1), 6),
            Err(ScenarioError::NegativeAmount(_))
        ));
        assert!(matches!(
            ui_amount_to_base_units(dec!(18446744073709551616), 0),
            Err(ScenarioError::AmountOverflow { .. })
        ));
        assert!(matches!(
            ui_amount_to_base_units(dec!(20), 18),
            Err(ScenarioError::AmountOverflow { .. })
        ));
    }

    #[test]
    fn format_ui_amounts() {
        assert_eq!(fmt_ui_amount(900_000_000_000, 9), "900");
        assert_eq!(fmt_ui_amount(1_500_000, 6), "1.5");
        assert_eq!(fmt_ui_amount(1, 6), "0.000001");
    }

    fn token(decimals: u8) -> (TokenContext, Address) {
        let payer = Address::new_unique();
        let token = TokenContext::new(
            Address::new_unique(),
            spl_token_interface::ID,
            decimals,
            payer,
            Some(payer),
        );
        (token, payer)
    }

    #[test]
    fn mint_creation_order() {
        let (token, payer) = token(6);
        let plan = mint_creation_plan(&token, &payer, 1_461_600, &payer, 21_000_000_000_000)
            .unwrap();
        let ata = token.get_ata_for(&payer);

        assert_eq!(
            plan.steps().copied().collect::<Vec<_>>(),
            vec![
                InstructionStep::CreateAccount {
                    account: token.mint_address
                },
                InstructionStep::InitializeMint {
                    mint: token.mint_address
                },
                InstructionStep::CreateAssociatedAccount { address: ata },
                InstructionStep::MintTo {
                    mint: token.mint_address,
                    destination: ata
                },
            ]
        );

        let programs = plan
            .instructions()
            .iter()
            .map(|ix| ix.program_id)
            .collect::<Vec<_>>();
        assert_eq!(
            programs,
            vec![
                solana_system_interface::program::ID,
                spl_token_interface::ID,
                spl_associated_token_account_interface::program::ID,
                spl_token_interface::ID,
            ]
        );
    }

    #[test]
    fn transfer_order() {
        let (token, payer) = token(9);
        let receiver = Address::new_unique();
        let mut plan =
            mint_creation_plan(&token, &payer, 1_461_600, &payer, 1_000_000_000_000).unwrap();
        push_transfer(&mut plan, &token, &payer, &payer, &receiver, 100_000_000_000).unwrap();

        assert_eq!(plan.len(), 6);
        let steps = plan.steps().copied().collect::<Vec<_>>();
        assert_eq!(
            steps[4],
            InstructionStep::CreateAssociatedAccount {
                address: token.get_ata_for(&receiver)
            }
        );
        assert_eq!(
            steps[5],
            InstructionStep::Transfer {
                source: token.get_ata_for(&payer),
                destination: token.get_ata_for(&receiver),
            }
        );
    }

    #[test]
    fn out_of_order_plans_rejected() {
        let (token, payer) = token(6);
        let good = mint_creation_plan(&token, &payer, 1_461_600, &payer, 1).unwrap();
        let entries = good.steps.clone();

        // Initialize before create.
        let mut swapped = InstructionPlan::new();
        for i in [1, 0, 2, 3] {
            let (step, ix) = entries[i].clone();
            swapped.push(step, ix);
        }
        assert!(matches!(
            swapped.check_order(),
            Err(ScenarioError::InstructionOrder(_))
        ));

        // Mint to the associated account before creating it.
        let mut early_mint = InstructionPlan::new();
        for i in [0, 1, 3, 2] {
            let (step, ix) = entries[i].clone();
            early_mint.push(step, ix);
        }
        assert!(early_mint.check_order().is_err());

        // Mint before the mint is initialized.
        let mut uninitialized = InstructionPlan::new();
        for i in [0, 2, 3, 1] {
            let (step, ix) = entries[i].clone();
            uninitialized.push(step, ix);
        }
        assert!(uninitialized.check_order().is_err());

        // Initializing a mint that's never created.
        let mut missing_create = InstructionPlan::new();
        for i in [1, 2, 3] {
            let (step, ix) = entries[i].clone();
            missing_create.push(step, ix);
        }
        assert!(missing_create.check_order().is_err());
    }

    #[test]
    fn transfer_into_existing_accounts() {
        // Transfers between accounts created outside the plan are fine.
        let (token, payer) = token(9);
        let receiver = Address::new_unique();
        let mut plan = InstructionPlan::new();
        plan.push(
            InstructionStep::Transfer {
                source: token.get_ata_for(&payer),
                destination: token.get_ata_for(&receiver),
            },
            token.transfer(&payer, &receiver, 5).unwrap(),
        );
        assert!(plan.check_order().is_ok());
    }
}
