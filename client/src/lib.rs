//! Client-side pipeline for creating SPL token mints in a single atomic transaction.
//!
//! [`config`] loads the endpoint and fee payer, [`pda`] derives associated token account
//! addresses, [`token_instructions`] builds ordered instruction plans, and [`transactions`]
//! assembles, signs and submits them. [`scenarios`] strings the stages together.

pub mod config;
pub mod context;
pub mod error;
pub mod funding;
pub mod logs;
pub mod mollusk_helpers;
pub mod pda;
pub mod scenarios;
pub mod token_instructions;
pub mod transactions;

pub use error::{
    ErrorKind,
    ScenarioError,
};
pub use logs::LogColor;
