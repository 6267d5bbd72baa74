#![doc = include_str!("../README.md")]

mod common;
pub use common::*;

pub mod bank;
pub mod directory;
pub mod ledger;
pub mod stream;

pub use bank::Bank;
pub use directory::{Directory, DirectoryLookup, ProfileQuery};
pub use ledger::{Ledger, LedgerLookup};
