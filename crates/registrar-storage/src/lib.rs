//! Local persistence for the PHPCoin registrar
//!
//! SQLite-backed key/value storage, the domain cache and the persisted
//! wallet session.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cache;
pub mod database;
pub mod error;
pub mod local_store;
pub mod migrations;
pub mod wallet_store;

pub use cache::DomainCache;
pub use database::Database;
pub use error::{Error, Result};
pub use local_store::{LocalStore, MemoryStore, ADDRESS_KEY, DOMAINS_KEY, PRIVATE_KEY_KEY};
pub use wallet_store::{StoredWallet, WalletStore};
