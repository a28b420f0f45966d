//! PHPCoin registrar service
//!
//! Transaction workflows, the wallet session, account refresh and view
//! reconciliation, wired together by [`Registrar`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod connectivity;
pub mod coordinator;
pub mod directory;
pub mod error;
pub mod inflight;
pub mod reconcile;
pub mod registrar;
pub mod session;
pub mod workflow;

pub use config::ServiceConfig;
pub use connectivity::{ApiStatus, Connectivity};
pub use coordinator::AccountCoordinator;
pub use directory::{Bootstrap, Directory, Quote};
pub use error::{Error, ErrorKind, Result, NOT_AUTHENTICATED, SERVICE_UNAVAILABLE};
pub use inflight::{InFlightGuard, InFlightRegistry, OperationKind};
pub use reconcile::{reconcile, DomainView, ViewDecision, ViewEvent};
pub use registrar::Registrar;
pub use session::{generate_nonce, Session, NONCE_LENGTH};
pub use workflow::{TransactionEngine, TransactionOutcome, INVALID_RECIPIENT};
