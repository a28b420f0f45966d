//! Transaction workflow engine
//!
//! Register, update and transfer run prepare, sign, finalize: the registry
//! issues an opaque payload, the wallet signs its exact bytes, and the
//! registry commits it. Unregister signs a fixed per-chain message instead.
//!
//! The engine never writes the domain cache. A successful finalize schedules
//! an authoritative account refresh and returns the transaction id; the cache
//! only changes when that refresh lands.

use crate::connectivity::Connectivity;
use crate::coordinator::AccountCoordinator;
use crate::inflight::{InFlightRegistry, OperationKind};
use crate::session::Session;
use crate::{Error, Result};
use registrar_client::{
    ApiError, FinalizeRequest, PrepareRegisterRequest, PrepareTransferRequest,
    PrepareUpdateRequest, RegistryApi, TransactionReceipt, UnregisterRequest,
};
use registrar_core::{
    fixed_message, normalize_name, validate_name, DnsTarget, PrivateKey, SignablePayload, Signer,
};
use registrar_params::Network;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Shown when a transfer recipient fails the address check
pub const INVALID_RECIPIENT: &str = "Please enter a valid PHPCoin address for the new owner.";

/// Committed mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionOutcome {
    /// Operation that ran
    pub operation: OperationKind,
    /// Normalized domain name
    pub name: String,
    /// On-chain transaction id
    pub transaction_id: String,
}

/// Unsigned intent for a two-phase operation
enum Intent {
    Register,
    Update(DnsTarget),
    Transfer(String),
}

impl Intent {
    fn kind(&self) -> OperationKind {
        match self {
            Intent::Register => OperationKind::Register,
            Intent::Update(_) => OperationKind::Update,
            Intent::Transfer(_) => OperationKind::Transfer,
        }
    }
}

/// Credentials captured at the start of a workflow
struct Credentials {
    key: PrivateKey,
    address: String,
}

/// Drives mutating operations against the registry
pub struct TransactionEngine {
    api: Arc<dyn RegistryApi>,
    signer: Arc<dyn Signer>,
    session: Arc<Session>,
    connectivity: Arc<Connectivity>,
    coordinator: Arc<AccountCoordinator>,
    inflight: Arc<InFlightRegistry>,
    network: Network,
}

impl TransactionEngine {
    /// Create engine
    pub fn new(
        api: Arc<dyn RegistryApi>,
        signer: Arc<dyn Signer>,
        session: Arc<Session>,
        connectivity: Arc<Connectivity>,
        coordinator: Arc<AccountCoordinator>,
        network: Network,
    ) -> Self {
        Self {
            api,
            signer,
            session,
            connectivity,
            coordinator,
            inflight: InFlightRegistry::new(),
            network,
        }
    }

    /// Operations currently running
    pub fn inflight(&self) -> &Arc<InFlightRegistry> {
        &self.inflight
    }

    /// Register `name` to the active wallet
    pub async fn register(&self, name: &str) -> Result<TransactionOutcome> {
        let result = self.run_two_phase(name, Intent::Register).await;
        log_outcome(OperationKind::Register, name, &result);
        result
    }

    /// Point `name` at `target`; [`DnsTarget::None`] clears the record
    pub async fn update_dns(&self, name: &str, target: DnsTarget) -> Result<TransactionOutcome> {
        let result = self.run_two_phase(name, Intent::Update(target)).await;
        log_outcome(OperationKind::Update, name, &result);
        result
    }

    /// Hand `name` to `recipient`
    pub async fn transfer(&self, name: &str, recipient: &str) -> Result<TransactionOutcome> {
        let result = self
            .run_two_phase(name, Intent::Transfer(recipient.trim().to_string()))
            .await;
        log_outcome(OperationKind::Transfer, name, &result);
        result
    }

    /// Release `name` back to the registry
    pub async fn unregister(&self, name: &str) -> Result<TransactionOutcome> {
        let result = self.run_unregister(name).await;
        log_outcome(OperationKind::Unregister, name, &result);
        result
    }

    async fn run_two_phase(&self, name: &str, intent: Intent) -> Result<TransactionOutcome> {
        let operation = intent.kind();
        let credentials = self.guard()?;
        let name = self.check_name(name)?;
        if let Intent::Transfer(recipient) = &intent {
            self.check_recipient(recipient, &credentials.address).await?;
        }

        let _slot = self.inflight.try_acquire(operation, &name)?;
        let public_key = self.public_key(&credentials.key).await?;

        debug!("Preparing {} of {}", operation, name);
        let payload = self.prepare(&name, &public_key, intent).await?;

        debug!("Signing {} payload ({} bytes)", operation, payload.len());
        let signature = self
            .signer
            .sign(payload.as_str(), &credentials.key)
            .await
            .map_err(signing_error)?;

        let request = FinalizeRequest {
            serialized_payload: payload,
            signature,
            public_key,
        };
        debug!("Finalizing {} of {}", operation, name);
        let receipt = self.finalize(operation, &request).await?;

        Ok(self.complete(operation, name, receipt, credentials.address))
    }

    async fn run_unregister(&self, name: &str) -> Result<TransactionOutcome> {
        let operation = OperationKind::Unregister;
        let credentials = self.guard()?;
        let name = self.check_name(name)?;

        let _slot = self.inflight.try_acquire(operation, &name)?;
        let public_key = self.public_key(&credentials.key).await?;

        let message = fixed_message(self.network.chain_id, &name);
        let signature = self
            .signer
            .sign(&message, &credentials.key)
            .await
            .map_err(signing_error)?;

        debug!("Submitting unregistration of {}", name);
        let result = self
            .api
            .unregister(&UnregisterRequest {
                name: name.clone(),
                signature,
                public_key,
            })
            .await;
        let receipt = self.observed(result)?;

        Ok(self.complete(operation, name, receipt, credentials.address))
    }

    /// Offline and credential checks, in that order
    fn guard(&self) -> Result<Credentials> {
        if self.connectivity.is_offline() {
            return Err(Error::Offline);
        }
        let key = self.session.private_key().ok_or(Error::Unauthenticated)?;
        let address = self.session.address().ok_or(Error::Unauthenticated)?;
        Ok(Credentials { key, address })
    }

    fn check_name(&self, name: &str) -> Result<String> {
        let name = normalize_name(name);
        validate_name(&name)?;
        if !self.network.has_known_extension(&name) {
            return Err(Error::Validation(format!(
                "{} is not served by this registry. Supported extensions: {}",
                name,
                self.network.extensions.join(", ")
            )));
        }
        Ok(name)
    }

    async fn check_recipient(&self, recipient: &str, own_address: &str) -> Result<()> {
        let valid = self
            .signer
            .is_valid_address(recipient)
            .await
            .map_err(|e| Error::ClientException(format!("Address check failed: {}", e)))?;
        if !valid {
            return Err(Error::Validation(INVALID_RECIPIENT.to_string()));
        }
        if recipient == own_address {
            return Err(Error::Validation(
                "You already own this domain.".to_string(),
            ));
        }
        Ok(())
    }

    async fn public_key(&self, key: &PrivateKey) -> Result<String> {
        self.signer.public_key(key).await.map_err(signing_error)
    }

    async fn prepare(&self, name: &str, public_key: &str, intent: Intent) -> Result<SignablePayload> {
        let result = match intent {
            Intent::Register => {
                self.api
                    .prepare_register(&PrepareRegisterRequest {
                        name: name.to_string(),
                        public_key: public_key.to_string(),
                    })
                    .await
            }
            Intent::Update(target) => {
                self.api
                    .prepare_update(&PrepareUpdateRequest {
                        name: name.to_string(),
                        dns: target.to_record(),
                    })
                    .await
            }
            Intent::Transfer(new_owner) => {
                self.api
                    .prepare_transfer(&PrepareTransferRequest {
                        name: name.to_string(),
                        new_owner,
                    })
                    .await
            }
        };
        let payload = self.observed(result)?;
        if payload.is_empty() {
            return Err(Error::RemoteRejected(ApiError::EmptyResponse.to_string()));
        }
        Ok(payload)
    }

    async fn finalize(
        &self,
        operation: OperationKind,
        request: &FinalizeRequest,
    ) -> Result<TransactionReceipt> {
        let result = match operation {
            OperationKind::Register => self.api.finalize_register(request).await,
            OperationKind::Update => self.api.finalize_update(request).await,
            OperationKind::Transfer => self.api.finalize_transfer(request).await,
            OperationKind::Unregister => {
                return Err(Error::ClientException(
                    "Unregistration has no finalize phase".to_string(),
                ))
            }
        };
        self.observed(result)
    }

    /// Feed a registry result through connectivity tracking
    fn observed<T>(&self, result: std::result::Result<T, ApiError>) -> Result<T> {
        self.connectivity.observe(&result);
        result.map_err(Error::from)
    }

    fn complete(
        &self,
        operation: OperationKind,
        name: String,
        receipt: TransactionReceipt,
        address: String,
    ) -> TransactionOutcome {
        self.coordinator.schedule_refresh(address);
        TransactionOutcome {
            operation,
            name,
            transaction_id: receipt.transaction_id,
        }
    }
}

fn signing_error(e: registrar_core::Error) -> Error {
    Error::ClientException(format!("Signing failed: {}", e))
}

fn log_outcome(operation: OperationKind, name: &str, result: &Result<TransactionOutcome>) {
    match result {
        Ok(outcome) => info!(
            "{} of {} committed: {}",
            operation, outcome.name, outcome.transaction_id
        ),
        Err(e) => warn!("{} of {} failed ({}): {}", operation, name, e.kind(), e),
    }
}
