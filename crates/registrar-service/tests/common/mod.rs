//! Test doubles for service tests

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use registrar_client::{
    ApiError, AuthRequest, AuthResponse, FinalizeRequest, Operation, PrepareRegisterRequest,
    PrepareTransferRequest, PrepareUpdateRequest, RegistryApi, TransactionReceipt,
    UnregisterRequest,
};
use registrar_core::{
    AccountInfo, Amount, Domain, DomainStatus, GlobalStats, PrivateKey, SignablePayload, Signer,
};
use registrar_params::Network;
use registrar_service::Registrar;
use registrar_storage::{LocalStore, MemoryStore};
use std::sync::Arc;
use tokio::sync::Notify;

pub const ADDRESS_A: &str = "PaWalletA";
pub const ADDRESS_B: &str = "PbWalletB";
pub const PAYLOAD: &str = r#"{"name":"x.tld","owner":"A"}"#;

type Reply<T> = Mutex<Result<T, ApiError>>;

/// Registry double that records every call and answers from a script
pub struct MockApi {
    calls: Mutex<Vec<Operation>>,
    pub auth: Reply<AuthResponse>,
    pub stats: Reply<GlobalStats>,
    pub search: Reply<Domain>,
    pub trending: Reply<Vec<String>>,
    pub prepare: Reply<String>,
    pub finalize: Reply<TransactionReceipt>,
    pub unregister: Reply<TransactionReceipt>,
    pub account: Reply<AccountInfo>,
    pub finalized: Mutex<Vec<FinalizeRequest>>,
    pub transfers: Mutex<Vec<PrepareTransferRequest>>,
    pub updates: Mutex<Vec<PrepareUpdateRequest>>,
    pub unregisters: Mutex<Vec<UnregisterRequest>>,
    /// When set, prepare calls wait for a notification
    pub prepare_gate: Mutex<Option<Arc<Notify>>>,
}

impl MockApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            auth: Mutex::new(Ok(AuthResponse {
                address: ADDRESS_A.to_string(),
            })),
            stats: Mutex::new(Ok(GlobalStats {
                total_domains: 42,
                total_funds: Amount::from_coins(100),
            })),
            search: Mutex::new(Ok(Domain::new("dapp.phpcoin", DomainStatus::Taken))),
            trending: Mutex::new(Ok(vec!["web3.phpcoin".to_string()])),
            prepare: Mutex::new(Ok(PAYLOAD.to_string())),
            finalize: Mutex::new(Ok(receipt("tx1"))),
            unregister: Mutex::new(Ok(receipt("tx-unreg"))),
            account: Mutex::new(Ok(AccountInfo::default())),
            finalized: Mutex::new(Vec::new()),
            transfers: Mutex::new(Vec::new()),
            updates: Mutex::new(Vec::new()),
            unregisters: Mutex::new(Vec::new()),
            prepare_gate: Mutex::new(None),
        })
    }

    pub fn calls(&self) -> Vec<Operation> {
        self.calls.lock().clone()
    }

    pub fn count(&self, op: Operation) -> usize {
        self.calls.lock().iter().filter(|c| **c == op).count()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    pub fn set_account(&self, balance: Amount, domains: Vec<Domain>) {
        *self.account.lock() = Ok(AccountInfo { balance, domains });
    }

    fn record(&self, op: Operation) {
        self.calls.lock().push(op);
    }

    async fn prepared(&self, op: Operation) -> Result<SignablePayload, ApiError> {
        self.record(op);
        let gate = self.prepare_gate.lock().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        let text = self.prepare.lock().clone()?;
        SignablePayload::from_json_text(text).map_err(|e| ApiError::Decode(e.to_string()))
    }

    fn finalized(&self, op: Operation, request: &FinalizeRequest) -> Result<TransactionReceipt, ApiError> {
        self.record(op);
        self.finalized.lock().push(request.clone());
        self.finalize.lock().clone()
    }
}

#[async_trait]
impl RegistryApi for MockApi {
    async fn auth(&self, _request: &AuthRequest) -> registrar_client::Result<AuthResponse> {
        self.record(Operation::Auth);
        self.auth.lock().clone()
    }

    async fn stats(&self) -> registrar_client::Result<GlobalStats> {
        self.record(Operation::Stats);
        self.stats.lock().clone()
    }

    async fn search(&self, _name: &str) -> registrar_client::Result<Domain> {
        self.record(Operation::Search);
        self.search.lock().clone()
    }

    async fn trending(&self) -> registrar_client::Result<Vec<String>> {
        self.record(Operation::Trending);
        self.trending.lock().clone()
    }

    async fn prepare_register(
        &self,
        _request: &PrepareRegisterRequest,
    ) -> registrar_client::Result<SignablePayload> {
        self.prepared(Operation::PrepareRegister).await
    }

    async fn finalize_register(
        &self,
        request: &FinalizeRequest,
    ) -> registrar_client::Result<TransactionReceipt> {
        self.finalized(Operation::FinalizeRegister, request)
    }

    async fn prepare_update(
        &self,
        request: &PrepareUpdateRequest,
    ) -> registrar_client::Result<SignablePayload> {
        self.updates.lock().push(request.clone());
        self.prepared(Operation::PrepareUpdate).await
    }

    async fn finalize_update(
        &self,
        request: &FinalizeRequest,
    ) -> registrar_client::Result<TransactionReceipt> {
        self.finalized(Operation::FinalizeUpdate, request)
    }

    async fn prepare_transfer(
        &self,
        request: &PrepareTransferRequest,
    ) -> registrar_client::Result<SignablePayload> {
        self.transfers.lock().push(request.clone());
        self.prepared(Operation::PrepareTransfer).await
    }

    async fn finalize_transfer(
        &self,
        request: &FinalizeRequest,
    ) -> registrar_client::Result<TransactionReceipt> {
        self.finalized(Operation::FinalizeTransfer, request)
    }

    async fn unregister(
        &self,
        request: &UnregisterRequest,
    ) -> registrar_client::Result<TransactionReceipt> {
        self.record(Operation::Unregister);
        self.unregisters.lock().push(request.clone());
        self.unregister.lock().clone()
    }

    async fn account(&self, _address: &str) -> registrar_client::Result<AccountInfo> {
        self.record(Operation::Account);
        self.account.lock().clone()
    }
}

/// Signer double: public key `pub1`, signature `sig1`, addresses start with `P`
pub struct MockSigner {
    pub messages: Mutex<Vec<String>>,
    pub fail_signing: Mutex<bool>,
}

impl MockSigner {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            messages: Mutex::new(Vec::new()),
            fail_signing: Mutex::new(false),
        })
    }
}

#[async_trait]
impl Signer for MockSigner {
    async fn public_key(&self, _key: &PrivateKey) -> registrar_core::Result<String> {
        Ok("pub1".to_string())
    }

    async fn sign(&self, message: &str, _key: &PrivateKey) -> registrar_core::Result<String> {
        if *self.fail_signing.lock() {
            return Err(registrar_core::Error::Signing("device unavailable".to_string()));
        }
        self.messages.lock().push(message.to_string());
        Ok("sig1".to_string())
    }

    async fn is_valid_address(&self, address: &str) -> registrar_core::Result<bool> {
        Ok(address.starts_with('P') && address.len() > 4)
    }
}

pub fn receipt(id: &str) -> TransactionReceipt {
    TransactionReceipt {
        transaction_id: id.to_string(),
    }
}

pub fn owned(name: &str, owner: &str) -> Domain {
    Domain {
        owner: Some(owner.to_string()),
        ..Domain::new(name, DomainStatus::Taken)
    }
}

pub struct Harness {
    pub api: Arc<MockApi>,
    pub signer: Arc<MockSigner>,
    pub store: Arc<MemoryStore>,
    pub registrar: Registrar,
}

/// Registrar over doubles, with no wallet logged in
pub fn harness() -> Harness {
    let api = MockApi::new();
    let signer = MockSigner::new();
    let store = Arc::new(MemoryStore::new());
    let registrar = Registrar::with_parts(
        Network::mainnet(),
        vec![],
        api.clone(),
        store.clone() as Arc<dyn LocalStore>,
        signer.clone(),
    );
    Harness {
        api,
        signer,
        store,
        registrar,
    }
}

/// Registrar with wallet A logged in and the login cleared from the logs
pub async fn logged_in() -> Harness {
    let h = harness();
    h.registrar
        .login(PrivateKey::new("lZ5tJkExampleKey"))
        .await
        .unwrap();
    h.api.clear_calls();
    h.signer.messages.lock().clear();
    h
}
