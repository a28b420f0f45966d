//! HTTP registry client

use crate::api::{Operation, RegistryApi};
use crate::config::ClientConfig;
use crate::envelope::{require, Envelope, ErrorBody};
use crate::error::{ApiError, Result};
use crate::types::{
    AuthRequest, AuthResponse, FinalizeRequest, PrepareRegisterRequest, PrepareTransferRequest,
    PrepareUpdateRequest, TransactionReceipt, UnregisterRequest,
};
use async_trait::async_trait;
use registrar_core::{AccountInfo, Domain, GlobalStats, SignablePayload};
use reqwest::{header, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Registry client over a single JSON endpoint, operations selected by `q`
pub struct RegistryClient {
    base_url: String,
    http: reqwest::Client,
}

impl RegistryClient {
    /// Create a client from configuration
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder
            .build()
            .map_err(|e| ApiError::InvalidConfig(e.to_string()))?;

        Ok(Self {
            base_url: config.base_url.clone(),
            http,
        })
    }

    /// Endpoint this client talks to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue one registry call and unwrap the envelope
    async fn call<B: Serialize + Sync, R: DeserializeOwned>(
        &self,
        method: Method,
        operation: Operation,
        query: &[(&str, &str)],
        body: Option<&B>,
    ) -> Result<Option<R>> {
        debug!("Registry call: {} {}", method, operation);

        let mut request = self
            .http
            .request(method, &self.base_url)
            .query(&[("q", operation.as_str())])
            .query(query)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            warn!("Registry unreachable during {}: {}", operation, e);
            ApiError::Offline
        })?;

        let status = response.status();
        let is_json = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.contains("application/json"));
        let bytes = response.bytes().await.map_err(|e| {
            warn!("Registry response for {} interrupted: {}", operation, e);
            ApiError::Offline
        })?;

        if !status.is_success() {
            let err = ErrorBody::into_error(&bytes, status.as_u16());
            debug!("Registry {} failed with status {}: {}", operation, status, err);
            return Err(err);
        }

        if !is_json || bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }

        let envelope: Envelope<R> = serde_json::from_slice(&bytes)
            .map_err(|e| ApiError::Decode(format!("{}: {}", operation, e)))?;
        envelope.into_result()
    }

    async fn get<R: DeserializeOwned>(
        &self,
        operation: Operation,
        query: &[(&str, &str)],
    ) -> Result<Option<R>> {
        self.call::<(), R>(Method::GET, operation, query, None).await
    }

    async fn post<B: Serialize + Sync, R: DeserializeOwned>(
        &self,
        operation: Operation,
        body: &B,
    ) -> Result<Option<R>> {
        self.call(Method::POST, operation, &[], Some(body)).await
    }
}

#[async_trait]
impl RegistryApi for RegistryClient {
    async fn auth(&self, request: &AuthRequest) -> Result<AuthResponse> {
        require(self.post(Operation::Auth, request).await?)
    }

    async fn stats(&self) -> Result<GlobalStats> {
        require(self.get(Operation::Stats, &[]).await?)
    }

    async fn search(&self, name: &str) -> Result<Domain> {
        require(self.get(Operation::Search, &[("name", name)]).await?)
    }

    async fn trending(&self) -> Result<Vec<String>> {
        Ok(self.get(Operation::Trending, &[]).await?.unwrap_or_default())
    }

    async fn prepare_register(&self, request: &PrepareRegisterRequest) -> Result<SignablePayload> {
        require(self.post(Operation::PrepareRegister, request).await?)
    }

    async fn finalize_register(&self, request: &FinalizeRequest) -> Result<TransactionReceipt> {
        require(self.post(Operation::FinalizeRegister, request).await?)
    }

    async fn prepare_update(&self, request: &PrepareUpdateRequest) -> Result<SignablePayload> {
        require(self.post(Operation::PrepareUpdate, request).await?)
    }

    async fn finalize_update(&self, request: &FinalizeRequest) -> Result<TransactionReceipt> {
        require(self.post(Operation::FinalizeUpdate, request).await?)
    }

    async fn prepare_transfer(&self, request: &PrepareTransferRequest) -> Result<SignablePayload> {
        require(self.post(Operation::PrepareTransfer, request).await?)
    }

    async fn finalize_transfer(&self, request: &FinalizeRequest) -> Result<TransactionReceipt> {
        require(self.post(Operation::FinalizeTransfer, request).await?)
    }

    async fn unregister(&self, request: &UnregisterRequest) -> Result<TransactionReceipt> {
        require(
            self.call(Method::DELETE, Operation::Unregister, &[], Some(request))
                .await?,
        )
    }

    async fn account(&self, address: &str) -> Result<AccountInfo> {
        require(self.get(Operation::Account, &[("address", address)]).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = RegistryClient::new(&ClientConfig::default()).unwrap();
        assert_eq!(client.base_url(), "http://phpcoin.net:5000/api.php");

        let config = ClientConfig {
            timeout_secs: Some(5),
            ..ClientConfig::default()
        };
        assert!(RegistryClient::new(&config).is_ok());
    }
}
