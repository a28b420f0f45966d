//! Read path tests: bootstrap, search and quotes

mod common;

use common::*;
use registrar_client::{ApiError, Operation};
use registrar_core::{Amount, Domain, DomainStatus, GlobalStats};
use registrar_service::{ApiStatus, ErrorKind};

#[tokio::test]
async fn test_bootstrap_online() {
    let h = harness();

    let boot = h.registrar.bootstrap().await;
    assert_eq!(boot.status, ApiStatus::Online);
    assert!(!boot.derived);
    assert_eq!(boot.stats.total_domains, 42);
    assert_eq!(boot.trending, vec!["web3.phpcoin"]);
    assert_eq!(h.api.calls(), vec![Operation::Stats, Operation::Trending]);
}

#[tokio::test]
async fn test_bootstrap_trending_failure_is_empty() {
    let h = harness();
    *h.api.trending.lock() = Err(ApiError::status_fallback(502));

    let boot = h.registrar.bootstrap().await;
    assert!(boot.trending.is_empty());
    assert_eq!(boot.stats.total_domains, 42);
}

#[tokio::test]
async fn test_bootstrap_falls_back_to_cache() {
    let h = harness();
    let mut paid = owned("dapp.phpcoin", ADDRESS_A);
    paid.price = Some(Amount::from_coins(5));
    h.registrar.cache().upsert_many(vec![
        paid,
        owned("web3.phpcoin", ADDRESS_B),
        Domain::reserved("admin.phpcoin"),
    ]);
    *h.api.stats.lock() = Err(ApiError::Offline);

    let boot = h.registrar.bootstrap().await;
    assert_eq!(boot.status, ApiStatus::Offline);
    assert!(boot.derived);
    assert!(boot.trending.is_empty());
    assert_eq!(
        boot.stats,
        GlobalStats {
            total_domains: 2,
            total_funds: Amount::from_coins(5),
        }
    );
    assert_eq!(h.api.count(Operation::Trending), 0);
}

#[tokio::test]
async fn test_search_qualifies_and_prices() {
    let h = harness();
    *h.api.search.lock() = Ok(Domain::new("Example.phpcoin", DomainStatus::Available));
    let revision = h.registrar.cache().revision();

    let found = h.registrar.search("  Example ").await.unwrap();
    assert_eq!(found.name, "example.phpcoin");
    assert_eq!(found.status, DomainStatus::Available);
    assert_eq!(found.price, Some(Amount::from_base_units(250_000_000)));

    assert_eq!(h.registrar.cache().revision(), revision);
    assert!(h.registrar.domain("example.phpcoin").is_none());
}

#[tokio::test]
async fn test_search_error_assumes_available() {
    let h = harness();
    *h.api.search.lock() = Err(ApiError::Rejected("Lookup failed".to_string()));

    let found = h.registrar.search("abc").await.unwrap();
    assert_eq!(found.name, "abc.phpcoin");
    assert_eq!(found.status, DomainStatus::Available);
    assert_eq!(found.price, Some(Amount::from_coins(5)));
}

#[tokio::test]
async fn test_search_offline_placeholder() {
    let h = harness();
    *h.api.stats.lock() = Err(ApiError::Offline);
    h.registrar.bootstrap().await;
    h.api.clear_calls();

    let found = h.registrar.search("dapp").await.unwrap();
    assert_eq!(found.status, DomainStatus::Taken);
    assert_eq!(found.owner, None);
    assert_eq!(found.price, None);
    assert!(h.api.calls().is_empty());
}

#[tokio::test]
async fn test_search_rejects_empty_query() {
    let h = harness();
    let err = h.registrar.search("   ").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(h.api.calls().is_empty());
}

#[tokio::test]
async fn test_quote_uses_paid_price_for_refund() {
    let h = harness();

    let quote = h.registrar.quote("verylongname").unwrap();
    assert_eq!(quote.name, "verylongname.phpcoin");
    assert_eq!(quote.registration, Amount::from_coins(1));
    assert_eq!(quote.refund, Amount::from_base_units(50_000_000));

    let mut paid = owned("dapp.phpcoin", ADDRESS_A);
    paid.price = Some(Amount::from_coins(4));
    h.registrar.cache().upsert_many(vec![paid]);
    let quote = h.registrar.quote("DApp").unwrap();
    assert_eq!(quote.registration, Amount::from_coins(5));
    assert_eq!(quote.refund, Amount::from_coins(2));
}
