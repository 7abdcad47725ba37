use async_trait::async_trait;
use mockall::mock;
use mockall::predicate::*;
use std::collections::BTreeMap;
use std::sync::Arc;

use validator_dashboard::{
    models::{
        currency::ExchangeRateTable,
        validator::{EpochBalance, ValidatorCache, ValidatorInfo},
    },
    repositories::traits::*,
    services::earnings_service::{AccountEarningsService, EarningsOption},
    DashboardError, Result,
};

mock! {
    pub PreferenceRepo {}
    #[async_trait]
    impl PreferenceRepository for PreferenceRepo {
        async fn get_preference(&self, key: Storage) -> Result<Option<String>>;
        async fn set_preference(&self, key: Storage, value: String) -> Result<()>;
    }
}

// Test helpers
fn generate_test_validator(index: u64) -> ValidatorInfo {
    ValidatorInfo {
        index,
        pubkey: format!("0x{:096x}", index),
        name: format!("validator-{}", index),
        status: "active_ongoing".to_string(),
        balance: 32.5,
    }
}

fn generate_test_cache() -> ValidatorCache {
    let mut cache = ValidatorCache::new();
    cache.insert(
        1,
        vec![
            EpochBalance {
                epoch: 1000,
                total_balance: Some(32.0),
            },
            EpochBalance {
                epoch: 1225,
                total_balance: Some(32.5),
            },
        ],
    );
    cache
}

fn generate_test_rates() -> ExchangeRateTable {
    let mut rates = BTreeMap::new();
    rates.insert("USD".to_string(), 3000.0);
    rates.insert("GBP".to_string(), 2500.0);
    ExchangeRateTable::new(rates)
}

#[tokio::test]
async fn test_load_uses_stored_currency() -> anyhow::Result<()> {
    let mut mock_repo = MockPreferenceRepo::new();
    mock_repo
        .expect_get_preference()
        .with(eq(Storage::Currency))
        .times(1)
        .returning(|_| Ok(Some("GBP".to_string())));

    let service = AccountEarningsService::new(Arc::new(mock_repo));
    let earnings = service
        .load(&[generate_test_validator(1)], &generate_test_cache())
        .await;

    let summary = earnings.summary(&generate_test_rates());
    assert_eq!(summary.currency, "GBP");
    assert_eq!(summary.total_balance_display, "£1,250.00 GBP");

    Ok(())
}

#[tokio::test]
async fn test_load_defaults_to_usd() -> anyhow::Result<()> {
    let mut mock_repo = MockPreferenceRepo::new();
    mock_repo
        .expect_get_preference()
        .times(1)
        .returning(|_| Ok(None));

    let service = AccountEarningsService::new(Arc::new(mock_repo));
    let earnings = service.load(&[], &ValidatorCache::new()).await;

    let summary = earnings.summary(&generate_test_rates());
    assert_eq!(summary.currency, "USD");
    assert_eq!(summary.total_earnings, 0.0);
    assert_eq!(summary.apr_display, "---%");

    Ok(())
}

#[tokio::test]
async fn test_unreadable_store_falls_back_to_default() -> anyhow::Result<()> {
    let mut mock_repo = MockPreferenceRepo::new();
    mock_repo
        .expect_get_preference()
        .times(1)
        .returning(|_| Err(DashboardError::ValidationError("corrupt".to_string())));

    let service = AccountEarningsService::new(Arc::new(mock_repo));
    assert_eq!(service.active_currency().await, "USD");

    Ok(())
}

#[tokio::test]
async fn test_select_currency_persists() -> anyhow::Result<()> {
    let mut mock_repo = MockPreferenceRepo::new();
    mock_repo
        .expect_get_preference()
        .times(1)
        .returning(|_| Ok(None));
    mock_repo
        .expect_set_preference()
        .with(eq(Storage::Currency), eq("GBP".to_string()))
        .times(1)
        .returning(|_, _| Ok(()));

    let service = AccountEarningsService::new(Arc::new(mock_repo));
    let mut earnings = service
        .load(&[generate_test_validator(1)], &generate_test_cache())
        .await;

    service.select_currency(&mut earnings, "GBP").await?;
    earnings.select_estimate(Some(EarningsOption::Daily));

    let summary = earnings.summary(&generate_test_rates());
    assert_eq!(summary.currency, "GBP");
    assert_eq!(summary.time_frame, Some("daily"));
    assert_eq!(summary.estimate_display, "0.50 ETH");

    Ok(())
}

#[tokio::test]
async fn test_failed_write_keeps_currency() -> anyhow::Result<()> {
    let mut mock_repo = MockPreferenceRepo::new();
    mock_repo
        .expect_get_preference()
        .returning(|_| Ok(Some("USD".to_string())));
    mock_repo.expect_set_preference().times(1).returning(|_, _| {
        Err(DashboardError::StorageError(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "read-only",
        )))
    });

    let service = AccountEarningsService::new(Arc::new(mock_repo));
    let mut earnings = service.load(&[], &ValidatorCache::new()).await;

    assert!(service.select_currency(&mut earnings, "EUR").await.is_err());
    assert_eq!(earnings.currency(), "USD");

    Ok(())
}
