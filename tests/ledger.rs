use std::{collections::HashSet, sync::Arc};

use ledger_store::{
    config::Config,
    error::AppError,
    models::account::{CreateAccountRequest, PinPolicy, UpdateDetailsRequest},
    services::{account_number, account_service::AccountService},
    store::AccountStore,
};
use tempfile::{TempDir, tempdir};

fn service_with(policy: PinPolicy) -> (TempDir, AccountService) {
    let dir = tempdir().unwrap();
    let config = Config {
        data_file: dir.path().join("database.json"),
        pin_policy: policy,
        ..Config::default()
    };
    let store = Arc::new(AccountStore::from_config(&config));
    (dir, AccountService::new(store, &config))
}

fn service() -> (TempDir, AccountService) {
    service_with(PinPolicy::Plaintext)
}

fn request(name: &str, phone: &str, pin: &str) -> CreateAccountRequest {
    CreateAccountRequest {
        name: name.to_string(),
        email: format!("{}@x.com", name.to_lowercase()),
        phone: phone.to_string(),
        pin: pin.to_string(),
    }
}

#[tokio::test]
async fn full_account_lifecycle() {
    let (_dir, service) = service();

    let number = service
        .create_account(&CreateAccountRequest {
            name: "Ann".to_string(),
            email: "a@x.com".to_string(),
            phone: "9876543210".to_string(),
            pin: "1234".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(number.len(), 9);
    assert!(account_number::is_well_formed(&number));
    assert_eq!(number.bytes().filter(u8::is_ascii_uppercase).count(), 5);

    assert_eq!(service.deposit(&number, "1234", 5000).await.unwrap(), 5000);
    assert!(matches!(
        service.deposit(&number, "1234", 16_000).await,
        Err(AppError::LimitExceeded { limit: 10_000 })
    ));
    assert_eq!(service.withdraw(&number, "1234", 3000).await.unwrap(), 2000);
    assert!(matches!(
        service.withdraw(&number, "1234", 5000).await,
        Err(AppError::InsufficientFunds { available: 2000 })
    ));

    let details = service.get_details(&number, "1234").await.unwrap();
    assert_eq!(details.name, "Ann");
    assert_eq!(details.balance, 2000);

    service.delete_account(&number, "1234").await.unwrap();
    assert!(matches!(
        service.get_details(&number, "1234").await,
        Err(AppError::InvalidCredentials)
    ));
}

#[tokio::test]
async fn invalid_create_leaves_store_unchanged() {
    let (_dir, service) = service();
    service
        .create_account(&request("Ann", "9876543210", "1234"))
        .await
        .unwrap();
    let before = std::fs::read(service.store().path()).unwrap();

    let err = service
        .create_account(&request("Bob", "12345", "1234"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let after = std::fs::read(service.store().path()).unwrap();
    assert_eq!(before, after);
    assert_eq!(service.store().load().await.unwrap().len(), 1);
}

#[tokio::test]
async fn invalid_create_on_empty_store_writes_nothing() {
    let (_dir, service) = service();

    assert!(service
        .create_account(&request("Ann", "12345", "1234"))
        .await
        .is_err());
    assert!(!service.store().path().exists());
}

#[tokio::test]
async fn account_numbers_are_unique() {
    let (_dir, service) = service();
    let mut numbers = HashSet::new();

    for i in 0..200 {
        let number = service
            .create_account(&request(&format!("User{i}"), "0123456789", "0000"))
            .await
            .unwrap();
        assert!(numbers.insert(number));
    }
    assert_eq!(service.store().load().await.unwrap().len(), 200);
}

#[tokio::test]
async fn get_details_does_not_mutate() {
    let (_dir, service) = service();
    let number = service
        .create_account(&request("Ann", "9876543210", "1234"))
        .await
        .unwrap();
    service.deposit(&number, "1234", 42).await.unwrap();
    let before = std::fs::read(service.store().path()).unwrap();

    let first = service.get_details(&number, "1234").await.unwrap();
    let second = service.get_details(&number, "1234").await.unwrap();

    assert_eq!(first, second);
    assert_eq!(before, std::fs::read(service.store().path()).unwrap());
}

#[tokio::test]
async fn failed_update_applies_nothing() {
    let (_dir, service) = service();
    let number = service
        .create_account(&request("Ann", "9876543210", "1234"))
        .await
        .unwrap();

    let err = service
        .update_details(
            &number,
            "1234",
            &UpdateDetailsRequest {
                name: Some("Changed".to_string()),
                email: Some("changed@x.com".to_string()),
                phone: Some("555".to_string()),
                pin: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let details = service.get_details(&number, "1234").await.unwrap();
    assert_eq!(details.name, "Ann");
    assert_eq!(details.email, "ann@x.com");
    assert_eq!(details.phone, "9876543210");
}

#[tokio::test]
async fn update_replaces_only_supplied_fields() {
    let (_dir, service) = service();
    let number = service
        .create_account(&request("Ann", "9876543210", "1234"))
        .await
        .unwrap();

    service
        .update_details(
            &number,
            "1234",
            &UpdateDetailsRequest {
                name: Some("  Annie ".to_string()),
                email: Some("".to_string()),
                phone: Some("0000000001".to_string()),
                pin: None,
            },
        )
        .await
        .unwrap();

    let details = service.get_details(&number, "1234").await.unwrap();
    assert_eq!(details.name, "Annie");
    assert_eq!(details.email, "ann@x.com");
    assert_eq!(details.phone, "0000000001");
}

#[tokio::test]
async fn hashed_pins_never_hit_the_snapshot_in_clear() {
    let (_dir, service) = service_with(PinPolicy::Sha256);
    let number = service
        .create_account(&request("Ann", "9876543210", "7391"))
        .await
        .unwrap();

    let raw = std::fs::read_to_string(service.store().path()).unwrap();
    assert!(!raw.contains("\"7391\""));
    assert_eq!(service.deposit(&number, "7391", 10).await.unwrap(), 10);
    assert!(service.deposit(&number, "1111", 10).await.is_err());
}

#[tokio::test]
async fn legacy_snapshot_is_usable() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("database.json");
    std::fs::write(
        &path,
        r#"[
    {
        "name": "Ann",
        "email": "a@x.com",
        "phone number": 9876543210,
        "pin": 42,
        "account_number": "AB12CD3E4",
        "balance": 300
    }
]"#,
    )
    .unwrap();
    let config = Config {
        data_file: path,
        ..Config::default()
    };
    let service = AccountService::new(Arc::new(AccountStore::from_config(&config)), &config);

    assert_eq!(service.withdraw("AB12CD3E4", "0042", 100).await.unwrap(), 200);

    let reloaded = service.store().load().await.unwrap();
    assert_eq!(reloaded[0].pin, "0042");
    assert_eq!(reloaded[0].phone, "9876543210");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_deposits_lose_no_updates() {
    let (_dir, service) = service();
    let number = service
        .create_account(&request("Ann", "9876543210", "1234"))
        .await
        .unwrap();
    service.deposit(&number, "1234", 500).await.unwrap();

    let tasks: Vec<_> = (0..50)
        .map(|_| {
            let service = service.clone();
            let number = number.clone();
            tokio::spawn(async move { service.deposit(&number, "1234", 25).await })
        })
        .collect();
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let details = service.get_details(&number, "1234").await.unwrap();
    assert_eq!(details.balance, 500 + 50 * 25);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn interleaved_withdrawals_never_overdraw() {
    let (_dir, service) = service();
    let number = service
        .create_account(&request("Ann", "9876543210", "1234"))
        .await
        .unwrap();
    service.deposit(&number, "1234", 1000).await.unwrap();

    let tasks: Vec<_> = (0..40)
        .map(|i| {
            let service = service.clone();
            let number = number.clone();
            tokio::spawn(async move {
                if i % 4 == 0 {
                    service.deposit(&number, "1234", 100).await.map(|_| 100i64)
                } else {
                    service.withdraw(&number, "1234", 150).await.map(|_| -150i64)
                }
            })
        })
        .collect();

    let mut expected: i64 = 1000;
    for task in tasks {
        match task.await.unwrap() {
            Ok(delta) => expected += delta,
            Err(AppError::InsufficientFunds { .. }) => {}
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }

    let balance = service.get_details(&number, "1234").await.unwrap().balance;
    assert!(expected >= 0);
    assert_eq!(balance as i64, expected);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creates_keep_every_account() {
    let (_dir, service) = service();

    let tasks: Vec<_> = (0..30)
        .map(|i| {
            let service = service.clone();
            tokio::spawn(async move {
                service
                    .create_account(&request(&format!("User{i}"), "0123456789", "0000"))
                    .await
            })
        })
        .collect();

    let mut numbers = HashSet::new();
    for task in tasks {
        numbers.insert(task.await.unwrap().unwrap());
    }

    assert_eq!(numbers.len(), 30);
    assert_eq!(service.store().load().await.unwrap().len(), 30);
}
