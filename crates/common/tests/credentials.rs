//! Integration tests for the credential store

mod common;

use ::common::credentials::CredentialError;

use crate::common::setup_credential_store;

#[tokio::test]
async fn test_signup_then_validate() {
    let (store, _temp) = setup_credential_store().await;

    store.create("alice", "secret").await.unwrap();

    assert!(store.validate("alice", "secret").await.unwrap());
    assert!(!store.validate("alice", "wrong").await.unwrap());
    assert!(!store.validate("bob", "secret").await.unwrap());
}

#[tokio::test]
async fn test_duplicate_signup_leaves_store_unchanged() {
    let (store, _temp) = setup_credential_store().await;

    store.create("alice", "secret").await.unwrap();
    let before = store.load().await.unwrap();

    let result = store.create("alice", "other").await;
    assert!(matches!(result, Err(CredentialError::UsernameTaken(_))));

    let after = store.load().await.unwrap();
    assert_eq!(before.len(), after.len());
    assert_eq!(before, after);
    assert!(store.validate("alice", "secret").await.unwrap());
}

#[tokio::test]
async fn test_empty_fields_are_rejected() {
    let (store, _temp) = setup_credential_store().await;

    for (username, password) in [("", "secret"), ("alice", ""), ("", "")] {
        let result = store.create(username, password).await;
        assert!(matches!(result, Err(CredentialError::MissingFields)));
    }
    assert_eq!(store.len().await.unwrap(), 0);
}

#[tokio::test]
async fn test_store_file_is_human_readable() {
    let (store, _temp) = setup_credential_store().await;

    store.create("alice", "secret").await.unwrap();

    let raw = std::fs::read_to_string(store.path()).unwrap();
    assert!(raw.starts_with("alice = "));
    assert!(raw.contains("$argon2id$"));
    assert!(!raw.contains("secret"));
}

#[tokio::test]
async fn test_concurrent_signups_are_not_lost() {
    let (store, _temp) = setup_credential_store().await;

    let mut handles = Vec::new();
    for i in 0..4 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            store.create(&format!("user{i}"), "secret").await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(store.len().await.unwrap(), 4);
}
