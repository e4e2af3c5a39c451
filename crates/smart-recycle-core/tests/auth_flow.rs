use std::collections::HashSet;

use smart_recycle_core::auth::NoDelay;
use smart_recycle_core::models::default_identities;
use smart_recycle_core::storage::{SESSION_KEY, USERS_KEY};
use smart_recycle_core::{
    CredentialStore, FileStore, Identity, KeyValueStore, LoginCredentials, RegisterData,
    SessionManager, SessionUser,
};

fn registration(email: &str) -> RegisterData {
    RegisterData {
        name: "Recycler".to_string(),
        email: email.to_string(),
        password: "pw".to_string(),
        phone: "+15550001111".to_string(),
        address: "7 Bin Road".to_string(),
    }
}

#[tokio::test]
async fn empty_store_login_seeds_and_authenticates() {
    let tmp = tempfile::tempdir().unwrap();
    let storage = FileStore::new(tmp.path().to_path_buf());
    let mut manager = SessionManager::new(storage.clone(), NoDelay);

    assert!(
        manager
            .login(&LoginCredentials::new("test@gmail.com", "TEST123"))
            .await
    );

    let raw = storage.get(SESSION_KEY).unwrap().unwrap();
    let session: SessionUser = serde_json::from_str(&raw).unwrap();
    assert_eq!(session.points, 1250);
    assert!(tmp.path().join("smartRecycleUser.json").exists());
}

#[tokio::test]
async fn session_survives_restart_on_disk() {
    let tmp = tempfile::tempdir().unwrap();
    {
        let mut manager = SessionManager::new(FileStore::new(tmp.path().to_path_buf()), NoDelay);
        assert!(manager.register(registration("a@b.com")).await);
        assert!(
            manager
                .login(&LoginCredentials::new("a@b.com", "pw"))
                .await
        );
        manager.update_points(75).unwrap();
    }

    let mut manager = SessionManager::new(FileStore::new(tmp.path().to_path_buf()), NoDelay);
    let user = manager.user().unwrap();
    assert_eq!(user.email, "a@b.com");
    assert_eq!(user.points, 75);

    manager.logout();
    assert!(!tmp.path().join("smartRecycleUser.json").exists());
}

#[tokio::test]
async fn duplicate_registration_keeps_one_record() {
    let tmp = tempfile::tempdir().unwrap();
    let storage = FileStore::new(tmp.path().to_path_buf());
    let mut manager = SessionManager::new(storage.clone(), NoDelay);

    assert!(manager.register(registration("a@b.com")).await);
    assert!(!manager.register(registration("a@b.com")).await);

    let identities: Vec<Identity> =
        serde_json::from_str(&storage.get(USERS_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(identities.iter().filter(|i| i.email == "a@b.com").count(), 1);
}

#[tokio::test]
async fn emails_stay_distinct_across_registrations() {
    let tmp = tempfile::tempdir().unwrap();
    let mut manager = SessionManager::new(FileStore::new(tmp.path().to_path_buf()), NoDelay);

    let emails = [
        "one@x.com",
        "two@x.com",
        "one@x.com",
        "admin@gmail.com",
        "three@x.com",
        "two@x.com",
    ];
    let mut accepted = 0;
    for email in emails {
        if manager.register(registration(email)).await {
            accepted += 1;
        }
    }
    assert_eq!(accepted, 3);

    let all = manager.credentials().all();
    let distinct: HashSet<&str> = all.iter().map(|i| i.email.as_str()).collect();
    assert_eq!(distinct.len(), all.len());
    assert_eq!(all.len(), 5);
}

#[test]
fn seeding_round_trips_through_disk() {
    let tmp = tempfile::tempdir().unwrap();
    let store = CredentialStore::new(FileStore::new(tmp.path().to_path_buf()));
    assert!(store.initialize_if_empty().unwrap());

    let reopened = CredentialStore::new(FileStore::new(tmp.path().to_path_buf()));
    let mut read_back = reopened.all();
    let mut expected = default_identities();
    read_back.sort_by(|a, b| a.id.cmp(&b.id));
    expected.sort_by(|a, b| a.id.cmp(&b.id));
    assert_eq!(read_back, expected);
}

#[tokio::test]
async fn reads_collection_written_by_browser() {
    let tmp = tempfile::tempdir().unwrap();
    let storage = FileStore::new(tmp.path().to_path_buf());
    storage
        .set(
            USERS_KEY,
            r#"[{"id":"1718000000000","email":"web@x.com","name":"Web","phone":"1","address":"2",
                "password":"pw","isAdmin":false,"points":10,"createdAt":"2024-06-10T06:13:20.000Z"}]"#,
        )
        .unwrap();

    let mut manager = SessionManager::new(storage, NoDelay);
    assert!(
        manager
            .login(&LoginCredentials::new("web@x.com", "pw"))
            .await
    );
    assert_eq!(manager.user().unwrap().points, 10);
    // Present collection is not reseeded
    assert!(!manager.credentials().email_exists("admin@gmail.com"));
}
