use super::*;

fn record(name: &str) -> CreatorRecord {
    CreatorRecord {
        name: name.to_string(),
        url: format!("https://example.com/{}", name.to_ascii_lowercase()),
        description: format!("{name} makes things"),
        image_url: None,
    }
}

#[tokio::test]
async fn health_check_succeeds_for_live_pool() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage.health_check().await.expect("health check");
}

#[tokio::test]
async fn creates_database_file_when_missing() {
    let suffix = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let temp_root = std::env::temp_dir().join(format!("creatorverse_storage_test_{suffix}"));
    let db_path = temp_root.join("nested").join("storage.db");
    let database_url = format!("sqlite://{}", db_path.to_string_lossy().replace('\\', "/"));

    let storage = Storage::new(&database_url).await.expect("db");
    drop(storage);

    assert!(
        db_path.exists(),
        "database file should exist: {}",
        db_path.display()
    );

    std::fs::remove_dir_all(temp_root).expect("cleanup");
}

#[tokio::test]
async fn empty_table_lists_nothing() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let creators = storage
        .list_creators(IdOrder::Ascending)
        .await
        .expect("list");
    assert!(creators.is_empty());
}

#[tokio::test]
async fn inserts_assign_increasing_ids_and_list_in_id_order() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let first = storage.insert_creator(&record("Ada")).await.expect("ada");
    let second = storage.insert_creator(&record("Grace")).await.expect("grace");
    let third = storage.insert_creator(&record("Linus")).await.expect("linus");
    assert!(first.id < second.id && second.id < third.id);
    assert!(first.created_at.is_some());

    let ascending = storage
        .list_creators(IdOrder::Ascending)
        .await
        .expect("list");
    let ids: Vec<_> = ascending.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![first.id, second.id, third.id]);

    let descending = storage
        .list_creators(IdOrder::Descending)
        .await
        .expect("list");
    assert_eq!(descending[0].id, third.id);
}

#[tokio::test]
async fn update_replaces_every_column() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let created = storage.insert_creator(&record("Ada")).await.expect("ada");

    let replacement = CreatorRecord {
        name: "Ada L.".into(),
        url: "https://x.com/ada".into(),
        description: "Analytical engine".into(),
        image_url: Some("https://img.example/ada.png".into()),
    };
    let updated = storage
        .update_creator(created.id, &replacement)
        .await
        .expect("update")
        .expect("row exists");
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.name, "Ada L.");
    assert_eq!(updated.image_url.as_deref(), Some("https://img.example/ada.png"));

    let reloaded = storage
        .get_creator(created.id)
        .await
        .expect("get")
        .expect("exists");
    assert_eq!(reloaded, updated);
}

#[tokio::test]
async fn update_of_missing_row_returns_none() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let updated = storage
        .update_creator(CreatorId(404), &record("Nobody"))
        .await
        .expect("update");
    assert!(updated.is_none());
}

#[tokio::test]
async fn delete_reports_whether_a_row_was_removed_and_ids_are_not_reused() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let first = storage.insert_creator(&record("Ada")).await.expect("ada");

    assert!(storage.delete_creator(first.id).await.expect("delete"));
    assert!(!storage.delete_creator(first.id).await.expect("delete again"));
    assert!(storage.get_creator(first.id).await.expect("get").is_none());

    let next = storage.insert_creator(&record("Grace")).await.expect("grace");
    assert!(next.id > first.id);
}
