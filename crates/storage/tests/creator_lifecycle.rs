use shared::{
    domain::CreatorId,
    protocol::IdOrder,
    schema::{CreatorDraft, CreatorField},
};
use storage::Storage;

#[tokio::test]
async fn create_edit_delete_lifecycle() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");

    let mut draft = CreatorDraft::empty();
    draft.set(CreatorField::Name, "Ada");
    draft.set(CreatorField::Url, "https://x.com/ada");
    draft.set(CreatorField::Description, "Pioneer");
    draft.validate().expect("valid draft");

    let created = storage
        .insert_creator(&draft.to_record())
        .await
        .expect("insert");
    let listed = storage
        .list_creators(IdOrder::Ascending)
        .await
        .expect("list");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, created.id);

    let mut edit = CreatorDraft::from(&created);
    edit.set(CreatorField::Name, "Ada L.");
    let updated = storage
        .update_creator(created.id, &edit.to_record())
        .await
        .expect("update")
        .expect("row exists");
    assert_eq!(updated.name, "Ada L.");
    assert_eq!(updated.url, "https://x.com/ada");
    assert_eq!(updated.description, "Pioneer");

    assert!(storage.delete_creator(created.id).await.expect("delete"));
    let listed = storage
        .list_creators(IdOrder::Ascending)
        .await
        .expect("list");
    assert!(listed.iter().all(|c| c.id != created.id));
    assert!(storage
        .get_creator(created.id)
        .await
        .expect("get")
        .is_none());
    assert!(storage
        .get_creator(CreatorId(created.id.0 + 1))
        .await
        .expect("get")
        .is_none());
}
