use super::*;
use crate::{
    form::FormPhase,
    test_support::{creator, FakeStore},
    DeletePhase,
};
use shared::schema::CreatorField;

#[test]
fn tokens_are_unique_per_mount() {
    let first = ListView::mount();
    let second = ListView::mount();
    assert_ne!(first.token(), second.token());
}

#[tokio::test]
async fn list_loads_in_id_order() {
    let store = FakeStore::with_rows([creator(3, "Linus"), creator(1, "Ada"), creator(2, "Grace")]);
    let mut view = ListView::mount();
    assert!(view.state().is_loading());

    view.load(&store).await;

    let ids: Vec<_> = view.cards().iter().map(|card| card.creator.id.0).collect();
    assert_eq!(ids, [1, 2, 3]);
    assert!(!view.is_empty_state());
    assert!(view
        .cards()
        .iter()
        .all(|card| card.delete.phase() == DeletePhase::Hidden));
}

#[test]
fn unordered_rows_are_sorted_on_arrival() {
    let mut view = ListView::mount();
    let token = view.token();
    assert!(view.apply_loaded(token, Ok(vec![creator(9, "Z"), creator(4, "A")])));
    let ids: Vec<_> = view.cards().iter().map(|card| card.creator.id.0).collect();
    assert_eq!(ids, [4, 9]);
}

#[tokio::test]
async fn empty_table_shows_empty_state() {
    let store = FakeStore::default();
    let mut view = ListView::mount();
    view.load(&store).await;
    assert!(view.is_empty_state());
    assert!(view.cards().is_empty());
}

#[test]
fn stale_list_result_is_dropped() {
    let mut view = ListView::mount();
    let stale = view.token();
    let fresh = view.reload();

    assert!(!view.apply_loaded(stale, Ok(vec![creator(1, "Ada")])));
    assert!(view.state().is_loading());

    assert!(view.apply_loaded(fresh, Ok(vec![creator(2, "Grace")])));
    assert_eq!(view.cards()[0].creator.name, "Grace");
}

#[test]
fn failed_list_load_keeps_message() {
    let mut view = ListView::mount();
    let token = view.token();
    view.apply_loaded(token, Err(StoreError::backend("timeout")));
    match view.state() {
        LoadState::Failed(message) => assert!(message.contains("timeout")),
        other => panic!("expected failure, got {other:?}"),
    }
    assert!(!view.is_empty_state());
}

#[tokio::test]
async fn removing_a_card_keeps_the_rest() {
    let store = FakeStore::with_rows([creator(1, "Ada"), creator(2, "Grace")]);
    let mut view = ListView::mount();
    view.load(&store).await;

    let card = view.card_mut(CreatorId(1)).expect("card");
    assert!(card.delete.request());
    assert_eq!(
        card.delete.confirm_and_delete(&store).await,
        crate::DeleteOutcome::Deleted(CreatorId(1))
    );
    let removed = view.remove(CreatorId(1)).expect("removed");
    assert_eq!(removed.name, "Ada");

    let names: Vec<_> = view.cards().iter().map(|c| c.creator.name.as_str()).collect();
    assert_eq!(names, ["Grace"]);
    assert_eq!(FakeStore::calls(&store.list_calls), 1);
    assert!(view.remove(CreatorId(1)).is_none());
}

#[tokio::test]
async fn detail_reports_missing_creator() {
    let store = FakeStore::default();
    let mut view = DetailView::mount(CreatorId(5));
    view.load(&store).await;
    assert_eq!(view.state(), &LoadState::NotFound);
    assert!(view.creator().is_none());
    assert!(view.delete_flow().is_none());
}

#[tokio::test]
async fn detail_offers_delete_once_loaded() {
    let store = FakeStore::with_rows([creator(5, "Ada")]);
    let mut view = DetailView::mount(CreatorId(5));
    assert!(view.delete_flow().is_none());

    view.load(&store).await;
    assert_eq!(view.creator().map(|c| c.name.as_str()), Some("Ada"));
    assert_eq!(FakeStore::calls(&store.get_calls), 1);
    let flow = view.delete_flow_mut().expect("delete flow");
    assert_eq!(flow.target(), CreatorId(5));
    assert!(flow.request());
}

#[test]
fn detail_ignores_result_from_previous_mount() {
    let old = DetailView::mount(CreatorId(1));
    let mut view = DetailView::mount(CreatorId(2));
    assert!(!view.apply_loaded(old.token(), Ok(creator(1, "Ada"))));
    assert!(view.state().is_loading());
}

#[tokio::test]
async fn edit_view_seeds_form_from_store() {
    let store = FakeStore::with_rows([creator(4, "Grace")]);
    let mut view = EditView::mount(CreatorId(4));
    assert!(!view.form_mut().set_field(CreatorField::Name, "early"));

    view.load(&store).await;

    assert_eq!(view.id(), CreatorId(4));
    assert_eq!(view.form().phase(), &FormPhase::Idle);
    assert_eq!(view.form().draft().name, "Grace");
    assert!(view.delete_flow().is_some());
    assert!(view.form_mut().set_field(CreatorField::Name, "Grace Hopper"));
}

#[tokio::test]
async fn edit_view_for_missing_creator_stays_closed() {
    let store = FakeStore::default();
    let mut view = EditView::mount(CreatorId(4));
    view.load(&store).await;
    assert!(matches!(view.form().phase(), FormPhase::LoadFailed(_)));
    assert!(view.delete_flow().is_none());
    assert!(!view.form_mut().set_field(CreatorField::Name, "x"));
}

#[test]
fn edit_view_drops_stale_load() {
    let mut view = EditView::mount(CreatorId(4));
    let stale = LoadToken::next();
    assert!(!view.apply_loaded(stale, Ok(creator(4, "Grace"))));
    assert_eq!(view.form().phase(), &FormPhase::Loading);
}
