use std::{
    collections::BTreeMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
};

use async_trait::async_trait;
use shared::{
    domain::{Creator, CreatorId},
    schema::CreatorRecord,
};

use crate::{CreatorStore, StoreError};

/// In-memory table that counts calls and can be told to fail.
#[derive(Default)]
pub(crate) struct FakeStore {
    rows: Mutex<BTreeMap<i64, Creator>>,
    next_id: Mutex<i64>,
    fail_with: Mutex<Option<StoreError>>,
    pub(crate) list_calls: AtomicUsize,
    pub(crate) get_calls: AtomicUsize,
    pub(crate) insert_calls: AtomicUsize,
    pub(crate) update_calls: AtomicUsize,
    pub(crate) delete_calls: AtomicUsize,
}

impl FakeStore {
    pub(crate) fn with_rows(rows: impl IntoIterator<Item = Creator>) -> Self {
        let store = Self::default();
        {
            let mut table = store.rows.lock().expect("rows");
            let mut next_id = store.next_id.lock().expect("next id");
            for row in rows {
                *next_id = (*next_id).max(row.id.0);
                table.insert(row.id.0, row);
            }
        }
        store
    }

    pub(crate) fn fail_next(&self, err: StoreError) {
        *self.fail_with.lock().expect("fail flag") = Some(err);
    }

    pub(crate) fn row(&self, id: CreatorId) -> Option<Creator> {
        self.rows.lock().expect("rows").get(&id.0).cloned()
    }

    pub(crate) fn len(&self) -> usize {
        self.rows.lock().expect("rows").len()
    }

    pub(crate) fn calls(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }

    fn take_failure(&self) -> Result<(), StoreError> {
        match self.fail_with.lock().expect("fail flag").take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl CreatorStore for FakeStore {
    async fn list_all(&self) -> Result<Vec<Creator>, StoreError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.take_failure()?;
        Ok(self.rows.lock().expect("rows").values().cloned().collect())
    }

    async fn get_by_id(&self, id: CreatorId) -> Result<Creator, StoreError> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        self.take_failure()?;
        self.row(id).ok_or(StoreError::NotFound { id })
    }

    async fn insert(&self, record: &CreatorRecord) -> Result<Creator, StoreError> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);
        self.take_failure()?;
        let id = {
            let mut next_id = self.next_id.lock().expect("next id");
            *next_id += 1;
            CreatorId(*next_id)
        };
        let creator = record.clone().into_creator(id);
        self.rows
            .lock()
            .expect("rows")
            .insert(id.0, creator.clone());
        Ok(creator)
    }

    async fn update(&self, id: CreatorId, record: &CreatorRecord) -> Result<Creator, StoreError> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        self.take_failure()?;
        let mut rows = self.rows.lock().expect("rows");
        let row = rows.get_mut(&id.0).ok_or(StoreError::NotFound { id })?;
        let created_at = row.created_at;
        *row = Creator {
            created_at,
            ..record.clone().into_creator(id)
        };
        Ok(row.clone())
    }

    async fn delete_by_id(&self, id: CreatorId) -> Result<(), StoreError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        self.take_failure()?;
        self.rows.lock().expect("rows").remove(&id.0);
        Ok(())
    }
}

pub(crate) fn creator(id: i64, name: &str) -> Creator {
    Creator {
        id: CreatorId(id),
        name: name.to_string(),
        url: format!("https://www.youtube.com/@{}", name.to_lowercase()),
        description: format!("{name} makes videos"),
        image_url: None,
        created_at: None,
    }
}
