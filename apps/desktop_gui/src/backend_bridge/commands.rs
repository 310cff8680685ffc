//! Backend commands queued from UI to backend worker.

use client_core::LoadToken;
use shared::{domain::CreatorId, schema::CreatorRecord};

/// Every command carries the token of the page that issued it; results are matched back by it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCommand {
    LoadAll {
        token: LoadToken,
    },
    LoadOne {
        token: LoadToken,
        id: CreatorId,
    },
    Insert {
        token: LoadToken,
        record: CreatorRecord,
    },
    Update {
        token: LoadToken,
        id: CreatorId,
        record: CreatorRecord,
    },
    Delete {
        token: LoadToken,
        id: CreatorId,
    },
    FetchImage {
        url: String,
    },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::LoadAll { .. } => "load_all",
            Self::LoadOne { .. } => "load_one",
            Self::Insert { .. } => "insert",
            Self::Update { .. } => "update",
            Self::Delete { .. } => "delete",
            Self::FetchImage { .. } => "fetch_image",
        }
    }
}
