//! Wire conventions for the `creators` table, a PostgREST-compatible subset.

use crate::domain::CreatorId;

pub const CREATORS_TABLE: &str = "creators";
pub const API_KEY_HEADER: &str = "apikey";
pub const PREFER_HEADER: &str = "prefer";
pub const RETURN_REPRESENTATION: &str = "return=representation";

pub fn creators_route() -> String {
    format!("/rest/v1/{CREATORS_TABLE}")
}

/// `id=eq.<n>` filter value.
pub fn id_eq_filter(id: CreatorId) -> String {
    format!("eq.{}", id.0)
}

pub fn parse_id_eq_filter(raw: &str) -> Option<CreatorId> {
    raw.strip_prefix("eq.")?
        .trim()
        .parse::<i64>()
        .ok()
        .map(CreatorId)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdOrder {
    #[default]
    Ascending,
    Descending,
}

impl IdOrder {
    pub fn as_param(self) -> &'static str {
        match self {
            Self::Ascending => "id.asc",
            Self::Descending => "id.desc",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "id" | "id.asc" => Some(Self::Ascending),
            "id.desc" => Some(Self::Descending),
            _ => None,
        }
    }
}
