use std::collections::HashMap;

use shared::{
    domain::{Creator, CreatorId},
    error::{ApiError, ErrorCode},
    protocol::{parse_id_eq_filter, IdOrder},
    schema::CreatorRecord,
};
use storage::Storage;
use tracing::{info, warn};

#[derive(Clone)]
pub struct ApiContext {
    pub storage: Storage,
}

/// Row selection parsed from table query parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TableQuery {
    pub id: Option<CreatorId>,
    pub order: IdOrder,
}

impl TableQuery {
    pub fn parse(params: &HashMap<String, String>) -> Result<Self, ApiError> {
        let mut query = TableQuery::default();
        for (key, value) in params {
            match key.as_str() {
                "select" => {
                    if value.trim() != "*" {
                        return Err(ApiError::new(
                            ErrorCode::Validation,
                            "only select=* is supported",
                        ));
                    }
                }
                "id" => {
                    let id = parse_id_eq_filter(value).ok_or_else(|| {
                        ApiError::new(
                            ErrorCode::Validation,
                            format!("unsupported id filter '{value}'"),
                        )
                    })?;
                    query.id = Some(id);
                }
                "order" => {
                    query.order = IdOrder::parse(value).ok_or_else(|| {
                        ApiError::new(
                            ErrorCode::Validation,
                            format!("unsupported ordering '{value}'"),
                        )
                    })?;
                }
                other => {
                    return Err(ApiError::new(
                        ErrorCode::Validation,
                        format!("unsupported query parameter '{other}'"),
                    ));
                }
            }
        }
        Ok(query)
    }

    fn require_id(&self) -> Result<CreatorId, ApiError> {
        self.id.ok_or_else(|| {
            ApiError::new(
                ErrorCode::Validation,
                "mutations require an id=eq.<id> filter",
            )
        })
    }
}

pub async fn select_creators(ctx: &ApiContext, query: &TableQuery) -> Result<Vec<Creator>, ApiError> {
    match query.id {
        Some(id) => Ok(ctx
            .storage
            .get_creator(id)
            .await
            .map_err(internal)?
            .into_iter()
            .collect()),
        None => ctx
            .storage
            .list_creators(query.order)
            .await
            .map_err(internal),
    }
}

pub async fn insert_creator(ctx: &ApiContext, record: CreatorRecord) -> Result<Creator, ApiError> {
    let record = checked_record(record)?;
    let creator = ctx
        .storage
        .insert_creator(&record)
        .await
        .map_err(internal)?;
    info!(id = creator.id.0, "creator created");
    Ok(creator)
}

/// Full replacement of the filtered row; an empty result means nothing matched.
pub async fn update_creators(
    ctx: &ApiContext,
    query: &TableQuery,
    record: CreatorRecord,
) -> Result<Vec<Creator>, ApiError> {
    let id = query.require_id()?;
    let record = checked_record(record)?;
    let updated = ctx
        .storage
        .update_creator(id, &record)
        .await
        .map_err(internal)?;
    if updated.is_none() {
        info!(id = id.0, "update matched no creator");
    }
    Ok(updated.into_iter().collect())
}

pub async fn delete_creators(ctx: &ApiContext, query: &TableQuery) -> Result<(), ApiError> {
    let id = query.require_id()?;
    let removed = ctx.storage.delete_creator(id).await.map_err(internal)?;
    info!(id = id.0, removed, "creator delete processed");
    Ok(())
}

fn checked_record(record: CreatorRecord) -> Result<CreatorRecord, ApiError> {
    let record = record.normalized();
    record.validate().map_err(|violations| {
        warn!(?violations, "rejected invalid creator record");
        ApiError::invalid_record(&violations)
    })?;
    Ok(record)
}

fn internal(err: anyhow::Error) -> ApiError {
    ApiError::new(ErrorCode::Internal, err.to_string())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
