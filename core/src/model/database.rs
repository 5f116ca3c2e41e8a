use super::connection::{Dialect, EntityStatus};
use crate::schema::databases;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A logical database/schema on a connection (`DBMgt`). For Oracle, each
/// user implies a twin schema record sharing the same name -- see
/// [`crate::orchestrator::actor`].
#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations, Serialize, Deserialize, PartialEq)]
#[diesel(belongs_to(crate::model::connection::Connection, foreign_key = cnt_id))]
#[diesel(table_name = databases)]
pub struct Database {
    pub id: Uuid,
    pub cnt_id: Uuid,
    pub name: String,
    pub dialect: Dialect,
    pub description: Option<String>,
    pub status: EntityStatus,
}

#[derive(Debug, Clone, Insertable, AsChangeset, Serialize, Deserialize, PartialEq)]
#[diesel(table_name = databases)]
pub struct NewDatabase {
    pub cnt_id: Uuid,
    pub name: String,
    pub dialect: Dialect,
    pub description: Option<String>,
    pub status: EntityStatus,
}

impl NewDatabase {
    /// Default row for an auto-collected schema found by the sync engine.
    pub fn auto_collected(cnt_id: Uuid, name: impl Into<String>, dialect: Dialect) -> Self {
        Self {
            cnt_id,
            name: name.into(),
            dialect,
            description: Some("Auto-collected".to_string()),
            status: EntityStatus::Enabled,
        }
    }
}
