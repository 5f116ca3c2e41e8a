use super::connection::EntityStatus;
use crate::schema::actors;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A database user (`DBActorMgt`). `ip_address` is the MySQL host mask in
/// `user@host` pairs; Oracle actors always store `%`. `db_password` is set
/// only on mutation requests and is never re-read from the remote.
#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations, Serialize, Deserialize, PartialEq)]
#[diesel(belongs_to(crate::model::connection::Connection, foreign_key = cnt_id))]
#[diesel(table_name = actors)]
pub struct Actor {
    pub id: Uuid,
    pub cnt_id: Uuid,
    pub db_user: String,
    pub ip_address: String,
    pub db_password: Option<String>,
    pub status: EntityStatus,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Insertable, AsChangeset, Serialize, Deserialize, PartialEq)]
#[diesel(table_name = actors)]
pub struct NewActor {
    pub cnt_id: Uuid,
    pub db_user: String,
    pub ip_address: String,
    pub db_password: Option<String>,
    pub status: EntityStatus,
    pub description: Option<String>,
}

impl NewActor {
    /// Default row for an auto-collected actor found by the sync engine.
    /// Never carries a password: the remote is the only place one lives.
    pub fn auto_collected(cnt_id: Uuid, db_user: impl Into<String>, ip_address: impl Into<String>) -> Self {
        Self {
            cnt_id,
            db_user: db_user.into(),
            ip_address: ip_address.into(),
            db_password: None,
            status: EntityStatus::Enabled,
            description: Some("Auto-collected".to_string()),
        }
    }
}

/// Fields that may change in an actor update (see
/// [`crate::orchestrator::actor::update_actor`]).
#[derive(Debug, Clone, Default)]
pub struct ActorUpdate {
    pub new_db_user: Option<String>,
    pub new_ip_address: Option<String>,
    pub new_password: Option<String>,
    pub description: Option<String>,
    pub status: Option<EntityStatus>,
}

impl ActorUpdate {
    pub fn changes_credentials(&self) -> bool {
        self.new_db_user.is_some() || self.new_ip_address.is_some() || self.new_password.is_some()
    }

    pub fn renames_identity(&self) -> bool {
        self.new_db_user.is_some() || self.new_ip_address.is_some()
    }
}
