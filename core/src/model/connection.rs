use crate::schema::connections;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The target database family. Determines which template set, quoting
/// rules, and container hierarchy (Oracle only) apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, diesel_derive_enum::DbEnum)]
#[ExistingTypePath = "crate::schema::sql_types::Dialect"]
pub enum Dialect {
    Mysql,
    Oracle,
}

/// Shared enabled/disabled status used by connections, actors, and objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, diesel_derive_enum::DbEnum)]
#[ExistingTypePath = "crate::schema::sql_types::EntityStatus"]
pub enum EntityStatus {
    Enabled,
    Disabled,
}

/// A remote database endpoint (`Cnt`). For Oracle, `parent_id` is `Some`
/// iff this row represents a PDB nested under a CDB; `service_name` is
/// required for Oracle and unused for MySQL.
#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize, Deserialize, PartialEq)]
#[diesel(table_name = connections)]
pub struct Connection {
    pub id: Uuid,
    pub name: String,
    pub dialect: Dialect,
    pub host: String,
    pub port: i32,
    pub db_user: String,
    pub db_password: String,
    pub service_name: Option<String>,
    pub agent_endpoint_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub status: EntityStatus,
}

#[derive(Debug, Clone, Insertable, AsChangeset, Serialize, Deserialize, PartialEq)]
#[diesel(table_name = connections)]
pub struct NewConnection {
    pub name: String,
    pub dialect: Dialect,
    pub host: String,
    pub port: i32,
    pub db_user: String,
    pub db_password: String,
    pub service_name: Option<String>,
    pub agent_endpoint_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub status: EntityStatus,
}

impl Connection {
    /// A connection is an Oracle CDB iff it is Oracle, carries a service
    /// name, and has no parent.
    pub fn is_oracle_cdb(&self) -> bool {
        self.dialect == Dialect::Oracle && self.service_name.is_some() && self.parent_id.is_none()
    }

    /// A connection is a PDB iff it is Oracle and has a parent.
    pub fn is_oracle_pdb(&self) -> bool {
        self.dialect == Dialect::Oracle && self.parent_id.is_some()
    }
}
