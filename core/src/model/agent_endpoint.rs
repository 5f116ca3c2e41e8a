use crate::schema::agent_endpoints;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Operating system family of the host an Agent runs on; determines which
/// executable path the Agent Transport invokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, diesel_derive_enum::DbEnum)]
#[ExistingTypePath = "crate::schema::sql_types::OsFamily"]
pub enum OsFamily {
    Linux,
    Windows,
}

/// Opaque routing record mapping a connection's agent id to a transport
/// client id and OS family. Immutable from the core's perspective.
#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize, Deserialize, PartialEq)]
#[diesel(table_name = agent_endpoints)]
pub struct AgentEndpoint {
    pub id: Uuid,
    pub client_id: String,
    pub os_family: OsFamily,
}

#[derive(Debug, Clone, Insertable, Serialize, Deserialize, PartialEq)]
#[diesel(table_name = agent_endpoints)]
pub struct NewAgentEndpoint {
    pub client_id: String,
    pub os_family: OsFamily,
}
