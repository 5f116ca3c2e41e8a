//! Mutation Orchestrators (C8): the uniform lifecycle every create/update/
//! delete operation follows -- open a transaction, load the connection and
//! its agent endpoint, render the template for the operation, check for a
//! conflicting duplicate, call the Agent, apply the local mutation
//! (including any twin rows an Oracle dialect implies), commit.
//!
//! Each entity module below implements that shape once for its own model;
//! this module only holds what is genuinely shared.

pub mod actor;
pub mod database;
pub mod object;
pub mod pdb;

use crate::agent::{AgentTransport, QueryParam};
use crate::crud::template as template_crud;
use crate::error::Result;
use crate::model::agent_endpoint::AgentEndpoint;
use crate::model::connection::{Connection, Dialect};
use crate::model::object::ObjectType;
use crate::model::template::{TemplateKind, TemplateOperation};
use crate::render::{self, PlaceholderValues};

use diesel_async::AsyncPgConnection;

/// Renders the template registered for `(kind, dialect, operation[, object_type])`
/// against `values`, applying the dialect's finishing pass.
pub async fn render_for(
    conn: &mut AsyncPgConnection,
    kind: TemplateKind,
    dialect: Dialect,
    operation: TemplateOperation,
    object_type_id: Option<ObjectType>,
    values: &PlaceholderValues,
) -> Result<String> {
    let template = template_crud::find_template(conn, kind, dialect, operation, object_type_id).await?;
    let rendered = render::render(&template.hex_sql, values)?;
    Ok(render::finalize(dialect, rendered))
}

/// Submits `statement` to the Agent behind `endpoint` and surfaces its
/// classified failure, the single call site every orchestrator routes its
/// remote leg through.
pub async fn dispatch_statement(
    transport: &AgentTransport,
    endpoint: &AgentEndpoint,
    statement: String,
) -> Result<()> {
    let param = QueryParam::new(endpoint.client_id.clone(), endpoint.os_family, statement);
    transport.execute(endpoint, &param).await?;
    Ok(())
}

/// Common placeholder entries every template family shares: the
/// connection's own identity fields, namespaced as `connection.*`.
pub fn connection_placeholders(cnt: &Connection) -> PlaceholderValues {
    let mut values = PlaceholderValues::new();
    values.insert("connection.host".into(), cnt.host.clone());
    values.insert("connection.db_user".into(), cnt.db_user.clone());
    if let Some(service_name) = &cnt.service_name {
        values.insert("connection.service_name".into(), service_name.clone());
    }
    values
}
