//! Oracle PDB lifecycle. A PDB is modeled as a `connections` row with
//! `parent_id` pointing at its CDB (see [`crate::model::connection`]), so
//! creating one is a connection-create plus a hardcoded Oracle DDL pair
//! the Agent runs against the CDB root.

use crate::agent::AgentTransport;
use crate::crud::connection as connection_crud;
use crate::crud::PgDb;
use crate::error::{OrchestrationError, Result};
use crate::model::connection::{Connection, Dialect, EntityStatus, NewConnection};
use crate::oracle::{self, ContainerRole};
use crate::render::escape_oracle_literal;

use uuid::Uuid;

use super::dispatch_statement;

/// `CREATE PLUGGABLE DATABASE` has no per-deployment variation (the file
/// locations and seed clause are fixed by the CDB's own layout), so unlike
/// every other mutation this is not rendered from a stored template.
fn create_pdb_ddl(pdb_name: &str, admin_user: &str, admin_password: &str) -> String {
    format!(
        "CREATE PLUGGABLE DATABASE {pdb_name} ADMIN USER {admin_user} IDENTIFIED BY \"{password}\" \
         ROLES=(DBA) FILE_NAME_CONVERT=('pdbseed','{pdb_name}')",
        pdb_name = pdb_name,
        admin_user = admin_user,
        password = escape_oracle_literal(admin_password),
    )
}

fn open_pdb_ddl(pdb_name: &str) -> String {
    format!("ALTER PLUGGABLE DATABASE {pdb_name} OPEN")
}

fn drop_pdb_ddl(pdb_name: &str) -> String {
    format!("DROP PLUGGABLE DATABASE {pdb_name} INCLUDING DATAFILES")
}

fn close_pdb_ddl(pdb_name: &str) -> String {
    format!("ALTER PLUGGABLE DATABASE {pdb_name} CLOSE IMMEDIATE")
}

pub async fn create_pdb(
    db: &mut PgDb<'_>,
    transport: &AgentTransport,
    cdb_id: Uuid,
    pdb_name: String,
    admin_user: String,
    admin_password: String,
) -> Result<Connection> {
    db.transaction(move |conn| {
        Box::pin(async move {
            let cdb = connection_crud::get_connection(conn, cdb_id).await?;
            if oracle::classify(&cdb) != ContainerRole::Cdb {
                return Err(OrchestrationError::Validation(format!(
                    "connection {cdb_id} is not a CDB"
                )));
            }
            let endpoint = connection_crud::get_agent_endpoint(conn, cdb.agent_endpoint_id).await?;

            if connection_crud::child_pdbs(conn, cdb_id)
                .await?
                .iter()
                .any(|p| p.name == pdb_name)
            {
                return Err(OrchestrationError::Duplicate(format!(
                    "PDB {pdb_name} already exists under CDB {cdb_id}"
                )));
            }

            dispatch_statement(
                transport,
                &endpoint,
                create_pdb_ddl(&pdb_name, &admin_user, &admin_password),
            )
            .await?;
            dispatch_statement(transport, &endpoint, open_pdb_ddl(&pdb_name)).await?;

            let new_conn = NewConnection {
                name: pdb_name.clone(),
                dialect: Dialect::Oracle,
                host: cdb.host.clone(),
                port: cdb.port,
                db_user: admin_user,
                db_password: admin_password,
                service_name: None,
                agent_endpoint_id: cdb.agent_endpoint_id,
                parent_id: Some(cdb_id),
                status: EntityStatus::Enabled,
            };
            connection_crud::create_connection(conn, &new_conn).await
        })
    })
    .await
}

pub async fn delete_pdb(db: &mut PgDb<'_>, transport: &AgentTransport, pdb_id: Uuid) -> Result<()> {
    db.transaction(move |conn| {
        Box::pin(async move {
            let pdb = connection_crud::get_connection(conn, pdb_id).await?;
            if oracle::classify(&pdb) != ContainerRole::Pdb {
                return Err(OrchestrationError::Validation(format!(
                    "connection {pdb_id} is not a PDB"
                )));
            }
            let cdb_id = pdb.parent_id.expect("classify() guarantees a PDB has a parent");
            let cdb = connection_crud::get_connection(conn, cdb_id).await?;
            let endpoint = connection_crud::get_agent_endpoint(conn, cdb.agent_endpoint_id).await?;

            if connection_crud::has_dependents(conn, pdb_id).await? {
                return Err(OrchestrationError::Validation(format!(
                    "PDB {pdb_id} still has schemas or actors registered"
                )));
            }

            dispatch_statement(transport, &endpoint, close_pdb_ddl(&pdb.name)).await?;
            dispatch_statement(transport, &endpoint, drop_pdb_ddl(&pdb.name)).await?;

            connection_crud::delete_connection(conn, pdb_id).await
        })
    })
    .await
}
