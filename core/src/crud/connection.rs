use crate::error::{OrchestrationError, Result};
use crate::model::agent_endpoint::AgentEndpoint;
use crate::model::connection::{Connection, NewConnection};
use crate::schema;

use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

pub async fn get_connection(conn: &mut AsyncPgConnection, id: Uuid) -> Result<Connection> {
    use schema::connections::dsl;
    dsl::connections
        .filter(dsl::id.eq(id))
        .select(Connection::as_select())
        .first(conn)
        .await
        .map_err(|e| match e {
            diesel::result::Error::NotFound => {
                OrchestrationError::NotFound(format!("connection {id} not found"))
            }
            other => other.into(),
        })
}

pub async fn get_agent_endpoint(conn: &mut AsyncPgConnection, id: Uuid) -> Result<AgentEndpoint> {
    use schema::agent_endpoints::dsl;
    dsl::agent_endpoints
        .filter(dsl::id.eq(id))
        .select(AgentEndpoint::as_select())
        .first(conn)
        .await
        .map_err(|e| match e {
            diesel::result::Error::NotFound => {
                OrchestrationError::NotFound(format!("agent endpoint {id} not found"))
            }
            other => other.into(),
        })
}

/// Loads a connection and its agent endpoint together, the pair every
/// mutation orchestrator needs before rendering and dispatching SQL.
pub async fn get_connection_with_endpoint(
    conn: &mut AsyncPgConnection,
    id: Uuid,
) -> Result<(Connection, AgentEndpoint)> {
    let cnt = get_connection(conn, id).await?;
    let endpoint = get_agent_endpoint(conn, cnt.agent_endpoint_id).await?;
    Ok((cnt, endpoint))
}

pub async fn create_connection(
    conn: &mut AsyncPgConnection,
    new_cnt: &NewConnection,
) -> Result<Connection> {
    use schema::connections::dsl::connections;
    Ok(diesel::insert_into(connections)
        .values(new_cnt)
        .get_result(conn)
        .await?)
}

pub async fn delete_connection(conn: &mut AsyncPgConnection, id: Uuid) -> Result<()> {
    use schema::connections::dsl;
    diesel::delete(dsl::connections.filter(dsl::id.eq(id)))
        .execute(conn)
        .await?;
    Ok(())
}

/// Returns the current child PDBs of a CDB connection, ordered by name for
/// deterministic fan-out.
pub async fn child_pdbs(conn: &mut AsyncPgConnection, cdb_id: Uuid) -> Result<Vec<Connection>> {
    use schema::connections::dsl;
    Ok(dsl::connections
        .filter(dsl::parent_id.eq(cdb_id))
        .select(Connection::as_select())
        .order(dsl::name.asc())
        .get_results(conn)
        .await?)
}

/// True if any schema, actor, or child PDB still references this
/// connection -- the delete-eligibility check for `DROP PDB`/connection
/// teardown flows.
pub async fn has_dependents(conn: &mut AsyncPgConnection, cnt_id: Uuid) -> Result<bool> {
    use schema::actors::dsl as actors_dsl;
    use schema::connections::dsl as conn_dsl;
    use schema::databases::dsl as db_dsl;

    let actor_count: i64 = actors_dsl::actors
        .filter(actors_dsl::cnt_id.eq(cnt_id))
        .count()
        .get_result(conn)
        .await?;
    if actor_count > 0 {
        return Ok(true);
    }

    let db_count: i64 = db_dsl::databases
        .filter(db_dsl::cnt_id.eq(cnt_id))
        .count()
        .get_result(conn)
        .await?;
    if db_count > 0 {
        return Ok(true);
    }

    let pdb_count: i64 = conn_dsl::connections
        .filter(conn_dsl::parent_id.eq(cnt_id))
        .count()
        .get_result(conn)
        .await?;
    Ok(pdb_count > 0)
}
