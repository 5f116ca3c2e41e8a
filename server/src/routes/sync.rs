use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use actix_web::{post, web, HttpResponse, Responder};
use dbctl_core::agent::{AgentTransport, QueryParam};
use dbctl_core::conf::EnvConfigSettings;
use dbctl_core::crud::{actor as actor_crud, connection as connection_crud, database as database_crud, PgDb};
use dbctl_core::model::actor::NewActor;
use dbctl_core::model::database::NewDatabase;
use dbctl_core::oracle;
use dbctl_core::sync::{self, SyncOutcome};
use diesel_async::AsyncPgConnection;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::state::AppState;

#[derive(Deserialize)]
struct DiscoveredActor {
    db_user: String,
    ip_address: String,
}

#[derive(Deserialize)]
struct DiscoveredDatabase {
    name: String,
}

/// Outcome of syncing one connection: its own actor/schema reconciliation,
/// plus -- for an Oracle CDB -- the same outcome recursively for every
/// child PDB, keyed by PDB name.
#[derive(Debug, Default, Serialize)]
struct ConnectionSyncOutcome {
    actors: SyncOutcome,
    databases: SyncOutcome,
    pdbs: HashMap<String, ConnectionSyncOutcome>,
}

async fn sync_actors_for(
    conn: &mut AsyncPgConnection,
    transport: &AgentTransport,
    conf: &EnvConfigSettings,
    cnt_id: Uuid,
) -> Result<SyncOutcome> {
    let cnt = connection_crud::get_connection(conn, cnt_id).await?;
    let endpoint = connection_crud::get_agent_endpoint(conn, cnt.agent_endpoint_id).await?;

    let param = QueryParam::new(endpoint.client_id.clone(), endpoint.os_family, "LIST_ACTORS".to_string());
    let response = transport.execute(&endpoint, &param).await?;
    let discovered: Vec<DiscoveredActor> =
        serde_json::from_str(&response.output).map_err(dbctl_core::error::OrchestrationError::from)?;
    let discovered: Vec<DiscoveredActor> = discovered
        .into_iter()
        .filter(|d| !sync::is_system_user(cnt.dialect, conf, &d.db_user))
        .collect();

    let local = actor_crud::list_actors(conn, cnt_id).await?;

    sync::reconcile(
        conn,
        local,
        discovered,
        |a| (a.db_user.clone(), a.ip_address.clone()),
        |d| (d.db_user.clone(), d.ip_address.clone()),
        |conn: &mut AsyncPgConnection, d: DiscoveredActor| {
            let new_actor = NewActor::auto_collected(cnt_id, d.db_user, d.ip_address);
            async move {
                actor_crud::insert_discovered(conn, &new_actor).await?;
                Ok(())
            }
        },
        |conn: &mut AsyncPgConnection, local_actor| async move { actor_crud::delete_actor(conn, local_actor.id).await },
    )
    .await
}

async fn sync_databases_for(
    conn: &mut AsyncPgConnection,
    transport: &AgentTransport,
    cnt_id: Uuid,
) -> Result<SyncOutcome> {
    let cnt = connection_crud::get_connection(conn, cnt_id).await?;
    let endpoint = connection_crud::get_agent_endpoint(conn, cnt.agent_endpoint_id).await?;

    let param = QueryParam::new(endpoint.client_id.clone(), endpoint.os_family, "LIST_DATABASES".to_string());
    let response = transport.execute(&endpoint, &param).await?;
    let discovered: Vec<DiscoveredDatabase> =
        serde_json::from_str(&response.output).map_err(dbctl_core::error::OrchestrationError::from)?;

    let local = database_crud::list_databases(conn, cnt_id).await?;
    let dialect = cnt.dialect;

    sync::reconcile(
        conn,
        local,
        discovered,
        |d| d.name.clone(),
        |d| d.name.clone(),
        |conn: &mut AsyncPgConnection, d: DiscoveredDatabase| {
            let new_db = NewDatabase::auto_collected(cnt_id, d.name, dialect);
            async move {
                database_crud::insert_discovered(conn, &new_db).await?;
                Ok(())
            }
        },
        |conn: &mut AsyncPgConnection, local_db| async move { database_crud::delete_database(conn, local_db.id).await },
    )
    .await
}

/// Runs the inventory sync engine for a single connection: reconciles
/// actors and schemas against what the Agent reports, then -- if this is
/// an Oracle CDB -- recurses into every child PDB so a single sync call at
/// the CDB fans out across its whole container hierarchy.
fn sync_connection<'a>(
    conn: &'a mut AsyncPgConnection,
    transport: &'a AgentTransport,
    conf: &'a EnvConfigSettings,
    cnt_id: Uuid,
) -> Pin<Box<dyn Future<Output = Result<ConnectionSyncOutcome>> + Send + 'a>> {
    Box::pin(async move {
        let actors = sync_actors_for(conn, transport, conf, cnt_id).await?;
        let databases = sync_databases_for(conn, transport, cnt_id).await?;

        let cnt = connection_crud::get_connection(conn, cnt_id).await?;
        let mut pdbs = HashMap::new();
        for pdb in oracle::child_pdbs(conn, &cnt).await? {
            let outcome = sync_connection(conn, transport, conf, pdb.id).await?;
            pdbs.insert(pdb.name.clone(), outcome);
        }

        Ok(ConnectionSyncOutcome { actors, databases, pdbs })
    })
}

/// The whole recursive CDB-to-PDB fan-out runs inside one transaction, so a
/// failure partway through (including in a child PDB) rolls back every
/// insert/delete already applied in this sync invocation.
#[post("/connections/{cnt_id}/sync")]
async fn sync(state: web::Data<AppState>, cnt_id: web::Path<Uuid>) -> Result<impl Responder> {
    let mut db = PgDb::try_from_pool(&state.pool).await?;
    let transport = state.transport.clone();
    let conf = state.conf.clone();
    let cnt_id = cnt_id.into_inner();
    let outcome = db
        .transaction(move |conn| Box::pin(async move { sync_connection(conn, &transport, &conf, cnt_id).await }))
        .await?;
    Ok(HttpResponse::Ok().json(outcome))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(sync);
}
