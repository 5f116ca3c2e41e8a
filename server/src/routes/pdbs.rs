use actix_web::{delete, get, post, web, HttpResponse, Responder};
use dbctl_core::crud::{connection as connection_crud, PgDb};
use dbctl_core::orchestrator::pdb as pdb_orchestrator;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::Result;
use crate::state::AppState;

#[derive(Deserialize)]
struct CreatePdbRequest {
    pdb_name: String,
    admin_user: String,
    admin_password: String,
}

#[post("/connections/{cdb_id}/pdbs")]
async fn create_pdb(
    state: web::Data<AppState>,
    cdb_id: web::Path<Uuid>,
    body: web::Json<CreatePdbRequest>,
) -> Result<impl Responder> {
    let mut db = PgDb::try_from_pool(&state.pool).await?;
    let req = body.into_inner();
    let pdb = pdb_orchestrator::create_pdb(
        &mut db,
        &state.transport,
        cdb_id.into_inner(),
        req.pdb_name,
        req.admin_user,
        req.admin_password,
    )
    .await?;
    Ok(HttpResponse::Created().json(pdb))
}

#[get("/connections/{cdb_id}/pdbs")]
async fn list_pdbs(state: web::Data<AppState>, cdb_id: web::Path<Uuid>) -> Result<impl Responder> {
    let mut db = PgDb::try_from_pool(&state.pool).await?;
    let pdbs = connection_crud::child_pdbs(db.conn(), cdb_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(pdbs))
}

#[delete("/connections/{cdb_id}/pdbs/{pdb_id}")]
async fn delete_pdb(state: web::Data<AppState>, path: web::Path<(Uuid, Uuid)>) -> Result<impl Responder> {
    let mut db = PgDb::try_from_pool(&state.pool).await?;
    let (_cdb_id, pdb_id) = path.into_inner();
    pdb_orchestrator::delete_pdb(&mut db, &state.transport, pdb_id).await?;
    Ok(HttpResponse::NoContent())
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(create_pdb).service(list_pdbs).service(delete_pdb);
}
