use actix_web::{delete, get, post, web, HttpResponse, Responder};
use dbctl_core::crud::{database as database_crud, PgDb};
use dbctl_core::orchestrator::database as database_orchestrator;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::Result;
use crate::state::AppState;

#[derive(Deserialize)]
struct CreateDatabaseRequest {
    name: String,
    description: Option<String>,
}

#[post("/connections/{cnt_id}/databases")]
async fn create_database(
    state: web::Data<AppState>,
    cnt_id: web::Path<Uuid>,
    body: web::Json<CreateDatabaseRequest>,
) -> Result<impl Responder> {
    let mut db = PgDb::try_from_pool(&state.pool).await?;
    let req = body.into_inner();
    let database = database_orchestrator::create_database(
        &mut db,
        &state.transport,
        cnt_id.into_inner(),
        req.name,
        req.description,
    )
    .await?;
    Ok(HttpResponse::Created().json(database))
}

#[get("/databases/{id}")]
async fn get_database(state: web::Data<AppState>, id: web::Path<Uuid>) -> Result<impl Responder> {
    let mut db = PgDb::try_from_pool(&state.pool).await?;
    let database = database_crud::get_database(db.conn(), id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(database))
}

#[get("/connections/{cnt_id}/databases")]
async fn list_databases(state: web::Data<AppState>, cnt_id: web::Path<Uuid>) -> Result<impl Responder> {
    let mut db = PgDb::try_from_pool(&state.pool).await?;
    let databases = database_crud::list_databases(db.conn(), cnt_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(databases))
}

#[delete("/connections/{cnt_id}/databases/{dbmgt_id}")]
async fn delete_database(state: web::Data<AppState>, path: web::Path<(Uuid, Uuid)>) -> Result<impl Responder> {
    let mut db = PgDb::try_from_pool(&state.pool).await?;
    let (_cnt_id, dbmgt_id) = path.into_inner();
    database_orchestrator::delete_database(&mut db, &state.transport, dbmgt_id).await?;
    Ok(HttpResponse::NoContent())
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(create_database)
        .service(get_database)
        .service(list_databases)
        .service(delete_database);
}
