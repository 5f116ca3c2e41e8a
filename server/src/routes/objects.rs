use actix_web::{delete, get, post, web, HttpResponse, Responder};
use dbctl_core::crud::{object as object_crud, PgDb};
use dbctl_core::model::object::ObjectType;
use dbctl_core::orchestrator::object as object_orchestrator;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::Result;
use crate::state::AppState;

#[derive(Deserialize)]
struct CreateObjectRequest {
    object_type: ObjectType,
    name: String,
    sql_param_hex: Option<String>,
    depends_on: Option<Uuid>,
}

#[post("/connections/{cnt_id}/databases/{dbmgt_id}/objects")]
async fn create_object(
    state: web::Data<AppState>,
    path: web::Path<(Uuid, Uuid)>,
    body: web::Json<CreateObjectRequest>,
) -> Result<impl Responder> {
    let mut db = PgDb::try_from_pool(&state.pool).await?;
    let (_cnt_id, dbmgt_id) = path.into_inner();
    let req = body.into_inner();
    let object = object_orchestrator::create_object(
        &mut db,
        &state.transport,
        dbmgt_id,
        req.object_type,
        req.name,
        req.sql_param_hex,
        req.depends_on,
    )
    .await?;
    Ok(HttpResponse::Created().json(object))
}

#[get("/objects/{id}")]
async fn get_object(state: web::Data<AppState>, id: web::Path<Uuid>) -> Result<impl Responder> {
    let mut db = PgDb::try_from_pool(&state.pool).await?;
    let object = object_crud::get_object(db.conn(), id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(object))
}

#[get("/databases/{dbmgt_id}/objects")]
async fn list_objects(state: web::Data<AppState>, dbmgt_id: web::Path<Uuid>) -> Result<impl Responder> {
    let mut db = PgDb::try_from_pool(&state.pool).await?;
    let objects = object_crud::list_objects(db.conn(), dbmgt_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(objects))
}

#[delete("/databases/{dbmgt_id}/objects/{object_id}")]
async fn delete_object(state: web::Data<AppState>, path: web::Path<(Uuid, Uuid)>) -> Result<impl Responder> {
    let mut db = PgDb::try_from_pool(&state.pool).await?;
    let (_dbmgt_id, object_id) = path.into_inner();
    object_orchestrator::delete_object(&mut db, &state.transport, object_id).await?;
    Ok(HttpResponse::NoContent())
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(create_object)
        .service(get_object)
        .service(list_objects)
        .service(delete_object);
}
