use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use dbctl_core::crud::{actor as actor_crud, PgDb};
use dbctl_core::model::actor::ActorUpdate;
use dbctl_core::model::connection::EntityStatus;
use dbctl_core::orchestrator::actor as actor_orchestrator;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::Result;
use crate::state::AppState;

#[derive(Deserialize)]
struct CreateActorRequest {
    db_user: String,
    ip_address: String,
    password: String,
}

#[post("/connections/{cnt_id}/actors")]
async fn create_actor(
    state: web::Data<AppState>,
    cnt_id: web::Path<Uuid>,
    body: web::Json<CreateActorRequest>,
) -> Result<impl Responder> {
    let mut db = PgDb::try_from_pool(&state.pool).await?;
    let req = body.into_inner();
    let actor = actor_orchestrator::create_actor(
        &mut db,
        &state.transport,
        cnt_id.into_inner(),
        req.db_user,
        req.ip_address,
        req.password,
    )
    .await?;
    Ok(HttpResponse::Created().json(actor))
}

#[get("/actors/{id}")]
async fn get_actor(state: web::Data<AppState>, id: web::Path<Uuid>) -> Result<impl Responder> {
    let mut db = PgDb::try_from_pool(&state.pool).await?;
    let actor = actor_crud::get_actor(db.conn(), id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(actor))
}

#[get("/connections/{cnt_id}/actors")]
async fn list_actors(state: web::Data<AppState>, cnt_id: web::Path<Uuid>) -> Result<impl Responder> {
    let mut db = PgDb::try_from_pool(&state.pool).await?;
    let actors = actor_crud::list_actors(db.conn(), cnt_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(actors))
}

#[derive(Deserialize, Default)]
struct UpdateActorRequest {
    new_db_user: Option<String>,
    new_ip_address: Option<String>,
    new_password: Option<String>,
    description: Option<String>,
    status: Option<EntityStatus>,
}

#[put("/connections/{cnt_id}/actors/{actor_id}")]
async fn update_actor(
    state: web::Data<AppState>,
    path: web::Path<(Uuid, Uuid)>,
    body: web::Json<UpdateActorRequest>,
) -> Result<impl Responder> {
    let mut db = PgDb::try_from_pool(&state.pool).await?;
    let (_cnt_id, actor_id) = path.into_inner();
    let req = body.into_inner();
    let update = ActorUpdate {
        new_db_user: req.new_db_user,
        new_ip_address: req.new_ip_address,
        new_password: req.new_password,
        description: req.description,
        status: req.status,
    };
    let actor = actor_orchestrator::update_actor(&mut db, &state.transport, actor_id, update).await?;
    Ok(HttpResponse::Ok().json(actor))
}

#[delete("/connections/{cnt_id}/actors/{actor_id}")]
async fn delete_actor(state: web::Data<AppState>, path: web::Path<(Uuid, Uuid)>) -> Result<impl Responder> {
    let mut db = PgDb::try_from_pool(&state.pool).await?;
    let (_cnt_id, actor_id) = path.into_inner();
    actor_orchestrator::delete_actor(&mut db, &state.transport, actor_id).await?;
    Ok(HttpResponse::NoContent())
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(create_actor)
        .service(get_actor)
        .service(list_actors)
        .service(update_actor)
        .service(delete_actor);
}
