use actix_web::{get, post, web, HttpResponse, Responder};
use dbctl_core::agent::AgentResponse;
use dbctl_core::crud::{job as job_crud, PgDb};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::Result;
use crate::state::AppState;

#[get("/jobs/{id}/status")]
async fn get_job(state: web::Data<AppState>, id: web::Path<Uuid>) -> Result<impl Responder> {
    let mut db = PgDb::try_from_pool(&state.pool).await?;
    let job = job_crud::get_job(db.conn(), id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(job))
}

#[derive(Deserialize)]
struct NotifyRequest {
    response_hex: String,
}

/// Push endpoint the Agent calls when a background job finishes, racing
/// safely against the monitor's own poll loop (see
/// [`dbctl_core::job_monitor::JobMonitor::notify`]).
#[post("/jobs/{id}/notify")]
async fn notify_job(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
    body: web::Json<NotifyRequest>,
) -> Result<impl Responder> {
    let response = AgentResponse::decode(&body.response_hex)?;
    state.job_monitor.notify(id.into_inner(), response).await?;
    Ok(HttpResponse::Ok().finish())
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(get_job).service(notify_job);
}
