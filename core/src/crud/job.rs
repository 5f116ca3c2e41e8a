use crate::error::{OrchestrationError, Result};
use crate::model::job::{Job, JobState, NewJob};
use crate::schema;

use chrono::Utc;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

pub async fn get_job(conn: &mut AsyncPgConnection, id: Uuid) -> Result<Job> {
    use schema::jobs::dsl;
    dsl::jobs
        .filter(dsl::id.eq(id))
        .select(Job::as_select())
        .first(conn)
        .await
        .map_err(|e| match e {
            diesel::result::Error::NotFound => {
                OrchestrationError::NotFound(format!("job {id} not found"))
            }
            other => other.into(),
        })
}

pub async fn register_job(conn: &mut AsyncPgConnection, new_job: &NewJob) -> Result<Job> {
    use schema::jobs::dsl::jobs;
    Ok(diesel::insert_into(jobs)
        .values(new_job)
        .get_result(conn)
        .await?)
}

/// Jobs the monitor still needs to poll: anything not yet in a terminal
/// state. Ordered oldest-first so long-waiting jobs get checked first.
pub async fn list_active(conn: &mut AsyncPgConnection) -> Result<Vec<Job>> {
    use schema::jobs::dsl;
    Ok(dsl::jobs
        .filter(
            dsl::state
                .eq(JobState::Pending)
                .or(dsl::state.eq(JobState::Running))
                .or(dsl::state.eq(JobState::PostProcessing)),
        )
        .select(Job::as_select())
        .order(dsl::created_at.asc())
        .get_results(conn)
        .await?)
}

/// Transitions a job's state, stamping `updated_at`. Returns the row as it
/// stood before the update so callers can detect a state already advanced
/// by a racing poll/push (the monitor's at-most-once dispatch guard).
pub async fn transition_state(
    conn: &mut AsyncPgConnection,
    id: Uuid,
    from: JobState,
    to: JobState,
    result_message: Option<&str>,
) -> Result<Option<Job>> {
    use schema::jobs::dsl;

    let updated: Vec<Job> = diesel::update(
        dsl::jobs.filter(dsl::id.eq(id)).filter(dsl::state.eq(from)),
    )
    .set((
        dsl::state.eq(to),
        dsl::result_message.eq(result_message.map(|s| s.to_string())),
        dsl::updated_at.eq(Utc::now()),
    ))
    .get_results(conn)
    .await?;

    Ok(updated.into_iter().next())
}

pub async fn delete_job(conn: &mut AsyncPgConnection, id: Uuid) -> Result<()> {
    use schema::jobs::dsl;
    diesel::delete(dsl::jobs.filter(dsl::id.eq(id)))
        .execute(conn)
        .await?;
    Ok(())
}
