//! Job Monitor (C4): polls the Agent for outstanding job status and runs
//! each job's completion dispatch exactly once, whether it learns of
//! completion via polling or an external push notification.
//!
//! An explicit instance rather than a process-wide singleton, so a test or
//! an embedding binary can run more than one monitor against different
//! pools without global state.

use crate::agent::{AgentResponse, AgentTransport, QueryParam};
use crate::crud::job as job_crud;
use crate::crud::PgDb;
use crate::error::{OrchestrationError, Result};
use crate::model::agent_endpoint::AgentEndpoint;
use crate::model::job::{Job, JobState};

use std::sync::Arc;
use std::time::Duration;

use diesel_async::pooled_connection::bb8::Pool;
use diesel_async::AsyncPgConnection;
use tracing::{error, info, warn};
use uuid::Uuid;

#[async_trait::async_trait]
pub trait JobCompletionDispatcher: Send + Sync {
    /// Runs a job's completion callback. Called exactly once per job,
    /// after the job has been atomically advanced to `PostProcessing`.
    async fn dispatch(&self, job: Job) -> Result<()>;
}

pub struct JobMonitor {
    pool: Pool<AsyncPgConnection>,
    transport: AgentTransport,
    dispatcher: Arc<dyn JobCompletionDispatcher>,
    poll_interval: Duration,
}

impl JobMonitor {
    pub fn new(
        pool: Pool<AsyncPgConnection>,
        transport: AgentTransport,
        dispatcher: Arc<dyn JobCompletionDispatcher>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            pool,
            transport,
            dispatcher,
            poll_interval,
        }
    }

    /// Runs the poll loop until `shutdown` resolves, then marks every job
    /// still active as cancelled before returning.
    pub async fn run(&self, mut shutdown: tokio::sync::oneshot::Receiver<()>) -> Result<()> {
        loop {
            tokio::select! {
                _ = tokio::time::sleep(self.poll_interval) => {
                    if let Err(e) = self.poll_once().await {
                        error!("job monitor poll failed: {e}");
                    }
                }
                _ = &mut shutdown => {
                    info!("job monitor shutting down, cancelling active jobs");
                    self.cancel_all_active().await?;
                    return Ok(());
                }
            }
        }
    }

    async fn poll_once(&self) -> Result<()> {
        let mut db = PgDb::try_from_pool(&self.pool).await?;
        let active = job_crud::list_active(db.conn()).await?;
        for job in active {
            if let Err(e) = self.poll_job(&job).await {
                warn!("polling job {} failed: {e}", job.id);
            }
        }
        Ok(())
    }

    async fn poll_job(&self, job: &Job) -> Result<()> {
        let mut db = PgDb::try_from_pool(&self.pool).await?;
        let endpoint = AgentEndpoint {
            id: Uuid::nil(),
            client_id: job.client_id.clone(),
            os_family: job.os_family,
        };
        let status_param = QueryParam::new(job.client_id.clone(), job.os_family, job.agent_job_id.clone());

        let response = match self.transport.execute(&endpoint, &status_param).await {
            Ok(r) => r,
            Err(OrchestrationError::AgentRetryableFailure(_)) | Err(OrchestrationError::AgentTimeout(_)) => {
                // Still pending from the Agent's perspective; check again next tick.
                return Ok(());
            }
            Err(e) => {
                self.finish_failed(db.conn(), job.id, &e.to_string()).await?;
                return Err(e);
            }
        };

        self.handle_agent_response(&mut db, job, response).await
    }

    async fn handle_agent_response(
        &self,
        db: &mut PgDb<'_>,
        job: &Job,
        response: AgentResponse,
    ) -> Result<()> {
        use crate::agent::AgentStatus;
        match response.status {
            AgentStatus::Accepted => Ok(()),
            AgentStatus::Ok => self.complete_after_processing(db, job.id, Some(&response.output)).await,
            AgentStatus::Error => self.finish_failed(db.conn(), job.id, &response.output).await,
        }
    }

    /// Advances a job to `PostProcessing` and runs its dispatcher exactly
    /// once. If the job has already left `Running` (a racing poll/push
    /// notification got there first), this is a no-op.
    pub async fn complete_after_processing(
        &self,
        db: &mut PgDb<'_>,
        job_id: Uuid,
        result_message: Option<&str>,
    ) -> Result<()> {
        let advanced = job_crud::transition_state(
            db.conn(),
            job_id,
            JobState::Running,
            JobState::PostProcessing,
            result_message,
        )
        .await?;

        let Some(job) = advanced else {
            return Ok(());
        };

        match self.dispatcher.dispatch(job).await {
            Ok(()) => {
                job_crud::transition_state(
                    db.conn(),
                    job_id,
                    JobState::PostProcessing,
                    JobState::Completed,
                    result_message,
                )
                .await?;
            }
            Err(e) => {
                job_crud::transition_state(
                    db.conn(),
                    job_id,
                    JobState::PostProcessing,
                    JobState::Failed,
                    Some(&e.to_string()),
                )
                .await?;
                return Err(e);
            }
        }
        Ok(())
    }

    async fn finish_failed(&self, conn: &mut AsyncPgConnection, job_id: Uuid, message: &str) -> Result<()> {
        job_crud::transition_state(conn, job_id, JobState::Running, JobState::Failed, Some(message)).await?;
        Ok(())
    }

    /// Called by the REST layer when the Agent pushes a notification
    /// rather than waiting for the next poll tick. Races safely against
    /// `poll_job` because both paths go through the same
    /// `Running -> PostProcessing` guarded transition.
    pub async fn notify(&self, job_id: Uuid, response: AgentResponse) -> Result<()> {
        let mut db = PgDb::try_from_pool(&self.pool).await?;
        let job = job_crud::get_job(db.conn(), job_id).await?;
        self.handle_agent_response(&mut db, &job, response).await
    }

    async fn cancel_all_active(&self) -> Result<()> {
        let mut db = PgDb::try_from_pool(&self.pool).await?;
        let active = job_crud::list_active(db.conn()).await?;
        for job in active {
            for from in [JobState::Pending, JobState::Running, JobState::PostProcessing] {
                job_crud::transition_state(db.conn(), job.id, from, JobState::Cancelled, Some("shutdown"))
                    .await?;
            }
        }
        Ok(())
    }
}
