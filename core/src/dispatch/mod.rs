//! Completion Dispatcher (C5): once a job leaves `PostProcessing`, routes
//! its [`CallbackPayload`] to the handler for its [`CallbackKind`] and
//! commits the resulting local mutation in a single transaction.

pub mod combined_object_gen;
pub mod object_gen;
pub mod policy_compliance;
pub mod upload;

use crate::crud::PgDb;
use crate::error::Result;
use crate::job_monitor::JobCompletionDispatcher;
use crate::model::job::{CallbackPayload, Job};

use diesel_async::pooled_connection::bb8::Pool;
use diesel_async::AsyncPgConnection;

pub struct CompletionDispatcher {
    pool: Pool<AsyncPgConnection>,
}

impl CompletionDispatcher {
    pub fn new(pool: Pool<AsyncPgConnection>) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl JobCompletionDispatcher for CompletionDispatcher {
    async fn dispatch(&self, job: Job) -> Result<()> {
        let mut db = PgDb::try_from_pool(&self.pool).await?;
        match job.context_data.clone() {
            CallbackPayload::ObjectGen { .. } => object_gen::apply(&mut db, &job).await,
            CallbackPayload::CombinedObjectGen { .. } => combined_object_gen::apply(&mut db, &job).await,
            CallbackPayload::Upload { .. } => upload::apply(&mut db, &job).await,
            CallbackPayload::PolicyCompliance { .. } => policy_compliance::apply(&mut db, &job).await,
        }
    }
}
