//! Handles a policy-compliance completion: an all-or-nothing bulk update,
//! unlike the sync-style handlers above -- a compliance sweep that only
//! half-applied would leave some schemas under a stale status with no way
//! to tell which ones from the outside.

use crate::crud::database as database_crud;
use crate::crud::PgDb;
use crate::error::Result;
use crate::model::connection::EntityStatus;
use crate::model::job::{CallbackPayload, Job, JobState};

pub async fn apply(db: &mut PgDb<'_>, job: &Job) -> Result<()> {
    let CallbackPayload::PolicyCompliance { cnt_id } = job.context_data.clone() else {
        unreachable!("dispatch routed a non-PolicyCompliance payload to policy_compliance::apply")
    };

    let compliant = job.state != JobState::Failed;
    let target_status = if compliant {
        EntityStatus::Enabled
    } else {
        EntityStatus::Disabled
    };

    db.transaction(|conn| {
        Box::pin(async move {
            let schemas = database_crud::list_databases(conn, cnt_id).await?;
            for schema in schemas {
                let mut changes = schema.clone();
                changes.status = target_status;
                database_crud::update_database(
                    conn,
                    schema.id,
                    &crate::model::database::NewDatabase {
                        cnt_id: changes.cnt_id,
                        name: changes.name,
                        dialect: changes.dialect,
                        description: changes.description,
                        status: changes.status,
                    },
                )
                .await?;
            }
            Ok(())
        })
    })
    .await
}
