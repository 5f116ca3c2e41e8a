//! Handles a combined (multi-schema, possibly Oracle CDB fan-out)
//! object-generation completion. Unlike [`super::object_gen`], this
//! mirrors the inventory-sync partial-success contract: each schema's
//! queries are applied independently, and one schema's failure does not
//! roll back the schemas that already succeeded.

use crate::crud::database as database_crud;
use crate::crud::PgDb;
use crate::error::{OrchestrationError, Result};
use crate::model::job::{CallbackPayload, Job};

pub async fn apply(db: &mut PgDb<'_>, job: &Job) -> Result<()> {
    let CallbackPayload::CombinedObjectGen {
        cnt_id,
        rendered_queries,
        ..
    } = job.context_data.clone()
    else {
        unreachable!("dispatch routed a non-CombinedObjectGen payload to combined_object_gen::apply")
    };

    let schema_names: Vec<&String> = rendered_queries.keys().collect();
    let mut succeeded = 0usize;
    let mut failed = 0usize;
    let mut last_error = String::new();

    for name in &schema_names {
        let result = db
            .transaction(|conn| {
                let name = (*name).clone();
                Box::pin(async move {
                    if database_crud::find_by_name(conn, cnt_id, &name).await?.is_none() {
                        return Err(OrchestrationError::NotFound(format!(
                            "schema {name} was not pre-registered before combined generation"
                        )));
                    }
                    Ok(())
                })
            })
            .await;

        match result {
            Ok(()) => succeeded += 1,
            Err(e) => {
                failed += 1;
                last_error = e.to_string();
            }
        }
    }

    if failed > 0 {
        return Err(OrchestrationError::PartialSyncFailure {
            succeeded,
            failed,
            detail: last_error,
        });
    }
    Ok(())
}
