//! Handles a single-dbmgt object-generation completion: parses the Agent's
//! per-query result rows out of the job's result message, and -- all
//! inside one transaction -- records one `DBObjectMgt` row per successful
//! result, skipping objects already present. A failed query is logged and
//! skipped rather than rolling back the whole job; the job only fails
//! outright if every query failed.

use crate::crud::object as object_crud;
use crate::crud::PgDb;
use crate::error::{OrchestrationError, Result};
use crate::model::connection::EntityStatus;
use crate::model::job::{CallbackPayload, Job};
use crate::model::object::{NewObject, ObjectType};

use serde::Deserialize;
use tracing::warn;

/// One row of the Agent's result payload, keyed by the same `query_key`
/// [`CallbackPayload::ObjectGen::rendered_queries`] submitted it under.
#[derive(Debug, Deserialize)]
struct ResultRow {
    query_key: String,
    status: String,
    #[allow(dead_code)]
    query: String,
    #[allow(dead_code)]
    result: String,
}

pub async fn apply(db: &mut PgDb<'_>, job: &Job) -> Result<()> {
    let CallbackPayload::ObjectGen { dbmgt_id, .. } = job.context_data.clone() else {
        unreachable!("dispatch routed a non-ObjectGen payload to object_gen::apply")
    };

    let raw = job.result_message.as_deref().ok_or_else(|| {
        OrchestrationError::JobFailed(format!("job {} completed with no result message", job.id))
    })?;
    let rows: Vec<ResultRow> = serde_json::from_str(raw)?;

    if rows.is_empty() || rows.iter().all(|r| !is_success(&r.status)) {
        return Err(OrchestrationError::JobFailed(format!(
            "object generation for schema {dbmgt_id} produced no successful results"
        )));
    }

    db.transaction(|conn| {
        Box::pin(async move {
            for row in &rows {
                if !is_success(&row.status) {
                    warn!("object-generation query {} failed: {}", row.query_key, row.status);
                    continue;
                }

                let Some((object_type, name)) = parse_query_key(&row.query_key) else {
                    warn!("could not parse object type/name from query key {}", row.query_key);
                    continue;
                };

                if object_crud::find_by_name(conn, dbmgt_id, name).await?.is_some() {
                    continue;
                }

                let new_obj = NewObject {
                    dbmgt_id,
                    object_type_id: object_type,
                    name: name.to_string(),
                    sql_param_hex: None,
                    status: EntityStatus::Enabled,
                    depends_on: None,
                };
                object_crud::create_object(conn, &new_obj).await?;
            }
            Ok(())
        })
    })
    .await
}

fn is_success(status: &str) -> bool {
    status.eq_ignore_ascii_case("success") || status.eq_ignore_ascii_case("ok")
}

/// Query keys are `ObjectType:<type>::<name>`, the same `ObjectType:<type>`
/// tag [`super::combined_object_gen`]'s `DB:<dbmgt_id>_ObjectType:<type>`
/// keys carry, with a `::<name>` suffix identifying which object of that
/// type the row is for (this callback is already scoped to one dbmgt, so
/// it needs no `DB:` prefix).
fn parse_query_key(key: &str) -> Option<(ObjectType, &str)> {
    let (type_token, name) = key.split_once("::")?;
    let type_token = type_token.strip_prefix("ObjectType:")?;
    let object_type = match type_token {
        "Table" => ObjectType::Table,
        "View" => ObjectType::View,
        "Procedure" => ObjectType::Procedure,
        "Function" => ObjectType::Function,
        "Index" => ObjectType::Index,
        "Sequence" => ObjectType::Sequence,
        "Trigger" => ObjectType::Trigger,
        "MaterializedView" => ObjectType::MaterializedView,
        "Package" => ObjectType::Package,
        _ => return None,
    };
    if name.is_empty() {
        return None;
    }
    Some((object_type, name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_object_type_and_name_from_query_key() {
        assert_eq!(
            parse_query_key("ObjectType:Index::idx_users_email"),
            Some((ObjectType::Index, "idx_users_email"))
        );
    }

    #[test]
    fn rejects_unknown_type_token() {
        assert_eq!(parse_query_key("ObjectType:Bogus::thing"), None);
    }

    #[test]
    fn rejects_malformed_key() {
        assert_eq!(parse_query_key("not_a_valid_key"), None);
    }

    #[test]
    fn recognizes_success_status_case_insensitively() {
        assert!(is_success("Success"));
        assert!(is_success("OK"));
        assert!(!is_success("failed"));
    }
}
