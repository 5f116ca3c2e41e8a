use crate::agent::AgentTransport;
use crate::crud::connection as connection_crud;
use crate::crud::database as database_crud;
use crate::crud::{object as object_crud, PgDb};
use crate::error::{OrchestrationError, Result};
use crate::model::connection::EntityStatus;
use crate::model::object::{NewObject, Object, ObjectType};
use crate::model::template::{TemplateKind, TemplateOperation};
use crate::render::PlaceholderValues;

use uuid::Uuid;

use super::{connection_placeholders, dispatch_statement, render_for};

pub async fn create_object(
    db: &mut PgDb<'_>,
    transport: &AgentTransport,
    dbmgt_id: Uuid,
    object_type: ObjectType,
    name: String,
    sql_param_hex: Option<String>,
    depends_on: Option<Uuid>,
) -> Result<Object> {
    db.transaction(move |conn| {
        Box::pin(async move {
            let schema = database_crud::get_database(conn, dbmgt_id).await?;
            let (cnt, endpoint) = connection_crud::get_connection_with_endpoint(conn, schema.cnt_id).await?;

            if let Some(dep_id) = depends_on {
                object_crud::get_object(conn, dep_id).await?;
            }

            let mut values: PlaceholderValues = connection_placeholders(&cnt);
            values.insert("dbobjectmgt.dbmgt_name".into(), schema.name.clone());
            values.insert("dbobjectmgt.name".into(), name.clone());
            if let Some(param_hex) = &sql_param_hex {
                let decoded = crate::render::decode_hex_sql(param_hex)?;
                values.insert("dbobjectmgt.sql_param".into(), decoded);
            }

            let sql = render_for(
                conn,
                TemplateKind::Object,
                cnt.dialect,
                TemplateOperation::Create,
                Some(object_type),
                &values,
            )
            .await?;
            dispatch_statement(transport, &endpoint, sql).await?;

            let new_obj = NewObject {
                dbmgt_id,
                object_type_id: object_type,
                name,
                sql_param_hex,
                status: EntityStatus::Enabled,
                depends_on,
            };
            object_crud::create_object(conn, &new_obj).await
        })
    })
    .await
}

pub async fn delete_object(
    db: &mut PgDb<'_>,
    transport: &AgentTransport,
    object_id: Uuid,
) -> Result<()> {
    db.transaction(move |conn| {
        Box::pin(async move {
            let object = object_crud::get_object(conn, object_id).await?;
            let schema = database_crud::get_database(conn, object.dbmgt_id).await?;
            let (cnt, endpoint) = connection_crud::get_connection_with_endpoint(conn, schema.cnt_id).await?;

            let dependents = object_crud::list_objects(conn, object.dbmgt_id)
                .await?
                .into_iter()
                .filter(|o| o.depends_on == Some(object_id))
                .count();
            if dependents > 0 {
                return Err(OrchestrationError::Validation(format!(
                    "object {object_id} has {dependents} dependent object(s); delete those first"
                )));
            }

            let mut values: PlaceholderValues = connection_placeholders(&cnt);
            values.insert("dbobjectmgt.dbmgt_name".into(), schema.name.clone());
            values.insert("dbobjectmgt.name".into(), object.name.clone());

            let sql = render_for(
                conn,
                TemplateKind::Object,
                cnt.dialect,
                TemplateOperation::Delete,
                Some(object.object_type_id),
                &values,
            )
            .await?;
            dispatch_statement(transport, &endpoint, sql).await?;

            object_crud::delete_object(conn, object_id).await
        })
    })
    .await
}
