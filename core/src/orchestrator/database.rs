use crate::agent::AgentTransport;
use crate::crud::connection as connection_crud;
use crate::crud::{database as database_crud, PgDb};
use crate::error::Result;
use crate::model::database::{Database, NewDatabase};
use crate::model::template::{TemplateKind, TemplateOperation};

use uuid::Uuid;

use super::{connection_placeholders, dispatch_statement, render_for};

pub async fn create_database(
    db: &mut PgDb<'_>,
    transport: &AgentTransport,
    cnt_id: Uuid,
    name: String,
    description: Option<String>,
) -> Result<Database> {
    db.transaction(move |conn| {
        Box::pin(async move {
            let (cnt, endpoint) = connection_crud::get_connection_with_endpoint(conn, cnt_id).await?;

            let mut values = connection_placeholders(&cnt);
            values.insert("dbmgt.name".into(), name.clone());

            let sql = render_for(conn, TemplateKind::DbType, cnt.dialect, TemplateOperation::Create, None, &values)
                .await?;
            dispatch_statement(transport, &endpoint, sql).await?;

            let new_db = NewDatabase {
                cnt_id,
                name,
                dialect: cnt.dialect,
                description,
                status: crate::model::connection::EntityStatus::Enabled,
            };
            database_crud::create_database(conn, &new_db).await
        })
    })
    .await
}

pub async fn delete_database(
    db: &mut PgDb<'_>,
    transport: &AgentTransport,
    database_id: Uuid,
) -> Result<()> {
    db.transaction(move |conn| {
        Box::pin(async move {
            let schema = database_crud::get_database(conn, database_id).await?;
            let (cnt, endpoint) = connection_crud::get_connection_with_endpoint(conn, schema.cnt_id).await?;

            let mut values = connection_placeholders(&cnt);
            values.insert("dbmgt.name".into(), schema.name.clone());

            let sql = render_for(conn, TemplateKind::DbType, cnt.dialect, TemplateOperation::Delete, None, &values)
                .await?;
            dispatch_statement(transport, &endpoint, sql).await?;

            database_crud::delete_database(conn, database_id).await
        })
    })
    .await
}
