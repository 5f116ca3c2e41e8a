use crate::agent::AgentTransport;
use crate::crud::connection as connection_crud;
use crate::crud::database as database_crud;
use crate::crud::{actor as actor_crud, PgDb};
use crate::error::{OrchestrationError, Result};
use crate::model::actor::{Actor, ActorUpdate, NewActor};
use crate::model::connection::Dialect;
use crate::model::database::NewDatabase;
use crate::model::template::{TemplateKind, TemplateOperation};
use crate::render::{escape_oracle_literal, mysql_account_identifier, PlaceholderValues};

use diesel_async::AsyncPgConnection;
use uuid::Uuid;

use super::{connection_placeholders, dispatch_statement, render_for};

pub async fn create_actor(
    db: &mut PgDb<'_>,
    transport: &AgentTransport,
    cnt_id: Uuid,
    db_user: String,
    ip_address: String,
    password: String,
) -> Result<Actor> {
    db.transaction(move |conn| {
        Box::pin(async move {
            let (cnt, endpoint) = connection_crud::get_connection_with_endpoint(conn, cnt_id).await?;

            if actor_crud::find_by_identity(conn, cnt_id, &db_user, &ip_address)
                .await?
                .is_some()
            {
                return Err(OrchestrationError::Duplicate(format!(
                    "actor {db_user}@{ip_address} already exists"
                )));
            }

            let mut values = connection_placeholders(&cnt);
            values.insert("dbactormgt.dbuser".into(), db_user.clone());
            values.insert("dbactormgt.ip_address".into(), ip_address.clone());
            values.insert("dbactormgt.password".into(), password.clone());
            values.insert(
                "dbactormgt.account_identifier".into(),
                mysql_account_identifier(&db_user, &ip_address),
            );

            let sql = render_for(conn, TemplateKind::Actor, cnt.dialect, TemplateOperation::Create, None, &values)
                .await?;
            dispatch_statement(transport, &endpoint, sql).await?;

            let new_actor = NewActor {
                cnt_id,
                db_user: db_user.clone(),
                ip_address: ip_address.clone(),
                db_password: Some(password),
                status: crate::model::connection::EntityStatus::Enabled,
                description: None,
            };
            let actor = actor_crud::create_actor(conn, &new_actor).await?;

            if matches!(cnt.dialect, Dialect::Oracle) {
                create_oracle_twin_schema(conn, cnt_id, &db_user).await?;
            }

            Ok(actor)
        })
    })
    .await
}

/// Oracle users imply a same-named schema; this keeps the two in lockstep
/// without the Agent needing to know about the twin relationship.
async fn create_oracle_twin_schema(conn: &mut AsyncPgConnection, cnt_id: Uuid, name: &str) -> Result<()> {
    if database_crud::find_by_name(conn, cnt_id, name).await?.is_some() {
        return Ok(());
    }
    let new_db = NewDatabase::auto_collected(cnt_id, name, Dialect::Oracle);
    database_crud::insert_discovered(conn, &new_db).await?;
    Ok(())
}

/// The inverse of [`create_oracle_twin_schema`]: removes the same-named
/// schema row an Oracle `DROP USER` implies, if still present.
async fn delete_oracle_twin_schema(conn: &mut AsyncPgConnection, cnt_id: Uuid, name: &str) -> Result<()> {
    if let Some(twin) = database_crud::find_by_name(conn, cnt_id, name).await? {
        database_crud::delete_database(conn, twin.id).await?;
    }
    Ok(())
}

/// Updates an actor, dispatching to the Agent only when credentials
/// actually change. A metadata-only change (description, status) never
/// calls the Agent; the local row is saved directly. Credential changes
/// are dialect-specific: MySQL supports a flexible rename/password/both
/// update, Oracle supports password-only (identity changes are rejected).
pub async fn update_actor(
    db: &mut PgDb<'_>,
    transport: &AgentTransport,
    actor_id: Uuid,
    update: ActorUpdate,
) -> Result<Actor> {
    db.transaction(move |conn| {
        Box::pin(async move {
            let actor = actor_crud::get_actor(conn, actor_id).await?;
            let (cnt, endpoint) = connection_crud::get_connection_with_endpoint(conn, actor.cnt_id).await?;

            if !update.changes_credentials() {
                return save_metadata_only(conn, actor_id, &update).await;
            }

            match cnt.dialect {
                Dialect::Mysql => update_mysql_credentials(conn, transport, &endpoint, &cnt, &actor, actor_id, &update).await,
                Dialect::Oracle => update_oracle_credentials(conn, transport, &endpoint, &actor, actor_id, &update).await,
            }
        })
    })
    .await
}

async fn save_metadata_only(conn: &mut AsyncPgConnection, actor_id: Uuid, update: &ActorUpdate) -> Result<Actor> {
    actor_crud::apply_update(
        conn,
        actor_id,
        None,
        None,
        None,
        update.description.as_deref(),
        update.status,
    )
    .await
}

/// Flexible MySQL actor update: resolves to one of three independent SQL
/// shapes (rename only, password only, both) based on which fields of
/// `update` are set, and issues exactly one statement to the Agent.
async fn update_mysql_credentials(
    conn: &mut AsyncPgConnection,
    transport: &AgentTransport,
    endpoint: &crate::model::agent_endpoint::AgentEndpoint,
    cnt: &crate::model::connection::Connection,
    actor: &Actor,
    actor_id: Uuid,
    update: &ActorUpdate,
) -> Result<Actor> {
    let new_db_user = update.new_db_user.clone().unwrap_or_else(|| actor.db_user.clone());
    let new_ip_address = update.new_ip_address.clone().unwrap_or_else(|| actor.ip_address.clone());

    let mut values = connection_placeholders(cnt);
    values.insert("dbactormgt.dbuser".into(), actor.db_user.clone());
    values.insert("dbactormgt.ip_address".into(), actor.ip_address.clone());
    values.insert("dbactormgt.new_dbuser".into(), new_db_user.clone());
    values.insert("dbactormgt.new_ip_address".into(), new_ip_address.clone());
    values.insert(
        "dbactormgt.account_identifier".into(),
        mysql_account_identifier(&actor.db_user, &actor.ip_address),
    );
    values.insert(
        "dbactormgt.new_account_identifier".into(),
        mysql_account_identifier(&new_db_user, &new_ip_address),
    );
    if let Some(password) = &update.new_password {
        values.insert("dbactormgt.password".into(), password.clone());
    }

    let operation = update_operation(update);
    let sql = render_for(conn, TemplateKind::Actor, cnt.dialect, operation, None, &values).await?;
    dispatch_statement(transport, endpoint, sql).await?;

    actor_crud::apply_update(
        conn,
        actor_id,
        update.new_db_user.as_deref(),
        update.new_ip_address.as_deref(),
        update.new_password.as_deref(),
        update.description.as_deref(),
        update.status,
    )
    .await
}

/// Oracle actor update: only a password change goes to the Agent, via the
/// hardcoded `ALTER USER ... IDENTIFIED BY` DDL (no per-deployment
/// variation, so -- like PDB DDL -- this is not rendered from a stored
/// template). Renaming an Oracle actor is not supported.
async fn update_oracle_credentials(
    conn: &mut AsyncPgConnection,
    transport: &AgentTransport,
    endpoint: &crate::model::agent_endpoint::AgentEndpoint,
    actor: &Actor,
    actor_id: Uuid,
    update: &ActorUpdate,
) -> Result<Actor> {
    if update.renames_identity() {
        return Err(OrchestrationError::Validation(
            "Oracle actors do not support renaming; only password and metadata updates are allowed".into(),
        ));
    }

    if let Some(password) = &update.new_password {
        dispatch_statement(transport, endpoint, alter_user_password_ddl(&actor.db_user, password)).await?;
    }

    actor_crud::apply_update(
        conn,
        actor_id,
        None,
        None,
        update.new_password.as_deref(),
        update.description.as_deref(),
        update.status,
    )
    .await
}

fn alter_user_password_ddl(db_user: &str, password: &str) -> String {
    format!(
        "ALTER USER \"{db_user}\" IDENTIFIED BY \"{password}\"",
        db_user = db_user,
        password = escape_oracle_literal(password),
    )
}

fn update_operation(update: &ActorUpdate) -> TemplateOperation {
    match (update.renames_identity(), update.new_password.is_some()) {
        (true, true) => TemplateOperation::Update,
        (true, false) => TemplateOperation::RenameActor,
        (false, true) => TemplateOperation::UpdatePassword,
        (false, false) => TemplateOperation::Update,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rename_only_picks_rename_actor_operation() {
        let update = ActorUpdate {
            new_db_user: Some("new_user".into()),
            ..Default::default()
        };
        assert_eq!(update_operation(&update), TemplateOperation::RenameActor);
    }

    #[test]
    fn password_only_picks_update_password_operation() {
        let update = ActorUpdate {
            new_password: Some("hunter2".into()),
            ..Default::default()
        };
        assert_eq!(update_operation(&update), TemplateOperation::UpdatePassword);
    }

    #[test]
    fn rename_and_password_picks_generic_update_operation() {
        let update = ActorUpdate {
            new_ip_address: Some("10.0.0.%".into()),
            new_password: Some("hunter2".into()),
            ..Default::default()
        };
        assert_eq!(update_operation(&update), TemplateOperation::Update);
    }

    #[test]
    fn neither_field_still_resolves_to_an_operation() {
        assert_eq!(update_operation(&ActorUpdate::default()), TemplateOperation::Update);
    }

    #[test]
    fn alter_user_password_ddl_quotes_user_and_escapes_password() {
        let ddl = alter_user_password_ddl("HR", "o'brien");
        assert_eq!(ddl, "ALTER USER \"HR\" IDENTIFIED BY \"o''brien\"");
    }
}

pub async fn delete_actor(db: &mut PgDb<'_>, transport: &AgentTransport, actor_id: Uuid) -> Result<()> {
    db.transaction(move |conn| {
        Box::pin(async move {
            let actor = actor_crud::get_actor(conn, actor_id).await?;
            let (cnt, endpoint) = connection_crud::get_connection_with_endpoint(conn, actor.cnt_id).await?;

            let mut values: PlaceholderValues = connection_placeholders(&cnt);
            values.insert("dbactormgt.dbuser".into(), actor.db_user.clone());
            values.insert("dbactormgt.ip_address".into(), actor.ip_address.clone());
            values.insert(
                "dbactormgt.account_identifier".into(),
                mysql_account_identifier(&actor.db_user, &actor.ip_address),
            );

            let sql = render_for(conn, TemplateKind::Actor, cnt.dialect, TemplateOperation::Delete, None, &values)
                .await?;
            dispatch_statement(transport, &endpoint, sql).await?;

            actor_crud::delete_actor(conn, actor_id).await?;

            if matches!(cnt.dialect, Dialect::Oracle) {
                delete_oracle_twin_schema(conn, cnt.id, &actor.db_user).await?;
            }

            Ok(())
        })
    })
    .await
}
