use crate::error::{OrchestrationError, Result};
use crate::model::actor::{Actor, NewActor};
use crate::model::connection::EntityStatus;
use crate::schema;

use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

pub async fn get_actor(conn: &mut AsyncPgConnection, id: Uuid) -> Result<Actor> {
    use schema::actors::dsl;
    dsl::actors
        .filter(dsl::id.eq(id))
        .select(Actor::as_select())
        .first(conn)
        .await
        .map_err(|e| match e {
            diesel::result::Error::NotFound => {
                OrchestrationError::NotFound(format!("actor {id} not found"))
            }
            other => other.into(),
        })
}

pub async fn list_actors(conn: &mut AsyncPgConnection, cnt_id: Uuid) -> Result<Vec<Actor>> {
    use schema::actors::dsl;
    Ok(dsl::actors
        .filter(dsl::cnt_id.eq(cnt_id))
        .select(Actor::as_select())
        .order(dsl::db_user.asc())
        .get_results(conn)
        .await?)
}

pub async fn find_by_identity(
    conn: &mut AsyncPgConnection,
    cnt_id: Uuid,
    db_user: &str,
    ip_address: &str,
) -> Result<Option<Actor>> {
    use schema::actors::dsl;
    Ok(dsl::actors
        .filter(dsl::cnt_id.eq(cnt_id))
        .filter(dsl::db_user.eq(db_user))
        .filter(dsl::ip_address.eq(ip_address))
        .select(Actor::as_select())
        .first(conn)
        .await
        .optional()?)
}

pub async fn create_actor(conn: &mut AsyncPgConnection, new_actor: &NewActor) -> Result<Actor> {
    use schema::actors::dsl::actors;
    if find_by_identity(conn, new_actor.cnt_id, &new_actor.db_user, &new_actor.ip_address)
        .await?
        .is_some()
    {
        return Err(OrchestrationError::Duplicate(format!(
            "actor {}@{} already exists on connection {}",
            new_actor.db_user, new_actor.ip_address, new_actor.cnt_id
        )));
    }
    Ok(diesel::insert_into(actors)
        .values(new_actor)
        .get_result(conn)
        .await?)
}

pub async fn insert_discovered(conn: &mut AsyncPgConnection, new_actor: &NewActor) -> Result<Actor> {
    use schema::actors::dsl::actors;
    Ok(diesel::insert_into(actors)
        .values(new_actor)
        .get_result(conn)
        .await?)
}

/// Applies the rename/password/status fields of a flexible update in place.
/// Callers decide which sub-case applies (rename-only, password-only, both)
/// before rendering SQL; this only persists the outcome.
pub async fn apply_update(
    conn: &mut AsyncPgConnection,
    id: Uuid,
    new_db_user: Option<&str>,
    new_ip_address: Option<&str>,
    new_password: Option<&str>,
    description: Option<&str>,
    status: Option<EntityStatus>,
) -> Result<Actor> {
    use schema::actors::dsl;

    let mut stmt = diesel::update(dsl::actors.filter(dsl::id.eq(id))).into_boxed();
    if let Some(v) = new_db_user {
        stmt = stmt.set(dsl::db_user.eq(v.to_string()));
    }
    if let Some(v) = new_ip_address {
        stmt = stmt.set(dsl::ip_address.eq(v.to_string()));
    }
    if let Some(v) = new_password {
        stmt = stmt.set(dsl::db_password.eq(Some(v.to_string())));
    }
    if let Some(v) = description {
        stmt = stmt.set(dsl::description.eq(Some(v.to_string())));
    }
    if let Some(v) = status {
        stmt = stmt.set(dsl::status.eq(v));
    }
    stmt.execute(conn).await?;
    get_actor(conn, id).await
}

pub async fn delete_actor(conn: &mut AsyncPgConnection, id: Uuid) -> Result<()> {
    use schema::actors::dsl;
    diesel::delete(dsl::actors.filter(dsl::id.eq(id)))
        .execute(conn)
        .await?;
    Ok(())
}
