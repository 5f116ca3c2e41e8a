use crate::error::{OrchestrationError, Result};
use crate::model::database::{Database, NewDatabase};
use crate::schema;

use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

pub async fn get_database(conn: &mut AsyncPgConnection, id: Uuid) -> Result<Database> {
    use schema::databases::dsl;
    dsl::databases
        .filter(dsl::id.eq(id))
        .select(Database::as_select())
        .first(conn)
        .await
        .map_err(|e| match e {
            diesel::result::Error::NotFound => {
                OrchestrationError::NotFound(format!("database {id} not found"))
            }
            other => other.into(),
        })
}

pub async fn list_databases(conn: &mut AsyncPgConnection, cnt_id: Uuid) -> Result<Vec<Database>> {
    use schema::databases::dsl;
    Ok(dsl::databases
        .filter(dsl::cnt_id.eq(cnt_id))
        .select(Database::as_select())
        .order(dsl::name.asc())
        .get_results(conn)
        .await?)
}

pub async fn find_by_name(
    conn: &mut AsyncPgConnection,
    cnt_id: Uuid,
    name: &str,
) -> Result<Option<Database>> {
    use schema::databases::dsl;
    Ok(dsl::databases
        .filter(dsl::cnt_id.eq(cnt_id))
        .filter(dsl::name.eq(name))
        .select(Database::as_select())
        .first(conn)
        .await
        .optional()?)
}

pub async fn create_database(
    conn: &mut AsyncPgConnection,
    new_db: &NewDatabase,
) -> Result<Database> {
    use schema::databases::dsl::databases;
    if find_by_name(conn, new_db.cnt_id, &new_db.name).await?.is_some() {
        return Err(OrchestrationError::Duplicate(format!(
            "database {} already exists on connection {}",
            new_db.name, new_db.cnt_id
        )));
    }
    Ok(diesel::insert_into(databases)
        .values(new_db)
        .get_result(conn)
        .await?)
}

/// Inserts without the duplicate check, for use by the sync engine which has
/// already diffed against the current inventory.
pub async fn insert_discovered(
    conn: &mut AsyncPgConnection,
    new_db: &NewDatabase,
) -> Result<Database> {
    use schema::databases::dsl::databases;
    Ok(diesel::insert_into(databases)
        .values(new_db)
        .get_result(conn)
        .await?)
}

pub async fn update_database(
    conn: &mut AsyncPgConnection,
    id: Uuid,
    changes: &NewDatabase,
) -> Result<Database> {
    use schema::databases::dsl;
    Ok(diesel::update(dsl::databases.filter(dsl::id.eq(id)))
        .set(changes)
        .get_result(conn)
        .await?)
}

pub async fn delete_database(conn: &mut AsyncPgConnection, id: Uuid) -> Result<()> {
    use schema::databases::dsl;
    diesel::delete(dsl::databases.filter(dsl::id.eq(id)))
        .execute(conn)
        .await?;
    Ok(())
}
