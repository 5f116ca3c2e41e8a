use crate::error::{OrchestrationError, Result};
use crate::model::object::{NewObject, Object};
use crate::schema;

use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

pub async fn get_object(conn: &mut AsyncPgConnection, id: Uuid) -> Result<Object> {
    use schema::objects::dsl;
    dsl::objects
        .filter(dsl::id.eq(id))
        .select(Object::as_select())
        .first(conn)
        .await
        .map_err(|e| match e {
            diesel::result::Error::NotFound => {
                OrchestrationError::NotFound(format!("object {id} not found"))
            }
            other => other.into(),
        })
}

pub async fn list_objects(conn: &mut AsyncPgConnection, dbmgt_id: Uuid) -> Result<Vec<Object>> {
    use schema::objects::dsl;
    Ok(dsl::objects
        .filter(dsl::dbmgt_id.eq(dbmgt_id))
        .select(Object::as_select())
        .order(dsl::name.asc())
        .get_results(conn)
        .await?)
}

pub async fn find_by_name(
    conn: &mut AsyncPgConnection,
    dbmgt_id: Uuid,
    name: &str,
) -> Result<Option<Object>> {
    use schema::objects::dsl;
    Ok(dsl::objects
        .filter(dsl::dbmgt_id.eq(dbmgt_id))
        .filter(dsl::name.eq(name))
        .select(Object::as_select())
        .first(conn)
        .await
        .optional()?)
}

pub async fn create_object(conn: &mut AsyncPgConnection, new_obj: &NewObject) -> Result<Object> {
    use schema::objects::dsl::objects;
    if find_by_name(conn, new_obj.dbmgt_id, &new_obj.name).await?.is_some() {
        return Err(OrchestrationError::Duplicate(format!(
            "object {} already exists in schema {}",
            new_obj.name, new_obj.dbmgt_id
        )));
    }
    Ok(diesel::insert_into(objects)
        .values(new_obj)
        .get_result(conn)
        .await?)
}

pub async fn update_object(
    conn: &mut AsyncPgConnection,
    id: Uuid,
    changes: &NewObject,
) -> Result<Object> {
    use schema::objects::dsl;
    Ok(diesel::update(dsl::objects.filter(dsl::id.eq(id)))
        .set(changes)
        .get_result(conn)
        .await?)
}

pub async fn delete_object(conn: &mut AsyncPgConnection, id: Uuid) -> Result<()> {
    use schema::objects::dsl;
    diesel::delete(dsl::objects.filter(dsl::id.eq(id)))
        .execute(conn)
        .await?;
    Ok(())
}
