use crate::error::{OrchestrationError, Result};
use crate::model::connection::Dialect;
use crate::model::object::ObjectType;
use crate::model::template::{NewTemplate, Template, TemplateKind, TemplateOperation};
use crate::schema;

use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

pub async fn get_template(conn: &mut AsyncPgConnection, id: Uuid) -> Result<Template> {
    use schema::templates::dsl;
    dsl::templates
        .filter(dsl::id.eq(id))
        .select(Template::as_select())
        .first(conn)
        .await
        .map_err(|e| match e {
            diesel::result::Error::NotFound => {
                OrchestrationError::NotFound(format!("template {id} not found"))
            }
            other => other.into(),
        })
}

/// Resolves the template a mutation orchestrator needs: kind + dialect +
/// operation, scoped to a specific object type when one is given (objects
/// vary by table/view/index/etc; actors and schemas do not).
pub async fn find_template(
    conn: &mut AsyncPgConnection,
    kind: TemplateKind,
    dialect: Dialect,
    operation: TemplateOperation,
    object_type_id: Option<ObjectType>,
) -> Result<Template> {
    use schema::templates::dsl;

    let mut query = dsl::templates
        .filter(dsl::kind.eq(kind))
        .filter(dsl::dialect.eq(dialect))
        .filter(dsl::operation.eq(operation))
        .into_boxed();

    query = match object_type_id {
        Some(t) => query.filter(dsl::object_type_id.eq(t)),
        None => query.filter(dsl::object_type_id.is_null()),
    };

    query
        .select(Template::as_select())
        .first(conn)
        .await
        .map_err(|e| match e {
            diesel::result::Error::NotFound => OrchestrationError::NotFound(format!(
                "no {:?}/{:?}/{:?} template registered for {:?}",
                kind, dialect, operation, object_type_id
            )),
            other => other.into(),
        })
}

pub async fn create_template(
    conn: &mut AsyncPgConnection,
    new_tpl: &NewTemplate,
) -> Result<Template> {
    use schema::templates::dsl::templates;
    Ok(diesel::insert_into(templates)
        .values(new_tpl)
        .get_result(conn)
        .await?)
}

pub async fn delete_template(conn: &mut AsyncPgConnection, id: Uuid) -> Result<()> {
    use schema::templates::dsl;
    diesel::delete(dsl::templates.filter(dsl::id.eq(id)))
        .execute(conn)
        .await?;
    Ok(())
}
