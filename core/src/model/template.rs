use super::connection::Dialect;
use super::object::ObjectType;
use crate::schema::templates;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which entity family a [`Template`] renders SQL for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, diesel_derive_enum::DbEnum)]
#[ExistingTypePath = "crate::schema::sql_types::TemplateKind"]
pub enum TemplateKind {
    /// `DBActor` templates: actor create/update/delete/get.
    Actor,
    /// `DBType` templates: database/PDB create/update/delete/get.
    DbType,
    /// `DBObject` templates: object create/update/delete/get.
    Object,
}

/// The CRUD-style operation a template implements. `RenameActor` and
/// `UpdatePassword` exist alongside the generic `Update` because a MySQL
/// actor's flexible update has three independent sub-cases (rename only,
/// password only, or both) each needing its own SQL shape; `Update` covers
/// the "both" case and schema/object/PDB updates, which only ever have one
/// shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, diesel_derive_enum::DbEnum)]
#[ExistingTypePath = "crate::schema::sql_types::TemplateOperation"]
pub enum TemplateOperation {
    Get,
    Create,
    Update,
    Delete,
    RenameActor,
    UpdatePassword,
}

/// A per-dialect, per-operation hex-encoded SQL template (`DBActor`/
/// `DBType`/`DBObject` in the data model). `input_type_id`, when set,
/// creates a dependency the renderer must resolve before this template
/// (e.g. an index template referencing its table template).
#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize, Deserialize, PartialEq)]
#[diesel(table_name = templates)]
pub struct Template {
    pub id: Uuid,
    pub kind: TemplateKind,
    pub dialect: Dialect,
    pub operation: TemplateOperation,
    pub object_type_id: Option<ObjectType>,
    pub input_type_id: Option<ObjectType>,
    pub hex_sql: String,
}

#[derive(Debug, Clone, Insertable, Serialize, Deserialize, PartialEq)]
#[diesel(table_name = templates)]
pub struct NewTemplate {
    pub kind: TemplateKind,
    pub dialect: Dialect,
    pub operation: TemplateOperation,
    pub object_type_id: Option<ObjectType>,
    pub input_type_id: Option<ObjectType>,
    pub hex_sql: String,
}
