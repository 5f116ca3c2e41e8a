use super::connection::EntityStatus;
use crate::schema::objects;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The enumerated kind of database object a template/object row refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, diesel_derive_enum::DbEnum)]
#[ExistingTypePath = "crate::schema::sql_types::ObjectType"]
pub enum ObjectType {
    Table,
    View,
    Procedure,
    Function,
    Index,
    Sequence,
    Trigger,
    MaterializedView,
    Package,
}

/// A discovered or user-created object inside a schema (`DBObjectMgt`).
/// `sql_param_hex` holds the free-form SQL parameter hex-encoded, same as
/// templates, so the renderer is the only place that decodes it.
#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations, Serialize, Deserialize, PartialEq)]
#[diesel(belongs_to(crate::model::database::Database, foreign_key = dbmgt_id))]
#[diesel(table_name = objects)]
pub struct Object {
    pub id: Uuid,
    pub dbmgt_id: Uuid,
    pub object_type_id: ObjectType,
    pub name: String,
    pub sql_param_hex: Option<String>,
    pub status: EntityStatus,
    /// For index->table style dependencies named in the template's
    /// "input-type" reference.
    pub depends_on: Option<Uuid>,
}

#[derive(Debug, Clone, Insertable, AsChangeset, Serialize, Deserialize, PartialEq)]
#[diesel(table_name = objects)]
pub struct NewObject {
    pub dbmgt_id: Uuid,
    pub object_type_id: ObjectType,
    pub name: String,
    pub sql_param_hex: Option<String>,
    pub status: EntityStatus,
    pub depends_on: Option<Uuid>,
}
