// @generated manually, mirroring the shape diesel CLI would produce.

pub mod sql_types {
    #[derive(diesel::query_builder::QueryId, diesel::sql_types::SqlType)]
    #[diesel(postgres_type(name = "dialect"))]
    pub struct Dialect;

    #[derive(diesel::query_builder::QueryId, diesel::sql_types::SqlType)]
    #[diesel(postgres_type(name = "entity_status"))]
    pub struct EntityStatus;

    #[derive(diesel::query_builder::QueryId, diesel::sql_types::SqlType)]
    #[diesel(postgres_type(name = "os_family"))]
    pub struct OsFamily;

    #[derive(diesel::query_builder::QueryId, diesel::sql_types::SqlType)]
    #[diesel(postgres_type(name = "object_type"))]
    pub struct ObjectType;

    #[derive(diesel::query_builder::QueryId, diesel::sql_types::SqlType)]
    #[diesel(postgres_type(name = "template_operation"))]
    pub struct TemplateOperation;

    #[derive(diesel::query_builder::QueryId, diesel::sql_types::SqlType)]
    #[diesel(postgres_type(name = "template_kind"))]
    pub struct TemplateKind;

    #[derive(diesel::query_builder::QueryId, diesel::sql_types::SqlType)]
    #[diesel(postgres_type(name = "job_state"))]
    pub struct JobState;

    #[derive(diesel::query_builder::QueryId, diesel::sql_types::SqlType)]
    #[diesel(postgres_type(name = "callback_kind"))]
    pub struct CallbackKind;
}

diesel::table! {
    use diesel::sql_types::*;
    use super::sql_types::OsFamily;

    agent_endpoints (id) {
        id -> Uuid,
        client_id -> Varchar,
        os_family -> OsFamily,
    }
}

diesel::table! {
    use diesel::sql_types::*;
    use super::sql_types::{Dialect, EntityStatus};

    connections (id) {
        id -> Uuid,
        name -> Varchar,
        dialect -> Dialect,
        host -> Varchar,
        port -> Int4,
        db_user -> Varchar,
        db_password -> Varchar,
        service_name -> Nullable<Varchar>,
        agent_endpoint_id -> Uuid,
        parent_id -> Nullable<Uuid>,
        status -> EntityStatus,
    }
}

diesel::table! {
    use diesel::sql_types::*;
    use super::sql_types::{Dialect, EntityStatus};

    databases (id) {
        id -> Uuid,
        cnt_id -> Uuid,
        name -> Varchar,
        dialect -> Dialect,
        description -> Nullable<Varchar>,
        status -> EntityStatus,
    }
}

diesel::table! {
    use diesel::sql_types::*;
    use super::sql_types::EntityStatus;

    actors (id) {
        id -> Uuid,
        cnt_id -> Uuid,
        db_user -> Varchar,
        ip_address -> Varchar,
        db_password -> Nullable<Varchar>,
        status -> EntityStatus,
        description -> Nullable<Varchar>,
    }
}

diesel::table! {
    use diesel::sql_types::*;
    use super::sql_types::{ObjectType, EntityStatus};

    objects (id) {
        id -> Uuid,
        dbmgt_id -> Uuid,
        object_type_id -> ObjectType,
        name -> Varchar,
        sql_param_hex -> Nullable<Text>,
        status -> EntityStatus,
        depends_on -> Nullable<Uuid>,
    }
}

diesel::table! {
    use diesel::sql_types::*;
    use super::sql_types::{Dialect, TemplateOperation, TemplateKind, ObjectType};

    templates (id) {
        id -> Uuid,
        kind -> TemplateKind,
        dialect -> Dialect,
        operation -> TemplateOperation,
        object_type_id -> Nullable<ObjectType>,
        input_type_id -> Nullable<ObjectType>,
        hex_sql -> Text,
    }
}

diesel::table! {
    use diesel::sql_types::*;
    use super::sql_types::{JobState, CallbackKind, OsFamily};

    jobs (id) {
        id -> Uuid,
        agent_job_id -> Varchar,
        owner_id -> Uuid,
        client_id -> Varchar,
        os_family -> OsFamily,
        callback_kind -> CallbackKind,
        context_data -> Jsonb,
        state -> JobState,
        result_message -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(connections -> agent_endpoints (agent_endpoint_id));
diesel::joinable!(databases -> connections (cnt_id));
diesel::joinable!(actors -> connections (cnt_id));
diesel::joinable!(objects -> databases (dbmgt_id));

diesel::allow_tables_to_appear_in_same_query!(
    agent_endpoints,
    connections,
    databases,
    actors,
    objects,
    templates,
    jobs,
);
