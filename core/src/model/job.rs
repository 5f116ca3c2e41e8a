use super::agent_endpoint::OsFamily;
use crate::schema::jobs;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_as_jsonb::AsJsonb;
use diesel::{AsExpression, FromSqlRow};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// The kind of completion callback a job will dispatch to, per the
/// re-architected tagged-variant design (see design notes): the dispatcher
/// matches on this column before even touching `context_data`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, diesel_derive_enum::DbEnum)]
#[ExistingTypePath = "crate::schema::sql_types::CallbackKind"]
pub enum CallbackKind {
    ObjectGen,
    CombinedObjectGen,
    Upload,
    PolicyCompliance,
}

/// `pending -> running -> post_processing -> {completed, failed}`;
/// `running -> failed` on unrecoverable poll error; `* -> cancelled` only
/// during shutdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, diesel_derive_enum::DbEnum)]
#[ExistingTypePath = "crate::schema::sql_types::JobState"]
pub enum JobState {
    Pending,
    Running,
    PostProcessing,
    Completed,
    Failed,
    Cancelled,
}

/// Typed context carried by a job, tagged by [`CallbackKind`]. Replaces the
/// duck-typed/untyped payload the original design used: each variant is the
/// exact shape its completion callback expects, so there is nothing to
/// downcast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, AsJsonb)]
pub enum CallbackPayload {
    /// Context for a single-dbmgt object-generation job.
    ObjectGen {
        dbmgt_id: Uuid,
        cnt_id: Uuid,
        agent_endpoint_id: Uuid,
        /// query_key -> rendered SQL, as submitted to the Agent.
        rendered_queries: HashMap<String, String>,
    },
    /// Context for a combined object-generation job spanning multiple
    /// dbmgt rows (and, for an Oracle CDB, triggering PDB fan-out).
    CombinedObjectGen {
        cnt_id: Uuid,
        agent_endpoint_id: Uuid,
        is_oracle_cdb: bool,
        rendered_queries: HashMap<String, String>,
    },
    /// Context for an upload completion: links the uploaded artefact back
    /// to the job that produced it.
    Upload {
        filename: String,
        filepath: String,
        source_job_id: Uuid,
    },
    /// Context for a policy-compliance completion.
    PolicyCompliance { cnt_id: Uuid },
}

impl CallbackPayload {
    pub fn kind(&self) -> CallbackKind {
        match self {
            CallbackPayload::ObjectGen { .. } => CallbackKind::ObjectGen,
            CallbackPayload::CombinedObjectGen { .. } => CallbackKind::CombinedObjectGen,
            CallbackPayload::Upload { .. } => CallbackKind::Upload,
            CallbackPayload::PolicyCompliance { .. } => CallbackKind::PolicyCompliance,
        }
    }
}

/// A control record for a long-running remote operation. Created when the
/// Agent accepts a background submission; destroyed (by the caller, via
/// `DELETE`-style cleanup) after its callback terminates.
#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize, Deserialize, PartialEq)]
#[diesel(table_name = jobs)]
pub struct Job {
    pub id: Uuid,
    /// The opaque job id issued by the Agent.
    pub agent_job_id: String,
    pub owner_id: Uuid,
    pub client_id: String,
    pub os_family: OsFamily,
    pub callback_kind: CallbackKind,
    pub context_data: CallbackPayload,
    pub state: JobState,
    pub result_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable, Serialize, Deserialize, PartialEq)]
#[diesel(table_name = jobs)]
pub struct NewJob {
    pub agent_job_id: String,
    pub owner_id: Uuid,
    pub client_id: String,
    pub os_family: OsFamily,
    pub callback_kind: CallbackKind,
    pub context_data: CallbackPayload,
    pub state: JobState,
    pub result_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NewJob {
    pub fn registered(
        agent_job_id: impl Into<String>,
        owner_id: Uuid,
        client_id: impl Into<String>,
        os_family: OsFamily,
        context_data: CallbackPayload,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            agent_job_id: agent_job_id.into(),
            owner_id,
            client_id: client_id.into(),
            os_family,
            callback_kind: context_data.kind(),
            context_data,
            state: JobState::Running,
            result_message: None,
            created_at: now,
            updated_at: now,
        }
    }
}
