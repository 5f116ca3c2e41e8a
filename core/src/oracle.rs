//! Oracle Container Resolver (C7): classifies connections in the CDB/PDB
//! hierarchy and resolves which connection a mutation should actually be
//! dispatched against.

use crate::crud::connection as connection_crud;
use crate::error::Result;
use crate::model::connection::{Connection, Dialect};

use diesel_async::AsyncPgConnection;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerRole {
    /// Not an Oracle connection, or an Oracle connection with no
    /// container relationship (a standalone/non-CDB database).
    NotContainerized,
    Cdb,
    Pdb,
}

pub fn classify(cnt: &Connection) -> ContainerRole {
    if cnt.is_oracle_cdb() {
        ContainerRole::Cdb
    } else if cnt.is_oracle_pdb() {
        ContainerRole::Pdb
    } else {
        ContainerRole::NotContainerized
    }
}

/// The connection a single-target mutation should execute against: a PDB
/// mutation always targets itself; a CDB mutation with no PDB in scope also
/// targets itself. Combined (fan-out) operations use [`child_pdbs`]
/// instead, and do not call this.
pub fn resolve_execution_target(cnt: &Connection) -> &Connection {
    cnt
}

/// Returns the PDBs a combined operation on a CDB must fan out to. Empty
/// for non-Oracle or non-CDB connections.
pub async fn child_pdbs(conn: &mut AsyncPgConnection, cnt: &Connection) -> Result<Vec<Connection>> {
    if !matches!(cnt.dialect, Dialect::Oracle) || classify(cnt) != ContainerRole::Cdb {
        return Ok(Vec::new());
    }
    connection_crud::child_pdbs(conn, cnt.id).await
}

/// True if `candidate` is a PDB whose parent is `cdb_id`.
pub fn belongs_to_cdb(candidate: &Connection, cdb_id: Uuid) -> bool {
    candidate.parent_id == Some(cdb_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::connection::EntityStatus;

    fn conn(dialect: Dialect, service_name: Option<&str>, parent_id: Option<Uuid>) -> Connection {
        Connection {
            id: Uuid::new_v4(),
            name: "t".into(),
            dialect,
            host: "h".into(),
            port: 1521,
            db_user: "u".into(),
            db_password: "p".into(),
            service_name: service_name.map(|s| s.to_string()),
            agent_endpoint_id: Uuid::new_v4(),
            parent_id,
            status: EntityStatus::Enabled,
        }
    }

    #[test]
    fn classifies_cdb() {
        let c = conn(Dialect::Oracle, Some("ORCLCDB"), None);
        assert_eq!(classify(&c), ContainerRole::Cdb);
    }

    #[test]
    fn classifies_pdb() {
        let cdb_id = Uuid::new_v4();
        let c = conn(Dialect::Oracle, None, Some(cdb_id));
        assert_eq!(classify(&c), ContainerRole::Pdb);
        assert!(belongs_to_cdb(&c, cdb_id));
    }

    #[test]
    fn mysql_is_never_containerized() {
        let c = conn(Dialect::Mysql, None, None);
        assert_eq!(classify(&c), ContainerRole::NotContainerized);
    }
}
