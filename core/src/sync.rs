//! Inventory Sync Engine (C6): diffs a remote-reported inventory against
//! the local one and applies the minimal set of inserts/deletes to match
//! it. Used for schemas, actors, and PDBs alike; each call site supplies
//! its own identity key and insert/delete operations.

use crate::conf::EnvConfigSettings;
use crate::error::Result;
use crate::model::connection::Dialect;

use std::collections::HashSet;
use std::hash::Hash;

/// True if `db_user` is a system-reserved identity for `dialect` that sync
/// must filter out of the remote-reported inventory before reconciling
/// (e.g. MySQL's `mysql.sys`, Oracle's `SYS`/`SYSTEM`). Oracle's exclusion
/// list is skipped entirely when `oracle_include_maintained_users` is set,
/// so a deployment whose Agent query already includes Oracle-maintained
/// users can reconcile against the full set instead of having them
/// filtered back out.
pub fn is_system_user(dialect: Dialect, conf: &EnvConfigSettings, db_user: &str) -> bool {
    match dialect {
        Dialect::Mysql => conf.mysql_system_users.iter().any(|u| u.eq_ignore_ascii_case(db_user)),
        Dialect::Oracle => {
            !conf.oracle_include_maintained_users
                && conf.oracle_system_users.iter().any(|u| u.eq_ignore_ascii_case(db_user))
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct SyncOutcome {
    pub inserted: usize,
    pub deleted: usize,
}

/// Reconciles `local` against `remote` by identity key `K`. Applies every
/// insert before any delete, so a partial failure mid-sync never leaves an
/// entity neither locally known nor remotely present.
///
/// `ctx` (typically a database connection) is threaded through explicitly
/// to `insert`/`delete` rather than captured, so callers never need two
/// closures fighting over the same `&mut` borrow.
pub async fn reconcile<C, L, R, K, InsertFut, DeleteFut>(
    ctx: &mut C,
    local: Vec<L>,
    remote: Vec<R>,
    local_key: impl Fn(&L) -> K,
    remote_key: impl Fn(&R) -> K,
    mut insert: impl FnMut(&mut C, R) -> InsertFut,
    mut delete: impl FnMut(&mut C, L) -> DeleteFut,
) -> Result<SyncOutcome>
where
    K: Eq + Hash,
    InsertFut: std::future::Future<Output = Result<()>>,
    DeleteFut: std::future::Future<Output = Result<()>>,
{
    let local_keys: HashSet<K> = local.iter().map(&local_key).collect();
    let remote_keys: HashSet<K> = remote.iter().map(&remote_key).collect();

    let mut outcome = SyncOutcome::default();

    for item in remote {
        if !local_keys.contains(&remote_key(&item)) {
            insert(ctx, item).await?;
            outcome.inserted += 1;
        }
    }

    for item in local {
        if !remote_keys.contains(&local_key(&item)) {
            delete(ctx, item).await?;
            outcome.deleted += 1;
        }
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conf(mysql_users: &[&str], oracle_users: &[&str], include_maintained: bool) -> EnvConfigSettings {
        EnvConfigSettings {
            port: 0,
            database_url: String::new(),
            agent_binary_path_linux: String::new(),
            agent_binary_path_windows: String::new(),
            agent_execution_timeout_secs: 0,
            agent_max_retries: 0,
            job_poll_interval_secs: 0,
            query_temp_dir: String::new(),
            results_dir: String::new(),
            notification_dir: String::new(),
            mysql_system_users: mysql_users.iter().map(|s| s.to_string()).collect(),
            oracle_system_users: oracle_users.iter().map(|s| s.to_string()).collect(),
            oracle_include_maintained_users: include_maintained,
        }
    }

    #[test]
    fn filters_mysql_system_users_case_insensitively() {
        let c = conf(&["mysql.sys", "root"], &[], false);
        assert!(is_system_user(Dialect::Mysql, &c, "ROOT"));
        assert!(!is_system_user(Dialect::Mysql, &c, "app_user"));
    }

    #[test]
    fn filters_oracle_system_users_unless_maintained_users_included() {
        let c = conf(&[], &["SYS", "SYSTEM"], false);
        assert!(is_system_user(Dialect::Oracle, &c, "sys"));

        let c = conf(&[], &["SYS", "SYSTEM"], true);
        assert!(!is_system_user(Dialect::Oracle, &c, "sys"));
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Local(String);
    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Remote(String);

    #[tokio::test]
    async fn inserts_new_and_deletes_missing() {
        let local = vec![Local("a".into()), Local("b".into())];
        let remote = vec![Remote("b".into()), Remote("c".into())];

        let mut inserted: Vec<String> = Vec::new();
        let mut deleted: Vec<String> = Vec::new();

        let outcome = reconcile(
            &mut (),
            local,
            remote,
            |l: &Local| l.0.clone(),
            |r: &Remote| r.0.clone(),
            |_ctx: &mut (), r: Remote| {
                inserted.push(r.0.clone());
                async { Ok(()) }
            },
            |_ctx: &mut (), l: Local| {
                deleted.push(l.0.clone());
                async { Ok(()) }
            },
        )
        .await
        .unwrap();

        assert_eq!(outcome, SyncOutcome { inserted: 1, deleted: 1 });
        assert_eq!(inserted, vec!["c".to_string()]);
        assert_eq!(deleted, vec!["a".to_string()]);
    }

    #[tokio::test]
    async fn identical_sets_are_a_no_op() {
        let local = vec![Local("a".into())];
        let remote = vec![Remote("a".into())];

        let outcome = reconcile(
            &mut (),
            local,
            remote,
            |l: &Local| l.0.clone(),
            |r: &Remote| r.0.clone(),
            |_ctx: &mut (), _r: Remote| async { Ok(()) },
            |_ctx: &mut (), _l: Local| async { Ok(()) },
        )
        .await
        .unwrap();

        assert_eq!(outcome, SyncOutcome::default());
    }

    #[tokio::test]
    async fn is_idempotent_across_repeated_runs() {
        async fn run() -> SyncOutcome {
            let local = vec![Local("a".into())];
            let remote = vec![Remote("a".into()), Remote("b".into())];
            reconcile(
                &mut (),
                local,
                remote,
                |l: &Local| l.0.clone(),
                |r: &Remote| r.0.clone(),
                |_ctx: &mut (), _r: Remote| async { Ok(()) },
                |_ctx: &mut (), _l: Local| async { Ok(()) },
            )
            .await
            .unwrap()
        }

        let first = run().await;
        let second = run().await;
        assert_eq!(first, second);
    }
}
