use crate::error::{OrchestrationError, Result};

use diesel_async::{
    pooled_connection::bb8::{Pool, PooledConnection},
    scoped_futures::ScopedBoxFuture,
    AsyncConnection, AsyncPgConnection,
};

pub mod actor;
pub mod connection;
pub mod database;
pub mod job;
pub mod object;
pub mod template;

/// Holds an [`AsyncPgConnection`] borrowed from a [`Pool`]. Submodules
/// implement the per-entity CRUD operations as free functions taking
/// `&mut AsyncPgConnection` directly (rather than `&mut self`) so the exact
/// same code path can run inside [`PgDb::transaction`] or against a bare
/// connection borrowed from the pool.
pub struct PgDb<'a> {
    con: PooledConnection<'a, AsyncPgConnection>,
}

impl<'a> PgDb<'a> {
    pub async fn try_from_pool(pool: &'a Pool<AsyncPgConnection>) -> Result<PgDb<'a>> {
        let con = pool.get().await.map_err(|_| {
            OrchestrationError::DbError("error connecting to the database connection pool".into())
        })?;
        Ok(Self { con })
    }

    pub fn conn(&mut self) -> &mut AsyncPgConnection {
        &mut self.con
    }

    /// Runs `f` inside a single local transaction, matching the mutation
    /// orchestrators' "open a transaction, do the remote call and local
    /// writes, commit" contract in one place.
    pub async fn transaction<'b, R, F>(&'b mut self, f: F) -> Result<R>
    where
        F: for<'c> FnOnce(&'c mut AsyncPgConnection) -> ScopedBoxFuture<'b, 'c, Result<R>>
            + Send
            + 'b,
        R: Send + 'b,
    {
        self.con.transaction(f).await
    }
}
