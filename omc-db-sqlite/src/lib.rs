//! SQLite storage of locations and change requests.

#[macro_use]
extern crate diesel;

use std::{cell::RefCell, fmt, sync::Arc};

use anyhow::{anyhow, Result as Fallible};
use diesel::{connection::SimpleConnection as _, r2d2, sqlite::SqliteConnection};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness as _};
use omc_core::usecases as uc;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

mod models;
mod repo_impl;
mod schema;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations");

const ENGINE_SETTINGS: &str = r#"
PRAGMA journal_mode = WAL;
PRAGMA synchronous = NORMAL;
PRAGMA busy_timeout = 5000;
PRAGMA foreign_keys = ON;
PRAGMA encoding = 'UTF-8';
"#;

type Manager = r2d2::ConnectionManager<SqliteConnection>;
type Pool = r2d2::Pool<Manager>;
type Pooled = r2d2::PooledConnection<Manager>;

/// Pool of SQLite connections.
///
/// Readers share the pool while a writer holds it exclusively,
/// otherwise concurrent writes fail with SQLITE_LOCKED.
#[derive(Clone)]
pub struct Connections {
    pool: Arc<RwLock<Pool>>,
}

#[derive(Debug, Clone, Copy)]
enum Access {
    ReadOnly,
    ReadWrite,
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Self::ReadOnly => "read-only",
            Self::ReadWrite => "read/write",
        })
    }
}

fn checkout(pool: &Pool, access: Access) -> Fallible<RefCell<Pooled>> {
    pool.get().map(RefCell::new).map_err(|err| {
        log::error!("No database connection for {access} access available: {err}");
        err.into()
    })
}

pub struct DbReadOnly<'a> {
    _lock: RwLockReadGuard<'a, Pool>,
    conn: RefCell<Pooled>,
}

pub struct DbReadWrite<'a> {
    _lock: RwLockWriteGuard<'a, Pool>,
    conn: RefCell<Pooled>,
}

/// The connection of a running transaction.
pub struct DbConnection<'a> {
    conn: RefCell<&'a mut SqliteConnection>,
}

/// Applies the engine settings that every connection relies on.
pub fn initialize_database(connection: &mut SqliteConnection) -> Fallible<()> {
    connection.batch_execute(ENGINE_SETTINGS)?;
    Ok(())
}

impl Connections {
    pub fn init(url: &str, pool_size: u32) -> Fallible<Self> {
        use diesel::Connection as _;
        // Fail early on unreachable databases
        SqliteConnection::establish(url)?;
        let pool = Pool::builder()
            .max_size(pool_size)
            .build(Manager::new(url))?;
        initialize_database(&mut *pool.get()?)?;
        Ok(Self {
            pool: Arc::new(RwLock::new(pool)),
        })
    }

    pub fn shared(&self) -> Fallible<DbReadOnly<'_>> {
        let lock = self.pool.read();
        let conn = checkout(&lock, Access::ReadOnly)?;
        Ok(DbReadOnly { _lock: lock, conn })
    }

    pub fn exclusive(&self) -> Fallible<DbReadWrite<'_>> {
        let lock = self.pool.write();
        let conn = checkout(&lock, Access::ReadWrite)?;
        Ok(DbReadWrite { _lock: lock, conn })
    }
}

impl DbReadWrite<'_> {
    /// Runs `f` within a transaction that is rolled back if `f` fails.
    pub fn transaction<T, E, F>(&mut self, f: F) -> Result<T, uc::Error>
    where
        F: FnOnce(&DbConnection) -> Result<T, E>,
        E: Into<uc::Error>,
    {
        use diesel::Connection as _;
        let mut failure: Option<uc::Error> = None;
        let conn: &mut SqliteConnection = self.conn.get_mut();
        let outcome = conn.transaction(|conn| {
            let conn = DbConnection {
                conn: RefCell::new(conn),
            };
            f(&conn).map_err(|err| {
                failure = Some(err.into());
                diesel::result::Error::RollbackTransaction
            })
        });
        match (outcome, failure) {
            (Ok(value), _) => Ok(value),
            (Err(_), Some(err)) => Err(err),
            (Err(err), None) => Err(uc::Error::Repo(repo_impl::from_diesel_err(err))),
        }
    }
}

pub fn run_embedded_database_migrations(mut db: DbReadWrite<'_>) -> Fallible<()> {
    let conn: &mut SqliteConnection = db.conn.get_mut();
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| anyhow!("Failed to run database migrations: {err}"))?;
    if applied.is_empty() {
        log::info!("Database schema is up to date");
    } else {
        log::info!("Applied {} database migration(s)", applied.len());
    }
    Ok(())
}
