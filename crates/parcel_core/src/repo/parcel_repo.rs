//! Parcel repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD over the `parcel` table plus the registered-only rule for
//!   address edits and deletion.
//!
//! # Invariants
//! - `number` is assigned by SQLite and never written by this module.
//! - `set_address`/`delete` touch zero rows unless status is `registered`,
//!   and report no error in that case.
//! - Read paths reject unknown status strings instead of masking them.
//! - Log events carry numbers and counts only, never address text.

use crate::db::DbError;
use crate::model::parcel::{ClientId, Parcel, ParcelNumber, ParcelStatus};
use log::{debug, error};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const PARCEL_TABLE: &str = "parcel";
const PARCEL_COLUMNS: [&str; 5] = ["number", "client", "status", "address", "created_at"];

const PARCEL_SELECT_SQL: &str = "SELECT
    number,
    client,
    status,
    address,
    created_at
FROM parcel";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for parcel persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound(ParcelNumber),
    InvalidData(String),
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(number) => write!(f, "parcel not found: {number}"),
            Self::InvalidData(message) => write!(f, "invalid persisted parcel data: {message}"),
            Self::MissingRequiredTable(table) => {
                write!(f, "connection is missing required table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "table `{table}` is missing required column `{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotFound(_)
            | Self::InvalidData(_)
            | Self::MissingRequiredTable(_)
            | Self::MissingRequiredColumn { .. } => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for parcel storage.
pub trait ParcelRepository {
    /// Inserts a parcel and returns the storage-assigned number.
    ///
    /// `parcel.number` is ignored.
    fn add(&self, parcel: &Parcel) -> RepoResult<ParcelNumber>;
    /// Fetches one parcel, failing with `NotFound` when no row matches.
    fn get(&self, number: ParcelNumber) -> RepoResult<Parcel>;
    /// Lists every parcel of a client in storage order. Empty when none match.
    fn get_by_client(&self, client: ClientId) -> RepoResult<Vec<Parcel>>;
    /// Overwrites status unconditionally.
    fn set_status(&self, number: ParcelNumber, status: ParcelStatus) -> RepoResult<()>;
    /// Overwrites address only while status is `registered`; no-op otherwise.
    fn set_address(&self, number: ParcelNumber, address: &str) -> RepoResult<()>;
    /// Deletes the row only while status is `registered`; no-op otherwise.
    fn delete(&self, number: ParcelNumber) -> RepoResult<()>;
}

impl<R: ParcelRepository + ?Sized> ParcelRepository for &R {
    fn add(&self, parcel: &Parcel) -> RepoResult<ParcelNumber> {
        (**self).add(parcel)
    }

    fn get(&self, number: ParcelNumber) -> RepoResult<Parcel> {
        (**self).get(number)
    }

    fn get_by_client(&self, client: ClientId) -> RepoResult<Vec<Parcel>> {
        (**self).get_by_client(client)
    }

    fn set_status(&self, number: ParcelNumber, status: ParcelStatus) -> RepoResult<()> {
        (**self).set_status(number, status)
    }

    fn set_address(&self, number: ParcelNumber, address: &str) -> RepoResult<()> {
        (**self).set_address(number, address)
    }

    fn delete(&self, number: ParcelNumber) -> RepoResult<()> {
        (**self).delete(number)
    }
}

/// SQLite-backed parcel store over a caller-owned connection.
pub struct SqliteParcelRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteParcelRepository<'conn> {
    /// Wraps a connection after checking that the `parcel` table is usable.
    ///
    /// # Errors
    /// - `MissingRequiredTable` when no `parcel` table exists.
    /// - `MissingRequiredColumn` when the table lacks one of the store columns.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_parcel_table(conn)?;
        Ok(Self { conn })
    }
}

impl ParcelRepository for SqliteParcelRepository<'_> {
    fn add(&self, parcel: &Parcel) -> RepoResult<ParcelNumber> {
        let result = self.insert_parcel(parcel);
        match &result {
            Ok(number) => debug!(
                "event=parcel_add module=repo status=ok number={} client={}",
                number, parcel.client
            ),
            Err(err) => error!(
                "event=parcel_add module=repo status=error client={} error={}",
                parcel.client, err
            ),
        }
        result
    }

    fn get(&self, number: ParcelNumber) -> RepoResult<Parcel> {
        let result = self.select_parcel(number);
        match &result {
            Ok(_) => debug!("event=parcel_get module=repo status=ok number={number}"),
            Err(RepoError::NotFound(_)) => {
                debug!("event=parcel_get module=repo status=not_found number={number}")
            }
            Err(err) => {
                error!("event=parcel_get module=repo status=error number={number} error={err}")
            }
        }
        result
    }

    fn get_by_client(&self, client: ClientId) -> RepoResult<Vec<Parcel>> {
        let result = self.select_client_parcels(client);
        match &result {
            Ok(parcels) => debug!(
                "event=parcel_list module=repo status=ok client={} count={}",
                client,
                parcels.len()
            ),
            Err(err) => {
                error!("event=parcel_list module=repo status=error client={client} error={err}")
            }
        }
        result
    }

    fn set_status(&self, number: ParcelNumber, status: ParcelStatus) -> RepoResult<()> {
        let result = self
            .conn
            .execute(
                "UPDATE parcel SET status = ?1 WHERE number = ?2;",
                params![status.as_str(), number],
            )
            .map_err(RepoError::from);
        log_write("parcel_set_status", number, &result);
        result.map(|_| ())
    }

    fn set_address(&self, number: ParcelNumber, address: &str) -> RepoResult<()> {
        let result = self
            .conn
            .execute(
                "UPDATE parcel
                 SET address = ?1
                 WHERE number = ?2
                   AND status = ?3;",
                params![address, number, ParcelStatus::Registered.as_str()],
            )
            .map_err(RepoError::from);
        log_write("parcel_set_address", number, &result);
        result.map(|_| ())
    }

    fn delete(&self, number: ParcelNumber) -> RepoResult<()> {
        let result = self
            .conn
            .execute(
                "DELETE FROM parcel
                 WHERE number = ?1
                   AND status = ?2;",
                params![number, ParcelStatus::Registered.as_str()],
            )
            .map_err(RepoError::from);
        log_write("parcel_delete", number, &result);
        result.map(|_| ())
    }
}

impl SqliteParcelRepository<'_> {
    fn insert_parcel(&self, parcel: &Parcel) -> RepoResult<ParcelNumber> {
        self.conn.execute(
            "INSERT INTO parcel (
                client,
                status,
                address,
                created_at
            ) VALUES (?1, ?2, ?3, ?4);",
            params![
                parcel.client,
                parcel.status.as_str(),
                parcel.address.as_str(),
                parcel.created_at.as_str(),
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn select_parcel(&self, number: ParcelNumber) -> RepoResult<Parcel> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PARCEL_SELECT_SQL} WHERE number = ?1;"))?;
        let mut rows = stmt.query([number])?;

        if let Some(row) = rows.next()? {
            return parse_parcel_row(row);
        }

        Err(RepoError::NotFound(number))
    }

    fn select_client_parcels(&self, client: ClientId) -> RepoResult<Vec<Parcel>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PARCEL_SELECT_SQL} WHERE client = ?1;"))?;
        let mut rows = stmt.query([client])?;
        let mut parcels = Vec::new();

        while let Some(row) = rows.next()? {
            parcels.push(parse_parcel_row(row)?);
        }

        Ok(parcels)
    }
}

// Zero changed rows is a valid outcome for every write; only SQL failures log as errors.
fn log_write(event: &str, number: ParcelNumber, result: &RepoResult<usize>) {
    match result {
        Ok(changed) => debug!(
            "event={event} module=repo status=ok number={number} changed={changed}"
        ),
        Err(err) => error!("event={event} module=repo status=error number={number} error={err}"),
    }
}

fn ensure_parcel_table(conn: &Connection) -> RepoResult<()> {
    let table_exists: bool = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [PARCEL_TABLE],
        |row| row.get(0),
    )?;
    if !table_exists {
        return Err(RepoError::MissingRequiredTable(PARCEL_TABLE));
    }

    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1);")?;
    let present = stmt
        .query_map([PARCEL_TABLE], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;

    for column in PARCEL_COLUMNS {
        if !present.iter().any(|name| name == column) {
            return Err(RepoError::MissingRequiredColumn {
                table: PARCEL_TABLE,
                column,
            });
        }
    }

    Ok(())
}

fn parse_parcel_row(row: &Row<'_>) -> RepoResult<Parcel> {
    let number: ParcelNumber = row.get("number")?;
    let status_text: String = row.get("status")?;
    let status = status_text.parse::<ParcelStatus>().map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid status `{status_text}` in parcel.status for number {number}"
        ))
    })?;

    Ok(Parcel {
        number,
        client: row.get("client")?,
        status,
        address: row.get("address")?,
        created_at: row.get("created_at")?,
    })
}
