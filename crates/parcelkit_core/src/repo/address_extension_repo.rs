//! Address extension repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide keyed access to shipping info stored per order address.
//! - Keep SQL and the JSON column codec inside the persistence boundary.
//!
//! # Invariants
//! - `save` is an upsert: one row per address id, last write wins.
//! - Deleting an absent row succeeds; delete reports storage failures only.
//! - Read paths reject undecodable persisted state instead of masking it.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::address_extension::{AddressExtensionRecord, AddressId};
use crate::model::shipping_info::ShippingInfo;
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};

const TABLE: &str = "address_shipping_info";

pub type RepoResult<T> = Result<T, RepoError>;

/// Errors from address extension repository operations.
#[derive(Debug)]
pub enum RepoError {
    /// No record is stored for the address id.
    NotFound(AddressId),
    /// A write could not be persisted; the message names the cause.
    CouldNotSave { message: String },
    /// A record could not be removed; the message names the cause.
    CouldNotDelete { message: String },
    /// Underlying SQLite/bootstrap error on a read path.
    Db(DbError),
    /// Persisted data cannot be converted to a valid read model.
    InvalidData(String),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "no shipping info found for address {id}"),
            Self::CouldNotSave { message } => {
                write!(f, "could not save shipping info: {message}")
            }
            Self::CouldNotDelete { message } => {
                write!(f, "could not delete shipping info: {message}")
            }
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => {
                write!(f, "invalid persisted shipping info: {message}")
            }
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "address extension repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "address extension repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "address extension repository requires column `{column}` in table `{table}`"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
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

/// Repository interface for shipping info attached to order addresses.
pub trait AddressExtensionRepository {
    /// Persists the record, inserting or replacing the row for its address.
    fn save(&self, record: &AddressExtensionRecord) -> RepoResult<AddressExtensionRecord>;
    /// Loads the record for one address id.
    fn get_by_id(&self, address_id: AddressId) -> RepoResult<AddressExtensionRecord>;
    /// Removes the record's row. Removing an absent row is not an error.
    fn delete(&self, record: &AddressExtensionRecord) -> RepoResult<()>;
    /// Loads the record for the id, then removes it.
    fn delete_by_id(&self, address_id: AddressId) -> RepoResult<()>;
    /// Projects the shipping info aggregate for one address id.
    fn get_shipping_info(&self, address_id: AddressId) -> RepoResult<ShippingInfo>;
}

/// SQLite-backed address extension repository.
#[derive(Debug)]
pub struct SqliteAddressExtensionRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAddressExtensionRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl AddressExtensionRepository for SqliteAddressExtensionRepository<'_> {
    fn save(&self, record: &AddressExtensionRecord) -> RepoResult<AddressExtensionRecord> {
        record
            .shipping_info
            .validate()
            .map_err(|err| RepoError::CouldNotSave {
                message: err.to_string(),
            })?;

        let encoded = record
            .shipping_info
            .to_json()
            .map_err(|err| RepoError::CouldNotSave {
                message: err.to_string(),
            })?;

        self.conn
            .execute(
                "INSERT INTO address_shipping_info (address_id, shipping_info)
                 VALUES (?1, ?2)
                 ON CONFLICT(address_id) DO UPDATE SET
                    shipping_info = excluded.shipping_info,
                    updated_at = (strftime('%s', 'now') * 1000);",
                params![record.address_id, encoded],
            )
            .map_err(|err| RepoError::CouldNotSave {
                message: err.to_string(),
            })?;

        Ok(record.clone())
    }

    fn get_by_id(&self, address_id: AddressId) -> RepoResult<AddressExtensionRecord> {
        let encoded: Option<String> = self
            .conn
            .query_row(
                "SELECT shipping_info FROM address_shipping_info WHERE address_id = ?1;",
                params![address_id],
                |row| row.get(0),
            )
            .optional()?;

        let encoded = encoded.ok_or(RepoError::NotFound(address_id))?;
        let shipping_info = ShippingInfo::from_json(&encoded).map_err(|err| {
            RepoError::InvalidData(format!(
                "address {address_id} column {TABLE}.shipping_info: {err}"
            ))
        })?;

        Ok(AddressExtensionRecord::new(address_id, shipping_info))
    }

    fn delete(&self, record: &AddressExtensionRecord) -> RepoResult<()> {
        self.conn
            .execute(
                "DELETE FROM address_shipping_info WHERE address_id = ?1;",
                params![record.address_id],
            )
            .map_err(|err| RepoError::CouldNotDelete {
                message: err.to_string(),
            })?;

        Ok(())
    }

    fn delete_by_id(&self, address_id: AddressId) -> RepoResult<()> {
        let record = self.get_by_id(address_id)?;
        self.delete(&record)
    }

    fn get_shipping_info(&self, address_id: AddressId) -> RepoResult<ShippingInfo> {
        Ok(self.get_by_id(address_id)?.shipping_info)
    }
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, TABLE)? {
        return Err(RepoError::MissingRequiredTable(TABLE));
    }

    for column in ["address_id", "shipping_info", "created_at", "updated_at"] {
        if !table_has_column(conn, TABLE, column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: TABLE,
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
