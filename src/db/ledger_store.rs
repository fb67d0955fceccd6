use redb::{ReadableDatabase, ReadableTable};

use crate::db::{tables, Db};
use crate::error::{AppError, Result};
use crate::models::{Ledger, UserRecord};

const BINCODE_CONFIG: bincode::config::Configuration = bincode::config::standard();

/// Per-user persistence for accounts and their ledgers
///
/// Every method runs in a single redb transaction. Methods block, so async
/// callers should run them inside `spawn_blocking`.
#[derive(Clone)]
pub struct LedgerStore {
    db: Db,
}

fn encode_user(record: &UserRecord) -> Result<Vec<u8>> {
    Ok(bincode::serde::encode_to_vec(record, BINCODE_CONFIG)?)
}

fn decode_user(bytes: &[u8]) -> Result<UserRecord> {
    let (record, _) = bincode::serde::decode_from_slice(bytes, BINCODE_CONFIG)?;
    Ok(record)
}

impl LedgerStore {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Check the database can open a read transaction
    pub fn is_reachable(&self) -> bool {
        match self.db.begin_read() {
            Ok(_) => true,
            Err(e) => {
                tracing::error!("Database health check failed: {:?}", e);
                false
            }
        }
    }

    /// Create a user together with an empty ledger
    pub fn create_user(&self, username: &str, record: &UserRecord) -> Result<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut users = write_txn.open_table(tables::USERS)?;
            if users.get(username)?.is_some() {
                tracing::info!("Registration for existing user {:?}", username);
                return Err(AppError::UserAlreadyExists);
            }
            users.insert(username, encode_user(record)?.as_slice())?;

            let mut ledgers = write_txn.open_table(tables::LEDGERS)?;
            let ledger = serde_json::to_vec(&Ledger::default())?;
            ledgers.insert(username, ledger.as_slice())?;
        }
        write_txn.commit()?;

        Ok(())
    }

    pub fn find_user(&self, username: &str) -> Result<Option<UserRecord>> {
        let read_txn = self.db.begin_read()?;
        let users = read_txn.open_table(tables::USERS)?;

        users
            .get(username)?
            .map(|bytes| decode_user(bytes.value()))
            .transpose()
    }

    /// Delete a user and, with it, their ledger
    pub fn delete_user(&self, username: &str) -> Result<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut users = write_txn.open_table(tables::USERS)?;
            if users.remove(username)?.is_none() {
                return Err(AppError::UserNotFound);
            }

            let mut ledgers = write_txn.open_table(tables::LEDGERS)?;
            ledgers.remove(username)?;
        }
        write_txn.commit()?;

        Ok(())
    }

    pub fn load_ledger(&self, username: &str) -> Result<Ledger> {
        let read_txn = self.db.begin_read()?;
        let ledgers = read_txn.open_table(tables::LEDGERS)?;

        let ledger = match ledgers.get(username)? {
            Some(bytes) => serde_json::from_slice(bytes.value())?,
            None => return Err(AppError::UserNotFound),
        };
        Ok(ledger)
    }

    /// Read-modify-write a ledger in one transaction.
    ///
    /// `apply` works on a copy. The copy is written back only if `apply`
    /// succeeds and actually changed something; otherwise the transaction is
    /// aborted and the stored ledger stays as it was.
    pub fn update_ledger<T>(
        &self,
        username: &str,
        apply: impl FnOnce(&mut Ledger) -> Result<T>,
    ) -> Result<T> {
        let write_txn = self.db.begin_write()?;
        let (value, changed) = {
            let mut ledgers = write_txn.open_table(tables::LEDGERS)?;
            let current: Ledger = match ledgers.get(username)? {
                Some(bytes) => serde_json::from_slice(bytes.value())?,
                None => return Err(AppError::UserNotFound),
            };

            let mut updated = current.clone();
            let value = apply(&mut updated)?;

            let changed = updated != current;
            if changed {
                let bytes = serde_json::to_vec(&updated)?;
                ledgers.insert(username, bytes.as_slice())?;
            }
            (value, changed)
        };

        if changed {
            write_txn.commit()?;
            tracing::debug!("Ledger for {:?} committed", username);
        } else {
            write_txn.abort()?;
        }

        Ok(value)
    }
}
