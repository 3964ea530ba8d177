use crate::core::db::error::StoreError;
use crate::types::ExpiryKey;
use redb::{ReadTransaction, ReadableTable, TableDefinition, WriteTransaction};
use std::time::SystemTime;

/// Stores `ExpiryKey { expires_at, id }` entries ordered by expiry instant so
/// the purge pass only walks entries that are already due.
pub struct ExpiryTable {
    definition: TableDefinition<'static, ExpiryKey, ()>,
}

impl ExpiryTable {
    pub const fn new(name: &'static str) -> Self {
        Self {
            definition: TableDefinition::new(name),
        }
    }

    pub fn init(&self, txn: &WriteTransaction) -> Result<(), StoreError> {
        txn.open_table(self.definition)?;
        Ok(())
    }

    pub fn insert(&self, txn: &WriteTransaction, key: &ExpiryKey) -> Result<(), StoreError> {
        let mut table = txn.open_table(self.definition)?;
        table.insert(key, &())?;
        Ok(())
    }

    /// Returns `true` if the key was present.
    pub fn remove(&self, txn: &WriteTransaction, key: &ExpiryKey) -> Result<bool, StoreError> {
        let mut table = txn.open_table(self.definition)?;
        Ok(table.remove(key)?.is_some())
    }

    /// Returns keys where `expires_at <= now`, soonest first.
    pub fn expired(
        &self,
        txn: &ReadTransaction,
        now: SystemTime,
    ) -> Result<Vec<ExpiryKey>, StoreError> {
        let table = txn.open_table(self.definition)?;

        table
            .range(
                ..=ExpiryKey {
                    expires_at: now,
                    id: u64::MAX,
                },
            )?
            .map(|entry| {
                let (key_guard, _) = entry?;
                Ok(key_guard.value())
            })
            .collect()
    }

    #[cfg(test)]
    pub fn all(&self, txn: &ReadTransaction) -> Result<Vec<ExpiryKey>, StoreError> {
        let table = txn.open_table(self.definition)?;
        let mut keys = Vec::new();

        for entry in table.iter()? {
            let (key_guard, _) = entry?;
            keys.push(key_guard.value());
        }

        Ok(keys)
    }

    #[cfg(test)]
    pub fn len(&self, txn: &ReadTransaction) -> Result<u64, StoreError> {
        use redb::ReadableTableMetadata;

        let table = txn.open_table(self.definition)?;
        Ok(table.len()?)
    }
}

#[cfg(test)]
mod tests;
