use redb::TableDefinition;

/// Users table: username -> UserRecord (bincode)
pub const USERS: TableDefinition<&str, &[u8]> = TableDefinition::new("users");

/// Ledgers table: username -> Ledger (JSON)
/// Removed together with the owning user
pub const LEDGERS: TableDefinition<&str, &[u8]> = TableDefinition::new("ledgers");
