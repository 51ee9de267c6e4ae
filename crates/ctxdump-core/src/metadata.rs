//! Server / Database / Table / Column hierarchy
//!
//! Ownership flows downward (a server owns its databases, a database its
//! tables, a table its columns). Back-references are arena indices resolved
//! through the owning [`Server`], never owning pointers.

use serde::{Deserialize, Serialize};

/// Index of a database within its server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DatabaseId(pub usize);

/// Index of a table within its server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableId {
    /// Owning database
    pub database: DatabaseId,

    /// Position in the database's table list
    pub index: usize,
}

/// Physical kind of a mapped entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TableKind {
    Table,
    View,
    Unknown,
}

impl std::fmt::Display for TableKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Table => write!(f, "Table"),
            Self::View => write!(f, "View"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// A column of a table or view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Physical column name
    pub name: String,

    /// Logical property name
    pub model_name: String,

    /// Owning table
    pub table: TableId,
}

/// A table or view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// Physical table or view name
    pub name: String,

    /// Logical entity name (namespace qualified)
    pub model_name: String,

    /// Table, view or unknown
    pub kind: TableKind,

    /// Columns in property order
    pub columns: Vec<Column>,

    /// Owning database
    pub database: DatabaseId,
}

impl Table {
    /// Short entity name used to name artifacts (`Shop.Order` -> `Order`)
    pub fn display_name(&self) -> &str {
        self.model_name
            .rsplit('.')
            .next()
            .unwrap_or(&self.model_name)
    }
}

/// A database exposed by a server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Database {
    /// Database name
    pub name: String,

    /// Name of the in-memory context the database was read through
    pub context_name: String,

    /// Tables and views
    pub tables: Vec<Table>,
}

/// Root of the hierarchy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Server {
    /// Server (data source) name
    pub name: String,

    /// Databases
    pub databases: Vec<Database>,
}

impl Server {
    /// Create a server with no databases
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            databases: Vec::new(),
        }
    }

    /// Add an empty database and return its id
    pub fn add_database(&mut self, name: impl Into<String>, context_name: impl Into<String>) -> DatabaseId {
        self.databases.push(Database {
            name: name.into(),
            context_name: context_name.into(),
            tables: Vec::new(),
        });
        DatabaseId(self.databases.len() - 1)
    }

    /// Add an empty table to a database and return its id
    ///
    /// Returns `None` if the database does not exist.
    pub fn add_table(
        &mut self,
        database: DatabaseId,
        name: impl Into<String>,
        model_name: impl Into<String>,
        kind: TableKind,
    ) -> Option<TableId> {
        let db = self.databases.get_mut(database.0)?;
        db.tables.push(Table {
            name: name.into(),
            model_name: model_name.into(),
            kind,
            columns: Vec::new(),
            database,
        });
        Some(TableId {
            database,
            index: db.tables.len() - 1,
        })
    }

    /// Add a column to a table
    ///
    /// Returns `false` if the table does not exist.
    pub fn add_column(&mut self, table: TableId, name: impl Into<String>, model_name: impl Into<String>) -> bool {
        match self.table_mut(table) {
            Some(t) => {
                t.columns.push(Column {
                    name: name.into(),
                    model_name: model_name.into(),
                    table,
                });
                true
            }
            None => false,
        }
    }

    /// Get a database
    pub fn database(&self, id: DatabaseId) -> Option<&Database> {
        self.databases.get(id.0)
    }

    /// Get a table
    pub fn table(&self, id: TableId) -> Option<&Table> {
        self.database(id.database)?.tables.get(id.index)
    }

    fn table_mut(&mut self, id: TableId) -> Option<&mut Table> {
        self.databases.get_mut(id.database.0)?.tables.get_mut(id.index)
    }

    /// Database owning a table
    pub fn owner_of_table(&self, table: &Table) -> Option<&Database> {
        self.database(table.database)
    }

    /// Table owning a column
    pub fn owner_of_column(&self, column: &Column) -> Option<&Table> {
        self.table(column.table)
    }

    /// All tables of all databases, in order
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.databases.iter().flat_map(|db| db.tables.iter())
    }
}
