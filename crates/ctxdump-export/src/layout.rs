//! Text layout of the mapped metadata

use ctxdump_core::Server;

/// Column headings matching the cells of [`metadata_rows`]
pub const METADATA_HEADER: [&str; 8] = [
    "Server", "Database", "Context", "Kind", "Table", "Model", "Column", "Property",
];

/// One row per table followed by one row per column of that table
pub fn metadata_rows(server: &Server) -> Vec<Vec<String>> {
    let mut rows = Vec::new();

    for database in &server.databases {
        for table in &database.tables {
            rows.push(vec![
                server.name.clone(),
                database.name.clone(),
                database.context_name.clone(),
                table.kind.to_string(),
                table.name.clone(),
                table.model_name.clone(),
                String::new(),
                String::new(),
            ]);

            for column in &table.columns {
                let mut row = vec![String::new(); 6];
                row.push(column.name.clone());
                row.push(column.model_name.clone());
                rows.push(row);
            }
        }
    }

    rows
}

/// Left-align every column to its widest cell plus `padding` spaces
///
/// Rows may have different lengths. Trailing whitespace is trimmed.
pub fn pad_rows(rows: &[Vec<String>], padding: usize) -> String {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let mut widths = vec![0; columns];
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    rows.iter()
        .map(|row| {
            let mut line = String::new();
            for (i, cell) in row.iter().enumerate() {
                line.push_str(cell);
                let fill = widths[i] - cell.chars().count() + padding;
                line.extend(std::iter::repeat(' ').take(fill));
            }
            line.trim_end().to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
