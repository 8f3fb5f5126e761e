use log::info;

use crate::btree;
use crate::error::{ExecuteError, FatalResult, PrepareError};
use crate::node::LeafNode;
use crate::row::{Row, ROW_SIZE};
use crate::table::Table;

pub enum Statement {
    Select,
    Insert(Row),
}

impl Statement {
    /// Parse one line of input into a statement. Recognizes `select` and
    /// `insert <id> <username> <email>`; anything else is
    /// `PrepareError::UnrecognizedStatement`.
    pub fn prepare(input: &str) -> Result<Self, PrepareError> {
        if input.eq_ignore_ascii_case("select") {
            return Ok(Statement::Select);
        }

        if let Some(rest) = input.strip_prefix("insert") {
            let row = rest.trim_start().parse::<Row>()?;
            return Ok(Statement::Insert(row));
        }

        Err(PrepareError::UnrecognizedStatement(input.to_string()))
    }

    /// Execute the statement against `table`. The outer `FatalResult`
    /// covers pager I/O; the inner `Result` covers conditions the REPL
    /// reports and recovers from (table full, duplicate key).
    pub fn execute(self, table: &mut Table) -> FatalResult<Result<(), ExecuteError>> {
        match self {
            Statement::Select => execute_select(table),
            Statement::Insert(row) => execute_insert(row, table),
        }
    }
}

fn execute_select(table: &mut Table) -> FatalResult<Result<(), ExecuteError>> {
    let mut cursor = btree::table_start(table)?;
    let mut rows_returned = 0u32;
    while !cursor.end_of_table {
        let bytes = btree::cursor_value(table, &cursor)?;
        let row = Row::deserialize(bytes);
        println!("{row}");
        rows_returned += 1;
        btree::cursor_advance(table, &mut cursor)?;
    }
    info!("select returned {rows_returned} row(s)");
    Ok(Ok(()))
}

fn execute_insert(row: Row, table: &mut Table) -> FatalResult<Result<(), ExecuteError>> {
    let root_page_num = table.root_page_num;
    let page = table.pager.get_page(root_page_num)?;
    let num_cells = LeafNode::new(page).num_cells();
    if num_cells as usize >= crate::node::LEAF_NODE_MAX_CELLS {
        return Ok(Err(ExecuteError::TableFull));
    }

    let key_to_insert = row.id();
    let cursor = btree::table_find(table, key_to_insert)?;

    if cursor.cell_num < num_cells {
        let page = table.pager.get_page(cursor.page_num)?;
        let key_at_index = LeafNode::new(page).key(cursor.cell_num);
        if key_at_index == key_to_insert {
            return Ok(Err(ExecuteError::DuplicateKey));
        }
    }

    let mut value = [0u8; ROW_SIZE];
    row.serialize(&mut value);
    btree::leaf_insert(table, &cursor, key_to_insert, &value)?;
    info!("inserted row with id {key_to_insert}");
    Ok(Ok(()))
}
