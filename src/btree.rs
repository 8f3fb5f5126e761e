use log::debug;

use crate::error::{FatalError, FatalResult};
use crate::node::{
    LeafNode, NodeType, LEAF_NODE_CELL_SIZE, LEAF_NODE_HEADER_SIZE, LEAF_NODE_MAX_CELLS,
    LEAF_NODE_VALUE_OFFSET, LEAF_NODE_VALUE_SIZE,
};
use crate::table::Table;

/// The only page a table ever has. There is no free list and no root
/// pointer indirection: page 0 is always the root, and it is always a
/// leaf.
pub const ROOT_PAGE_NUM: u32 = 0;

/// A cursor positioned somewhere in the table, identified purely by
/// `(page_num, cell_num)`. Does not borrow the table; every access
/// re-borrows it.
pub struct Cursor {
    pub page_num: u32,
    pub cell_num: u32,
    pub end_of_table: bool,
}

/// Cursor at the start of the table, i.e. cell 0 of the root leaf.
pub fn table_start(table: &mut Table) -> FatalResult<Cursor> {
    let root_page_num = table.root_page_num;
    let page = table.pager.get_page(root_page_num)?;
    let num_cells = LeafNode::new(page).num_cells();

    Ok(Cursor {
        page_num: root_page_num,
        cell_num: 0,
        end_of_table: num_cells == 0,
    })
}

/// Locate the cursor position at which `key` belongs: either the cell
/// holding it, or the cell it should be inserted before.
pub fn table_find(table: &mut Table, key: u32) -> FatalResult<Cursor> {
    let root_page_num = table.root_page_num;
    let page = table.pager.get_page(root_page_num)?;
    let node = LeafNode::new(page);

    match node.node_type() {
        NodeType::Leaf => leaf_find(table, root_page_num, key),
        NodeType::Internal => Err(FatalError::InternalNodeSearch),
    }
}

fn leaf_find(table: &mut Table, page_num: u32, key: u32) -> FatalResult<Cursor> {
    let page = table.pager.get_page(page_num)?;
    let node = LeafNode::new(page);
    let num_cells = node.num_cells();

    let mut min_index = 0u32;
    let mut max_index = num_cells;
    while min_index != max_index {
        let index = (min_index + max_index) / 2;
        let key_at_index = node.key(index);
        debug!("leaf_find: probing cell {index} (key {key_at_index}) for key {key}");
        if key == key_at_index {
            return Ok(Cursor {
                page_num,
                cell_num: index,
                end_of_table: false,
            });
        }
        if key < key_at_index {
            max_index = index;
        } else {
            min_index = index + 1;
        }
    }

    Ok(Cursor {
        page_num,
        cell_num: min_index,
        end_of_table: false,
    })
}

/// Insert `(key, value)` at `cursor`'s position, shifting later cells
/// right. Precondition: the caller has already checked `num_cells <
/// LEAF_NODE_MAX_CELLS` (the executor reports `ExecuteError::TableFull`
/// itself, before ever reaching here) and that no cell at `cursor` already
/// holds `key`. A full leaf at this point means the precondition was
/// violated, so this fails fatally rather than silently overwriting data —
/// there is no split implementation to fall back on.
pub fn leaf_insert(table: &mut Table, cursor: &Cursor, key: u32, value: &[u8]) -> FatalResult<()> {
    let page = table.pager.get_page(cursor.page_num)?;
    let mut node = LeafNode::new(page);

    if node.num_cells() >= LEAF_NODE_MAX_CELLS as u32 {
        return Err(FatalError::LeafSplitNotImplemented);
    }

    node.make_room_at(cursor.cell_num);
    node.set_num_cells(node.num_cells() + 1);
    node.set_key(cursor.cell_num, key);
    node.value_mut(cursor.cell_num).copy_from_slice(value);

    Ok(())
}

pub fn cursor_value<'a>(table: &'a mut Table, cursor: &Cursor) -> FatalResult<&'a [u8]> {
    let page = table.pager.get_page(cursor.page_num)?;
    let start =
        LEAF_NODE_HEADER_SIZE + cursor.cell_num as usize * LEAF_NODE_CELL_SIZE + LEAF_NODE_VALUE_OFFSET;
    Ok(&page.bytes()[start..start + LEAF_NODE_VALUE_SIZE])
}

pub fn cursor_advance(table: &mut Table, cursor: &mut Cursor) -> FatalResult<()> {
    let page = table.pager.get_page(cursor.page_num)?;
    let num_cells = LeafNode::new(page).num_cells();

    cursor.cell_num += 1;
    if cursor.cell_num >= num_cells {
        cursor.end_of_table = true;
    }
    Ok(())
}
