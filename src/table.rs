use crate::btree::ROOT_PAGE_NUM;
use crate::error::FatalResult;
use crate::node::LeafNode;
use crate::pager::Pager;

/// A single-table database. Owns the pager and the logical position of its
/// one and only B-tree root.
///
/// Deliberately has no `Drop` impl: closing is an explicit, fallible
/// operation the caller must perform (`Table::close`). A process that
/// exits abnormally (fatal error, panic, signal) skips `Drop` anyway, so
/// giving `Table` a flushing destructor would only create the illusion
/// that abnormal termination is safe. It is not: unflushed pages are lost.
pub struct Table {
    pub root_page_num: u32,
    pub pager: Pager,
}

impl Table {
    pub fn open(filename: &str) -> FatalResult<Self> {
        let mut pager = Pager::open(filename)?;

        if pager.num_pages() == 0 {
            let page = pager.get_page(ROOT_PAGE_NUM)?;
            let mut root = LeafNode::new(page);
            root.initialize();
            root.set_is_root(true);
        }

        Ok(Self {
            root_page_num: ROOT_PAGE_NUM,
            pager,
        })
    }

    pub fn close(self) -> FatalResult<()> {
        self.pager.close()
    }
}
