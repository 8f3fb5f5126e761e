use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};

use log::{debug, info};

use crate::error::{FatalError, FatalResult};

pub const PAGE_SIZE: usize = 4096;
pub const TABLE_MAX_PAGES: usize = 100;

/// One 4096-byte page frame, fully owned by the `Pager` that holds it.
pub struct Page {
    data: [u8; PAGE_SIZE],
}

impl Page {
    fn zeroed() -> Self {
        Page {
            data: [0; PAGE_SIZE],
        }
    }

    #[cfg(test)]
    pub fn zeroed_for_test() -> Self {
        Self::zeroed()
    }

    pub fn bytes(&self) -> &[u8; PAGE_SIZE] {
        &self.data
    }

    pub fn bytes_mut(&mut self) -> &mut [u8; PAGE_SIZE] {
        &mut self.data
    }
}

/// Sole gateway between page numbers and bytes on disk. Never interprets
/// page contents; a cache hit or miss is the only thing it knows about a
/// page's lifecycle.
pub struct Pager {
    file: File,
    file_length: u64,
    num_pages: u32,
    frames: Vec<Option<Box<Page>>>,
}

impl Pager {
    pub fn open(filename: &str) -> FatalResult<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(filename)
            .map_err(|_| FatalError::OpenFile)?;

        let file_length = file.metadata()?.len();

        if file_length % PAGE_SIZE as u64 != 0 {
            return Err(FatalError::CorruptFile);
        }

        let num_pages = (file_length / PAGE_SIZE as u64) as u32;
        info!("opened {filename} with {num_pages} existing page(s)");

        let mut frames = Vec::with_capacity(TABLE_MAX_PAGES);
        frames.resize_with(TABLE_MAX_PAGES, || None);

        Ok(Self {
            file,
            file_length,
            num_pages,
            frames,
        })
    }

    pub fn num_pages(&self) -> u32 {
        self.num_pages
    }

    fn validate_page_num(page_num: u32) -> FatalResult<()> {
        if page_num as usize >= TABLE_MAX_PAGES {
            return Err(FatalError::PageOutOfBounds {
                requested: page_num,
                limit: TABLE_MAX_PAGES as u32,
            });
        }
        Ok(())
    }

    /// Demand-load page `page_num`, returning a mutable reference to its
    /// in-memory frame. A cache miss zero-fills the frame and then reads the
    /// corresponding file region, if any; bytes past EOF stay zeroed.
    pub fn get_page(&mut self, page_num: u32) -> FatalResult<&mut Page> {
        Self::validate_page_num(page_num)?;

        if self.frames[page_num as usize].is_none() {
            let mut page = Box::new(Page::zeroed());

            let mut pages_on_disk = self.file_length / PAGE_SIZE as u64;
            if self.file_length % PAGE_SIZE as u64 != 0 {
                pages_on_disk += 1;
            }

            if (page_num as u64) <= pages_on_disk {
                debug!("pager cache miss on page {page_num}, reading from disk");
                let offset = page_num as u64 * PAGE_SIZE as u64;
                self.file.seek(SeekFrom::Start(offset))?;
                self.file.read(page.bytes_mut())?;
            }

            self.frames[page_num as usize] = Some(page);

            if page_num >= self.num_pages {
                self.num_pages = page_num + 1;
            }
        }

        Ok(self.frames[page_num as usize].as_mut().unwrap())
    }

    fn flush(&mut self, page_num: u32) -> FatalResult<()> {
        let page = self.frames[page_num as usize]
            .as_ref()
            .ok_or(FatalError::FlushNullPage)?;

        let offset = page_num as u64 * PAGE_SIZE as u64;
        self.file.seek(SeekFrom::Start(offset))?;
        self.file.write_all(page.bytes())?;
        Ok(())
    }

    /// Flush every cached page within the logical page count and release all
    /// frames, then close the file handle. Frames allocated past
    /// `num_pages` (there should not be any in normal operation) are
    /// released without flushing.
    pub fn close(mut self) -> FatalResult<()> {
        for page_num in 0..self.num_pages {
            if self.frames[page_num as usize].is_some() {
                self.flush(page_num)?;
            }
        }
        info!("closed pager, flushed {} page(s)", self.num_pages);
        self.frames.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(tmp: &tempfile::TempDir, name: &str) -> String {
        tmp.path().join(name).to_str().unwrap().to_string()
    }

    #[test]
    fn opening_a_fresh_file_has_zero_pages() {
        let tmp = tempfile::tempdir().unwrap();
        let path = scratch_path(&tmp, "fresh.db");
        let pager = Pager::open(&path).unwrap();
        assert_eq!(pager.num_pages(), 0);
    }

    #[test]
    fn get_page_past_num_pages_extends_it() {
        let tmp = tempfile::tempdir().unwrap();
        let path = scratch_path(&tmp, "grow.db");
        let mut pager = Pager::open(&path).unwrap();
        pager.get_page(0).unwrap();
        assert_eq!(pager.num_pages(), 1);
    }

    #[test]
    fn out_of_bounds_page_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let path = scratch_path(&tmp, "bounds.db");
        let mut pager = Pager::open(&path).unwrap();
        let err = pager.get_page(TABLE_MAX_PAGES as u32).unwrap_err();
        assert!(matches!(err, FatalError::PageOutOfBounds { .. }));
    }

    #[test]
    fn data_survives_a_close_and_reopen() {
        let tmp = tempfile::tempdir().unwrap();
        let path = scratch_path(&tmp, "roundtrip.db");

        let mut pager = Pager::open(&path).unwrap();
        {
            let page = pager.get_page(0).unwrap();
            page.bytes_mut()[0] = 42;
        }
        pager.close().unwrap();

        let mut reopened = Pager::open(&path).unwrap();
        assert_eq!(reopened.num_pages(), 1);
        let page = reopened.get_page(0).unwrap();
        assert_eq!(page.bytes()[0], 42);
    }

    #[test]
    fn a_non_page_sized_file_is_corrupt() {
        let tmp = tempfile::tempdir().unwrap();
        let path = scratch_path(&tmp, "corrupt.db");
        {
            let mut f = File::create(&path).unwrap();
            f.write_all(&[0u8; 100]).unwrap();
        }
        let err = Pager::open(&path).unwrap_err();
        assert!(matches!(err, FatalError::CorruptFile));
    }
}
