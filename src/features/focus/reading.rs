//! Reading-session linkage: books tied to a countdown and page progress.

use serde::{Deserialize, Serialize};

use crate::api::{Book, LinkedBookInfo, ReadingBook};

/// The book a session is linked to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookLink {
    pub id: String,
    pub title: String,
    pub current_page: u32,
    pub page_count: u32,
}

impl BookLink {
    /// Task name used for a session on this book.
    #[must_use]
    pub fn task_name(&self) -> String {
        format!("Reading: {}", self.title)
    }

    /// Build a link from the partial book echoed by `start_timer`.
    ///
    /// Returns `None` when the server did not name the book.
    #[must_use]
    pub fn from_info(info: &LinkedBookInfo) -> Option<Self> {
        Some(Self {
            id: info.id.clone()?,
            title: info.title.clone()?,
            current_page: info.current_page,
            page_count: info.page_count.unwrap_or(0),
        })
    }

    /// Overwrite with server data, keeping fields the server left out.
    pub fn merge(&mut self, info: &LinkedBookInfo) {
        if let Some(id) = &info.id {
            self.id.clone_from(id);
        }
        if let Some(title) = &info.title {
            self.title.clone_from(title);
        }
        self.current_page = info.current_page;
        if let Some(count) = info.page_count {
            self.page_count = count;
        }
    }
}

impl From<&Book> for BookLink {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id.clone(),
            title: book.title.clone(),
            current_page: book.current_page,
            page_count: book.page_count,
        }
    }
}

impl From<ReadingBook> for BookLink {
    fn from(book: ReadingBook) -> Self {
        Self {
            id: book.id,
            title: book.title,
            current_page: book.current_page,
            page_count: book.page_count,
        }
    }
}

/// Picker label, e.g. `Dune (120/412 pages)`.
#[must_use]
pub fn book_label(book: &Book) -> String {
    format!("{} ({}/{} pages)", book.title, book.current_page, book.page_count)
}

/// Find a cached book by id.
#[must_use]
pub fn find_book<'a>(books: &'a [Book], id: &str) -> Option<&'a Book> {
    books.iter().find(|b| b.id == id)
}

/// Whole-number percentage of `current` out of `page_count`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn percent_complete(current: u32, page_count: u32) -> u32 {
    if page_count == 0 {
        return 0;
    }
    (f64::from(current) / f64::from(page_count) * 100.0).round() as u32
}

/// Page progress captured after a reading session ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadingProgress {
    book: BookLink,
    pages_read: u32,
    current_page: u32,
}

impl ReadingProgress {
    /// Start at the book's current page with nothing read.
    #[must_use]
    pub fn new(book: BookLink) -> Self {
        let current_page = book.current_page;
        Self { book, pages_read: 0, current_page }
    }

    /// Record pages read and derive the new current page.
    ///
    /// The result stays within `[book.current_page, book.page_count]`.
    pub fn set_pages_read(&mut self, pages: u32) {
        self.pages_read = pages;
        let start = self.book.current_page;
        let ceiling = self.book.page_count.max(start);
        self.current_page = start.saturating_add(pages).min(ceiling);
    }

    /// Set the current page directly.
    pub fn set_current_page(&mut self, page: u32) {
        self.current_page = page.min(self.book.page_count.max(self.book.current_page));
    }

    #[must_use]
    pub const fn book(&self) -> &BookLink {
        &self.book
    }

    #[must_use]
    pub const fn pages_read(&self) -> u32 {
        self.pages_read
    }

    #[must_use]
    pub const fn current_page(&self) -> u32 {
        self.current_page
    }

    /// Percent of the book finished at the current page.
    #[must_use]
    pub fn percent(&self) -> u32 {
        percent_complete(self.current_page, self.book.page_count)
    }
}
