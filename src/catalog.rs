//! Catalog
//!
//! Book records keyed by ISBN, kept in insertion order.

use std::collections::HashMap;

use crate::aggregate::Book;
use crate::domain::{DomainError, Isbn};

/// In-memory book catalog
#[derive(Debug, Default)]
pub struct Catalog {
    books: Vec<Book>,
    index: HashMap<Isbn, usize>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a book. It starts out available.
    pub fn add_book(
        &mut self,
        title: impl Into<String>,
        author: impl Into<String>,
        id: impl Into<Isbn>,
    ) -> Result<Book, DomainError> {
        let id = id.into();
        if self.index.contains_key(&id) {
            return Err(DomainError::duplicate_book(&id));
        }

        let book = Book::new(id, title.into(), author.into())?;
        self.index.insert(book.id().clone(), self.books.len());
        self.books.push(book.clone());

        tracing::info!("Book added: {} ({})", book.title(), book.id());
        Ok(book)
    }

    pub fn find_book(&self, id: &Isbn) -> Result<&Book, DomainError> {
        self.index
            .get(id)
            .and_then(|&i| self.books.get(i))
            .ok_or_else(|| DomainError::book_not_found(id))
    }

    pub(crate) fn find_book_mut(&mut self, id: &Isbn) -> Result<&mut Book, DomainError> {
        match self.index.get(id) {
            Some(&i) => self
                .books
                .get_mut(i)
                .ok_or_else(|| DomainError::book_not_found(id)),
            None => Err(DomainError::book_not_found(id)),
        }
    }

    /// All books, insertion order
    pub fn list_books(&self) -> Vec<Book> {
        self.books.clone()
    }

    /// Books not currently on loan, insertion order
    pub fn available_books(&self) -> Vec<Book> {
        self.books
            .iter()
            .filter(|b| b.is_available())
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}
