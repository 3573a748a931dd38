use crate::domain::{Book, BookId};
use crate::ports::book_repository::{BookRepository as BookRepositoryTrait, Result};
use async_trait::async_trait;
use std::sync::Mutex;

use super::InMemoryError;

/// In-memory implementation of BookRepository
///
/// Keeps books in insertion order. Saving an existing id replaces it in place.
#[derive(Debug, Default)]
pub struct BookRepository {
    books: Mutex<Vec<Book>>,
}

impl BookRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookRepositoryTrait for BookRepository {
    async fn add(&self, book: Book) -> Result<Book> {
        let mut books = self.books.lock().map_err(|_| InMemoryError::LockPoisoned)?;
        match books.iter_mut().find(|existing| existing.id() == book.id()) {
            Some(existing) => *existing = book.clone(),
            None => books.push(book.clone()),
        }
        Ok(book)
    }

    async fn delete(&self, id: BookId) -> Result<()> {
        let mut books = self.books.lock().map_err(|_| InMemoryError::LockPoisoned)?;
        books.retain(|book| book.id() != id);
        Ok(())
    }

    async fn find_by_id(&self, id: BookId) -> Result<Option<Book>> {
        let books = self.books.lock().map_err(|_| InMemoryError::LockPoisoned)?;
        Ok(books.iter().find(|book| book.id() == id).cloned())
    }

    async fn list(&self) -> Result<Vec<Book>> {
        let books = self.books.lock().map_err(|_| InMemoryError::LockPoisoned)?;
        Ok(books.clone())
    }
}
