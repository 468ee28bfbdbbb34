//! The [`Catalog`] itself.

use uuid::Uuid;

use shelf_core::book::{Book, Category, NewBook};

use crate::error::{Error, Result};

/// An owned collection of books with search and administrative edits.
///
/// Insertion order is preserved; search results keep it too.
#[derive(Debug, Default)]
pub struct Catalog {
  books: Vec<Book>,
}

impl Catalog {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn from_books(books: Vec<Book>) -> Self {
    Self { books }
  }

  pub fn books(&self) -> &[Book] {
    &self.books
  }

  pub fn len(&self) -> usize {
    self.books.len()
  }

  pub fn is_empty(&self) -> bool {
    self.books.is_empty()
  }

  pub fn available_count(&self) -> usize {
    self.books.iter().filter(|b| b.available).count()
  }

  pub fn issued_count(&self) -> usize {
    self.books.len() - self.available_count()
  }

  /// Case-insensitive substring match over title and author, optionally
  /// narrowed to one category. An empty query matches everything, so
  /// `search("", None)` is the unfiltered listing.
  pub fn search(&self, query: &str, category: Option<Category>) -> Vec<&Book> {
    let needle = query.trim().to_lowercase();
    self
      .books
      .iter()
      .filter(|b| category.is_none_or(|c| b.category == c))
      .filter(|b| {
        needle.is_empty()
          || b.title.to_lowercase().contains(&needle)
          || b.author.to_lowercase().contains(&needle)
      })
      .collect()
  }

  /// Add a book, assigning its id. New books start available.
  pub fn add(&mut self, book: NewBook) -> Result<Uuid> {
    let book = validated(book)?;
    let book_id = Uuid::new_v4();
    self.books.push(Book {
      book_id,
      title:     book.title,
      author:    book.author,
      category:  book.category,
      isbn:      book.isbn,
      available: true,
    });
    Ok(book_id)
  }

  /// Replace every editable field of an existing book. Availability is not
  /// an editable field and carries over unchanged.
  pub fn update(&mut self, book_id: Uuid, book: NewBook) -> Result<()> {
    let book = validated(book)?;
    let entry = self
      .books
      .iter_mut()
      .find(|b| b.book_id == book_id)
      .ok_or(Error::UnknownBook(book_id))?;
    entry.title = book.title;
    entry.author = book.author;
    entry.category = book.category;
    entry.isbn = book.isbn;
    Ok(())
  }

  /// Remove a book, returning the removed entry.
  pub fn remove(&mut self, book_id: Uuid) -> Result<Book> {
    let index = self
      .books
      .iter()
      .position(|b| b.book_id == book_id)
      .ok_or(Error::UnknownBook(book_id))?;
    Ok(self.books.remove(index))
  }
}

fn validated(book: NewBook) -> Result<NewBook> {
  for (field, value) in [
    ("title", &book.title),
    ("author", &book.author),
    ("isbn", &book.isbn),
  ] {
    if value.trim().is_empty() {
      return Err(Error::BlankField { field });
    }
  }
  Ok(book)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn new_book(title: &str, author: &str, category: Category) -> NewBook {
    NewBook {
      title:    title.into(),
      author:   author.into(),
      category,
      isbn:     "978-0-00-000000-0".into(),
    }
  }

  fn sample() -> Catalog {
    let mut catalog = Catalog::new();
    catalog
      .add(new_book("The Great Gatsby", "F. Scott Fitzgerald", Category::Fiction))
      .unwrap();
    catalog
      .add(new_book("A Brief History of Time", "Stephen Hawking", Category::Science))
      .unwrap();
    catalog
      .add(new_book("Clean Code", "Robert C. Martin", Category::Technology))
      .unwrap();
    catalog
  }

  #[test]
  fn search_matches_title_and_author_case_insensitively() {
    let catalog = sample();
    assert_eq!(catalog.search("gatsby", None).len(), 1);
    assert_eq!(catalog.search("HAWKING", None).len(), 1);
    assert_eq!(catalog.search("nothing here", None).len(), 0);
  }

  #[test]
  fn empty_query_lists_everything() {
    let catalog = sample();
    assert_eq!(catalog.search("", None).len(), 3);
    assert_eq!(catalog.search("   ", None).len(), 3);
  }

  #[test]
  fn category_filter_narrows_results() {
    let catalog = sample();
    let hits = catalog.search("", Some(Category::Science));
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].title, "A Brief History of Time");
    assert_eq!(catalog.search("gatsby", Some(Category::Science)).len(), 0);
  }

  #[test]
  fn add_rejects_blank_fields() {
    let mut catalog = Catalog::new();
    let mut blank = new_book("", "Someone", Category::Fiction);
    assert!(matches!(
      catalog.add(blank.clone()),
      Err(Error::BlankField { field: "title" })
    ));
    blank.title = "Title".into();
    blank.isbn = "  ".into();
    assert!(matches!(
      catalog.add(blank),
      Err(Error::BlankField { field: "isbn" })
    ));
    assert!(catalog.is_empty());
  }

  #[test]
  fn update_replaces_fields_but_not_availability() {
    let mut catalog = sample();
    let book_id = catalog.books()[0].book_id;
    catalog
      .books
      .iter_mut()
      .find(|b| b.book_id == book_id)
      .unwrap()
      .available = false;

    catalog
      .update(book_id, new_book("Tender Is the Night", "F. Scott Fitzgerald", Category::Literature))
      .unwrap();

    let book = catalog.books().iter().find(|b| b.book_id == book_id).unwrap();
    assert_eq!(book.title, "Tender Is the Night");
    assert_eq!(book.category, Category::Literature);
    assert!(!book.available, "availability belongs to the loan flow");
  }

  #[test]
  fn update_and_remove_of_unknown_id_fail() {
    let mut catalog = sample();
    let missing = Uuid::new_v4();
    assert!(matches!(
      catalog.update(missing, new_book("X", "Y", Category::Fiction)),
      Err(Error::UnknownBook(id)) if id == missing
    ));
    assert!(matches!(
      catalog.remove(missing),
      Err(Error::UnknownBook(id)) if id == missing
    ));
  }

  #[test]
  fn remove_returns_the_entry_and_shrinks_the_catalog() {
    let mut catalog = sample();
    let book_id = catalog.books()[1].book_id;
    let removed = catalog.remove(book_id).unwrap();
    assert_eq!(removed.title, "A Brief History of Time");
    assert_eq!(catalog.len(), 2);
  }

  #[test]
  fn counts_split_by_availability() {
    let mut catalog = sample();
    catalog.books[0].available = false;
    assert_eq!(catalog.available_count(), 2);
    assert_eq!(catalog.issued_count(), 1);
  }
}
