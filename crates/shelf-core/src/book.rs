//! Catalog book types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Shelving category for a book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
  Fiction,
  NonFiction,
  Science,
  History,
  Technology,
  Literature,
}

impl Category {
  pub const ALL: [Category; 6] = [
    Category::Fiction,
    Category::NonFiction,
    Category::Science,
    Category::History,
    Category::Technology,
    Category::Literature,
  ];

  /// Human-readable label, as shown in the catalog filter bar.
  pub fn label(&self) -> &'static str {
    match self {
      Self::Fiction => "Fiction",
      Self::NonFiction => "Non-Fiction",
      Self::Science => "Science",
      Self::History => "History",
      Self::Technology => "Technology",
      Self::Literature => "Literature",
    }
  }
}

impl std::fmt::Display for Category {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.label())
  }
}

impl std::str::FromStr for Category {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Category::ALL
      .iter()
      .find(|c| c.label().eq_ignore_ascii_case(s.trim()))
      .copied()
      .ok_or_else(|| format!("unknown category: {s:?}"))
  }
}

/// One catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
  pub book_id:   Uuid,
  pub title:     String,
  pub author:    String,
  pub category:  Category,
  pub isbn:      String,
  /// False while the only copy is out on loan.
  pub available: bool,
}

/// Input to a catalog insert or update; `book_id` is assigned by the catalog.
#[derive(Debug, Clone)]
pub struct NewBook {
  pub title:    String,
  pub author:   String,
  pub category: Category,
  pub isbn:     String,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn category_labels_round_trip_through_from_str() {
    for category in Category::ALL {
      let parsed: Category = category.label().parse().unwrap();
      assert_eq!(parsed, category);
    }
  }

  #[test]
  fn category_parse_is_case_insensitive() {
    assert_eq!("science".parse::<Category>().unwrap(), Category::Science);
    assert_eq!("non-fiction".parse::<Category>().unwrap(), Category::NonFiction);
  }

  #[test]
  fn unknown_category_is_an_error() {
    assert!("Cooking".parse::<Category>().is_err());
  }
}
