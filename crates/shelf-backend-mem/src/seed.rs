//! The demo dataset: catalog, student accounts, and loans.

use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use shelf_core::{
  book::{Book, Category},
  loan::{BorrowRecord, LoanStatus},
  profile::StudentProfile,
};

use crate::backend::{Account, Tables};

const DEMO_PASSWORD: &str = "secret";

fn date(y: i32, m: u32, d: u32) -> DateTime<Utc> {
  Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
}

fn book(
  title: &str,
  author: &str,
  category: Category,
  isbn: &str,
  available: bool,
) -> Book {
  Book {
    book_id: Uuid::new_v4(),
    title: title.to_owned(),
    author: author.to_owned(),
    category,
    isbn: isbn.to_owned(),
    available,
  }
}

struct Student {
  account: Account,
  profile: StudentProfile,
}

fn student(full_name: &str, student_id: &str, email: &str) -> Student {
  let subject_id = Uuid::new_v4();
  let created = date(2023, 9, 1);
  Student {
    account: Account {
      subject_id,
      email:    email.to_owned(),
      password: DEMO_PASSWORD.to_owned(),
    },
    profile: StudentProfile {
      profile_id: Uuid::new_v4(),
      subject_id,
      full_name:  full_name.to_owned(),
      student_id: student_id.to_owned(),
      email:      email.to_owned(),
      phone:      None,
      created_at: created,
      updated_at: created,
    },
  }
}

fn loan(
  book: &Book,
  profile: &StudentProfile,
  borrowed: DateTime<Utc>,
  due: DateTime<Utc>,
  returned: Option<DateTime<Utc>>,
) -> BorrowRecord {
  BorrowRecord {
    record_id:   Uuid::new_v4(),
    book_id:     book.book_id,
    title:       book.title.clone(),
    author:      book.author.clone(),
    profile_id:  profile.profile_id,
    borrowed_at: borrowed,
    due_at:      due,
    returned_at: returned,
    status:      if returned.is_some() {
      LoanStatus::Returned
    } else {
      LoanStatus::Borrowed
    },
  }
}

pub(crate) fn demo_tables() -> Tables {
  let books = vec![
    book("The Great Gatsby", "F. Scott Fitzgerald", Category::Fiction, "978-0743273565", true),
    book("A Brief History of Time", "Stephen Hawking", Category::Science, "978-0553380163", true),
    book("1984", "George Orwell", Category::Fiction, "978-0451524935", false),
    book("Sapiens", "Yuval Noah Harari", Category::History, "978-0062316097", true),
    book("Clean Code", "Robert C. Martin", Category::Technology, "978-0132350884", true),
    book("Pride and Prejudice", "Jane Austen", Category::Literature, "978-0141439518", false),
    book("The Selfish Gene", "Richard Dawkins", Category::Science, "978-0199291151", true),
    book("To Kill a Mockingbird", "Harper Lee", Category::Literature, "978-0446310789", true),
  ];

  let alice = student("Alice Johnson", "STU001", "alice@example.com");
  let bob   = student("Bob Smith", "STU002", "bob@example.com");
  let carol = student("Carol White", "STU003", "carol@example.com");

  let records = vec![
    // Alice has 1984 out, well past due.
    loan(&books[2], &alice.profile, date(2024, 1, 5), date(2024, 1, 19), None),
    // Bob has Pride and Prejudice out.
    loan(&books[5], &bob.profile, date(2024, 1, 8), date(2024, 1, 22), None),
    // Carol returned The Great Gatsby on its due date.
    loan(
      &books[0],
      &carol.profile,
      date(2023, 12, 20),
      date(2024, 1, 3),
      Some(date(2024, 1, 3)),
    ),
  ];

  let students = [alice, bob, carol];
  Tables {
    accounts: students.iter().map(|s| s.account.clone()).collect(),
    session: None,
    profiles: students.iter().map(|s| s.profile.clone()).collect(),
    records,
    books,
    fail_end_session: false,
  }
}
