use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum Error {
  #[error("field cannot be blank: {field}")]
  BlankField { field: &'static str },
  #[error("no book with id {0}")]
  UnknownBook(Uuid),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
