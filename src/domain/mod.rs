pub mod book;
pub mod errors;
pub mod events;
pub mod fine;
pub mod member;
pub mod value_objects;

pub use book::Book;
pub use errors::*;
pub use events::*;
pub use fine::*;
pub use member::{DEFAULT_MAX_BOOKS_ALLOWED, Loan, Member};
pub use value_objects::*;
