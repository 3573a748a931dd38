pub mod book_repository;
pub mod event_bus;
pub mod member_repository;

pub use book_repository::BookRepository;
pub use event_bus::{EventBus, SubscriptionId};
pub use member_repository::MemberRepository;

use thiserror::Error;

/// Errors raised by the in-memory adapters
#[derive(Debug, Error)]
pub enum InMemoryError {
    #[error("in-memory store lock was poisoned")]
    LockPoisoned,
}
