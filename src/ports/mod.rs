pub mod book_repository;
pub mod clock;
pub mod event_publisher;
pub mod member_repository;

pub use book_repository::BookRepository;
pub use clock::Clock;
pub use event_publisher::EventPublisher;
pub use member_repository::MemberRepository;
