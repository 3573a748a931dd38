use lending_library::{
    adapters::{
        clock::SystemClock,
        in_memory::{BookRepository, EventBus, MemberRepository},
    },
    application::library::{LibraryService, ServiceDependencies, detect_overdue_loans},
    config::LibraryConfig,
    domain::{BOOK_ADDED, BOOK_OVERDUE, BOOK_RETURNED, LibraryEvent, MemberType},
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lending_library=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = LibraryConfig::from_env().expect("Invalid library configuration");
    tracing::info!(?config, "configuration loaded");

    // Event subscriptions
    let event_bus = Arc::new(EventBus::new());
    event_bus.subscribe(BOOK_ADDED, |event| {
        if let LibraryEvent::BookAdded(e) = event {
            tracing::info!(
                "EVENT: New book added -> {} by {}",
                e.new_book.title(),
                e.new_book.author()
            );
        }
        Ok(())
    });
    event_bus.subscribe(BOOK_RETURNED, |event| {
        tracing::info!(payload = %event.payload(), "EVENT: book returned");
        Ok(())
    });
    event_bus.subscribe(BOOK_OVERDUE, |event| {
        tracing::info!(payload = %event.payload(), "EVENT: notify member of overdue book");
        Ok(())
    });

    // Initialize adapters
    let service_deps = ServiceDependencies {
        book_repository: Arc::new(BookRepository::new()),
        member_repository: Arc::new(MemberRepository::new()),
        event_publisher: event_bus.clone(),
        clock: Arc::new(SystemClock),
    };

    let library = LibraryService::new(service_deps, config.fine_strategies())
        .with_default_max_books(config.default_max_books);

    if let Err(e) = run_demo(&library).await {
        tracing::error!("Demo failed: {}", e);
        std::process::exit(1);
    }
}

/// 書籍の追加から延滞検出までの一連の流れ
async fn run_demo(
    library: &LibraryService,
) -> Result<(), lending_library::application::library::LibraryApplicationError> {
    let gatsby = library
        .add_book("The Great Gatsby", "F. Scott Fitzgerald")
        .await?;
    let orwell = library.add_book("1984", "George Orwell").await?;
    library.add_book("Brave New World", "Aldous Huxley").await?;

    let alice = library.register_member("Alice", None, None).await?;
    let bob = library
        .register_member("Bob", Some(MemberType::Premium), None)
        .await?;
    tracing::info!(
        "Registered members: {} (ID:{}), {} (ID:{})",
        alice.name(),
        alice.id(),
        bob.name(),
        bob.id()
    );

    library.borrow_book(alice.id(), gatsby.id()).await?;
    library.borrow_book(bob.id(), orwell.id()).await?;
    tracing::info!("{} borrowed \"{}\"", alice.name(), gatsby.title());
    tracing::info!("{} borrowed \"{}\"", bob.name(), orwell.title());

    if let Err(e) = library.borrow_book(alice.id(), orwell.id()).await {
        tracing::warn!("Error: {}", e);
    }

    library.return_book(alice.id(), gatsby.id()).await?;

    let available: Vec<String> = library
        .list_available_books()
        .await?
        .iter()
        .map(|book| book.title().to_string())
        .collect();
    tracing::info!("Available books: {}", available.join(", "));

    let fine = library.calculate_fine(bob.id(), orwell.id()).await?;
    tracing::info!("Fine for {} on \"{}\" is ${}", bob.name(), orwell.title(), fine);

    let overdue = detect_overdue_loans(library).await?;
    tracing::info!("Overdue loans detected: {}", overdue);

    Ok(())
}
