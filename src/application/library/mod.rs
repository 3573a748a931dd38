mod errors;
mod library_service;
mod overdue_detection;

pub use errors::{LibraryApplicationError, Result};
pub use library_service::{LibraryService, ServiceDependencies, days_late};
pub use overdue_detection::detect_overdue_loans;
