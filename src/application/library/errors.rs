use crate::domain::{
    BookId, BorrowBookError, MemberId, MemberLimitError, MemberType, ReturnBookError,
};
use thiserror::Error;

/// ライブラリアプリケーション層のエラー
#[derive(Debug, Error)]
pub enum LibraryApplicationError {
    /// 会員が存在しない
    #[error("Member with ID {0} not found")]
    MemberNotFound(MemberId),

    /// 書籍がカタログに存在しない
    #[error("Book with ID {0} is not available")]
    BookNotAvailable(BookId),

    /// 既に貸出中（自分自身の二重貸出を含む）
    #[error("Book with ID {0} is already borrowed")]
    AlreadyBorrowed(BookId),

    /// 貸出中ではない（返却済み、または該当する貸出が無い）
    #[error("Book with ID {0} is already returned")]
    AlreadyReturned(BookId),

    /// 貸出上限に達している
    #[error("Member with ID {0} has reached maximum borrowed books")]
    LimitExceeded(MemberId),

    /// 貸出中の書籍は削除できない
    #[error("Book with ID {0} is on loan and cannot be removed")]
    BookOnLoan(BookId),

    /// 貸出中の書籍がある会員は登録解除できない
    #[error("Member with ID {0} still has books on loan")]
    MemberHasLoans(MemberId),

    /// 現在の貸出冊数を下回る上限
    #[error("Limit {requested} is below the {active} books currently on loan")]
    InvalidLimit { requested: usize, active: usize },

    /// 会員種別に対応する料金戦略が無い
    #[error("No fine strategy registered for member type {}", .0.as_str())]
    MissingFineStrategy(MemberType),

    /// BookRepositoryのエラー
    #[error("Book repository error")]
    BookRepositoryError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// MemberRepositoryのエラー
    #[error("Member repository error")]
    MemberRepositoryError(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl LibraryApplicationError {
    pub(super) fn from_borrow(err: BorrowBookError, member_id: MemberId, book_id: BookId) -> Self {
        match err {
            BorrowBookError::AlreadyBorrowed => LibraryApplicationError::AlreadyBorrowed(book_id),
            BorrowBookError::LimitExceeded => LibraryApplicationError::LimitExceeded(member_id),
        }
    }

    pub(super) fn from_return(err: ReturnBookError, book_id: BookId) -> Self {
        match err {
            ReturnBookError::AlreadyReturned => LibraryApplicationError::AlreadyReturned(book_id),
        }
    }

    pub(super) fn from_limit(err: MemberLimitError, requested: usize) -> Self {
        match err {
            MemberLimitError::BelowActiveLoans { active } => {
                LibraryApplicationError::InvalidLimit { requested, active }
            }
        }
    }
}

/// アプリケーション層の Result型
pub type Result<T> = std::result::Result<T, LibraryApplicationError>;
