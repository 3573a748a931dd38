use serde::{Deserialize, Serialize};

use super::{BookId, BorrowBookError, ReturnBookError};

/// Book エンティティ - カタログ上の1冊
///
/// 貸出可否（available）は書籍自身が唯一の情報源として保持する。
/// 誰が借りているかは知らない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    id: BookId,
    title: String,
    author: String,
    available: bool,
}

impl Book {
    /// 新規作成（貸出可能な状態）
    pub fn new(id: BookId, title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            author: author.into(),
            available: true,
        }
    }

    pub fn id(&self) -> BookId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    /// 貸出中にする
    ///
    /// 既に貸出中の場合は冪等に扱わずエラーを返す。
    pub fn mark_borrowed(&mut self) -> Result<(), BorrowBookError> {
        if !self.available {
            return Err(BorrowBookError::AlreadyBorrowed);
        }
        self.available = false;
        Ok(())
    }

    /// 返却済みにする
    pub fn mark_returned(&mut self) -> Result<(), ReturnBookError> {
        if self.available {
            return Err(ReturnBookError::AlreadyReturned);
        }
        self.available = true;
        Ok(())
    }
}
