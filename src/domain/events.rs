use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::{Book, BookId, MemberId};

pub const BOOK_ADDED: &str = "book-added";
pub const BOOK_RETURNED: &str = "book-returned";
pub const BOOK_OVERDUE: &str = "book-overdue";

/// イベント：書籍がカタログに追加された
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookAdded {
    #[serde(rename = "newBook")]
    pub new_book: Book,
}

/// イベント：書籍が返却された
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookReturned {
    pub member_id: MemberId,
    pub book_id: BookId,
}

/// イベント：貸出が延滞している
///
/// コア操作からは発行されない。延滞検出バッチなど外部から発行する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookOverdue {
    pub member_id: MemberId,
    pub book_id: BookId,
}

/// ライブラリイベント統合型
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LibraryEvent {
    BookAdded(BookAdded),
    BookReturned(BookReturned),
    BookOverdue(BookOverdue),
}

impl LibraryEvent {
    /// 購読に使うイベント名
    pub fn name(&self) -> &'static str {
        match self {
            LibraryEvent::BookAdded(_) => BOOK_ADDED,
            LibraryEvent::BookReturned(_) => BOOK_RETURNED,
            LibraryEvent::BookOverdue(_) => BOOK_OVERDUE,
        }
    }

    /// 購読者に渡す構造化ペイロード
    pub fn payload(&self) -> Value {
        let payload = match self {
            LibraryEvent::BookAdded(e) => serde_json::to_value(e),
            LibraryEvent::BookReturned(e) => serde_json::to_value(e),
            LibraryEvent::BookOverdue(e) => serde_json::to_value(e),
        };
        payload.unwrap_or_else(|err| json!({ "error": err.to_string() }))
    }
}
