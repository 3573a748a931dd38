use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Book, BookId, BorrowBookError, MemberId, MemberLimitError, MemberType, ReturnBookError};

/// 貸出上限の既定値
pub const DEFAULT_MAX_BOOKS_ALLOWED: usize = 4;

/// 貸出記録
///
/// 独立した集約ではなく、会員が所有する書籍への弱い参照と貸出日時の組。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loan {
    pub book_id: BookId,
    pub borrowed_at: DateTime<Utc>,
}

/// Member エンティティ
///
/// 不変条件：
/// - loans.len() <= max_books_allowed
/// - loans は book_id で一意
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    id: MemberId,
    name: String,
    member_type: MemberType,
    max_books_allowed: usize,
    loans: Vec<Loan>,
}

impl Member {
    pub fn new(
        id: MemberId,
        name: impl Into<String>,
        member_type: MemberType,
        max_books_allowed: usize,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            member_type,
            max_books_allowed,
            loans: Vec::new(),
        }
    }

    pub fn id(&self) -> MemberId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn member_type(&self) -> MemberType {
        self.member_type
    }

    pub fn max_books_allowed(&self) -> usize {
        self.max_books_allowed
    }

    /// 貸出中の記録（読み取り専用）
    pub fn loans(&self) -> &[Loan] {
        &self.loans
    }

    pub fn has_loans(&self) -> bool {
        !self.loans.is_empty()
    }

    /// 指定の書籍を借りているか
    pub fn loan_for(&self, book_id: BookId) -> Option<&Loan> {
        self.loans.iter().find(|loan| loan.book_id == book_id)
    }

    /// 貸出上限を変更する
    ///
    /// 現在の貸出冊数を下回る値は不変条件を壊すため受け付けない。
    pub fn set_max_books_allowed(&mut self, max_books_allowed: usize) -> Result<(), MemberLimitError> {
        if max_books_allowed < self.loans.len() {
            return Err(MemberLimitError::BelowActiveLoans {
                active: self.loans.len(),
            });
        }
        self.max_books_allowed = max_books_allowed;
        Ok(())
    }

    /// 書籍を借りる
    ///
    /// ビジネスルール：
    /// - 上限チェックは書籍に触れる前に行う（上限エラー時に書籍の状態は変わらない）
    /// - 同じ書籍を二重に借りることはできない
    /// - 貸出中の書籍は借りられない
    pub fn borrow(&mut self, book: &mut Book, borrowed_at: DateTime<Utc>) -> Result<(), BorrowBookError> {
        if self.loans.len() >= self.max_books_allowed {
            return Err(BorrowBookError::LimitExceeded);
        }
        if self.loan_for(book.id()).is_some() {
            return Err(BorrowBookError::AlreadyBorrowed);
        }

        book.mark_borrowed()?;
        self.loans.push(Loan {
            book_id: book.id(),
            borrowed_at,
        });
        Ok(())
    }

    /// 書籍を返す
    ///
    /// 貸出記録の削除を先に行い、その後で書籍の状態遷移を試みる。
    /// 自分の貸出記録に無い書籍でも書籍側の遷移は行われる。
    pub fn return_book(&mut self, book: &mut Book) -> Result<(), ReturnBookError> {
        self.loans.retain(|loan| loan.book_id != book.id());
        book.mark_returned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn member_with_limit(limit: usize) -> Member {
        Member::new(MemberId::new(1), "Alice", MemberType::Regular, limit)
    }

    fn book(id: u64) -> Book {
        Book::new(BookId::new(id), format!("Book {}", id), "Author")
    }

    #[test]
    fn test_new_member_has_no_loans() {
        let member = member_with_limit(DEFAULT_MAX_BOOKS_ALLOWED);
        assert!(member.loans().is_empty());
        assert_eq!(member.max_books_allowed(), 4);
        assert_eq!(member.member_type(), MemberType::Regular);
        assert_eq!(member.name(), "Alice");
    }

    #[test]
    fn test_borrow_records_loan_and_marks_book() {
        let mut member = member_with_limit(4);
        let mut book = book(1);
        let now = Utc::now();

        member.borrow(&mut book, now).unwrap();

        assert!(!book.is_available());
        assert_eq!(member.loans().len(), 1);
        assert_eq!(member.loans()[0].book_id, book.id());
        assert_eq!(member.loans()[0].borrowed_at, now);
    }

    #[test]
    fn test_borrow_fails_when_limit_reached_without_touching_book() {
        let mut member = member_with_limit(1);
        let mut first = book(1);
        let mut second = book(2);

        member.borrow(&mut first, Utc::now()).unwrap();
        let result = member.borrow(&mut second, Utc::now());

        assert_eq!(result, Err(BorrowBookError::LimitExceeded));
        // 上限エラー時は書籍の状態が変わらない
        assert!(second.is_available());
        assert_eq!(member.loans().len(), 1);
    }

    #[test]
    fn test_borrow_fails_when_book_unavailable() {
        let mut member = member_with_limit(4);
        let mut book = book(1);
        book.mark_borrowed().unwrap();

        let result = member.borrow(&mut book, Utc::now());
        assert_eq!(result, Err(BorrowBookError::AlreadyBorrowed));
        assert!(member.loans().is_empty());
    }

    #[test]
    fn test_borrow_same_book_twice_fails() {
        let mut member = member_with_limit(4);
        let mut book = book(1);
        member.borrow(&mut book, Utc::now()).unwrap();

        let result = member.borrow(&mut book, Utc::now());
        assert_eq!(result, Err(BorrowBookError::AlreadyBorrowed));
        assert_eq!(member.loans().len(), 1);
    }

    #[test]
    fn test_return_removes_loan_and_marks_available() {
        let mut member = member_with_limit(4);
        let mut book = book(1);
        member.borrow(&mut book, Utc::now()).unwrap();

        member.return_book(&mut book).unwrap();

        assert!(book.is_available());
        assert!(member.loans().is_empty());
    }

    #[test]
    fn test_return_not_borrowed_book_still_flips_book() {
        let mut owner = member_with_limit(4);
        let mut other = Member::new(MemberId::new(2), "Bob", MemberType::Regular, 4);
        let mut book = book(1);
        owner.borrow(&mut book, Utc::now()).unwrap();

        // 自分の貸出記録に無くても書籍側は返却される
        other.return_book(&mut book).unwrap();
        assert!(book.is_available());
        assert_eq!(owner.loans().len(), 1);
    }

    #[test]
    fn test_return_available_book_fails() {
        let mut member = member_with_limit(4);
        let mut book = book(1);

        let result = member.return_book(&mut book);
        assert_eq!(result, Err(ReturnBookError::AlreadyReturned));
        assert!(book.is_available());
    }

    #[test]
    fn test_loans_keep_borrow_order() {
        let mut member = member_with_limit(4);
        let start = Utc::now();
        let mut books: Vec<Book> = (1..=3).map(book).collect();
        for (i, b) in books.iter_mut().enumerate() {
            member.borrow(b, start + Duration::days(i as i64)).unwrap();
        }

        let ids: Vec<u64> = member.loans().iter().map(|l| l.book_id.value()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_set_max_books_allowed() {
        let mut member = member_with_limit(4);
        let mut a = book(1);
        let mut b = book(2);
        member.borrow(&mut a, Utc::now()).unwrap();
        member.borrow(&mut b, Utc::now()).unwrap();

        assert_eq!(
            member.set_max_books_allowed(1),
            Err(MemberLimitError::BelowActiveLoans { active: 2 })
        );
        assert_eq!(member.max_books_allowed(), 4);

        member.set_max_books_allowed(2).unwrap();
        assert_eq!(member.max_books_allowed(), 2);
    }
}
