use crate::domain::{
    Book, BookAdded, BookId, BookReturned, DEFAULT_MAX_BOOKS_ALLOWED, FineStrategies, IdSequence,
    LibraryEvent, Loan, Member, MemberId, MemberType,
};
use crate::ports::*;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;

use super::errors::{LibraryApplicationError, Result};

/// サービスの依存関係
///
/// 外部の協調者をまとめたデータ構造。
/// イベント通知先はサービスが排他的に所有しない（他の購読者と共有される）。
#[derive(Clone)]
pub struct ServiceDependencies {
    pub book_repository: Arc<dyn BookRepository>,
    pub member_repository: Arc<dyn MemberRepository>,
    pub event_publisher: Arc<dyn EventPublisher>,
    pub clock: Arc<dyn Clock>,
}

/// 貸出日時から現在までの延滞日数（切り捨て、負にはならない）
pub fn days_late(borrowed_at: DateTime<Utc>, now: DateTime<Utc>) -> u32 {
    let days = (now - borrowed_at).num_days().max(0);
    u32::try_from(days).unwrap_or(u32::MAX)
}

/// ライブラリサービス
///
/// 書籍・会員・貸出・延滞料金の業務操作を調整する。
///
/// 書籍の状態遷移はこのサービスを通じてのみ行われる：
/// `Available → (borrow) → OnLoan → (return) → Available`
///
/// # 一貫性保証
///
/// 変更系の操作は `write_lock` で直列化される。
/// 読み取り → 検証 → 変更 → 書き戻し の一連の流れが他の呼び出しと交差しない。
/// 読み取り専用の操作はロックを取らない。
pub struct LibraryService {
    deps: ServiceDependencies,
    fine_strategies: FineStrategies,
    book_ids: IdSequence,
    member_ids: IdSequence,
    default_max_books_allowed: usize,
    write_lock: Mutex<()>,
}

impl LibraryService {
    pub fn new(deps: ServiceDependencies, fine_strategies: FineStrategies) -> Self {
        Self {
            deps,
            fine_strategies,
            book_ids: IdSequence::new(),
            member_ids: IdSequence::new(),
            default_max_books_allowed: DEFAULT_MAX_BOOKS_ALLOWED,
            write_lock: Mutex::new(()),
        }
    }

    /// 上限を指定せずに登録された会員の貸出上限を変更する
    pub fn with_default_max_books(mut self, max_books_allowed: usize) -> Self {
        self.default_max_books_allowed = max_books_allowed;
        self
    }

    pub fn dependencies(&self) -> &ServiceDependencies {
        &self.deps
    }

    // ========================================================================
    // カタログ
    // ========================================================================

    /// 書籍を追加する
    ///
    /// "book-added" を発行してから保存する。
    pub async fn add_book(&self, title: &str, author: &str) -> Result<Book> {
        let _guard = self.write_lock.lock().await;

        let book = Book::new(BookId::new(self.book_ids.next_value()), title, author);

        self.deps
            .event_publisher
            .publish(LibraryEvent::BookAdded(BookAdded {
                new_book: book.clone(),
            }));

        let book = self
            .deps
            .book_repository
            .add(book)
            .await
            .map_err(LibraryApplicationError::BookRepositoryError)?;

        tracing::info!(book_id = %book.id(), title = book.title(), "book added");
        Ok(book)
    }

    /// 書籍を削除する
    ///
    /// 貸出中の書籍は削除できない。存在しないIDは何もしない。
    pub async fn remove_book(&self, id: BookId) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        if let Some(book) = self.find_book(id).await? {
            if !book.is_available() {
                tracing::warn!(book_id = %id, "refusing to remove a book that is on loan");
                return Err(LibraryApplicationError::BookOnLoan(id));
            }
        }

        self.deps
            .book_repository
            .delete(id)
            .await
            .map_err(LibraryApplicationError::BookRepositoryError)?;

        tracing::info!(book_id = %id, "book removed");
        Ok(())
    }

    pub async fn find_book(&self, id: BookId) -> Result<Option<Book>> {
        self.deps
            .book_repository
            .find_by_id(id)
            .await
            .map_err(LibraryApplicationError::BookRepositoryError)
    }

    /// 貸出可能な書籍をリポジトリの順序で返す
    pub async fn list_available_books(&self) -> Result<Vec<Book>> {
        let books = self
            .deps
            .book_repository
            .list()
            .await
            .map_err(LibraryApplicationError::BookRepositoryError)?;

        Ok(books.into_iter().filter(Book::is_available).collect())
    }

    // ========================================================================
    // 会員
    // ========================================================================

    /// 会員を登録する
    ///
    /// 種別の既定は Regular、上限の既定はサービスの既定値（通常4冊）。
    pub async fn register_member(
        &self,
        name: &str,
        member_type: Option<MemberType>,
        max_books_allowed: Option<usize>,
    ) -> Result<Member> {
        let _guard = self.write_lock.lock().await;

        let member = Member::new(
            MemberId::new(self.member_ids.next_value()),
            name,
            member_type.unwrap_or_default(),
            max_books_allowed.unwrap_or(self.default_max_books_allowed),
        );

        let member = self
            .deps
            .member_repository
            .add(member)
            .await
            .map_err(LibraryApplicationError::MemberRepositoryError)?;

        tracing::info!(
            member_id = %member.id(),
            member_type = member.member_type().as_str(),
            max_books_allowed = member.max_books_allowed(),
            "member registered"
        );
        Ok(member)
    }

    /// 会員の登録を解除する
    ///
    /// 貸出中の書籍がある会員は解除できない。存在しないIDは何もしない。
    pub async fn unregister_member(&self, id: MemberId) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        if let Some(member) = self.find_member(id).await? {
            if member.has_loans() {
                tracing::warn!(member_id = %id, "refusing to unregister a member with loans");
                return Err(LibraryApplicationError::MemberHasLoans(id));
            }
        }

        self.deps
            .member_repository
            .delete(id)
            .await
            .map_err(LibraryApplicationError::MemberRepositoryError)?;

        tracing::info!(member_id = %id, "member unregistered");
        Ok(())
    }

    /// 会員の貸出上限を変更する
    pub async fn set_member_limit(&self, id: MemberId, max_books_allowed: usize) -> Result<Member> {
        let _guard = self.write_lock.lock().await;

        let mut member = self.load_member(id).await?;
        member
            .set_max_books_allowed(max_books_allowed)
            .map_err(|e| LibraryApplicationError::from_limit(e, max_books_allowed))?;

        let member = self
            .deps
            .member_repository
            .add(member)
            .await
            .map_err(LibraryApplicationError::MemberRepositoryError)?;

        tracing::info!(member_id = %id, max_books_allowed, "member limit updated");
        Ok(member)
    }

    pub async fn find_member(&self, id: MemberId) -> Result<Option<Member>> {
        self.deps
            .member_repository
            .find_by_id(id)
            .await
            .map_err(LibraryApplicationError::MemberRepositoryError)
    }

    /// 全会員をリポジトリの順序で返す
    pub async fn list_members(&self) -> Result<Vec<Member>> {
        self.deps
            .member_repository
            .list()
            .await
            .map_err(LibraryApplicationError::MemberRepositoryError)
    }

    // ========================================================================
    // 貸出・返却
    // ========================================================================

    /// 書籍を貸し出す
    ///
    /// ビジネスルール（この順で検証する）：
    /// - 会員が存在すること
    /// - 会員が同じ書籍を既に借りていないこと
    /// - 書籍がカタログに存在すること
    /// - 書籍が貸出可能であること
    /// - 会員の貸出冊数が上限未満であること（エンティティで検証）
    ///
    /// すべての検証を通過した場合のみ状態を変更する。
    pub async fn borrow_book(&self, member_id: MemberId, book_id: BookId) -> Result<Book> {
        let _guard = self.write_lock.lock().await;

        let mut member = self.load_member(member_id).await?;

        if member.loan_for(book_id).is_some() {
            tracing::warn!(%member_id, %book_id, "member already holds this book");
            return Err(LibraryApplicationError::AlreadyBorrowed(book_id));
        }

        let mut book = self
            .find_book(book_id)
            .await?
            .ok_or(LibraryApplicationError::BookNotAvailable(book_id))?;

        if !book.is_available() {
            tracing::warn!(%member_id, %book_id, "book is already on loan");
            return Err(LibraryApplicationError::AlreadyBorrowed(book_id));
        }

        let before = book.clone();
        member
            .borrow(&mut book, self.deps.clock.now())
            .map_err(|e| LibraryApplicationError::from_borrow(e, member_id, book_id))?;

        self.persist(&book, &before, member).await?;

        tracing::info!(%member_id, %book_id, "book borrowed");
        Ok(book)
    }

    /// 書籍を返却する
    ///
    /// ビジネスルール（この順で検証する）：
    /// - 会員が存在すること
    /// - 書籍がカタログに存在すること
    /// - 書籍が貸出中であること
    /// - その会員が借りている書籍であること
    ///
    /// 返却が成功した後に "book-returned" を発行する。
    pub async fn return_book(&self, member_id: MemberId, book_id: BookId) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        let mut member = self.load_member(member_id).await?;

        let mut book = self
            .find_book(book_id)
            .await?
            .ok_or(LibraryApplicationError::BookNotAvailable(book_id))?;

        if book.is_available() {
            tracing::warn!(%member_id, %book_id, "book is not on loan");
            return Err(LibraryApplicationError::AlreadyReturned(book_id));
        }

        // 他の会員の貸出を書籍側だけ戻してしまうと貸出記録と不整合になる
        if member.loan_for(book_id).is_none() {
            tracing::warn!(%member_id, %book_id, "book is on loan to another member");
            return Err(LibraryApplicationError::AlreadyReturned(book_id));
        }

        let before = book.clone();
        member
            .return_book(&mut book)
            .map_err(|e| LibraryApplicationError::from_return(e, book_id))?;

        self.persist(&book, &before, member).await?;

        self.deps
            .event_publisher
            .publish(LibraryEvent::BookReturned(BookReturned { member_id, book_id }));

        tracing::info!(%member_id, %book_id, "book returned");
        Ok(())
    }

    // ========================================================================
    // 延滞料金
    // ========================================================================

    /// 延滞料金を計算する
    ///
    /// 貸出日時から現在までの経過日数を、会員種別に対応する戦略で料金に変換する。
    /// 状態は変更しない。
    pub async fn calculate_fine(&self, member_id: MemberId, book_id: BookId) -> Result<u64> {
        let member = self.load_member(member_id).await?;

        let loan = member
            .loan_for(book_id)
            .ok_or(LibraryApplicationError::AlreadyReturned(book_id))?;

        self.fine_for_loan(&member, loan)
    }

    /// 1件の貸出に対する現時点の延滞料金
    pub(super) fn fine_for_loan(&self, member: &Member, loan: &Loan) -> Result<u64> {
        let days_late = days_late(loan.borrowed_at, self.deps.clock.now());

        let calculator = self
            .fine_strategies
            .calculator_for(member.member_type())
            .ok_or(LibraryApplicationError::MissingFineStrategy(
                member.member_type(),
            ))?;

        let fine = calculator.calculate_fine(days_late);
        tracing::debug!(
            member_id = %member.id(),
            book_id = %loan.book_id,
            member_type = member.member_type().as_str(),
            days_late,
            fine,
            "fine calculated"
        );
        Ok(fine)
    }

    // ========================================================================
    // ヘルパー
    // ========================================================================

    async fn load_member(&self, id: MemberId) -> Result<Member> {
        self.find_member(id)
            .await?
            .ok_or(LibraryApplicationError::MemberNotFound(id))
    }

    /// 状態遷移後の書籍と会員を書き戻す
    ///
    /// 会員の書き込みに失敗した場合は書籍を遷移前の状態に戻してからエラーを返す。
    async fn persist(&self, book: &Book, before: &Book, member: Member) -> Result<()> {
        self.deps
            .book_repository
            .add(book.clone())
            .await
            .map_err(LibraryApplicationError::BookRepositoryError)?;

        if let Err(err) = self.deps.member_repository.add(member).await {
            if let Err(restore_err) = self.deps.book_repository.add(before.clone()).await {
                tracing::error!(
                    book_id = %before.id(),
                    error = %restore_err,
                    "failed to restore book after member write failure"
                );
            }
            return Err(LibraryApplicationError::MemberRepositoryError(err));
        }

        Ok(())
    }
}
