use crate::domain::{Book, BookId};
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 書籍リポジトリポート
///
/// カタログの保存先を抽象化する。実装はインメモリでも永続ストアでもよい。
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// 書籍を保存する
    ///
    /// 同じIDが既に存在する場合は元の位置のまま置き換える（upsert）。
    async fn add(&self, book: Book) -> Result<Book>;

    /// IDで書籍を削除する。存在しない場合は何もしない。
    async fn delete(&self, id: BookId) -> Result<()>;

    async fn find_by_id(&self, id: BookId) -> Result<Option<Book>>;

    /// 全書籍を保存順に返す
    async fn list(&self) -> Result<Vec<Book>>;
}
