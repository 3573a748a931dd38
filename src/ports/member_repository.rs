use crate::domain::{Member, MemberId};
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 会員リポジトリポート
#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// 会員を保存する
    ///
    /// 同じIDが既に存在する場合は元の位置のまま置き換える（upsert）。
    async fn add(&self, member: Member) -> Result<Member>;

    /// IDで会員を削除する。存在しない場合は何もしない。
    async fn delete(&self, id: MemberId) -> Result<()>;

    async fn find_by_id(&self, id: MemberId) -> Result<Option<Member>>;

    /// 全会員を登録順に返す
    async fn list(&self) -> Result<Vec<Member>>;
}
