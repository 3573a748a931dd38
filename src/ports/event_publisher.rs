use crate::domain::LibraryEvent;

/// イベント通知ポート
///
/// 同期・撃ちっぱなし。購読者の失敗を発行元に返してはならない。
pub trait EventPublisher: Send + Sync {
    fn publish(&self, event: LibraryEvent);
}
