use chrono::{DateTime, Utc};

/// 現在時刻ポート
///
/// 貸出日時と延滞日数の計算に使う。テストでは固定時刻を注入する。
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
