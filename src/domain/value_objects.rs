use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// 書籍ID - カタログ内で一意
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BookId(u64);

impl BookId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 会員ID - 会員名簿内で一意
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MemberId(u64);

impl MemberId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 会員種別
///
/// 延滞料金の計算方式は会員種別ごとに決まる。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MemberType {
    #[default]
    Regular,
    Premium,
}

impl MemberType {
    /// すべての会員種別（料金戦略テーブルの検証に使用）
    pub const ALL: [MemberType; 2] = [MemberType::Regular, MemberType::Premium];

    pub fn as_str(&self) -> &'static str {
        match self {
            MemberType::Regular => "Regular",
            MemberType::Premium => "Premium",
        }
    }
}

impl std::str::FromStr for MemberType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Regular" | "regular" => Ok(MemberType::Regular),
            "Premium" | "premium" => Ok(MemberType::Premium),
            _ => Err(format!("Invalid member type: {}", s)),
        }
    }
}

/// 採番器
///
/// サービスインスタンスごとに所有する単調増加のシーケンス。
/// 書籍と会員はそれぞれ別のシーケンスを持つ。
#[derive(Debug, Default)]
pub struct IdSequence {
    next: AtomicU64,
}

impl IdSequence {
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    pub fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }

    /// 次の値を払い出す
    pub fn next_value(&self) -> u64 {
        self.next.fetch_add(1, Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_sequence_is_monotonic() {
        let seq = IdSequence::new();
        assert_eq!(seq.next_value(), 0);
        assert_eq!(seq.next_value(), 1);
        assert_eq!(seq.next_value(), 2);
    }

    #[test]
    fn test_id_sequences_are_independent() {
        let books = IdSequence::new();
        let members = IdSequence::new();
        books.next_value();
        books.next_value();
        // 別インスタンスは互いに干渉しない
        assert_eq!(members.next_value(), 0);
        assert_eq!(books.next_value(), 2);
    }

    #[test]
    fn test_member_type_default_is_regular() {
        assert_eq!(MemberType::default(), MemberType::Regular);
    }

    #[test]
    fn test_member_type_from_str() {
        assert_eq!("Premium".parse::<MemberType>(), Ok(MemberType::Premium));
        assert_eq!("regular".parse::<MemberType>(), Ok(MemberType::Regular));
        assert!("Gold".parse::<MemberType>().is_err());
    }

    #[test]
    fn test_id_display() {
        assert_eq!(BookId::new(7).to_string(), "7");
        assert_eq!(MemberId::new(3).value(), 3);
    }
}
