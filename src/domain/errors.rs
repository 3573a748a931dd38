/// 貸出のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BorrowBookError {
    /// 既に貸出中
    AlreadyBorrowed,
    /// 貸出上限に達している
    LimitExceeded,
}

/// 返却のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnBookError {
    /// 既に返却済み
    AlreadyReturned,
}

/// 貸出上限変更のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberLimitError {
    /// 現在の貸出冊数を下回る上限は設定できない
    BelowActiveLoans { active: usize },
}
