use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::MemberType;

/// 延滞料金の計算戦略
///
/// 延滞日数から料金を求める純粋関数。同じ入力には常に同じ結果を返す。
pub trait FineCalculator: Send + Sync {
    fn calculate_fine(&self, days_late: u32) -> u64;
}

/// 猶予日数を超えた日数 × 日額
fn fine_after_grace(days_late: u32, grace_days: u32, rate_per_day: u64) -> u64 {
    u64::from(days_late.saturating_sub(grace_days)).saturating_mul(rate_per_day)
}

/// 一般会員向けの定額日割り計算
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlatRateFineCalculator {
    rate_per_day: u64,
    grace_days: u32,
}

impl FlatRateFineCalculator {
    pub fn new(rate_per_day: u64, grace_days: u32) -> Self {
        Self {
            rate_per_day,
            grace_days,
        }
    }
}

impl FineCalculator for FlatRateFineCalculator {
    fn calculate_fine(&self, days_late: u32) -> u64 {
        fine_after_grace(days_late, self.grace_days, self.rate_per_day)
    }
}

/// プレミアム会員向けの計算
///
/// 式は定額と同じ。猶予が長く、日額が低い設定で使う。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PremiumFineCalculator {
    rate_per_day: u64,
    grace_days: u32,
}

impl PremiumFineCalculator {
    pub fn new(rate_per_day: u64, grace_days: u32) -> Self {
        Self {
            rate_per_day,
            grace_days,
        }
    }
}

impl FineCalculator for PremiumFineCalculator {
    fn calculate_fine(&self, days_late: u32) -> u64 {
        fine_after_grace(days_late, self.grace_days, self.rate_per_day)
    }
}

/// 料金戦略テーブルの構築エラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FineStrategyError {
    /// 会員種別に対応する戦略が登録されていない
    MissingStrategy(MemberType),
}

/// 会員種別 → 料金戦略 の固定テーブル
///
/// 構築時にすべての会員種別が登録されていることを検証する。
/// 構築後は変更しない。
#[derive(Clone)]
pub struct FineStrategies {
    by_type: HashMap<MemberType, Arc<dyn FineCalculator>>,
}

impl FineStrategies {
    pub fn new(
        by_type: HashMap<MemberType, Arc<dyn FineCalculator>>,
    ) -> Result<Self, FineStrategyError> {
        if let Some(missing) = MemberType::ALL
            .into_iter()
            .find(|member_type| !by_type.contains_key(member_type))
        {
            return Err(FineStrategyError::MissingStrategy(missing));
        }
        Ok(Self { by_type })
    }

    /// 一般会員とプレミアム会員の2種類から構築する
    pub fn standard(
        regular: impl FineCalculator + 'static,
        premium: impl FineCalculator + 'static,
    ) -> Self {
        let mut by_type: HashMap<MemberType, Arc<dyn FineCalculator>> = HashMap::new();
        by_type.insert(MemberType::Regular, Arc::new(regular));
        by_type.insert(MemberType::Premium, Arc::new(premium));
        Self { by_type }
    }

    pub fn calculator_for(&self, member_type: MemberType) -> Option<&dyn FineCalculator> {
        self.by_type.get(&member_type).map(|calc| calc.as_ref())
    }
}

impl fmt::Debug for FineStrategies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FineStrategies")
            .field("member_types", &self.by_type.keys().collect::<Vec<_>>())
            .finish()
    }
}
