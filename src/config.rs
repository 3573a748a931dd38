use crate::domain::{
    DEFAULT_MAX_BOOKS_ALLOWED, FineStrategies, FlatRateFineCalculator, PremiumFineCalculator,
};
use std::str::FromStr;
use thiserror::Error;

/// 設定読み込みのエラー
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

/// ライブラリの設定
///
/// 料金戦略の日額・猶予日数と、会員の既定の貸出上限。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryConfig {
    pub regular_fine_per_day: u64,
    pub regular_grace_days: u32,
    pub premium_fine_per_day: u64,
    pub premium_grace_days: u32,
    pub default_max_books: usize,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            regular_fine_per_day: 10,
            regular_grace_days: 14,
            premium_fine_per_day: 5,
            premium_grace_days: 20,
            default_max_books: DEFAULT_MAX_BOOKS_ALLOWED,
        }
    }
}

impl LibraryConfig {
    /// 環境変数から読み込む。未設定の項目は既定値を使う。
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 任意のキー参照関数から読み込む
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            regular_fine_per_day: read(
                &lookup,
                "LIBRARY_REGULAR_FINE_PER_DAY",
                defaults.regular_fine_per_day,
            )?,
            regular_grace_days: read(
                &lookup,
                "LIBRARY_REGULAR_GRACE_DAYS",
                defaults.regular_grace_days,
            )?,
            premium_fine_per_day: read(
                &lookup,
                "LIBRARY_PREMIUM_FINE_PER_DAY",
                defaults.premium_fine_per_day,
            )?,
            premium_grace_days: read(
                &lookup,
                "LIBRARY_PREMIUM_GRACE_DAYS",
                defaults.premium_grace_days,
            )?,
            default_max_books: read(
                &lookup,
                "LIBRARY_DEFAULT_MAX_BOOKS",
                defaults.default_max_books,
            )?,
        })
    }

    /// 会員種別ごとの料金戦略テーブル
    pub fn fine_strategies(&self) -> FineStrategies {
        FineStrategies::standard(
            FlatRateFineCalculator::new(self.regular_fine_per_day, self.regular_grace_days),
            PremiumFineCalculator::new(self.premium_fine_per_day, self.premium_grace_days),
        )
    }
}

fn read<T, F>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value }),
    }
}
