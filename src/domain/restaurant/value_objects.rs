//! Restaurant Context - Value Objects

use serde::{Deserialize, Serialize};

use super::RestaurantError;

/// 名称（餐厅、桌台标签、菜品、选项共用）
///
/// 不变量:
/// - 去除首尾空白后非空
/// - 长度不超过 `EntityName::MAX_LEN` 个字符
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityName(String);

impl EntityName {
    pub const MAX_LEN: usize = 120;

    pub fn new(name: impl Into<String>) -> Result<Self, RestaurantError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(RestaurantError::EmptyName);
        }
        if trimmed.chars().count() > Self::MAX_LEN {
            return Err(RestaurantError::NameTooLong { max: Self::MAX_LEN });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for EntityName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 金额（最小货币单位，如“分”）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// 创建非负金额
    pub fn new(minor_units: i64) -> Result<Self, RestaurantError> {
        if minor_units < 0 {
            return Err(RestaurantError::NegativePrice(minor_units));
        }
        Ok(Self(minor_units))
    }

    pub fn minor_units(&self) -> i64 {
        self.0
    }

    /// 叠加差价（可为负），结果不低于 0
    pub fn apply_delta(self, delta: i64) -> Self {
        Self(self.0.saturating_add(delta).max(0))
    }

    pub fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(i64::from(quantity)))
    }
}

impl std::ops::Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, m| acc + m)
    }
}

/// 座位数（桌台容量与订座人数共用）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SeatCount(u32);

impl SeatCount {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 50;

    pub fn new(value: i64) -> Result<Self, RestaurantError> {
        if value < i64::from(Self::MIN) || value > i64::from(Self::MAX) {
            return Err(RestaurantError::SeatCountOutOfRange {
                value,
                min: Self::MIN,
                max: Self::MAX,
            });
        }
        Ok(Self(value as u32))
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

/// 桌台实时房间名：`restaurant:{id}:table:{id}`
pub fn table_room_name(restaurant_id: impl std::fmt::Display, table_id: impl std::fmt::Display) -> String {
    format!("restaurant:{}:table:{}", restaurant_id, table_id)
}
