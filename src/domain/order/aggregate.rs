//! Order Context - 状态机与计价

use serde::{Deserialize, Serialize};

use super::OrderError;
use crate::domain::restaurant::Money;

/// 订单状态
///
/// 合法流转:
/// - new -> preparing | cancelled
/// - preparing -> served | cancelled
/// - served -> paid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    New,
    Preparing,
    Served,
    Paid,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::New => "new",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Served => "served",
            OrderStatus::Paid => "paid",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "new" => Some(OrderStatus::New),
            "preparing" => Some(OrderStatus::Preparing),
            "served" => Some(OrderStatus::Served),
            "paid" => Some(OrderStatus::Paid),
            "cancelled" => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }

    pub fn parse(s: &str) -> Result<Self, OrderError> {
        Self::from_str(s).ok_or_else(|| OrderError::UnknownStatus(s.to_string()))
    }

    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (OrderStatus::New, OrderStatus::Preparing)
                | (OrderStatus::New, OrderStatus::Cancelled)
                | (OrderStatus::Preparing, OrderStatus::Served)
                | (OrderStatus::Preparing, OrderStatus::Cancelled)
                | (OrderStatus::Served, OrderStatus::Paid)
        )
    }

    /// 校验并返回目标状态
    pub fn transition(self, next: OrderStatus) -> Result<OrderStatus, OrderError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(OrderError::IllegalTransition {
                from: self.as_str(),
                to: next.as_str(),
            })
        }
    }
}

/// 单个菜品的点单数量
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quantity(u32);

impl Quantity {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 99;

    pub fn new(value: i64) -> Result<Self, OrderError> {
        if value < i64::from(Self::MIN) || value > i64::from(Self::MAX) {
            return Err(OrderError::QuantityOutOfRange {
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

/// 计价后的订单行
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricedLine {
    pub unit_price: Money,
    pub line_total: Money,
}

/// 计算订单行价格
///
/// 单价 = 基础价 + 所有选项差价（不低于 0），行合计 = 数量 × 单价
pub fn price_line(base_price: Money, option_deltas: &[i64], quantity: Quantity) -> PricedLine {
    let delta: i64 = option_deltas.iter().fold(0i64, |acc, d| acc.saturating_add(*d));
    let unit_price = base_price.apply_delta(delta);
    PricedLine {
        unit_price,
        line_total: unit_price.times(quantity.get()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_roundtrip_strings() {
        for status in [
            OrderStatus::New,
            OrderStatus::Preparing,
            OrderStatus::Served,
            OrderStatus::Paid,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(OrderStatus::from_str(status.as_str()), Some(status));
        }
        assert!(OrderStatus::parse("eaten").is_err());
    }

    #[test]
    fn test_legal_transitions() {
        assert_eq!(
            OrderStatus::New.transition(OrderStatus::Preparing),
            Ok(OrderStatus::Preparing)
        );
        assert!(OrderStatus::Preparing.can_transition_to(OrderStatus::Served));
        assert!(OrderStatus::Served.can_transition_to(OrderStatus::Paid));
        assert!(OrderStatus::New.can_transition_to(OrderStatus::Cancelled));
    }

    #[test]
    fn test_illegal_transitions() {
        assert!(OrderStatus::New.transition(OrderStatus::Paid).is_err());
        assert!(OrderStatus::Paid.transition(OrderStatus::Cancelled).is_err());
        assert!(OrderStatus::Served.transition(OrderStatus::Cancelled).is_err());
        assert!(OrderStatus::Cancelled.transition(OrderStatus::New).is_err());
    }

    #[test]
    fn test_quantity_bounds() {
        assert!(Quantity::new(0).is_err());
        assert!(Quantity::new(100).is_err());
        assert_eq!(Quantity::new(3).unwrap().get(), 3);
    }

    #[test]
    fn test_price_line_with_options() {
        let base = Money::new(800).unwrap();
        let line = price_line(base, &[150, 50], Quantity::new(2).unwrap());
        assert_eq!(line.unit_price.minor_units(), 1000);
        assert_eq!(line.line_total.minor_units(), 2000);
    }

    #[test]
    fn test_price_line_negative_delta_floors() {
        let base = Money::new(200).unwrap();
        let line = price_line(base, &[-500], Quantity::new(4).unwrap());
        assert_eq!(line.unit_price, Money::ZERO);
        assert_eq!(line.line_total, Money::ZERO);
    }
}
