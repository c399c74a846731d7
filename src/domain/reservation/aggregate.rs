//! Reservation Context - 状态机与约束

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ReservationError;
use crate::domain::restaurant::SeatCount;

/// 订座状态
///
/// 合法流转:
/// - pending -> confirmed | cancelled
/// - confirmed -> seated | cancelled
/// - seated -> completed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Seated,
    Completed,
    Cancelled,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::Seated => "seated",
            ReservationStatus::Completed => "completed",
            ReservationStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(ReservationStatus::Pending),
            "confirmed" => Some(ReservationStatus::Confirmed),
            "seated" => Some(ReservationStatus::Seated),
            "completed" => Some(ReservationStatus::Completed),
            "cancelled" => Some(ReservationStatus::Cancelled),
            _ => None,
        }
    }

    pub fn parse(s: &str) -> Result<Self, ReservationError> {
        Self::from_str(s).ok_or_else(|| ReservationError::UnknownStatus(s.to_string()))
    }

    pub fn transition(self, next: ReservationStatus) -> Result<ReservationStatus, ReservationError> {
        let allowed = matches!(
            (self, next),
            (ReservationStatus::Pending, ReservationStatus::Confirmed)
                | (ReservationStatus::Pending, ReservationStatus::Cancelled)
                | (ReservationStatus::Confirmed, ReservationStatus::Seated)
                | (ReservationStatus::Confirmed, ReservationStatus::Cancelled)
                | (ReservationStatus::Seated, ReservationStatus::Completed)
        );
        if allowed {
            Ok(next)
        } else {
            Err(ReservationError::IllegalTransition {
                from: self.as_str(),
                to: next.as_str(),
            })
        }
    }
}

/// 桌台容量必须不小于订座人数
pub fn ensure_fits_table(capacity: SeatCount, party_size: SeatCount) -> Result<(), ReservationError> {
    if capacity < party_size {
        return Err(ReservationError::TableTooSmall {
            capacity: capacity.get(),
            party_size: party_size.get(),
        });
    }
    Ok(())
}

pub fn ensure_in_future(reserved_at: DateTime<Utc>, now: DateTime<Utc>) -> Result<(), ReservationError> {
    if reserved_at <= now {
        return Err(ReservationError::InThePast);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_happy_path() {
        let status = ReservationStatus::Pending
            .transition(ReservationStatus::Confirmed)
            .and_then(|s| s.transition(ReservationStatus::Seated))
            .and_then(|s| s.transition(ReservationStatus::Completed));
        assert_eq!(status, Ok(ReservationStatus::Completed));
    }

    #[test]
    fn test_rejects_reopening() {
        assert!(ReservationStatus::Cancelled
            .transition(ReservationStatus::Confirmed)
            .is_err());
        assert!(ReservationStatus::Seated
            .transition(ReservationStatus::Cancelled)
            .is_err());
        assert!(ReservationStatus::Pending
            .transition(ReservationStatus::Completed)
            .is_err());
    }

    #[test]
    fn test_table_capacity() {
        let four = SeatCount::new(4).unwrap();
        let six = SeatCount::new(6).unwrap();
        assert!(ensure_fits_table(six, four).is_ok());
        assert!(ensure_fits_table(four, four).is_ok());
        assert_eq!(
            ensure_fits_table(four, six),
            Err(ReservationError::TableTooSmall {
                capacity: 4,
                party_size: 6
            })
        );
    }

    #[test]
    fn test_future_check() {
        let now = Utc::now();
        assert!(ensure_in_future(now + Duration::hours(2), now).is_ok());
        assert_eq!(ensure_in_future(now, now), Err(ReservationError::InThePast));
    }
}
