//! SQLite Reservation Repository

use async_trait::async_trait;
use chrono::{DateTime, Days, NaiveTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use super::{format_ts, map_db_err, parse_ts, parse_uuid, to_u32, DbPool};
use crate::application::ports::{
    RepositoryError, ReservationFilter, ReservationRecord, ReservationRepositoryPort,
};
use crate::domain::reservation::ReservationStatus;

/// SQLite Reservation Repository
pub struct SqliteReservationRepository {
    pool: DbPool,
}

impl SqliteReservationRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct ReservationRow {
    id: String,
    restaurant_id: String,
    table_id: Option<String>,
    customer_name: String,
    customer_phone: String,
    party_size: i64,
    reserved_at: String,
    status: String,
    note: Option<String>,
    created_at: String,
    updated_at: String,
}

impl TryFrom<ReservationRow> for ReservationRecord {
    type Error = RepositoryError;

    fn try_from(row: ReservationRow) -> Result<Self, Self::Error> {
        Ok(ReservationRecord {
            id: parse_uuid(&row.id)?,
            restaurant_id: parse_uuid(&row.restaurant_id)?,
            table_id: row.table_id.as_deref().map(parse_uuid).transpose()?,
            customer_name: row.customer_name,
            customer_phone: row.customer_phone,
            party_size: to_u32(row.party_size, "party_size")?,
            reserved_at: parse_ts(&row.reserved_at)?,
            status: ReservationStatus::from_str(&row.status).ok_or_else(|| {
                RepositoryError::SerializationError(format!("unknown reservation status: {}", row.status))
            })?,
            note: row.note,
            created_at: parse_ts(&row.created_at)?,
            updated_at: parse_ts(&row.updated_at)?,
        })
    }
}

const SELECT_RESERVATION: &str = r#"
    SELECT id, restaurant_id, table_id, customer_name, customer_phone, party_size,
           reserved_at, status, note, created_at, updated_at
    FROM reservations
"#;

#[async_trait]
impl ReservationRepositoryPort for SqliteReservationRepository {
    async fn save(&self, reservation: &ReservationRecord) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO reservations (
                id, restaurant_id, table_id, customer_name, customer_phone, party_size,
                reserved_at, status, note, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                table_id = excluded.table_id,
                customer_name = excluded.customer_name,
                customer_phone = excluded.customer_phone,
                party_size = excluded.party_size,
                reserved_at = excluded.reserved_at,
                status = excluded.status,
                note = excluded.note,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(reservation.id.to_string())
        .bind(reservation.restaurant_id.to_string())
        .bind(reservation.table_id.map(|id| id.to_string()))
        .bind(&reservation.customer_name)
        .bind(&reservation.customer_phone)
        .bind(i64::from(reservation.party_size))
        .bind(format_ts(&reservation.reserved_at))
        .bind(reservation.status.as_str())
        .bind(&reservation.note)
        .bind(format_ts(&reservation.created_at))
        .bind(format_ts(&reservation.updated_at))
        .execute(&self.pool)
        .await
        .map_err(map_db_err)?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ReservationRecord>, RepositoryError> {
        let row: Option<ReservationRow> = sqlx::query_as(&format!("{} WHERE id = ?", SELECT_RESERVATION))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_err)?;

        row.map(ReservationRecord::try_from).transpose()
    }

    async fn find_by_restaurant(
        &self,
        restaurant_id: Uuid,
        filter: &ReservationFilter,
    ) -> Result<Vec<ReservationRecord>, RepositoryError> {
        let status = filter.status.map(|s| s.as_str());
        let (day_start, day_end) = match filter.day {
            Some(day) => {
                let start: DateTime<Utc> = day.and_time(NaiveTime::MIN).and_utc();
                let end = start
                    .checked_add_days(Days::new(1))
                    .ok_or_else(|| RepositoryError::SerializationError(format!("day out of range: {}", day)))?;
                (Some(format_ts(&start)), Some(format_ts(&end)))
            }
            None => (None, None),
        };

        let sql = format!(
            r#"{}
            WHERE restaurant_id = ?
              AND (? IS NULL OR status = ?)
              AND (? IS NULL OR (reserved_at >= ? AND reserved_at < ?))
            ORDER BY reserved_at ASC
            "#,
            SELECT_RESERVATION
        );
        let rows: Vec<ReservationRow> = sqlx::query_as(&sql)
            .bind(restaurant_id.to_string())
            .bind(status)
            .bind(status)
            .bind(&day_start)
            .bind(&day_start)
            .bind(&day_end)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_err)?;

        rows.into_iter().map(ReservationRecord::try_from).collect()
    }

    async fn update_status(
        &self,
        id: Uuid,
        from: ReservationStatus,
        to: ReservationStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE reservations SET status = ?, updated_at = ? WHERE id = ? AND status = ?",
        )
        .bind(to.as_str())
        .bind(format_ts(&updated_at))
        .bind(id.to_string())
        .bind(from.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_db_err)?;

        if result.rows_affected() > 0 {
            return Ok(());
        }

        let current: Option<String> = sqlx::query_scalar("SELECT status FROM reservations WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_err)?;

        match current {
            None => Err(RepositoryError::NotFound(format!("reservation {}", id))),
            Some(current) => Err(RepositoryError::StaleState(format!(
                "reservation {} is {}, expected {}",
                id,
                current,
                from.as_str()
            ))),
        }
    }
}
