// Daily limit business logic
// Effective-limit resolution, UTC day-bucketed aggregation, and the
// append-only limit history.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    db::DieselPool,
    models::daily_limit::{
        DailyLimit, LimitHistoryEntry, LimitHistoryResponse, NewDailyLimit, SetLimitRequest,
    },
    utils::service_error::ServiceError,
};

// =============================================================================
// TYPES
// =============================================================================

/// Aggregated consumption for one UTC day
#[derive(Debug, Clone, PartialEq)]
pub struct DailyTotals {
    pub daily_total_mg: f64,
    pub daily_limit_mg: Option<f64>,
    pub over_limit: bool,
    pub remaining_mg: Option<f64>,
}

impl DailyTotals {
    /// Derive the over-limit flag and remaining headroom from a day's total
    /// and the limit in effect. No configured limit means never over limit
    /// and no meaningful remainder.
    pub fn from_parts(daily_total_mg: f64, daily_limit_mg: Option<f64>) -> Self {
        let over_limit = match daily_limit_mg {
            Some(limit) => daily_total_mg > limit,
            None => false,
        };
        let remaining_mg = daily_limit_mg.map(|limit| limit - daily_total_mg);

        Self {
            daily_total_mg,
            daily_limit_mg,
            over_limit,
            remaining_mg,
        }
    }
}

// =============================================================================
// DAY BOUNDARIES
// =============================================================================

/// UTC day bounds for a calendar date: 00:00:00.000 through 23:59:59.999,
/// both inclusive. All day-bucketing in the service goes through here so the
/// server's local zone can never leak into the math.
pub fn day_bounds_utc(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = date
        .and_hms_opt(0, 0, 0)
        .expect("midnight is a valid wall-clock time")
        .and_utc();
    let end = date
        .and_hms_milli_opt(23, 59, 59, 999)
        .expect("23:59:59.999 is a valid wall-clock time")
        .and_utc();
    (start, end)
}

/// Pick the limit in effect at `cutoff` from an in-memory history slice:
/// the record with the greatest `effective_from` that is not after the
/// cutoff. Equal `effective_from` values break toward the later-written row.
pub fn resolve_effective(history: &[DailyLimit], cutoff: DateTime<Utc>) -> Option<f64> {
    history
        .iter()
        .filter(|record| record.effective_from <= cutoff)
        .max_by_key(|record| (record.effective_from, record.created_at))
        .map(|record| record.limit_mg)
}

// =============================================================================
// LIMIT SERVICE
// =============================================================================

pub struct LimitService {
    pool: DieselPool,
}

impl LimitService {
    pub fn new(pool: DieselPool) -> Self {
        Self { pool }
    }

    /// The daily limit in effect for `user` on `date`, or None when the user
    /// has never set a limit (or every limit record postdates the date).
    /// Store failures propagate; they are never folded into None.
    #[instrument(skip(self))]
    pub async fn effective_limit(
        &self,
        user: Uuid,
        date: NaiveDate,
    ) -> Result<Option<f64>, ServiceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| ServiceError::DatabaseError(e.to_string()))?;
        Self::effective_limit_on(&mut conn, user, date).await
    }

    /// Connection-scoped variant, usable inside transactions
    pub async fn effective_limit_on(
        conn: &mut AsyncPgConnection,
        user: Uuid,
        date: NaiveDate,
    ) -> Result<Option<f64>, ServiceError> {
        use crate::schema::daily_limits::dsl::*;

        let (start_of_day, _) = day_bounds_utc(date);

        let effective = daily_limits
            .filter(user_id.eq(user))
            .filter(effective_from.le(start_of_day))
            .order((effective_from.desc(), created_at.desc()))
            .select(limit_mg)
            .first::<f64>(conn)
            .await
            .optional()?;

        Ok(effective)
    }

    /// Total consumption for `user` on `date` against the effective limit
    #[instrument(skip(self))]
    pub async fn daily_totals(
        &self,
        user: Uuid,
        date: NaiveDate,
    ) -> Result<DailyTotals, ServiceError> {
        use crate::schema::caffeine_entries::dsl::*;

        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| ServiceError::DatabaseError(e.to_string()))?;
        let (start_of_day, end_of_day) = day_bounds_utc(date);

        let total: Option<f64> = caffeine_entries
            .filter(user_id.eq(user))
            .filter(consumed_at.between(start_of_day, end_of_day))
            .select(diesel::dsl::sum(caffeine_mg))
            .first(&mut conn)
            .await?;

        let limit = Self::effective_limit_on(&mut conn, user, date).await?;

        Ok(DailyTotals::from_parts(total.unwrap_or(0.0), limit))
    }

    /// Append a new limit record effective now. The history is never updated
    /// in place.
    #[instrument(skip(self, request))]
    pub async fn set_limit(
        &self,
        user: Uuid,
        request: SetLimitRequest,
    ) -> Result<DailyLimit, ServiceError> {
        use crate::schema::daily_limits::dsl::*;
        use validator::Validate;

        request.validate()?;

        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| ServiceError::DatabaseError(e.to_string()))?;

        let record = diesel::insert_into(daily_limits)
            .values(NewDailyLimit {
                user_id: user,
                limit_mg: request.limit_mg,
                effective_from: Utc::now(),
            })
            .get_result::<DailyLimit>(&mut conn)
            .await?;

        info!(
            "User {} set daily limit to {} mg effective {}",
            user, record.limit_mg, record.effective_from
        );

        Ok(record)
    }

    /// Full limit-change history plus the limit currently in effect
    #[instrument(skip(self))]
    pub async fn limit_history(
        &self,
        user: Uuid,
        today: NaiveDate,
    ) -> Result<LimitHistoryResponse, ServiceError> {
        use crate::schema::daily_limits::dsl::*;

        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| ServiceError::DatabaseError(e.to_string()))?;

        let records: Vec<DailyLimit> = daily_limits
            .filter(user_id.eq(user))
            .order((effective_from.desc(), created_at.desc()))
            .load(&mut conn)
            .await?;

        let (start_of_today, _) = day_bounds_utc(today);
        let current_limit_mg = resolve_effective(&records, start_of_today);

        Ok(LimitHistoryResponse {
            current_limit_mg,
            history: records.iter().map(LimitHistoryEntry::from).collect(),
        })
    }

    /// All limit records for a user, oldest first. Used by trend aggregation
    /// to resolve per-day limits without one query per day.
    pub async fn load_history(&self, user: Uuid) -> Result<Vec<DailyLimit>, ServiceError> {
        use crate::schema::daily_limits::dsl::*;

        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| ServiceError::DatabaseError(e.to_string()))?;

        let records = daily_limits
            .filter(user_id.eq(user))
            .order(effective_from.asc())
            .load::<DailyLimit>(&mut conn)
            .await?;

        Ok(records)
    }
}

// =============================================================================
// TESTS
// =============================================================================
