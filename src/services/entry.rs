// Caffeine entry business logic
// Logging, editing, and day-bucketed reads of consumption events

use chrono::{Duration, NaiveDate, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use std::collections::HashMap;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::DieselPool,
    models::caffeine_entry::{
        CaffeineEntry, CreateEntryRequest, DailySummaryResponse, DayTotalResponse,
        NewCaffeineEntry, UpdateCaffeineEntry, UpdateEntryRequest,
    },
    models::drink::Drink,
    services::limits::{day_bounds_utc, resolve_effective, DailyTotals, LimitService},
    utils::service_error::ServiceError,
};

/// Upper bound for the history endpoint; a year of days is plenty for trends
const MAX_HISTORY_DAYS: u32 = 365;

pub struct EntryService {
    pool: DieselPool,
}

impl EntryService {
    pub fn new(pool: DieselPool) -> Self {
        Self { pool }
    }

    /// Log a consumption event. A referenced drink template fills in name and
    /// caffeine amount when the request omits them.
    #[instrument(skip(self, request))]
    pub async fn create_entry(
        &self,
        user: Uuid,
        mut request: CreateEntryRequest,
    ) -> Result<CaffeineEntry, ServiceError> {
        request.sanitize();
        request.validate()?;
        request
            .validate_custom()
            .map_err(ServiceError::ValidationError)?;

        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| ServiceError::DatabaseError(e.to_string()))?;

        // Resolve the drink template when one is referenced
        let template = match request.drink_id {
            Some(drink_ref) => {
                use crate::schema::drinks::dsl::*;
                let drink = drinks
                    .filter(id.eq(drink_ref))
                    .filter(user_id.eq(user))
                    .first::<Drink>(&mut conn)
                    .await
                    .optional()?;
                Some(drink.ok_or(ServiceError::NotFound)?)
            },
            None => None,
        };

        let entry_name = request
            .name
            .clone()
            .or_else(|| template.as_ref().map(|d| d.name.clone()))
            .ok_or_else(|| {
                ServiceError::ValidationError("Name is required".to_string())
            })?;
        let entry_mg = request
            .caffeine_mg
            .or_else(|| template.as_ref().map(|d| d.caffeine_mg))
            .ok_or_else(|| {
                ServiceError::ValidationError("Caffeine amount is required".to_string())
            })?;

        let new_entry = NewCaffeineEntry {
            user_id: user,
            drink_id: request.drink_id,
            name: entry_name,
            caffeine_mg: entry_mg,
            consumed_at: request.consumed_at.unwrap_or_else(Utc::now),
        };

        let entry = {
            use crate::schema::caffeine_entries::dsl::*;
            diesel::insert_into(caffeine_entries)
                .values(&new_entry)
                .get_result::<CaffeineEntry>(&mut conn)
                .await?
        };

        info!(
            "User {} logged {} mg ({}) at {}",
            user, entry.caffeine_mg, entry.name, entry.consumed_at
        );

        Ok(entry)
    }

    /// Daily summary: the day's entries plus totals against the effective limit
    #[instrument(skip(self))]
    pub async fn day_summary(
        &self,
        user: Uuid,
        date: NaiveDate,
    ) -> Result<DailySummaryResponse, ServiceError> {
        use crate::schema::caffeine_entries::dsl::*;

        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| ServiceError::DatabaseError(e.to_string()))?;

        let (start_of_day, end_of_day) = day_bounds_utc(date);

        let entries: Vec<CaffeineEntry> = caffeine_entries
            .filter(user_id.eq(user))
            .filter(consumed_at.between(start_of_day, end_of_day))
            .order(consumed_at.asc())
            .load(&mut conn)
            .await?;

        let total: f64 = entries.iter().map(|e| e.caffeine_mg).sum();
        let limit = LimitService::effective_limit_on(&mut conn, user, date).await?;
        let totals = DailyTotals::from_parts(total, limit);

        Ok(DailySummaryResponse {
            entries,
            daily_total_mg: totals.daily_total_mg,
            daily_limit_mg: totals.daily_limit_mg,
            over_limit: totals.over_limit,
            remaining_mg: totals.remaining_mg,
        })
    }

    /// Per-day totals for the trailing `days` UTC days ending today
    #[instrument(skip(self, limits))]
    pub async fn history(
        &self,
        limits: &LimitService,
        user: Uuid,
        days: u32,
        today: NaiveDate,
    ) -> Result<Vec<DayTotalResponse>, ServiceError> {
        use crate::schema::caffeine_entries::dsl::*;

        let days = days.clamp(1, MAX_HISTORY_DAYS);

        let first_day = today - Duration::days(i64::from(days) - 1);
        let (range_start, _) = day_bounds_utc(first_day);
        let (_, range_end) = day_bounds_utc(today);

        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| ServiceError::DatabaseError(e.to_string()))?;

        let entries: Vec<CaffeineEntry> = caffeine_entries
            .filter(user_id.eq(user))
            .filter(consumed_at.between(range_start, range_end))
            .load(&mut conn)
            .await?;

        drop(conn);

        // One limit-history read covers every day in the range
        let limit_history = limits.load_history(user).await?;

        let mut per_day: HashMap<NaiveDate, f64> = HashMap::new();
        for entry in &entries {
            *per_day.entry(entry.consumed_at.date_naive()).or_insert(0.0) += entry.caffeine_mg;
        }

        let mut results = Vec::with_capacity(days as usize);
        for offset in 0..days {
            let date = first_day + Duration::days(i64::from(offset));
            let total_mg = per_day.get(&date).copied().unwrap_or(0.0);
            let (start_of_day, _) = day_bounds_utc(date);
            let limit_mg = resolve_effective(&limit_history, start_of_day);
            let totals = DailyTotals::from_parts(total_mg, limit_mg);

            results.push(DayTotalResponse {
                date,
                total_mg: totals.daily_total_mg,
                limit_mg: totals.daily_limit_mg,
                over_limit: totals.over_limit,
            });
        }

        Ok(results)
    }

    /// Edit an entry; scoped to the owner
    #[instrument(skip(self, request))]
    pub async fn update_entry(
        &self,
        user: Uuid,
        entry_id: Uuid,
        request: UpdateEntryRequest,
    ) -> Result<CaffeineEntry, ServiceError> {
        use crate::schema::caffeine_entries::dsl::*;

        request.validate()?;

        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| ServiceError::DatabaseError(e.to_string()))?;

        let changes = UpdateCaffeineEntry {
            name: crate::utils::trim_optional_field(request.name.as_ref()),
            caffeine_mg: request.caffeine_mg,
            consumed_at: request.consumed_at,
            updated_at: Utc::now(),
        };

        let entry = diesel::update(
            caffeine_entries
                .filter(id.eq(entry_id))
                .filter(user_id.eq(user)),
        )
        .set(&changes)
        .get_result::<CaffeineEntry>(&mut conn)
        .await
        .map_err(|e| match e {
            diesel::result::Error::NotFound => ServiceError::NotFound,
            _ => e.into(),
        })?;

        Ok(entry)
    }

    /// Delete an entry; scoped to the owner
    #[instrument(skip(self))]
    pub async fn delete_entry(&self, user: Uuid, entry_id: Uuid) -> Result<(), ServiceError> {
        use crate::schema::caffeine_entries::dsl::*;

        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| ServiceError::DatabaseError(e.to_string()))?;

        let deleted = diesel::delete(
            caffeine_entries
                .filter(id.eq(entry_id))
                .filter(user_id.eq(user)),
        )
        .execute(&mut conn)
        .await?;

        if deleted == 0 {
            return Err(ServiceError::NotFound);
        }

        Ok(())
    }
}
