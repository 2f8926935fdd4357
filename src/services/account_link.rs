// Guest account linking
// Transfers everything a guest accumulated to a freshly authenticated
// account, then removes the guest row. All-or-nothing: a partial transfer
// would silently lose or duplicate a user's history.

use diesel::prelude::*;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{db::DieselPool, models::user::User, utils::service_error::ServiceError};

pub struct AccountLinkService {
    pool: DieselPool,
}

impl AccountLinkService {
    pub fn new(pool: DieselPool) -> Self {
        Self { pool }
    }

    /// Reassign every caffeine entry, drink, daily limit, and favorite owned
    /// by `anonymous_user_id` to `target_user_id`, then delete the guest row,
    /// as a single transaction.
    ///
    /// A missing guest id is a no-op, not an error: the guest may never have
    /// persisted anything, or the link may have already run. Foreign keys are
    /// enforced, so linking to a nonexistent target fails the reassignment
    /// and rolls the whole transaction back.
    #[instrument(skip(self))]
    pub async fn link_anonymous_user(
        &self,
        anonymous_user_id: Uuid,
        target_user_id: Uuid,
    ) -> Result<(), ServiceError> {
        if anonymous_user_id == target_user_id {
            return Ok(());
        }

        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| ServiceError::DatabaseError(e.to_string()))?;

        conn.transaction::<_, ServiceError, _>(|tx| {
            Box::pin(async move {
                // Only actual guest rows are linkable; a vanished guest is a no-op
                let guest = {
                    use crate::schema::users::dsl::*;
                    users
                        .filter(id.eq(anonymous_user_id))
                        .filter(is_guest.eq(true))
                        .first::<User>(tx)
                        .await
                        .optional()?
                };

                if guest.is_none() {
                    info!(
                        "Guest {} not found; nothing to link to {}",
                        anonymous_user_id, target_user_id
                    );
                    return Ok(());
                }

                let moved_entries = {
                    use crate::schema::caffeine_entries::dsl::*;
                    diesel::update(caffeine_entries.filter(user_id.eq(anonymous_user_id)))
                        .set(user_id.eq(target_user_id))
                        .execute(tx)
                        .await?
                };

                let moved_drinks = {
                    use crate::schema::drinks::dsl::*;
                    diesel::update(drinks.filter(user_id.eq(anonymous_user_id)))
                        .set(user_id.eq(target_user_id))
                        .execute(tx)
                        .await?
                };

                let moved_limits = {
                    use crate::schema::daily_limits::dsl::*;
                    diesel::update(daily_limits.filter(user_id.eq(anonymous_user_id)))
                        .set(user_id.eq(target_user_id))
                        .execute(tx)
                        .await?
                };

                let moved_favorites =
                    Self::transfer_favorites(tx, anonymous_user_id, target_user_id).await?;

                {
                    use crate::schema::users::dsl::*;
                    diesel::delete(users.filter(id.eq(anonymous_user_id)))
                        .execute(tx)
                        .await?;
                }

                info!(
                    "Linked guest {} into {}: {} entries, {} drinks, {} limits, {} favorites",
                    anonymous_user_id,
                    target_user_id,
                    moved_entries,
                    moved_drinks,
                    moved_limits,
                    moved_favorites
                );

                Ok(())
            })
        })
        .await
    }

    /// Move the guest's favorites, respecting the (user, name, caffeine_mg)
    /// uniqueness: when the target already saved the same favorite, the
    /// target's row wins and the guest duplicate is dropped.
    async fn transfer_favorites(
        tx: &mut diesel_async::AsyncPgConnection,
        anonymous_user_id: Uuid,
        target_user_id: Uuid,
    ) -> Result<usize, ServiceError> {
        use crate::schema::favorites::dsl::*;

        let target_keys: Vec<(String, f64)> = favorites
            .filter(user_id.eq(target_user_id))
            .select((name, caffeine_mg))
            .load(tx)
            .await?;

        let guest_rows: Vec<(Uuid, String, f64)> = favorites
            .filter(user_id.eq(anonymous_user_id))
            .select((id, name, caffeine_mg))
            .load(tx)
            .await?;

        let mut duplicate_ids = Vec::new();
        let mut movable_ids = Vec::new();
        for (fav_id, fav_name, fav_mg) in guest_rows {
            if target_keys
                .iter()
                .any(|(n, mg)| *n == fav_name && *mg == fav_mg)
            {
                duplicate_ids.push(fav_id);
            } else {
                movable_ids.push(fav_id);
            }
        }

        if !duplicate_ids.is_empty() {
            diesel::delete(favorites.filter(id.eq_any(&duplicate_ids)))
                .execute(tx)
                .await?;
        }

        let moved = if movable_ids.is_empty() {
            0
        } else {
            diesel::update(favorites.filter(id.eq_any(&movable_ids)))
                .set(user_id.eq(target_user_id))
                .execute(tx)
                .await?
        };

        Ok(moved)
    }
}
