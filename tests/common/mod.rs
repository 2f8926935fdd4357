// Common test utilities and helper structs
// Shared across all test files to avoid duplication

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use jolt_backend_core::{
    db::{create_diesel_pool, DieselDatabaseConfig, DieselPool},
    models::{
        caffeine_entry::{CaffeineEntry, NewCaffeineEntry},
        daily_limit::{DailyLimit, NewDailyLimit},
        drink::{Drink, NewDrink},
        favorite::{Favorite, NewFavorite},
        user::{NewUser, User},
    },
};
use uuid::Uuid;

/// Set up a database pool for integration tests, or None when no database is
/// configured (tests then skip rather than fail)
pub async fn setup_test_pool() -> Option<DieselPool> {
    dotenv::dotenv().ok();

    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("Skipping test: DATABASE_URL not configured");
        return None;
    }

    // The email config is required by the global config but irrelevant here
    if std::env::var("RESEND_API_KEY").is_err() {
        std::env::set_var("RESEND_API_KEY", "re_test_key");
    }

    let pool = match create_diesel_pool(DieselDatabaseConfig::default()).await {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("Skipping test: Failed to create pool: {}", e);
            return None;
        },
    };

    // Make sure the schema exists
    if let Err(e) = jolt_backend_core::migrations::diesel::run_migrations(&pool).await {
        eprintln!("Skipping test: Migrations failed: {}", e);
        return None;
    }

    Some(pool)
}

/// Unique email per test run to avoid collisions with leftover data
pub fn test_email(prefix: &str) -> String {
    format!("{}+{}@test.jolt.sh", prefix, Uuid::new_v4().simple())
}

/// Create an authenticated user
pub async fn create_user(pool: &DieselPool, email: &str) -> User {
    let mut conn = pool.get().await.expect("Should get connection");
    User::create(&mut conn, NewUser::authenticated(email))
        .await
        .expect("Should create user")
}

/// Create a guest user
pub async fn create_guest(pool: &DieselPool) -> User {
    let mut conn = pool.get().await.expect("Should get connection");
    User::create(&mut conn, NewUser::guest())
        .await
        .expect("Should create guest")
}

/// Fetch a user row if it still exists
pub async fn find_user(pool: &DieselPool, user: Uuid) -> Option<User> {
    use jolt_backend_core::schema::users::dsl::*;

    let mut conn = pool.get().await.expect("Should get connection");
    users
        .filter(id.eq(user))
        .first::<User>(&mut conn)
        .await
        .optional()
        .expect("Should query user")
}

/// Insert a caffeine entry at a specific instant
pub async fn insert_entry(
    pool: &DieselPool,
    user: Uuid,
    name: &str,
    mg: f64,
    consumed_at: DateTime<Utc>,
) -> CaffeineEntry {
    use jolt_backend_core::schema::caffeine_entries;

    let mut conn = pool.get().await.expect("Should get connection");
    diesel::insert_into(caffeine_entries::table)
        .values(NewCaffeineEntry {
            user_id: user,
            drink_id: None,
            name: name.to_string(),
            caffeine_mg: mg,
            consumed_at,
        })
        .get_result(&mut conn)
        .await
        .expect("Should insert entry")
}

/// Entries currently owned by a user
pub async fn entries_for(pool: &DieselPool, user: Uuid) -> Vec<CaffeineEntry> {
    use jolt_backend_core::schema::caffeine_entries::dsl::*;

    let mut conn = pool.get().await.expect("Should get connection");
    caffeine_entries
        .filter(user_id.eq(user))
        .load(&mut conn)
        .await
        .expect("Should load entries")
}

/// Insert a daily limit record effective at a specific instant
pub async fn insert_limit(
    pool: &DieselPool,
    user: Uuid,
    mg: f64,
    effective_from: DateTime<Utc>,
) -> DailyLimit {
    use jolt_backend_core::schema::daily_limits;

    let mut conn = pool.get().await.expect("Should get connection");
    diesel::insert_into(daily_limits::table)
        .values(NewDailyLimit {
            user_id: user,
            limit_mg: mg,
            effective_from,
        })
        .get_result(&mut conn)
        .await
        .expect("Should insert limit")
}

/// Limits currently owned by a user
pub async fn limits_for(pool: &DieselPool, user: Uuid) -> Vec<DailyLimit> {
    use jolt_backend_core::schema::daily_limits::dsl::*;

    let mut conn = pool.get().await.expect("Should get connection");
    daily_limits
        .filter(user_id.eq(user))
        .load(&mut conn)
        .await
        .expect("Should load limits")
}

/// Insert a drink template
pub async fn insert_drink(pool: &DieselPool, user: Uuid, name: &str, mg: f64) -> Drink {
    use jolt_backend_core::schema::drinks;

    let mut conn = pool.get().await.expect("Should get connection");
    diesel::insert_into(drinks::table)
        .values(NewDrink {
            user_id: user,
            name: name.to_string(),
            caffeine_mg: mg,
            size_ml: None,
        })
        .get_result(&mut conn)
        .await
        .expect("Should insert drink")
}

/// Drinks currently owned by a user
pub async fn drinks_for(pool: &DieselPool, user: Uuid) -> Vec<Drink> {
    use jolt_backend_core::schema::drinks::dsl::*;

    let mut conn = pool.get().await.expect("Should get connection");
    drinks
        .filter(user_id.eq(user))
        .load(&mut conn)
        .await
        .expect("Should load drinks")
}

/// Insert a favorite
pub async fn insert_favorite(
    pool: &DieselPool,
    user: Uuid,
    name: &str,
    icon: &str,
    mg: f64,
) -> Favorite {
    use jolt_backend_core::schema::favorites;

    let mut conn = pool.get().await.expect("Should get connection");
    diesel::insert_into(favorites::table)
        .values(NewFavorite {
            user_id: user,
            name: name.to_string(),
            icon: icon.to_string(),
            caffeine_mg: mg,
        })
        .get_result(&mut conn)
        .await
        .expect("Should insert favorite")
}

/// Favorites currently owned by a user
pub async fn favorites_for(pool: &DieselPool, user: Uuid) -> Vec<Favorite> {
    use jolt_backend_core::schema::favorites::dsl::*;

    let mut conn = pool.get().await.expect("Should get connection");
    favorites
        .filter(user_id.eq(user))
        .load(&mut conn)
        .await
        .expect("Should load favorites")
}
