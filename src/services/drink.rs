// Drink template business logic

use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::DieselPool,
    models::drink::{CreateDrinkRequest, Drink, NewDrink, UpdateDrink, UpdateDrinkRequest},
    utils::service_error::ServiceError,
};

pub struct DrinkService {
    pool: DieselPool,
}

impl DrinkService {
    pub fn new(pool: DieselPool) -> Self {
        Self { pool }
    }

    /// List the user's drink templates, newest first
    #[instrument(skip(self))]
    pub async fn list_drinks(&self, user: Uuid) -> Result<Vec<Drink>, ServiceError> {
        use crate::schema::drinks::dsl::*;

        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| ServiceError::DatabaseError(e.to_string()))?;

        let results = drinks
            .filter(user_id.eq(user))
            .order(created_at.desc())
            .load::<Drink>(&mut conn)
            .await?;

        Ok(results)
    }

    /// Create a drink template
    #[instrument(skip(self, request))]
    pub async fn create_drink(
        &self,
        user: Uuid,
        mut request: CreateDrinkRequest,
    ) -> Result<Drink, ServiceError> {
        use crate::schema::drinks::dsl::*;

        request.sanitize();
        request.validate()?;

        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| ServiceError::DatabaseError(e.to_string()))?;

        let drink = diesel::insert_into(drinks)
            .values(NewDrink {
                user_id: user,
                name: request.name,
                caffeine_mg: request.caffeine_mg,
                size_ml: request.size_ml,
            })
            .get_result::<Drink>(&mut conn)
            .await?;

        info!("User {} created drink '{}'", user, drink.name);

        Ok(drink)
    }

    /// Update a drink template; scoped to the creator
    #[instrument(skip(self, request))]
    pub async fn update_drink(
        &self,
        user: Uuid,
        drink_id: Uuid,
        request: UpdateDrinkRequest,
    ) -> Result<Drink, ServiceError> {
        use crate::schema::drinks::dsl::*;

        request.validate()?;

        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| ServiceError::DatabaseError(e.to_string()))?;

        let changes = UpdateDrink {
            name: crate::utils::trim_optional_field(request.name.as_ref()),
            caffeine_mg: request.caffeine_mg,
            size_ml: request.size_ml,
            updated_at: Utc::now(),
        };

        let drink = diesel::update(drinks.filter(id.eq(drink_id)).filter(user_id.eq(user)))
            .set(&changes)
            .get_result::<Drink>(&mut conn)
            .await
            .map_err(|e| match e {
                diesel::result::Error::NotFound => ServiceError::NotFound,
                _ => e.into(),
            })?;

        Ok(drink)
    }

    /// Delete a drink template; scoped to the creator.
    /// Entries that referenced the template keep their logged name and
    /// amount; the reference itself is cleared by the schema.
    #[instrument(skip(self))]
    pub async fn delete_drink(&self, user: Uuid, drink_id: Uuid) -> Result<(), ServiceError> {
        use crate::schema::drinks::dsl::*;

        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| ServiceError::DatabaseError(e.to_string()))?;

        let deleted = diesel::delete(drinks.filter(id.eq(drink_id)).filter(user_id.eq(user)))
            .execute(&mut conn)
            .await?;

        if deleted == 0 {
            return Err(ServiceError::NotFound);
        }

        Ok(())
    }
}
