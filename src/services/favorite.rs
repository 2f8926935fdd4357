// Favorite quick-add shortcuts

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::DieselPool,
    models::favorite::{CreateFavoriteRequest, Favorite, NewFavorite},
    utils::service_error::ServiceError,
};

pub struct FavoriteService {
    pool: DieselPool,
}

impl FavoriteService {
    pub fn new(pool: DieselPool) -> Self {
        Self { pool }
    }

    /// List the user's favorites, newest first
    #[instrument(skip(self))]
    pub async fn list_favorites(&self, user: Uuid) -> Result<Vec<Favorite>, ServiceError> {
        use crate::schema::favorites::dsl::*;

        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| ServiceError::DatabaseError(e.to_string()))?;

        let results = favorites
            .filter(user_id.eq(user))
            .order(created_at.desc())
            .load::<Favorite>(&mut conn)
            .await?;

        Ok(results)
    }

    /// Save a favorite. Duplicate (name, caffeine amount) pairs surface as a
    /// conflict rather than a second row.
    #[instrument(skip(self, request))]
    pub async fn create_favorite(
        &self,
        user: Uuid,
        mut request: CreateFavoriteRequest,
    ) -> Result<Favorite, ServiceError> {
        use crate::schema::favorites::dsl::*;

        request.sanitize();
        request.validate()?;

        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| ServiceError::DatabaseError(e.to_string()))?;

        let favorite = diesel::insert_into(favorites)
            .values(NewFavorite {
                user_id: user,
                name: request.name,
                icon: request.icon,
                caffeine_mg: request.caffeine_mg,
            })
            .get_result::<Favorite>(&mut conn)
            .await
            .map_err(|e| match e {
                diesel::result::Error::DatabaseError(
                    diesel::result::DatabaseErrorKind::UniqueViolation,
                    _,
                ) => ServiceError::FavoriteAlreadyExists,
                _ => e.into(),
            })?;

        info!("User {} saved favorite '{}'", user, favorite.name);

        Ok(favorite)
    }

    /// Remove a favorite; scoped to the owner
    #[instrument(skip(self))]
    pub async fn delete_favorite(&self, user: Uuid, favorite_id: Uuid) -> Result<(), ServiceError> {
        use crate::schema::favorites::dsl::*;

        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| ServiceError::DatabaseError(e.to_string()))?;

        let deleted = diesel::delete(favorites.filter(id.eq(favorite_id)).filter(user_id.eq(user)))
            .execute(&mut conn)
            .await?;

        if deleted == 0 {
            return Err(ServiceError::NotFound);
        }

        Ok(())
    }
}
