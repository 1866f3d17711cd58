use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, QueryFilter, QueryOrder,
    Set, SqlErr, TransactionTrait,
};
use tracing::{debug, info};

use crate::{
    entities::movie,
    error::{AppError, AppResult},
    models::{MovieDetails, Rating},
    ranking,
};

#[derive(Clone)]
pub struct MovieStore {
    db: DatabaseConnection,
}

impl MovieStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn all(&self) -> AppResult<Vec<movie::Model>> {
        let movies = movie::Entity::find().order_by_asc(movie::Column::Id).all(&self.db).await?;
        Ok(movies)
    }

    pub async fn get(&self, id: i32) -> AppResult<Option<movie::Model>> {
        Ok(movie::Entity::find_by_id(id).one(&self.db).await?)
    }

    pub async fn find_by_title(&self, title: &str) -> AppResult<Option<movie::Model>> {
        let movie =
            movie::Entity::find().filter(movie::Column::Title.eq(title)).one(&self.db).await?;
        Ok(movie)
    }

    /// Inserts an unrated movie. A duplicate title is a `Conflict`.
    pub async fn insert(&self, details: &MovieDetails) -> AppResult<movie::Model> {
        let model = movie::ActiveModel {
            id: NotSet,
            title: Set(details.title.clone()),
            year: Set(details.year),
            description: Set(details.description.clone()),
            rating: Set(None),
            ranking: Set(None),
            review: Set(None),
            img_url: Set(details.img_url.clone()),
        };

        let inserted = model.insert(&self.db).await.map_err(|err| match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                AppError::Conflict(format!("\"{}\" is already in your collection.", details.title))
            },
            _ => AppError::Database(err),
        })?;

        info!(id = inserted.id, title = %inserted.title, "movie added");
        Ok(inserted)
    }

    /// Sets rating and review, leaving every other column untouched.
    pub async fn rate(&self, id: i32, rating: Rating, review: &str) -> AppResult<movie::Model> {
        let Some(existing) = self.get(id).await? else {
            return Err(not_found(id));
        };

        let mut model: movie::ActiveModel = existing.into();
        model.rating = Set(Some(rating.value()));
        model.review = Set(Some(review.to_string()));
        let updated = model.update(&self.db).await?;

        info!(id = updated.id, rating = %rating, "movie rated");
        Ok(updated)
    }

    pub async fn delete(&self, id: i32) -> AppResult<movie::Model> {
        let Some(existing) = self.get(id).await? else {
            return Err(not_found(id));
        };

        let res = movie::Entity::delete_by_id(id).exec(&self.db).await?;
        if res.rows_affected == 0 {
            return Err(not_found(id));
        }

        info!(id = id, title = %existing.title, "movie deleted");
        Ok(existing)
    }

    /// Persists the current ranking projection in one transaction, writing only changed rows.
    pub async fn rerank(&self) -> AppResult<()> {
        let txn = self.db.begin().await?;

        let movies = movie::Entity::find().all(&txn).await?;
        let mut changed = 0usize;

        for ranked in ranking::rank(movies) {
            let rank = Some(ranked.rank as i32);
            if ranked.movie.ranking == rank {
                continue;
            }
            let mut model: movie::ActiveModel = ranked.movie.into();
            model.ranking = Set(rank);
            model.update(&txn).await?;
            changed += 1;
        }

        txn.commit().await?;

        debug!(changed = changed, "rankings recomputed");
        Ok(())
    }
}

fn not_found(id: i32) -> AppError {
    AppError::NotFound(format!("No movie with id {id} in your collection."))
}
