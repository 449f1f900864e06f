use jiff::civil::Date;
use sea_orm::{
    ActiveValue::NotSet, DatabaseConnection, EntityTrait, PaginatorTrait, QueryOrder, Set,
};

use crate::{
    entities::title,
    error::StoreError,
    models::{StoredTitle, Title},
};

/// SQLite's default `SQLITE_MAX_VARIABLE_NUMBER`.
const SQLITE_MAX_VARIABLES: usize = 32_766;
/// Bound parameters per inserted row; `id` is assigned by the store.
const BOUND_COLUMNS: usize = 6;

/// Most rows a single bulk insert statement can carry.
pub const MAX_ROWS_PER_INSERT: usize = SQLITE_MAX_VARIABLES / BOUND_COLUMNS;

/// The `titles` collection.
///
/// Operations mirror a document store: `clear` is `deleteMany({})`,
/// `insert_one`/`insert_batch` are single and bulk inserts, `find_all` is an
/// unfiltered `find`. Cloning is cheap and shares the underlying pool.
#[derive(Clone)]
pub struct TitleStore {
    db: DatabaseConnection,
}

impl TitleStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Removes every document, returning how many were deleted.
    pub async fn clear(&self) -> Result<u64, StoreError> {
        let res = title::Entity::delete_many().exec(&self.db).await?;
        Ok(res.rows_affected)
    }

    pub async fn insert_one(&self, title: Title) -> Result<i32, StoreError> {
        let res = title::Entity::insert(to_active(title)?).exec(&self.db).await?;
        Ok(res.last_insert_id)
    }

    /// Writes `titles` in as many statements as the bound-parameter limit needs.
    pub async fn insert_batch(&self, titles: Vec<Title>) -> Result<(), StoreError> {
        let mut models = titles.into_iter().map(to_active).collect::<Result<Vec<_>, _>>()?;
        while !models.is_empty() {
            let rest = models.split_off(models.len().min(MAX_ROWS_PER_INSERT));
            title::Entity::insert_many(std::mem::replace(&mut models, rest)).exec(&self.db).await?;
        }
        Ok(())
    }

    pub async fn find_all(&self) -> Result<Vec<StoredTitle>, StoreError> {
        title::Entity::find()
            .order_by_asc(title::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(from_model)
            .collect()
    }

    pub async fn count(&self) -> Result<u64, StoreError> {
        Ok(title::Entity::find().count(&self.db).await?)
    }

    pub async fn close(self) -> Result<(), StoreError> {
        self.db.close().await?;
        Ok(())
    }
}

fn to_active(t: Title) -> Result<title::ActiveModel, StoreError> {
    let fields = serde_json::to_string(&t.fields)?;

    Ok(title::ActiveModel {
        id: NotSet,
        title: Set(t.title),
        duration: Set(t.duration),
        date_added: Set(t.date_added.map(|d| d.to_string())),
        release_year: Set(t.release_year),
        content_age: Set(t.content_age),
        fields: Set(fields),
    })
}

fn from_model(m: title::Model) -> Result<StoredTitle, StoreError> {
    let id = m.id;
    let date_added = m
        .date_added
        .as_deref()
        .map(str::parse::<Date>)
        .transpose()
        .map_err(|e: jiff::Error| StoreError::Decode { id, message: e.to_string() })?;
    let fields = serde_json::from_str(&m.fields)
        .map_err(|e| StoreError::Decode { id, message: e.to_string() })?;

    Ok(StoredTitle {
        id,
        title: Title {
            title: m.title,
            duration: m.duration,
            date_added,
            release_year: m.release_year,
            content_age: m.content_age,
            fields,
        },
    })
}
