//! Generic collection repository
//!
//! One CRUD surface shared by every entity. Each entity binds itself to a
//! collection by implementing [`Persist`]; the repository is then a thin,
//! stateless wrapper over a [`mongodb::Collection`] handle.
//!
//! Behavioral contract (uniform across entities):
//!
//! - `update_one` always applies a `$set` partial merge, never a full
//!   document replace
//! - a filter matching zero documents surfaces as [`DbError::NotFound`] from
//!   `find_one`, `update_one` and `delete_one`, so callers never have to
//!   distinguish a zero count from success themselves
//!
//! # Example
//!
//! ```no_run
//! use mongodb::bson::doc;
//! use outlay_shared::db::Repository;
//! use outlay_shared::models::Category;
//!
//! # async fn example(db: &mongodb::Database) -> Result<(), outlay_shared::db::DbError> {
//! let categories: Repository<Category> = Repository::new(db);
//! let food = categories.find_one(doc! { "name": "Food" }).await?;
//! println!("{}", food.name);
//! # Ok(())
//! # }
//! ```

use crate::db::DbError;
use futures::TryStreamExt;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{doc, Document};
use mongodb::{Collection, Database};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

/// Binds an entity type to its collection name.
pub trait Persist: Serialize + DeserializeOwned + Send + Sync + Unpin {
    /// Name of the collection this entity is stored in.
    const COLLECTION: &'static str;
}

/// CRUD operations scoped to one logical collection.
///
/// Stateless apart from the collection handle, which is a cheap clone of
/// the shared connection; repositories can be created per request.
pub struct Repository<T: Persist> {
    collection: Collection<T>,
}

impl<T: Persist> Repository<T> {
    /// Creates a repository bound to `T`'s collection on the given database.
    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.collection::<T>(T::COLLECTION),
        }
    }

    /// Inserts one document and returns its generated ID.
    pub async fn insert_one(&self, entity: &T) -> Result<ObjectId, DbError> {
        let result = self.collection.insert_one(entity).await?;
        result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| DbError::Decode("insert returned a non-ObjectId _id".to_string()))
    }

    /// Returns every document matching `filter`, in natural order.
    ///
    /// An empty filter (`doc! {}`) matches the whole collection.
    pub async fn find_many(&self, filter: Document) -> Result<Vec<T>, DbError> {
        debug!(collection = T::COLLECTION, ?filter, "find");
        let cursor = self.collection.find(filter).await?;
        Ok(cursor.try_collect().await?)
    }

    /// Returns every document matching `filter`, ordered by `sort`.
    pub async fn find_many_sorted(
        &self,
        filter: Document,
        sort: Document,
    ) -> Result<Vec<T>, DbError> {
        debug!(collection = T::COLLECTION, ?filter, ?sort, "find sorted");
        let cursor = self.collection.find(filter).sort(sort).await?;
        Ok(cursor.try_collect().await?)
    }

    /// Returns the single document matching `filter`.
    ///
    /// # Errors
    ///
    /// [`DbError::NotFound`] when nothing matches. Callers that need the
    /// "maybe absent" shape should match on that variant rather than decode
    /// a zero-value document.
    pub async fn find_one(&self, filter: Document) -> Result<T, DbError> {
        self.collection
            .find_one(filter)
            .await?
            .ok_or(DbError::NotFound)
    }

    /// Applies `patch` as a `$set` to the single document matching `filter`.
    ///
    /// Returns the modified count. Whether the document existed is decided
    /// on the matched count, so patching a document with values it already
    /// holds succeeds with a count of zero.
    ///
    /// # Errors
    ///
    /// [`DbError::NotFound`] when the filter matched no document.
    pub async fn update_one(&self, patch: Document, filter: Document) -> Result<u64, DbError> {
        let update = doc! { "$set": patch };
        let result = self.collection.update_one(filter, update).await?;
        if result.matched_count == 0 {
            return Err(DbError::NotFound);
        }
        Ok(result.modified_count)
    }

    /// Deletes the single document matching `filter` and returns the
    /// deleted count.
    ///
    /// # Errors
    ///
    /// [`DbError::NotFound`] when the filter matched no document.
    pub async fn delete_one(&self, filter: Document) -> Result<u64, DbError> {
        let result = self.collection.delete_one(filter).await?;
        if result.deleted_count == 0 {
            return Err(DbError::NotFound);
        }
        Ok(result.deleted_count)
    }
}
