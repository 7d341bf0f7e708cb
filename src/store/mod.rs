use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use uuid::Uuid;

use crate::error::{AppError, Result};

pub mod pipeline;

pub use pipeline::{Pipeline, Projection};

/// A document fetched from the store: the generated identifier plus the
/// JSON body exactly as it was inserted.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: Uuid,
    pub body: Value,
}

/// A typed view of a stored document. `doc` flattens into the JSON
/// representation so responses read `{ "id": ..., ...fields }`.
#[derive(Debug, Clone, Serialize)]
pub struct Stored<T> {
    pub id: Uuid,
    #[serde(flatten)]
    pub doc: T,
}

impl Document {
    pub fn into_typed<T: DeserializeOwned>(self) -> Result<Stored<T>> {
        let doc = serde_json::from_value(self.body)
            .map_err(|e| AppError::Database(format!("malformed document body: {}", e)))?;
        Ok(Stored { id: self.id, doc })
    }

    /// The body with the identifier spliced in under `id`.
    pub fn into_json(self) -> Value {
        let mut body = self.body;
        if let Value::Object(ref mut map) = body {
            map.insert("id".to_string(), Value::String(self.id.to_string()));
        }
        body
    }
}

/// A conjunction of field-equality predicates over string values.
/// An empty filter matches every document in the collection.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    predicates: Vec<(String, String)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.predicates.push((field.into(), value.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Asc,
    Desc,
}

/// Single-field sort specification. Timestamp fields are stored as
/// RFC 3339 strings, so lexicographic ordering is chronological.
#[derive(Debug, Clone)]
pub struct Sort {
    pub field: String,
    pub order: Order,
}

impl Sort {
    pub fn asc(field: impl Into<String>) -> Self {
        Self { field: field.into(), order: Order::Asc }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self { field: field.into(), order: Order::Desc }
    }
}

/// Explicit partial-update representation: a mapping of field name to
/// replacement value. Fields absent from the mapping are left untouched
/// by `update_by_id`.
#[derive(Debug, Clone, Default)]
pub struct Patch {
    fields: serde_json::Map<String, Value>,
}

impl Patch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Adds the field only when a value was actually supplied.
    pub fn maybe_set<V: Into<Value>>(self, field: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(v) => self.set(field, v),
            None => self,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn to_json_string(&self) -> Result<String> {
        serde_json::to_string(&Value::Object(self.fields.clone())).map_err(Into::into)
    }
}

/// Thin gateway over the documents table. Collections are row
/// partitions, bodies are JSON, and every operation is a single
/// statement with no retries. Zero matched or deleted rows is reported
/// through the returned count, never as an error.
pub struct DocumentStore {
    pool: SqlitePool,
}

impl DocumentStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, collection: &str, doc: &impl Serialize) -> Result<Uuid> {
        let id = Uuid::new_v4();
        let body = serde_json::to_string(doc)?;

        sqlx::query("INSERT INTO documents (id, collection, body) VALUES (?, ?, ?)")
            .bind(id.to_string())
            .bind(collection)
            .bind(body)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(id)
    }

    pub async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        sort: Option<&Sort>,
    ) -> Result<Vec<Document>> {
        let mut query = self.select_query(collection, filter, sort);

        let rows = query
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(Self::row_to_document).collect()
    }

    pub async fn find_one(
        &self,
        collection: &str,
        filter: &Filter,
        sort: &Sort,
    ) -> Result<Option<Document>> {
        let mut query = self.select_query(collection, filter, Some(sort));
        query.push(" LIMIT 1");

        let row = query
            .build()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        row.map(Self::row_to_document).transpose()
    }

    /// Merges the patch into the stored body, returning the matched
    /// count. Zero means no document has that identifier.
    pub async fn update_by_id(&self, collection: &str, id: Uuid, patch: &Patch) -> Result<u64> {
        let patch_json = patch.to_json_string()?;

        let result = sqlx::query(
            "UPDATE documents SET body = json_patch(body, ?) WHERE collection = ? AND id = ?",
        )
        .bind(patch_json)
        .bind(collection)
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected())
    }

    /// Deletes at most one document, optionally constrained by extra
    /// field predicates (e.g. only while a status field still holds a
    /// given value). Returns the deleted count.
    pub async fn delete_by_id(
        &self,
        collection: &str,
        id: Uuid,
        extra: Option<&Filter>,
    ) -> Result<u64> {
        let mut query: QueryBuilder<Sqlite> =
            QueryBuilder::new("DELETE FROM documents WHERE collection = ");
        query.push_bind(collection.to_string());
        query.push(" AND id = ");
        query.push_bind(id.to_string());
        if let Some(filter) = extra {
            Self::push_predicates(&mut query, filter);
        }

        let result = query
            .build()
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected())
    }

    /// Runs a multi-stage read pipeline (lookup, project, sort) rooted
    /// at `collection`. Lookup stages read their joined collection in
    /// full; the reshaping itself happens in process.
    pub async fn aggregate(&self, collection: &str, pipeline: &Pipeline) -> Result<Vec<Value>> {
        let mut docs: Vec<Value> = self
            .find(collection, &Filter::new(), None)
            .await?
            .into_iter()
            .map(Document::into_json)
            .collect();

        for stage in pipeline.stages() {
            match stage {
                pipeline::Stage::Lookup { from, local_field, foreign_field, target } => {
                    let joined: Vec<Value> = self
                        .find(from, &Filter::new(), None)
                        .await?
                        .into_iter()
                        .map(Document::into_json)
                        .collect();
                    pipeline::apply_lookup(&mut docs, &joined, local_field, foreign_field, target);
                }
                pipeline::Stage::Project(projection) => {
                    pipeline::apply_project(&mut docs, projection);
                }
                pipeline::Stage::Sort { field, order } => {
                    pipeline::apply_sort(&mut docs, field, *order);
                }
            }
        }

        Ok(docs)
    }

    fn select_query(
        &self,
        collection: &str,
        filter: &Filter,
        sort: Option<&Sort>,
    ) -> QueryBuilder<'static, Sqlite> {
        let mut query: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT id, body FROM documents WHERE collection = ");
        query.push_bind(collection.to_string());
        Self::push_predicates(&mut query, filter);

        match sort {
            Some(sort) => {
                query.push(" ORDER BY json_extract(body, ");
                query.push_bind(format!("$.{}", sort.field));
                query.push(match sort.order {
                    Order::Asc => ") ASC",
                    Order::Desc => ") DESC",
                });
            }
            // Insertion order when no sort is requested.
            None => {
                query.push(" ORDER BY rowid ASC");
            }
        }

        query
    }

    fn push_predicates(query: &mut QueryBuilder<'static, Sqlite>, filter: &Filter) {
        for (field, value) in &filter.predicates {
            query.push(" AND json_extract(body, ");
            query.push_bind(format!("$.{}", field));
            query.push(") = ");
            query.push_bind(value.clone());
        }
    }

    fn row_to_document(row: sqlx::sqlite::SqliteRow) -> Result<Document> {
        let id: String = row
            .try_get("id")
            .map_err(|e| AppError::Database(e.to_string()))?;
        let body: String = row
            .try_get("body")
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(Document {
            id: Uuid::parse_str(&id).map_err(|e| AppError::Database(e.to_string()))?,
            body: serde_json::from_str(&body)
                .map_err(|e| AppError::Database(format!("malformed document body: {}", e)))?,
        })
    }
}
