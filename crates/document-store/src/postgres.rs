use std::marker::PhantomData;

use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};

use crate::{
    AggregateId, Command, CommandId, Document, DocumentQuery, Patch, Result, StoreError, Version,
    store::{DocumentReader, DocumentWriter},
};

/// PostgreSQL-backed document store for one collection.
///
/// Documents live as JSONB bodies in the shared `documents` table, keyed by
/// `(collection, id)`. The `version` column mirrors the body's version and is
/// what compare-and-swap writes are checked against.
pub struct PostgresDocumentStore<D> {
    pool: PgPool,
    _document: PhantomData<fn() -> D>,
}

impl<D> Clone for PostgresDocumentStore<D> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            _document: PhantomData,
        }
    }
}

impl<D: Document> PostgresDocumentStore<D> {
    /// Creates a new PostgreSQL document store.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _document: PhantomData,
        }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        Ok(())
    }

    fn row_to_document(row: PgRow) -> Result<D> {
        let body: serde_json::Value = row.try_get("body")?;
        Ok(serde_json::from_value(body)?)
    }
}

#[async_trait]
impl<D: Document> DocumentReader<D> for PostgresDocumentStore<D> {
    #[tracing::instrument(skip(self), fields(collection = D::collection()))]
    async fn find_one_by_id(&self, id: AggregateId) -> Result<Option<D>> {
        let row: Option<PgRow> =
            sqlx::query("SELECT body FROM documents WHERE collection = $1 AND id = $2")
                .bind(D::collection())
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await?;

        row.map(Self::row_to_document).transpose()
    }

    #[tracing::instrument(skip(self), fields(collection = D::collection()))]
    async fn find_one(&self, query: DocumentQuery) -> Result<Option<D>> {
        let mut sql = String::from("SELECT body FROM documents WHERE collection = $1");
        let mut param_count = 1;

        // Build dynamic query
        for _ in query.criteria() {
            sql.push_str(&format!(
                " AND body -> ${} = ${}",
                param_count + 1,
                param_count + 2
            ));
            param_count += 2;
        }
        sql.push_str(" ORDER BY created_at ASC LIMIT 1");

        let mut sqlx_query = sqlx::query(&sql).bind(D::collection());
        for (field, value) in query.criteria() {
            sqlx_query = sqlx_query.bind(field.as_str()).bind(value);
        }

        let row = sqlx_query.fetch_optional(&self.pool).await?;
        row.map(Self::row_to_document).transpose()
    }
}

#[async_trait]
impl<D: Document> DocumentWriter<D> for PostgresDocumentStore<D> {
    #[tracing::instrument(skip(self, document), fields(collection = D::collection(), id = %document.id()))]
    async fn create(&self, document: D) -> Result<AggregateId> {
        let id = document.id();
        let body = serde_json::to_value(&document)?;

        sqlx::query(
            r#"
            INSERT INTO documents (collection, id, version, body)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(D::collection())
        .bind(id.as_uuid())
        .bind(document.version().as_i64())
        .bind(body)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return StoreError::DuplicateId {
                    collection: D::collection(),
                    id,
                };
            }
            StoreError::Database(e)
        })?;

        Ok(id)
    }

    #[tracing::instrument(skip(self, patch), fields(collection = D::collection()))]
    async fn update_one(&self, id: AggregateId, patch: Patch, expected: Version) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE documents
            SET body = body || $4, version = $5, updated_at = NOW()
            WHERE collection = $1 AND id = $2 AND version = $3
            "#,
        )
        .bind(D::collection())
        .bind(id.as_uuid())
        .bind(expected.as_i64())
        .bind(patch.to_json())
        .bind(patch.version().as_i64())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            tracing::debug!(%id, %expected, "update matched no document at expected version");
        }
        Ok(result.rows_affected())
    }

    #[tracing::instrument(skip(self), fields(collection = D::collection()))]
    async fn delete_one(&self, id: AggregateId, expected: Version) -> Result<u64> {
        let result = sqlx::query(
            "DELETE FROM documents WHERE collection = $1 AND id = $2 AND version = $3",
        )
        .bind(D::collection())
        .bind(id.as_uuid())
        .bind(expected.as_i64())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    #[tracing::instrument(skip(self, command), fields(collection = D::collection(), command_type = %command.command_type))]
    async fn store_command(&self, command: Command) -> Result<CommandId> {
        let id = CommandId::new();

        sqlx::query(
            r#"
            INSERT INTO commands (id, collection, aggregate_id, command_type, payload, timestamp)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(id.as_uuid())
        .bind(D::collection())
        .bind(command.aggregate_id.as_uuid())
        .bind(&command.command_type)
        .bind(serde_json::Value::Object(command.payload))
        .bind(command.timestamp)
        .execute(&self.pool)
        .await?;

        Ok(id)
    }
}
