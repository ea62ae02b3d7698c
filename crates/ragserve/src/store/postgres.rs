//! Postgres + pgvector fragment store

use std::sync::Arc;

use async_trait::async_trait;
use pgvector::Vector;
use tokio_postgres::{Client, NoTls};

use crate::error::{Error, Result};

use super::{Fragment, FragmentStore};

/// Fragment store backed by Postgres with the pgvector extension.
///
/// Cosine distance (`<=>`) over an ivfflat index does the ranking; the
/// embedding dimension is enforced client-side on every insert and query.
pub struct PostgresFragmentStore {
    client: Arc<Client>,
    dimensions: usize,
}

impl PostgresFragmentStore {
    /// Connect to Postgres and spawn the connection driver onto the runtime
    pub async fn connect(database_url: &str, dimensions: usize) -> Result<Self> {
        let (client, connection) = tokio_postgres::connect(database_url, NoTls)
            .await
            .map_err(|e| Error::store(format!("failed to connect to postgres: {e}")))?;

        tokio::spawn(async move {
            if let Err(err) = connection.await {
                tracing::error!("postgres connection error: {err}");
            }
        });

        Ok(Self {
            client: Arc::new(client),
            dimensions,
        })
    }

    /// Idempotently ensure the extension, table, and similarity index exist.
    /// Safe to call on every process start.
    pub async fn init(&self) -> Result<()> {
        let ddl = [
            "CREATE EXTENSION IF NOT EXISTS vector".to_string(),
            format!(
                "CREATE TABLE IF NOT EXISTS fragments (
                    id BIGSERIAL PRIMARY KEY,
                    content TEXT NOT NULL,
                    source TEXT NOT NULL,
                    embedding VECTOR({}) NOT NULL
                )",
                self.dimensions
            ),
            "CREATE INDEX IF NOT EXISTS fragments_embedding_idx \
             ON fragments USING ivfflat (embedding vector_cosine_ops) WITH (lists = 100)"
                .to_string(),
        ];

        for statement in &ddl {
            self.client
                .execute(statement.as_str(), &[])
                .await
                .map_err(|e| Error::store(format!("init statement failed: {e}")))?;
        }

        Ok(())
    }

    fn check_dimensions(&self, vector: &[f32]) -> Result<()> {
        if vector.len() != self.dimensions {
            return Err(Error::store(format!(
                "vector dimension {} does not match store dimension {}",
                vector.len(),
                self.dimensions
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl FragmentStore for PostgresFragmentStore {
    async fn insert(&self, content: &str, source: &str, vector: &[f32]) -> Result<()> {
        self.check_dimensions(vector)?;

        let embedding = Vector::from(vector.to_vec());
        self.client
            .execute(
                "INSERT INTO fragments (content, source, embedding) VALUES ($1, $2, $3)",
                &[&content, &source, &embedding],
            )
            .await
            .map_err(|e| Error::store(format!("insert failed: {e}")))?;

        Ok(())
    }

    async fn search(&self, query_vector: &[f32], top_k: usize) -> Result<Vec<Fragment>> {
        if top_k == 0 {
            return Ok(Vec::new());
        }
        self.check_dimensions(query_vector)?;

        let embedding = Vector::from(query_vector.to_vec());
        let limit = top_k as i64;
        let rows = self
            .client
            .query(
                "SELECT id, content, source, embedding <=> $1 AS distance \
                 FROM fragments \
                 ORDER BY embedding <=> $1 ASC \
                 LIMIT $2",
                &[&embedding, &limit],
            )
            .await
            .map_err(|e| Error::store(format!("vector search failed: {e}")))?;

        let mut fragments = Vec::with_capacity(rows.len());
        for row in rows {
            fragments.push(Fragment {
                id: row.try_get("id")?,
                content: row.try_get("content")?,
                source: row.try_get("source")?,
                distance: row.try_get("distance")?,
            });
        }

        Ok(fragments)
    }
}
