use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::types::Json;
use sqlx::{Postgres, QueryBuilder as SqlBuilder, Row};
use tracing::debug;

use crate::config::DatabaseConfig;
use crate::database::manager::{build_connection_string, DatabaseError};
use crate::database::store::{assign_id, strip_id, Collection, Document, DocumentStore};
use crate::filter::{DocumentFilter, FindOptions, SortDirection, SortField, ID_FIELD};

/// Postgres-backed document store.
///
/// Each collection is a table `(seq BIGSERIAL, id TEXT PRIMARY KEY, data JSONB)`.
/// `data` holds the whole document including `id`; `seq` records insertion
/// order and breaks sort ties.
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let connection_string = build_connection_string(&config.url, &config.name)?;
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.connect_timeout())
            .connect(&connection_string)
            .await?;

        let store = Self { pool };
        store.ping().await?;
        Ok(store)
    }

    fn push_where(sql: &mut SqlBuilder<'_, Postgres>, filter: &DocumentFilter) {
        for (i, (field, value)) in filter.iter().enumerate() {
            sql.push(if i == 0 { " WHERE " } else { " AND " });
            if field == ID_FIELD {
                sql.push("id = ").push_bind(id_text(value));
            } else {
                sql.push("data -> ")
                    .push_bind(field.to_string())
                    .push(" = ")
                    .push_bind(Json(value.clone()));
            }
        }
    }

    fn push_order(sql: &mut SqlBuilder<'_, Postgres>, options: &FindOptions) {
        let Some(spec) = &options.sort else {
            sql.push(" ORDER BY seq ASC");
            return;
        };
        let dir = spec.direction.to_sql();
        // Missing and non-string keys sort lowest in both directions
        let nulls = match spec.direction {
            SortDirection::Asc => "NULLS FIRST",
            SortDirection::Desc => "NULLS LAST",
        };
        match &spec.field {
            SortField::Id => {
                sql.push(format!(" ORDER BY id {dir}, seq ASC"));
            }
            SortField::Field(name) => {
                // Strings compare case-insensitively; other JSON values keep jsonb ordering
                sql.push(" ORDER BY CASE WHEN jsonb_typeof(data -> ")
                    .push_bind(name.clone())
                    .push(") = 'string' THEN lower(data ->> ")
                    .push_bind(name.clone())
                    .push(format!(") END {dir} {nulls}, data -> "))
                    .push_bind(name.clone())
                    .push(format!(" {dir} {nulls}, seq ASC"));
            }
        }
    }

    fn row_to_document(row: &PgRow) -> Result<Document, DatabaseError> {
        let Json(value): Json<Value> = row.try_get("data")?;
        match value {
            Value::Object(map) => Ok(map),
            other => Err(DatabaseError::QueryError(format!(
                "stored document is not an object: {}",
                other
            ))),
        }
    }

    fn map_insert_error(collection: Collection, id: &str, err: sqlx::Error) -> DatabaseError {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return DatabaseError::Duplicate {
                    collection: collection.name(),
                    field: db_err.constraint().unwrap_or(ID_FIELD).to_string(),
                    value: id.to_string(),
                };
            }
        }
        DatabaseError::Sqlx(err)
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn find(
        &self,
        collection: Collection,
        filter: &DocumentFilter,
        options: &FindOptions,
    ) -> Result<Vec<Document>, DatabaseError> {
        let mut sql = SqlBuilder::<Postgres>::new(format!("SELECT data FROM \"{}\"", collection.name()));
        Self::push_where(&mut sql, filter);
        Self::push_order(&mut sql, options);
        if let Some(limit) = options.limit {
            sql.push(" LIMIT ").push_bind(clamp_i64(limit));
        }
        if options.skip > 0 {
            sql.push(" OFFSET ").push_bind(clamp_i64(options.skip));
        }
        debug!("find on {}: {}", collection, sql.sql());

        let rows = sql.build().fetch_all(&self.pool).await?;
        rows.iter().map(Self::row_to_document).collect()
    }

    async fn count(&self, collection: Collection, filter: &DocumentFilter) -> Result<u64, DatabaseError> {
        let mut sql = SqlBuilder::<Postgres>::new(format!(
            "SELECT COUNT(*) AS count FROM \"{}\"",
            collection.name()
        ));
        Self::push_where(&mut sql, filter);

        let row = sql.build().fetch_one(&self.pool).await?;
        let count: i64 = row.try_get("count")?;
        Ok(count.max(0) as u64)
    }

    async fn insert_one(&self, collection: Collection, mut document: Document) -> Result<String, DatabaseError> {
        let id = assign_id(&mut document);
        sqlx::query(&format!(
            "INSERT INTO \"{}\" (id, data) VALUES ($1, $2)",
            collection.name()
        ))
        .bind(&id)
        .bind(Json(Value::Object(document)))
        .execute(&self.pool)
        .await
        .map_err(|e| Self::map_insert_error(collection, &id, e))?;
        Ok(id)
    }

    async fn insert_many(
        &self,
        collection: Collection,
        documents: Vec<Document>,
    ) -> Result<Vec<String>, DatabaseError> {
        let statement = format!("INSERT INTO \"{}\" (id, data) VALUES ($1, $2)", collection.name());
        let mut tx = self.pool.begin().await?;
        let mut ids = Vec::with_capacity(documents.len());

        for mut document in documents {
            let id = assign_id(&mut document);
            sqlx::query(&statement)
                .bind(&id)
                .bind(Json(Value::Object(document)))
                .execute(&mut *tx)
                .await
                .map_err(|e| Self::map_insert_error(collection, &id, e))?;
            ids.push(id);
        }

        tx.commit().await?;
        Ok(ids)
    }

    async fn update_one(
        &self,
        collection: Collection,
        filter: &DocumentFilter,
        set: Document,
    ) -> Result<u64, DatabaseError> {
        let table = collection.name();
        let mut sql = SqlBuilder::<Postgres>::new(format!("UPDATE \"{table}\" SET data = data || "));
        sql.push_bind(Json(Value::Object(strip_id(set))));
        sql.push(format!(" WHERE seq = (SELECT seq FROM \"{table}\""));
        Self::push_where(&mut sql, filter);
        sql.push(" ORDER BY seq ASC LIMIT 1)");

        let result = sql.build().execute(&self.pool).await.map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => DatabaseError::Duplicate {
                collection: table,
                field: db_err.constraint().unwrap_or("unique").to_string(),
                value: String::from("<update>"),
            },
            other => DatabaseError::Sqlx(other),
        })?;
        Ok(result.rows_affected())
    }

    async fn ensure_indexes(&self) -> Result<(), DatabaseError> {
        for collection in Collection::ALL {
            let table = collection.name();
            sqlx::query(&format!(
                "CREATE TABLE IF NOT EXISTS \"{table}\" (
                    seq BIGSERIAL NOT NULL,
                    id TEXT PRIMARY KEY,
                    data JSONB NOT NULL
                )"
            ))
            .execute(&self.pool)
            .await?;
            sqlx::query(&format!(
                "CREATE UNIQUE INDEX IF NOT EXISTS \"{table}_seq_idx\" ON \"{table}\" (seq)"
            ))
            .execute(&self.pool)
            .await?;
        }

        let statements = [
            "CREATE INDEX IF NOT EXISTS \"products_category_id_idx\" ON \"products\" ((data -> 'category_id'))",
            "CREATE INDEX IF NOT EXISTS \"products_category_group_idx\" ON \"products\" ((data -> 'category_group'))",
            "CREATE UNIQUE INDEX IF NOT EXISTS \"users_email_idx\" ON \"users\" ((data -> 'email'))",
        ];
        for statement in statements {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

fn id_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn clamp_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
