//! PostgreSQL post store.

use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DbConn, DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

use quill_core::StoreError;
use quill_core::ports::{IndexQuery, PostStore, Record, STATUS_INDEX};

use super::entity::post_record::{self, Entity as PostRecordEntity};

/// Post store over the `post_records` table.
///
/// The conditional write is `INSERT .. ON CONFLICT DO NOTHING`; zero affected
/// rows means the key was already taken.
pub struct PostgresPostStore {
    db: DbConn,
}

impl PostgresPostStore {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    fn indexed_attr(record: &Record, name: &str) -> Result<String, StoreError> {
        record
            .get(name)
            .and_then(serde_json::Value::as_str)
            .map(str::to_owned)
            .ok_or_else(|| {
                StoreError::Query(format!("record is missing indexed attribute `{name}`"))
            })
    }
}

fn map_db_err(err: DbErr) -> StoreError {
    match err {
        DbErr::ConnectionAcquire(_) | DbErr::Conn(_) => {
            tracing::error!(error = %err, "Database connection error");
            StoreError::Unavailable(err.to_string())
        }
        _ => StoreError::Query(err.to_string()),
    }
}

#[async_trait]
impl PostStore for PostgresPostStore {
    async fn put_if_absent(&self, key: &str, record: Record) -> Result<(), StoreError> {
        let model = post_record::ActiveModel {
            post_id: Set(key.to_string()),
            status: Set(Self::indexed_attr(&record, "status")?),
            created_at: Set(Self::indexed_attr(&record, "createdAt")?),
            record: Set(serde_json::Value::Object(record)),
        };

        let inserted = PostRecordEntity::insert(model)
            .on_conflict(
                OnConflict::column(post_record::Column::PostId)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(map_db_err)?;

        if inserted == 0 {
            return Err(StoreError::Conflict {
                key: key.to_string(),
            });
        }

        tracing::debug!(key = %key, "Record stored");
        Ok(())
    }

    async fn query_by_index(&self, query: &IndexQuery) -> Result<Vec<Record>, StoreError> {
        if query.index != STATUS_INDEX {
            return Err(StoreError::UnknownIndex(query.index.clone()));
        }

        let mut select =
            PostRecordEntity::find().filter(post_record::Column::Status.eq(query.key.as_str()));
        select = if query.descending {
            select
                .order_by_desc(post_record::Column::CreatedAt)
                .order_by_desc(post_record::Column::PostId)
        } else {
            select
                .order_by_asc(post_record::Column::CreatedAt)
                .order_by_asc(post_record::Column::PostId)
        };
        if let Ok(limit) = i64::try_from(query.limit) {
            select = select.limit(limit as u64);
        }

        let rows = select.all(&self.db).await.map_err(map_db_err)?;

        rows.into_iter()
            .map(|row| match row.record {
                serde_json::Value::Object(map) => Ok(map),
                other => Err(StoreError::Corrupt(format!(
                    "record {} is not an object: {other}",
                    row.post_id
                ))),
            })
            .collect()
    }
}
