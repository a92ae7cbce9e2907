//! Post record entity for SeaORM.
//!
//! The full record is kept as JSONB; `status` and `created_at` are copied
//! out of it so the `(status, created_at)` index can serve the feed query.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "post_records")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub post_id: String,
    pub status: String,
    pub created_at: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub record: Json,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
