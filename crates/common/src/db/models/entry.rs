//! Glossary entry entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "glossary_entries")]
pub struct Model {
    /// Assigned by the database on insert; immutable thereafter
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Unique human-readable key of the entry
    #[sea_orm(column_type = "Text", unique)]
    pub term: String,

    /// May be empty
    #[sea_orm(column_type = "Text")]
    pub definition: String,

    pub created_at: DateTimeWithTimeZone,

    /// Entries are never updated; equals `created_at`
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
