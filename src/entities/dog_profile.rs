use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "dog_profiles")]
pub struct Model {
    /// Dog name, the natural key the mobile client upserts by.
    #[sea_orm(primary_key, auto_increment = false)]
    pub name: String,
    pub breed: String,
    pub age_months: i32,
    pub weight_kg: f64,
    pub last_updated: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
