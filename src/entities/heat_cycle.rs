use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Append-only heat-cycle prediction history, queried by dog name ordered
/// by creation time descending.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "heat_cycles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub dog_name: String,
    pub prediction_type: String,
    pub prediction_value: f64,
    pub prediction_unit: String,
    pub estimated_date: Date,
    pub fertility_status: String,
    pub alert_level: String,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
