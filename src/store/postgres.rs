use async_trait::async_trait;
use sea_orm::{
    sea_query::OnConflict, ColumnTrait, Database, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use sea_orm_migration::MigratorTrait;
use uuid::Uuid;

use crate::entities::{dog_profile, heat_cycle};
use crate::fertility::FertilityPrediction;
use crate::migrator::Migrator;
use crate::state::DogProfile;

use super::{ProfileStore, StoreError};

/// Postgres-backed profile mirror (sea-orm).
pub struct PostgresStore {
    db: DatabaseConnection,
}

impl PostgresStore {
    /// Connect and bring the schema up to date.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let db = Database::connect(database_url).await?;
        Migrator::up(&db, None).await?;
        Ok(Self { db })
    }

    pub fn from_connection(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProfileStore for PostgresStore {
    async fn save_profile(&self, profile: &DogProfile) -> Result<(), StoreError> {
        let model = dog_profile::ActiveModel {
            name: Set(profile.name.clone()),
            breed: Set(profile.breed.clone()),
            age_months: Set(profile.age_months),
            weight_kg: Set(profile.weight_kg),
            last_updated: Set(profile.last_updated),
        };

        dog_profile::Entity::insert(model)
            .on_conflict(
                OnConflict::column(dog_profile::Column::Name)
                    .update_columns([
                        dog_profile::Column::Breed,
                        dog_profile::Column::AgeMonths,
                        dog_profile::Column::WeightKg,
                        dog_profile::Column::LastUpdated,
                    ])
                    .to_owned(),
            )
            .exec(&self.db)
            .await?;
        Ok(())
    }

    async fn append_cycle(&self, prediction: &FertilityPrediction) -> Result<(), StoreError> {
        let model = heat_cycle::ActiveModel {
            id: Set(Uuid::new_v4()),
            dog_name: Set(prediction.dog_name.clone()),
            prediction_type: Set(prediction.prediction_type.as_str().to_string()),
            prediction_value: Set(prediction.prediction_value),
            prediction_unit: Set(prediction.prediction_unit.as_str().to_string()),
            estimated_date: Set(prediction.estimated_date),
            fertility_status: Set(prediction.fertility_status.clone()),
            alert_level: Set(prediction.alert_level.as_str().to_string()),
            created_at: Set(prediction.timestamp),
        };

        heat_cycle::Entity::insert(model).exec(&self.db).await?;
        Ok(())
    }

    async fn fetch_profile(&self, name: &str) -> Result<Option<DogProfile>, StoreError> {
        let found = dog_profile::Entity::find_by_id(name).one(&self.db).await?;
        Ok(found.map(profile_from_model))
    }

    async fn list_profiles(&self) -> Result<Vec<DogProfile>, StoreError> {
        let rows = dog_profile::Entity::find().all(&self.db).await?;
        Ok(rows.into_iter().map(profile_from_model).collect())
    }

    async fn query_cycles(
        &self,
        name: &str,
        limit: u64,
    ) -> Result<Vec<heat_cycle::Model>, StoreError> {
        let rows = heat_cycle::Entity::find()
            .filter(heat_cycle::Column::DogName.eq(name))
            .order_by_desc(heat_cycle::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await?;
        Ok(rows)
    }
}

fn profile_from_model(model: dog_profile::Model) -> DogProfile {
    DogProfile {
        name: model.name,
        breed: model.breed,
        age_months: model.age_months,
        weight_kg: model.weight_kg,
        last_updated: model.last_updated,
        latest_prediction: None,
    }
}
