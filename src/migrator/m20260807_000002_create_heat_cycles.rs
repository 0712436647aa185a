use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(HeatCycles::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(HeatCycles::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(HeatCycles::DogName).string().not_null())
                    .col(ColumnDef::new(HeatCycles::PredictionType).string().not_null())
                    .col(ColumnDef::new(HeatCycles::PredictionValue).double().not_null())
                    .col(ColumnDef::new(HeatCycles::PredictionUnit).string().not_null())
                    .col(ColumnDef::new(HeatCycles::EstimatedDate).date().not_null())
                    .col(ColumnDef::new(HeatCycles::FertilityStatus).string().not_null())
                    .col(ColumnDef::new(HeatCycles::AlertLevel).string().not_null())
                    .col(ColumnDef::new(HeatCycles::CreatedAt).date_time().not_null())
                    .to_owned(),
            )
            .await?;

        // Heat-cycle history is always read per dog, newest first.
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_heat_cycles_dog_name_created_at")
                    .table(HeatCycles::Table)
                    .col(HeatCycles::DogName)
                    .col(HeatCycles::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(HeatCycles::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum HeatCycles {
    Table,
    Id,
    DogName,
    PredictionType,
    PredictionValue,
    PredictionUnit,
    EstimatedDate,
    FertilityStatus,
    AlertLevel,
    CreatedAt,
}
