use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DogProfiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DogProfiles::Name)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DogProfiles::Breed).string().not_null())
                    .col(ColumnDef::new(DogProfiles::AgeMonths).integer().not_null())
                    .col(ColumnDef::new(DogProfiles::WeightKg).double().not_null())
                    .col(
                        ColumnDef::new(DogProfiles::LastUpdated)
                            .date_time()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DogProfiles::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum DogProfiles {
    Table,
    Name,
    Breed,
    AgeMonths,
    WeightKg,
    LastUpdated,
}
