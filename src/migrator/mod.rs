use sea_orm_migration::prelude::*;

mod m20260807_000001_create_dog_profiles;
mod m20260807_000002_create_heat_cycles;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260807_000001_create_dog_profiles::Migration),
            Box::new(m20260807_000002_create_heat_cycles::Migration),
        ]
    }
}
