pub use super::dog_profile::Entity as DogProfiles;
pub use super::heat_cycle::Entity as HeatCycles;
