//! SeaORM entity models
//!
//! Database entities for the Dog Breeds pipeline

mod breed;

pub use breed::{
    Entity as BreedEntity,
    Model as Breed,
    ActiveModel as BreedActiveModel,
    Column as BreedColumn,
};
