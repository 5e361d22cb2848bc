//! Domain entities and value objects of the HR schema.

pub mod entities;
pub mod value_objects;

pub use entities::*;
pub use value_objects::*;
