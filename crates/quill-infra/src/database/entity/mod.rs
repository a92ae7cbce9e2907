//! SeaORM entities.

pub mod post_record;
