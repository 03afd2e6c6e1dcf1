// Billboard sightings: persistence, photo ingestion, stats and their HTTP handlers.
pub mod handlers;
pub mod photos;
pub mod repository;

pub use photos::PhotoStore;
pub use repository::{PanneauRepository, PgPanneauRepository};
