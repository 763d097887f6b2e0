//! Data module - CSV loading and reshaping

mod loader;
mod processor;

pub use loader::DataLoader;
pub use processor::{ContributorRow, DataProcessor, GenreRow, LongTables, PairRow, Role};
