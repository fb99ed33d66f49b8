pub mod categories;
pub mod posts;
