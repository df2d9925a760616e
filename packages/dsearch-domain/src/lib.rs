pub mod category;
pub mod language;
pub mod query;
