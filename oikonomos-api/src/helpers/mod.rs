pub mod database;
pub mod dates;
pub mod money;
