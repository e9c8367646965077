pub mod error;
pub mod satellites;
pub mod selection;
pub mod ships;
pub mod types;
