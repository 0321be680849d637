pub mod editors;
pub mod views;
