pub mod csv_export;
pub mod file;
pub mod settings;

pub use file::{load_project, save_project};
