pub mod error;
pub mod language;
pub mod model;
pub mod provider;
pub mod text;
pub mod traits;
pub mod ui;
