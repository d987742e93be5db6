pub mod api;
pub mod classifier;
pub mod config;
pub mod model;
pub mod store;
pub mod ticket;

pub use classifier::{classify_complaint, detect_language, Classification, ScoreMap};
pub use model::{Category, Language};
