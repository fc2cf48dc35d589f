pub mod error;
pub mod model;
pub mod text;
pub mod types;

pub use error::{Error, Result};
pub use model::LanguageModel;
pub use types::{Article, Outline, OutlineSection, SearchResult, SourceRecord};
