// crates/forgeboard-core/src/lib.rs
pub mod catalog;
pub mod index;
pub mod select;
pub mod schema;
pub mod validate;
pub mod widget;

pub use catalog::*;
pub use index::*;
pub use select::*;
pub use schema::*;
pub use validate::*;
pub use widget::*;

#[derive(Debug, thiserror::Error)]
pub enum ForgeError {
    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    #[error("Invalid requirement schema: {0}")]
    InvalidSchema(String),

    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unknown feature: {0}")]
    UnknownFeature(String),
}

pub type Result<T> = std::result::Result<T, ForgeError>;
