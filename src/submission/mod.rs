pub mod compose;
pub mod honeypot;
pub mod metadata;
pub mod model;
pub mod parser;
pub mod pipeline;
pub mod validate;

pub use model::Submission;
pub use validate::{FieldSource, ValidationError};
