pub mod generation;

pub use generation::{resolve_model, validate_generation_params};
