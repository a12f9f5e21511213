//! Generic method binding.
//!
//! ## Components
//!
//! - [`build_substitution_map`]: Pair explicit type arguments with generic parameters
//! - [`infer_substitution`]: Infer generic arguments from call arguments
//! - [`specialize_method`]: Produce the concrete method for a substitution

mod inference;
mod substitution;

pub use inference::infer_substitution;
pub use substitution::{build_substitution_map, specialize_method};
