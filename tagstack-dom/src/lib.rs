//! Document mutation layer for tagstack.
//!
//! Vendor adapters never touch a DOM directly. They describe the markup they
//! need as [`ScriptElement`]s and fallback snippets, and hand them to a
//! [`DocumentMutator`]:
//! - [`MemoryDocument`]: in-memory document that records every mutation
//! - `WebDocument` (feature `web`): the live browser document via `web-sys`
//!
//! The remove-then-insert discipline lives in the adapters; the mutator only
//! has to apply operations in the order it receives them.

mod element;
mod error;
mod memory;
mod mutator;
#[cfg(feature = "web")]
mod web;

pub use element::{Fallback, PageLocation, ScriptElement, ScriptPosition, ScriptSource};
pub use error::{DomError, DomResult};
pub use memory::{MemoryDocument, Mutation};
pub use mutator::DocumentMutator;
#[cfg(feature = "web")]
pub use web::WebDocument;
