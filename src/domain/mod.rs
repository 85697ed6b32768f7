//! Domain layer - documents, export jobs and chat content.
//!
//! Pure types and rules with no I/O. Adapters decode platform payloads into
//! these types once, at the boundary.

pub mod document;
pub mod export;
pub mod foundation;
pub mod message;
