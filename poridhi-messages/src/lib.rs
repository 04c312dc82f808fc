//! poridhi-messages
//!
//! User-facing message templates and the builder that fills them in.

pub mod builder;
pub mod macros;
pub mod messages;
