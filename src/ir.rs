//! Intermediate representations of translation values.

pub mod reference;
pub mod template;
