//! Domain layer modules
//!
//! This module contains business domain logic:
//! - `template`: Template catalog, query and substitution
//! - `picker`: Template selection and note creation

pub mod picker;
pub mod template;
