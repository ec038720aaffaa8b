//! Foundation types shared by every layer.
//!
//! - [`XmiId`] - identifiers carried by source model elements (`xmi:id`)
//! - [`Name`] - element and attribute names
//!
//! This module has NO dependencies on other crate modules.

mod id;

pub use id::XmiId;

/// Element, attribute and type names. Inline for short names, cheap to clone.
pub type Name = smol_str::SmolStr;
