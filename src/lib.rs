//! # uml2grammar
//!
//! Transforms UML class models into grammar models.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! pipeline     → transform / transform_xmi / generate
//!   ↓
//! grammar      → Grammar metamodel, GrammarBuilder, link, render
//!   ↓
//! uml          → UML metamodel, IdentifierIndex, UmlBuilder
//!   ↓
//! interchange  → RawNode tree, XMI reader
//!   ↓
//! base         → Primitives (Name, XmiId)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! use uml2grammar::{TransformConfig, grammar::render, transform_xmi};
//!
//! let xmi = std::fs::read("fsm.uml")?;
//! let grammar = transform_xmi(&xmi, &TransformConfig::default())?;
//! println!("{}", render(&grammar));
//! ```

// ============================================================================
// MODULES (dependency order: base → interchange → uml → grammar → pipeline)
// ============================================================================

/// Foundation types: Name, XmiId
pub mod base;

/// Source model interchange: raw tree, XMI reader
pub mod interchange;

/// UML metamodel and model building
pub mod uml;

/// Grammar metamodel, building, linking and rendering
pub mod grammar;

/// Transformation settings
pub mod config;

/// Error type shared by every phase
pub mod error;

/// Phase orchestration
pub mod pipeline;

// Re-export commonly needed items
pub use config::{AssociationArityPolicy, OptionalityPolicy, TransformConfig};
pub use error::TransformError;
pub use grammar::Grammar;
pub use pipeline::transform;
#[cfg(feature = "interchange")]
pub use pipeline::{generate, transform_xmi};
