//! Source model interchange.
//!
//! The transformation core consumes a generic attributed tree ([`RawNode`]),
//! independent of the document format it came from. With the `interchange`
//! feature, [`Xmi`] produces that tree from XMI documents.
//!
//! ```text
//! ┌──────────────┐   Xmi::read   ┌──────────────┐  packaged_elements  ┌─────────────┐
//! │   XMI bytes  │ ────────────▶ │ XmiDocument  │ ──────────────────▶ │ [&RawNode]  │
//! └──────────────┘               └──────────────┘                     └─────────────┘
//! ```

mod error;
mod node;
#[cfg(feature = "interchange")]
mod xmi;

pub use error::InterchangeError;
pub use node::{ATTR_PREFIX, ID_ATTR, KIND_ATTR, RawNode, RawValue};
#[cfg(feature = "interchange")]
pub use xmi::{Xmi, XmiDocument};
