//! HTML normalization for wiki-export pages.
//!
//! This crate turns idiosyncratic wiki-export HTML into a small set of
//! converter-friendly constructs:
//! - [`dom`] — the mutable document-tree accessor (kuchiki wrapper)
//! - [`normalize`] — the structural fix-up passes (panels, icons, links,
//!   classes, chrome removal)
//! - [`table`] — grid reconstruction into literal pipe-table blocks
//! - [`postprocess`] — text passes applied after the external renderer ran

pub mod dom;
pub mod normalize;
pub mod postprocess;
pub mod table;

pub use normalize::NormalizedContent;
