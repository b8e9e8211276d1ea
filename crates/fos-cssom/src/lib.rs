//! fOS CSS Object Model
//!
//! In-memory style sheet tree, value and color model, shorthand expansion
//! and compaction, and cascade merging of declaration blocks.

pub mod cascade;
pub mod color;
pub mod config;
pub mod declaration;
pub mod named_colors;
pub mod selectors;
pub mod shorthands;
pub mod traversal;
pub mod tree;
pub mod values;

pub use cascade::{merge_declarations, merge_declarations_with, DeclarationMerger};
pub use color::{Channel, Color, ColorFamily};
pub use config::Config;
pub use declaration::{AtRuleSet, DeclarationBlock, Rule, RuleSet};
pub use selectors::{Comparison, Selector, Specificity, SpecificityFilter};
pub use shorthands::{create_shorthands, expand_shorthands};
pub use traversal::ValueRoot;
pub use tree::{Charset, CssList, Document, Import, MediaQuery, Node};
pub use values::{Function, Separator, Size, Value, ValueList};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// CSS object model error
#[derive(Debug, thiserror::Error)]
pub enum CssomError {
    #[error("Invalid specificity filter: {0:?}")]
    InvalidFilter(String),
}
