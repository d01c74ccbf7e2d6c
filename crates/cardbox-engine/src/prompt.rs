//! The interaction port for operator decisions.
//!
//! Allocation conflicts cannot be resolved from the data alone: when an
//! import shrinks a card's owned count below what decks already commit, only
//! the operator knows which deck gives up its copies. The engine therefore
//! takes its decisions through this trait instead of talking to a terminal,
//! which also lets tests drive the resolver with a scripted double.

use crate::error::Result;

/// Provider of interactive decisions.
///
/// Every method may return [`crate::Error::Cancelled`], which aborts the
/// enclosing operation entirely.
pub trait DecisionProvider {
    /// Ask a yes/no question.
    fn confirm(&self, prompt: &str) -> Result<bool>;

    /// Ask the operator to pick one of `options`; returns the index.
    fn select(&self, prompt: &str, options: &[String]) -> Result<usize>;

    /// Ask for an amount within `min..=max` inclusive.
    fn prompt_amount(&self, prompt: &str, min: u32, max: u32) -> Result<u32>;
}
