//! Ideograph decomposition graph
//!
//! ```text
//! charData.txt ──► parse ──► DecompStore ──► resolve (fixpoint) ──► views
//! replaceChars.txt ──┘          │                                   │
//!                               └── merge ──► resolve ──► serialize  └─► signatures
//! ```
//!
//! - `store`: the keyed record map plus enumeration sequence, merge and
//!   serialization
//! - `load`: building a store from the primary and replacement files
//! - `resolve`: owner computation and orphan-intermediate cleanup
//! - `signature`: decomposition tags, owner tags, expansion, flattening and
//!   bottom-up leveling
//! - `views`: grouping of keys by shape, leader, signature, form and tag
//! - `crossval`: comparison against parsed IDS data
//!
//! The store is built once per run and then only read, apart from explicit
//! merges which leave owner lists stale until the next [`DecompStore::resolve`].

pub mod crossval;
pub mod load;
pub mod resolve;
pub mod signature;
pub mod store;
pub mod views;

pub use crossval::{ComparisonBuckets, IdsComparison, MergeSuggestion};
pub use load::LoadReport;
pub use resolve::ResolveReport;
pub use signature::{BottomUp, EXPANSION_DEPTH};
pub use store::{DecompStore, Entry};
pub use views::{BlockTallies, Group, RadicalBucket};
