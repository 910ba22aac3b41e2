//! Ideograph decomposition formats
//!
//! This crate owns every *text* format the workspace reads or writes and the
//! small vocabularies those formats are built on:
//!
//! - `key`: character keys and the domain ordering (intermediates first)
//! - `shape`: the shape vocabulary, modifier suffixes and arity classes
//! - `record`: the `KEY:SHAPE(COMP,...)COMMENT` record grammar
//! - `ids`: the prefix ideographic-description-sequence grammar (cross-checks)
//! - `unnest`: rewriting nested decompositions into flat records
//! - `blocks`: Unicode block classification used by reports
//!
//! Nothing here touches the filesystem; callers hand in text and get typed
//! values (or typed errors) back.

pub mod blocks;
pub mod ids;
pub mod key;
pub mod record;
pub mod shape;
pub mod unnest;

pub use blocks::UnicodeBlock;
pub use ids::{parse_ids_file, parse_ids_sequence, IdsDecomp, IdsKind, IdsOperator, IdsParseError, IdsTable};
pub use key::{is_intermediate, key_cmp, sort_keys};
pub use record::{
    format_record_line, parse_record_line, parse_records, DecompRecord, ParsedRecords,
    RecordParseError,
};
pub use shape::{Arity, Modifier, Shape, ShapeFamily};
pub use unnest::{unnest_line, unnest_text, UnnestError, Unnested, UnnestedText};
