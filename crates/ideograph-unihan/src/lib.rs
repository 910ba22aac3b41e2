//! Unihan database readers
//!
//! Every Unihan file shares one line format, `U+XXXX<TAB>FIELD<TAB>VALUE`,
//! with `#` comment lines. Each reader consumes the fields it knows and
//! tallies the rest:
//!
//! - `fields`: the shared line reader
//! - `irg`: `kIICore` priorities and `kIRG_GSource` simplified marks
//! - `readings`: `kMandarin` syllables and their initial/final/tone split
//! - `frequency`: `kFrequency` ranks combined with the simplified marks
//! - `variants`: variant fields joined into connected groups

pub mod fields;
pub mod frequency;
pub mod irg;
pub mod readings;
pub mod variants;

pub use fields::{parse_field_line, FieldLine, UnihanLineError};
pub use frequency::{CharStats, Frequencies};
pub use irg::{CoreChar, IrgSources, Priority};
pub use readings::{split_syllable, SyllableEntry, SyllableParts, SyllableTable};
pub use variants::{VariantGraph, VariantGroup, VariantLink};
