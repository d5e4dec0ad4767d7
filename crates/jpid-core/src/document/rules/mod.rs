//! Rule-based building blocks for Japanese identity documents.

pub mod markers;
pub mod validators;
pub mod patterns;
pub mod normalize;
pub mod regions;

pub use validators::{is_valid_address, is_valid_date, is_valid_id_number, is_valid_name};
pub use patterns::{ExtractionPattern, PatternTable};
pub use regions::{extract_municipality, extract_name};
