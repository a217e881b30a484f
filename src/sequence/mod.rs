//! Sequence mapping module.
//!
//! Provides:
//! - Date to delta-day index conversion and its inverse
//! - Calendar and index ranges for download jobs

pub mod mapper;
pub mod range;

pub use mapper::{
    base_date, date_to_index, index_to_date, is_business_day, SequenceIndex, BASE_INDEX,
    HOLE_INDEX,
};
pub use range::{DateRange, IndexRange, ResolvedRange};
