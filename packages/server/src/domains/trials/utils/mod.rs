//! Pure functions for building registry queries and filtering studies.
//!
//! No side effects live here.

pub mod eligibility;
pub mod query_builder;

pub use eligibility::{age_in_range, is_eligible, parse_age_years, select_studies, sex_matches, truncate_summary, Selection};
pub use query_builder::{build_expr, BROAD_QUERY};
