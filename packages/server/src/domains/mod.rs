// Business domains
pub mod trials;
