// HTTP routes
pub mod health;
pub mod trials;

pub use health::*;
pub use trials::*;
