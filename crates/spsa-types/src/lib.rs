pub mod errors;
pub mod problem;
pub mod result;
pub mod support;

pub use errors::*;
pub use problem::*;
pub use result::*;
pub use support::*;
