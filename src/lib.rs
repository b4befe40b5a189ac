pub mod curve;
pub mod error;
pub mod frame;
pub mod math;

pub use error::{CurvisError, Result};
