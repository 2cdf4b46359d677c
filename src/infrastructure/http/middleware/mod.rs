pub mod error;
pub mod workspace;

pub use error::*;
pub use workspace::*;
