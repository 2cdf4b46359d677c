pub mod pagination;
pub mod template;
pub mod workspace;

pub use pagination::*;
pub use template::*;
pub use workspace::*;
