pub mod descriptor;
pub mod environment;
pub mod error;
pub mod extensions;

// Re-export main types
pub use descriptor::*;
pub use environment::*;
pub use error::*;
pub use extensions::*;
