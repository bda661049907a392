pub mod builder;
pub mod definition;

pub use builder::*;
pub use definition::*;
