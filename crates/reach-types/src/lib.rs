pub mod field;
pub mod mesh;
pub mod pose;
pub mod stats;

pub use field::*;
pub use mesh::*;
pub use pose::*;
pub use stats::*;
