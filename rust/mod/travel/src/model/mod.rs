mod destination;
mod relation;

pub use destination::*;
pub use relation::*;
