mod identity;
mod profile;
mod session;

pub use identity::*;
pub use profile::*;
pub use session::*;
