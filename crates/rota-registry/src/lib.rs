mod error;
mod person;
mod registry;
mod reservations;

pub use error::*;
pub use person::*;
pub use registry::*;
pub use reservations::*;
