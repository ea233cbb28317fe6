mod ids;
mod profile;
mod records;
mod trip;

pub use ids::*;
pub use profile::*;
pub use records::*;
pub use trip::*;

pub const FIRST_ID: u64 = 1;
