mod lmdb;
mod recorder;
mod sink;

pub use lmdb::*;
pub use recorder::*;
pub use sink::*;
