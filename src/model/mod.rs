pub mod config;
pub mod field;
pub mod record;

pub use config::*;
pub use field::*;
pub use record::*;
