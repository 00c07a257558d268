pub mod config_io;
pub mod lock;
pub mod record_io;
pub mod watcher;
