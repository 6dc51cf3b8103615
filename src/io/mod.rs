pub mod board_io;
pub mod config_io;
pub mod lock;
