pub mod board;
pub mod session;
pub mod settings;
pub mod sketch;
pub mod snapshot;
