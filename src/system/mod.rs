pub mod collector;
pub mod process;
pub mod procfs;
pub mod snapshot;
