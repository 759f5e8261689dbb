pub use config::Config;
pub use input::{split_batches, Batch};
pub use session::run_session;

pub mod config;
pub mod input;
pub mod session;
