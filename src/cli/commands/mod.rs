//! CLI command implementations.

mod config;
mod doctor;
mod export;
mod extract;
mod init;
mod list;
mod parse;

pub use config::run_config;
pub use doctor::run_doctor;
pub use export::run_export;
pub use extract::{run_extract, ExtractArgs};
pub use init::run_init;
pub use list::run_list;
pub use parse::run_parse;
