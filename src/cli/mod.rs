mod args;
mod ask;
mod process;
mod search;

pub use args::{Args, Command};
pub use ask::run_ask;
pub use process::{run_process, run_status};
pub use search::run_search;
