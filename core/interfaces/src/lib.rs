mod checkpointer;
mod child_chain;
mod config;
mod root_chain;

pub use checkpointer::*;
pub use child_chain::*;
pub use config::*;
pub use root_chain::*;
