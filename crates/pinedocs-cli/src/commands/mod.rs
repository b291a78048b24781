//! Command implementations for the pinedocs CLI.
//!
//! Each subcommand lives in its own submodule; `run` composes the other two.

mod content;
mod run;
mod urls;

pub use content::execute as content;
pub use run::execute as run;
pub use urls::execute as urls;
