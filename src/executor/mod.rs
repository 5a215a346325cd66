//! Action execution module
//!
//! - `interpreter`: decides how a script file is launched
//! - `runner`: runs one action against one target
//! - `stderr_buffer`: bounded diagnostic tail attached to failures

mod interpreter;
mod runner;
mod stderr_buffer;

pub use interpreter::{command_for, find_executable, interpreter_for, is_image, is_runnable};

pub(crate) use interpreter::image_extensions;

pub use runner::{
    build_command, run_action, RunResult, ENV_ACTION, ENV_KIND, ENV_TAB, ENV_URL, ENV_WINDOW,
};

pub use stderr_buffer::StderrBuffer;

#[cfg(test)]
#[path = "../executor_tests.rs"]
mod tests;
