//! Shell - the command line behind the screen
//!
//! - Line editing and history (`input`)
//! - Command interpretation against the directory tree (`interpreter`)
//! - The pager (`viewer`)
//! - The sorting program `run fordjohnson` drives (`sort`)
//! - The session tying them to key events and frames (`terminal`)

pub mod input;
pub mod interpreter;
pub mod sort;
pub mod terminal;
pub mod viewer;

pub use input::{CommandHistory, InputBuffer};
pub use interpreter::{interpret, CommandResult, ShellState, SORT_PROGRAM};
pub use sort::{FordJohnsonSorter, SortStep, SortTrace, Sorter};
pub use terminal::{
    fulfil, LoadCompletion, LoadKind, LoadOutcome, LoadRequest, OutputLine, TerminalSession,
};
pub use viewer::{paginate, ViewerState};
