//! Command interpreter
//!
//! Turns one submitted line into a [`CommandResult`]. Matching follows the
//! terminal's long-standing quirks: `help`, `clear` and `ls` must match
//! exactly, `cd`, `cat` and `view` are recognised by a case-insensitive
//! prefix, `pwd` ignores case, and `run` is the first word.

use crate::vfs::DirectoryTree;

const HELP_TEXT: &str = "Available commands: help, clear, ls, cd, cat, view, run, pwd";

/// The sort program `run` knows how to start
pub const SORT_PROGRAM: &str = "fordjohnson";

/// What the session should do with a submitted line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    /// Print the text (may be empty, or span several lines)
    Text(String),
    /// Fetch the text file at `path` and page through it
    EnterViewer { path: String },
    /// Load the image at `path` and show it
    EnterImageViewer { path: String },
    /// Sort the numbers and show the run
    RunVisualizer { numbers: Vec<i64> },
    /// Drop the scrollback
    ClearScreen,
    /// Nothing was typed
    Noop,
}

/// Navigation state the interpreter reads and changes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellState {
    /// Current directory, always a key of the tree
    pub cwd: String,
}

impl ShellState {
    pub fn new() -> Self {
        Self { cwd: "/".to_string() }
    }
}

impl Default for ShellState {
    fn default() -> Self {
        Self::new()
    }
}

/// Interpret one input line
pub fn interpret(line: &str, state: &mut ShellState, tree: &DirectoryTree) -> CommandResult {
    if line.is_empty() {
        return CommandResult::Noop;
    }

    let lower = line.to_lowercase();
    let args: Vec<&str> = line.split_whitespace().collect();

    match line {
        "help" => return CommandResult::Text(HELP_TEXT.to_string()),
        "clear" => return CommandResult::ClearScreen,
        "ls" => return cmd_ls(state, tree),
        _ => {}
    }

    if lower.starts_with("cd") {
        cmd_cd(&args, state, tree)
    } else if lower.starts_with("cat") {
        cmd_cat(&args, state, tree)
    } else if lower.starts_with("view") {
        cmd_view(&args, state, tree)
    } else if lower == "pwd" {
        CommandResult::Text(format!("Current directory: {}", state.cwd))
    } else if args.first() == Some(&"run") {
        cmd_run(&args, state, tree)
    } else {
        CommandResult::Text(format!(
            "Command '{}' not recognized. Type 'help' for assistance.",
            line
        ))
    }
}

fn text(s: impl Into<String>) -> CommandResult {
    CommandResult::Text(s.into())
}

fn is_image(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower.ends_with(".jpg") || lower.ends_with(".jpeg")
}

fn cmd_ls(state: &ShellState, tree: &DirectoryTree) -> CommandResult {
    match tree.listing(&state.cwd) {
        Ok(names) => text(format!("Directory {}: {}", state.cwd, names.join(", "))),
        Err(e) => text(format!("ls: {}", e)),
    }
}

/// cd - change directory
fn cmd_cd(args: &[&str], state: &mut ShellState, tree: &DirectoryTree) -> CommandResult {
    if args.len() != 2 {
        return text("Usage: cd [dir] (e.g., cd files, cd ..)");
    }

    let dir = args[1];
    if dir == ".." {
        state.cwd = tree.resolve_parent(&state.cwd);
        return text("");
    }

    match tree.resolve_child(&state.cwd, dir) {
        Ok(path) => {
            state.cwd = path;
            text("")
        }
        Err(_) => text(format!("Directory '{}' not found.", dir.to_lowercase())),
    }
}

/// cat - page through a text file
fn cmd_cat(args: &[&str], state: &ShellState, tree: &DirectoryTree) -> CommandResult {
    if args.len() != 2 {
        return text("Usage: cat [file]");
    }

    let file = args[1];
    if is_image(file) {
        return text(format!("cat: '{}' is an image. Use 'view {}' instead.", file, file));
    }
    if tree.is_dir(&crate::vfs::join(&state.cwd, file)) {
        return text(format!("cat: '{}' is a directory.", file));
    }

    match tree.find_file(&state.cwd, file) {
        Some(path) => CommandResult::EnterViewer { path },
        None => text(format!("File '{}' not found in {}.", file, state.cwd)),
    }
}

/// view - show an image
fn cmd_view(args: &[&str], state: &ShellState, tree: &DirectoryTree) -> CommandResult {
    if args.len() != 2 {
        return text("Usage: view [image]");
    }

    let file = args[1];
    if !is_image(file) {
        return text(format!("view: '{}' is not an image (.jpg/.jpeg).", file));
    }

    match tree.find_file(&state.cwd, file) {
        Some(path) => CommandResult::EnterImageViewer { path },
        None => text(format!("File '{}' not found in {}.", file, state.cwd)),
    }
}

/// run - start a program from the current directory
fn cmd_run(args: &[&str], state: &ShellState, tree: &DirectoryTree) -> CommandResult {
    let Some(program) = args.get(1) else {
        return text("Usage: run [program] [numbers...]");
    };

    if *program != SORT_PROGRAM || tree.find_file(&state.cwd, program).is_none() {
        return text(format!("Error: Program {} not found in {}.", program, state.cwd));
    }

    let numbers: Vec<i64> = args[2..].iter().filter_map(|a| parse_leading_int(a)).collect();
    if numbers.is_empty() {
        return text(format!("Invalid format. Use: run {} [numbers]", SORT_PROGRAM));
    }

    CommandResult::RunVisualizer { numbers }
}

/// Parse the integer at the start of `s`: optional sign, then digits.
/// Trailing garbage is ignored (`"12abc"` is 12); no digits gives `None`.
/// Values past the `i64` range saturate at `i64::MAX` / `i64::MIN`.
fn parse_leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if digits_end == 0 {
        return None;
    }
    let value = rest[..digits_end].bytes().fold(0i64, |acc, d| {
        let digit = i64::from(d - b'0');
        if negative {
            acc.saturating_mul(10).saturating_sub(digit)
        } else {
            acc.saturating_mul(10).saturating_add(digit)
        }
    });
    Some(value)
}
