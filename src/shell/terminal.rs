//! Terminal session - the state machine behind the screen
//!
//! Provides:
//! - Line editing with a movable cursor and command history
//! - Command submission through the interpreter
//! - Pager mode for text files and images
//! - Load requests for content, completed asynchronously by the host
//! - Cursor blinking on the idle tick
//!
//! The session never draws. After any call that returns `true` the host
//! composes a [`Frame`] with [`TerminalSession::frame`] and paints it.

use super::input::{CommandHistory, InputBuffer};
use super::interpreter::{interpret, CommandResult, ShellState};
use super::sort::{FordJohnsonSorter, Sorter};
use super::viewer::ViewerState;
use crate::config::TerminalConfig;
use crate::console_log;
use crate::layout::TextMeasurer;
use crate::platform::{ContentSource, KeyEvent, LoadError};
use crate::render::{self, Frame, RenderSink};
use crate::vfs::DirectoryTree;
use futures::future::LocalBoxFuture;
use futures::FutureExt;

/// A line in the scrollback
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputLine {
    /// A submitted command with the prompt it was typed at
    PromptEcho { prompt: String, command: String },
    /// Response text
    Plain(String),
}

impl OutputLine {
    pub fn plain(text: impl Into<String>) -> Self {
        Self::Plain(text.into())
    }

    /// The line as it reads on screen
    pub fn text(&self) -> String {
        match self {
            OutputLine::PromptEcho { prompt, command } => format!("{}{}", prompt, command),
            OutputLine::Plain(text) => text.clone(),
        }
    }
}

/// What a load request fetches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadKind {
    Text,
    Image,
}

/// A content load the host should run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    pub id: u64,
    pub kind: LoadKind,
    pub path: String,
}

/// Result of a load, by kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Text(Result<String, LoadError>),
    Image(Result<(), LoadError>),
}

/// A finished load, handed back with [`TerminalSession::complete_load`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadCompletion {
    pub id: u64,
    pub path: String,
    pub outcome: LoadOutcome,
}

/// Run a load request against a content source.
///
/// The returned future owns everything it needs, so the host can spawn it
/// and feed the completion back whenever it resolves.
pub fn fulfil(
    request: LoadRequest,
    source: &dyn ContentSource,
) -> LocalBoxFuture<'static, LoadCompletion> {
    let LoadRequest { id, kind, path } = request;
    let outcome: LocalBoxFuture<'static, LoadOutcome> = match kind {
        LoadKind::Text => source.fetch_text(&path).map(LoadOutcome::Text).boxed_local(),
        LoadKind::Image => source.load_image(&path).map(LoadOutcome::Image).boxed_local(),
    };
    async move {
        LoadCompletion {
            id,
            path,
            outcome: outcome.await,
        }
    }
    .boxed_local()
}

/// Cursor blink timing
#[derive(Debug, Clone, Copy)]
struct CursorBlink {
    visible: bool,
    last_toggle_ms: f64,
    interval_ms: f64,
}

impl CursorBlink {
    fn new(interval_ms: f64) -> Self {
        Self {
            visible: true,
            last_toggle_ms: 0.0,
            interval_ms,
        }
    }

    /// Flip visibility once the interval has passed since the last flip
    fn tick(&mut self, now_ms: f64) -> bool {
        if now_ms - self.last_toggle_ms > self.interval_ms {
            self.visible = !self.visible;
            self.last_toggle_ms = now_ms;
            true
        } else {
            false
        }
    }
}

/// Terminal state
pub struct TerminalSession {
    config: TerminalConfig,
    tree: DirectoryTree,
    shell: ShellState,

    /// Current input line
    input: InputBuffer,

    /// Submitted lines, newest first
    history: CommandHistory,

    /// Scrollback. Never trimmed; only a suffix is ever shown.
    lines: Vec<OutputLine>,

    viewer: ViewerState,
    blink: CursorBlink,
    sorter: Box<dyn Sorter>,

    next_load_id: u64,
    /// Issued but not yet picked up by the host
    queued_load: Option<LoadRequest>,
    /// The only load whose completion is still accepted
    awaited_load: Option<u64>,

    /// Numbers of the last sort run, for the visualizer
    visualization: Option<Vec<i64>>,
}

impl TerminalSession {
    pub fn new(config: TerminalConfig, tree: DirectoryTree) -> Self {
        Self {
            input: InputBuffer::new(config.input_capacity),
            blink: CursorBlink::new(config.cursor_blink_ms),
            config,
            tree,
            shell: ShellState::new(),
            history: CommandHistory::new(),
            lines: Vec::new(),
            viewer: ViewerState::new(),
            sorter: Box::new(FordJohnsonSorter::new()),
            next_load_id: 1,
            queued_load: None,
            awaited_load: None,
            visualization: None,
        }
    }

    /// Replace the sorting collaborator
    pub fn with_sorter(mut self, sorter: Box<dyn Sorter>) -> Self {
        self.sorter = sorter;
        self
    }

    pub fn config(&self) -> &TerminalConfig {
        &self.config
    }

    pub fn lines(&self) -> &[OutputLine] {
        &self.lines
    }

    pub fn input(&self) -> &InputBuffer {
        &self.input
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    pub fn viewer(&self) -> &ViewerState {
        &self.viewer
    }

    pub fn cwd(&self) -> &str {
        &self.shell.cwd
    }

    pub fn cursor_visible(&self) -> bool {
        self.blink.visible
    }

    /// Prompt for the current directory
    pub fn prompt(&self) -> String {
        self.config.prompt(&self.shell.cwd)
    }

    /// Print text to the scrollback, one line per `\n`
    pub fn print(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        for line in text.split('\n') {
            self.lines.push(OutputLine::plain(line));
        }
    }

    /// Handle a key press. Returns whether the screen needs a redraw.
    pub fn handle_key(&mut self, event: &KeyEvent, now_ms: f64) -> bool {
        if self.viewer.is_active() {
            return self.handle_viewer_key(event);
        }

        match event.key.as_str() {
            "Enter" => {
                self.submit(now_ms);
                true
            }
            "Backspace" => self.input.backspace(),
            "Delete" => self.input.delete(),
            "Home" => {
                self.input.home();
                true
            }
            "End" => {
                self.input.end();
                true
            }
            "ArrowLeft" => {
                self.input.move_left();
                true
            }
            "ArrowRight" => {
                self.input.move_right();
                true
            }
            "ArrowUp" => match self.history.older(self.input.text()) {
                Some(entry) => {
                    self.input.replace(entry);
                    true
                }
                None => false,
            },
            "ArrowDown" => match self.history.newer() {
                Some(entry) => {
                    self.input.replace(&entry);
                    true
                }
                None => false,
            },
            _ => match event.printable() {
                Some(ch) => self.input.insert(ch),
                None => false,
            },
        }
    }

    /// Does the current mode act on this key, whether or not anything
    /// changes? Hosts use it to keep the key from reaching the page.
    pub fn consumes_key(&self, event: &KeyEvent) -> bool {
        let key = event.key.as_str();
        if self.viewer.is_active() {
            return matches!(key, "ArrowDown" | "ArrowUp" | "q");
        }
        matches!(
            key,
            "Enter"
                | "Backspace"
                | "Delete"
                | "Home"
                | "End"
                | "ArrowLeft"
                | "ArrowRight"
                | "ArrowUp"
                | "ArrowDown"
        ) || event.printable().is_some()
    }

    fn handle_viewer_key(&mut self, event: &KeyEvent) -> bool {
        match event.key.as_str() {
            "ArrowDown" => self.viewer.scroll_down(),
            "ArrowUp" => self.viewer.scroll_up(),
            "q" => {
                self.viewer.close();
                true
            }
            _ => false,
        }
    }

    /// Submit the current input line
    fn submit(&mut self, now_ms: f64) {
        let line = self.input.take();
        if !line.is_empty() {
            self.history.push(line.clone());
        }
        self.history.reset();
        self.execute(&line, now_ms);
    }

    /// Run a command line as if it had been typed and submitted
    pub fn execute(&mut self, line: &str, now_ms: f64) {
        let prompt = self.prompt();

        match interpret(line, &mut self.shell, &self.tree) {
            CommandResult::Noop => {
                self.tick(now_ms);
            }
            CommandResult::ClearScreen => {
                self.lines.clear();
            }
            CommandResult::Text(body) => {
                self.echo(prompt, line);
                self.print(&body);
            }
            CommandResult::EnterViewer { path } => {
                self.echo(prompt, line);
                self.request_load(LoadKind::Text, path);
            }
            CommandResult::EnterImageViewer { path } => {
                self.echo(prompt, line);
                self.request_load(LoadKind::Image, path);
            }
            CommandResult::RunVisualizer { numbers } => {
                self.echo(prompt, line);
                let sorted = self.sorter.sort(&numbers);
                let listed: Vec<String> = sorted.iter().map(|n| n.to_string()).collect();
                self.print(&format!("Sorted: {}", listed.join(", ")));
                self.visualization = Some(numbers);
            }
        }
    }

    fn echo(&mut self, prompt: String, command: &str) {
        self.lines.push(OutputLine::PromptEcho {
            prompt,
            command: command.to_string(),
        });
    }

    /// Queue a load. A newer request replaces an older one outright.
    fn request_load(&mut self, kind: LoadKind, path: String) {
        let id = self.next_load_id;
        self.next_load_id += 1;

        if let Some(old) = self.awaited_load {
            console_log!("[session] load {} superseded by load {} ({})", old, id, path);
        }

        self.awaited_load = Some(id);
        self.queued_load = Some(LoadRequest { id, kind, path });
    }

    /// Take the load the host should start, if any
    pub fn take_load_request(&mut self) -> Option<LoadRequest> {
        self.queued_load.take()
    }

    /// Is a load still outstanding?
    pub fn is_loading(&self) -> bool {
        self.awaited_load.is_some()
    }

    /// Hand back a finished load. Returns whether the screen changed.
    ///
    /// Only the most recent request is accepted; anything older is stale
    /// and dropped. Failures open the viewer with the error as its text.
    pub fn complete_load(&mut self, completion: LoadCompletion) -> bool {
        if self.awaited_load != Some(completion.id) {
            console_log!(
                "[session] dropping stale load {} ({})",
                completion.id,
                completion.path
            );
            return false;
        }
        self.awaited_load = None;

        let LoadCompletion { path, outcome, .. } = completion;
        match outcome {
            LoadOutcome::Text(Ok(content)) => self.viewer.open_text(&content),
            LoadOutcome::Text(Err(e)) => {
                console_log!("[load] {} failed: {}", path, e);
                self.viewer.open_text(&format!("Error loading {}: {}", path, e));
            }
            LoadOutcome::Image(Ok(())) => self.viewer.open_image(path),
            LoadOutcome::Image(Err(e)) => {
                console_log!("[load] {} failed: {}", path, e);
                self.viewer.open_text(&format!("Failed to load image from {}", path));
            }
        }
        true
    }

    /// Numbers of the last `run fordjohnson`, once
    pub fn take_visualization(&mut self) -> Option<Vec<i64>> {
        self.visualization.take()
    }

    /// Idle tick. Blinks the cursor at most once per interval; returns
    /// whether the screen needs a redraw. Safe to call every frame.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        if self.viewer.is_active() {
            return false;
        }
        self.blink.tick(now_ms)
    }

    /// Compose the current frame
    pub fn frame(&self, measurer: &(impl TextMeasurer + ?Sized)) -> Frame {
        render::compose(self, measurer)
    }

    /// Compose and paint onto a surface that both measures and paints
    pub fn render<S: TextMeasurer + RenderSink>(&self, surface: &mut S) {
        let frame = self.frame(&*surface);
        surface.paint(&frame);
    }
}

impl Default for TerminalSession {
    fn default() -> Self {
        Self::new(TerminalConfig::default(), DirectoryTree::default())
    }
}
