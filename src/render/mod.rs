//! Frame composition
//!
//! Turns session state into a [`Frame`]: positioned, colour-tagged runs of
//! text. Painting is the job of a [`RenderSink`]; this module never touches
//! a drawing backend, so layouts can be checked with [`PlainTextSink`].
//!
//! Screen layout (default geometry):
//!
//! ```text
//! y=20   Welcome to Ngaurama-Linux 1.8 LTS          banner rows
//! y=40   >> Type "help" to get started
//! y=100  evaluator@42:/ ~$ ls                       scrollback suffix
//! y=120  Directory /: files, programs, images
//! y=140  evaluator@42:/ ~$ cd fi┃                   prompt + input rows
//! ```

#[cfg(target_arch = "wasm32")]
pub mod canvas;

use crate::config::{Palette, TerminalConfig};
use crate::layout::{break_chars, fit_scrollback, locate_cursor, wrap_words, FontSpec, TextMeasurer};
use crate::shell::{OutputLine, TerminalSession};

/// Kind of text, mapped to a colour by the palette
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorTag {
    Banner,
    Echo,
    Response,
    Prompt,
    Input,
    Cursor,
    ViewerText,
    ViewerHint,
}

impl ColorTag {
    pub fn css(self, palette: &Palette) -> &str {
        match self {
            ColorTag::Banner => &palette.banner,
            ColorTag::Echo => &palette.echo,
            ColorTag::Response => &palette.response,
            ColorTag::Prompt => &palette.prompt,
            ColorTag::Input => &palette.input,
            ColorTag::Cursor => &palette.cursor,
            ColorTag::ViewerText => &palette.viewer_text,
            ColorTag::ViewerHint => &palette.viewer_hint,
        }
    }
}

/// Text at a position. `y` is the top of the row.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub tag: ColorTag,
}

/// The command line screen
#[derive(Debug, Clone, PartialEq)]
pub struct TerminalFrame {
    pub font: FontSpec,
    pub banner: Vec<TextRun>,
    pub history: Vec<TextRun>,
    pub prompt: TextRun,
    pub input: Vec<TextRun>,
    /// Absent while the cursor blinks off
    pub cursor: Option<TextRun>,
}

/// The pager screen
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerFrame {
    pub font: FontSpec,
    pub lines: Vec<TextRun>,
    /// Image to draw over the whole surface
    pub image: Option<String>,
    pub hint: TextRun,
}

/// Everything needed to paint one frame
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    Terminal(TerminalFrame),
    Viewer(ViewerFrame),
}

impl Frame {
    /// All text runs in painting order
    pub fn runs(&self) -> Vec<&TextRun> {
        match self {
            Frame::Terminal(t) => t
                .banner
                .iter()
                .chain(&t.history)
                .chain(std::iter::once(&t.prompt))
                .chain(&t.input)
                .chain(&t.cursor)
                .collect(),
            Frame::Viewer(v) => v.lines.iter().chain(std::iter::once(&v.hint)).collect(),
        }
    }
}

/// Render-sink collaborator: paints a frame somewhere
pub trait RenderSink {
    fn paint(&mut self, frame: &Frame);
}

/// Sink that flattens a frame into lines of text, one per row.
///
/// Runs on the same row are joined left to right; the cursor glyph is left
/// out so the text reads as typed.
#[derive(Debug, Clone, Default)]
pub struct PlainTextSink {
    pub lines: Vec<String>,
    pub image: Option<String>,
}

impl PlainTextSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

impl RenderSink for PlainTextSink {
    fn paint(&mut self, frame: &Frame) {
        let mut runs: Vec<&TextRun> = frame
            .runs()
            .into_iter()
            .filter(|r| r.tag != ColorTag::Cursor)
            .collect();
        runs.sort_by(|a, b| a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x)));

        self.lines.clear();
        let mut last_y = None;
        for run in runs {
            if last_y == Some(run.y) {
                if let Some(line) = self.lines.last_mut() {
                    line.push_str(&run.text);
                }
            } else {
                self.lines.push(run.text.clone());
                last_y = Some(run.y);
            }
        }

        self.image = match frame {
            Frame::Viewer(v) => v.image.clone(),
            Frame::Terminal(_) => None,
        };
    }
}

/// Visual rows an output line takes.
///
/// A prompt echo puts the command to the right of the prompt, so the
/// command wraps in what is left of the row. Both halves wrap on their own
/// and the line is as tall as the taller one.
pub fn line_rows(line: &OutputLine, max_width: f64, measure: &impl Fn(&str) -> f64) -> usize {
    match line {
        OutputLine::Plain(text) => wrap_words(text, max_width, measure).len(),
        OutputLine::PromptEcho { prompt, command } => {
            let prompt_width = measure(prompt);
            let prompt_rows = wrap_words(prompt, max_width, measure).len();
            let command_rows = wrap_words(command, max_width - prompt_width, measure).len();
            prompt_rows.max(command_rows)
        }
    }
}

/// Runs for one output line whose first row is at `first_row`
fn layout_line(
    line: &OutputLine,
    first_row: usize,
    config: &TerminalConfig,
    measure: &impl Fn(&str) -> f64,
) -> Vec<TextRun> {
    let screen = &config.screen;
    let mut runs = Vec::new();

    let mut push_rows = |rows: Vec<String>, x: f64, tag: ColorTag| {
        for (i, text) in rows.into_iter().enumerate() {
            runs.push(TextRun {
                text,
                x,
                y: screen.row_y(first_row + i),
                tag,
            });
        }
    };

    match line {
        OutputLine::Plain(text) => {
            push_rows(
                wrap_words(text, screen.max_width, measure),
                screen.margin,
                ColorTag::Response,
            );
        }
        OutputLine::PromptEcho { prompt, command } => {
            let prompt_width = measure(prompt);
            push_rows(
                wrap_words(prompt, screen.max_width, measure),
                screen.margin,
                ColorTag::Echo,
            );
            push_rows(
                wrap_words(command, screen.max_width - prompt_width, measure),
                screen.margin + prompt_width,
                ColorTag::Echo,
            );
        }
    }

    runs
}

/// Compose the frame for the session's current mode
pub fn compose(session: &TerminalSession, measurer: &(impl TextMeasurer + ?Sized)) -> Frame {
    if session.viewer().is_active() {
        Frame::Viewer(compose_viewer(session, measurer))
    } else {
        Frame::Terminal(compose_terminal(session, measurer))
    }
}

fn compose_terminal(
    session: &TerminalSession,
    measurer: &(impl TextMeasurer + ?Sized),
) -> TerminalFrame {
    let config = session.config();
    let screen = &config.screen;
    let font = config.terminal_font.clone();
    let measure = |s: &str| measurer.measure_width(s, &font);

    let banner = config
        .banner
        .iter()
        .take(screen.banner_rows)
        .enumerate()
        .map(|(i, text)| TextRun {
            text: text.clone(),
            x: screen.margin,
            y: screen.row_y(i),
            tag: ColorTag::Banner,
        })
        .collect();

    let visible = fit_scrollback(session.lines(), screen.row_budget(), |line| {
        line_rows(line, screen.max_width, &measure)
    });

    let mut row = screen.banner_rows;
    let mut history = Vec::new();
    for line in visible {
        history.extend(layout_line(line, row, config, &measure));
        row += line_rows(line, screen.max_width, &measure);
    }

    let prompt_text = session.prompt();
    let prompt_width = measure(&prompt_text);
    let prompt = TextRun {
        text: prompt_text,
        x: screen.margin,
        y: screen.row_y(row),
        tag: ColorTag::Prompt,
    };

    let input_text = session.input().text();
    let input = break_chars(input_text, prompt_width, screen.max_width, measure)
        .into_iter()
        .enumerate()
        .filter(|(_, text)| !text.is_empty())
        .map(|(i, text)| TextRun {
            text,
            x: if i == 0 {
                screen.margin + prompt_width
            } else {
                screen.margin
            },
            y: screen.row_y(row + i),
            tag: ColorTag::Input,
        })
        .collect();

    let cursor = session.cursor_visible().then(|| {
        let pos = locate_cursor(
            input_text,
            session.input().cursor(),
            prompt_width,
            screen.max_width,
            measure,
        );
        TextRun {
            text: config.cursor_glyph.clone(),
            x: screen.margin + pos.x,
            y: screen.row_y(row + pos.row),
            tag: ColorTag::Cursor,
        }
    });

    TerminalFrame {
        font,
        banner,
        history,
        prompt,
        input,
        cursor,
    }
}

fn compose_viewer(
    session: &TerminalSession,
    measurer: &(impl TextMeasurer + ?Sized),
) -> ViewerFrame {
    let config = session.config();
    let screen = &config.screen;
    let font = config.viewer_font.clone();
    let measure = |s: &str| measurer.measure_width(s, &font);
    let viewer = session.viewer();

    // The hint sits in the bottom margin, just below the last text row
    let hint_row = screen.total_rows();
    let hint_text = if viewer.image().is_some() {
        &config.image_hint
    } else {
        &config.viewer_hint
    };

    let mut lines = Vec::new();
    let mut row = 0;
    'page: for line in viewer.visible(config.viewer_page_lines) {
        for text in wrap_words(line, screen.max_width, measure) {
            if row >= hint_row {
                break 'page;
            }
            lines.push(TextRun {
                text,
                x: screen.margin,
                y: screen.row_y(row),
                tag: ColorTag::ViewerText,
            });
            row += 1;
        }
    }

    ViewerFrame {
        font,
        lines,
        image: viewer.image().map(str::to_string),
        hint: TextRun {
            text: hint_text.clone(),
            x: screen.margin,
            y: screen.row_y(hint_row),
            tag: ColorTag::ViewerHint,
        },
    }
}
