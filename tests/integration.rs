//! Integration tests for the retroterm session
//!
//! Drives a session the way a host does: key events in, load requests out,
//! frames painted into a plain-text sink.

use futures::executor::block_on;
use retroterm::config::TerminalConfig;
use retroterm::layout::{fit_scrollback, locate_cursor, wrap_words, MonospaceMeasurer};
use retroterm::platform::{KeyEvent, LocalContentSource};
use retroterm::render::{line_rows, PlainTextSink, RenderSink};
use retroterm::shell::{fulfil, OutputLine, TerminalSession};
use retroterm::vfs::DirectoryTree;
use std::path::PathBuf;

fn press(session: &mut TerminalSession, key: &str) -> bool {
    session.handle_key(&KeyEvent::plain(key), 0.0)
}

/// Type a line and press Enter
fn run_cmd(session: &mut TerminalSession, line: &str) {
    for ch in line.chars() {
        press(session, &ch.to_string());
    }
    press(session, "Enter");
}

/// Last plain response line
fn last_response(session: &TerminalSession) -> String {
    session
        .lines()
        .iter()
        .rev()
        .find_map(|l| match l {
            OutputLine::Plain(text) => Some(text.clone()),
            OutputLine::PromptEcho { .. } => None,
        })
        .unwrap_or_default()
}

fn screen(session: &TerminalSession) -> Vec<String> {
    let mut sink = PlainTextSink::new();
    sink.paint(&session.frame(&MonospaceMeasurer::new()));
    sink.lines
}

/// A content directory unique to this test
fn content_dir(name: &str) -> PathBuf {
    let root = std::env::temp_dir().join(format!("retroterm-it-{}-{}", name, std::process::id()));
    std::fs::create_dir_all(root.join("files")).unwrap();
    std::fs::create_dir_all(root.join("images")).unwrap();
    root
}

fn chars10(s: &str) -> f64 {
    s.chars().count() as f64 * 10.0
}

// ============================================================================
// Commands
// ============================================================================

#[test]
fn test_ls_at_root() {
    let mut session = TerminalSession::default();
    run_cmd(&mut session, "ls");
    assert_eq!(last_response(&session), "Directory /: files, programs, images");
}

#[test]
fn test_cd_then_ls() {
    let mut session = TerminalSession::default();
    run_cmd(&mut session, "cd files");
    run_cmd(&mut session, "ls");
    assert_eq!(
        last_response(&session),
        "Directory /files: AboutMe.txt, Notes.txt, Bible.txt"
    );
}

#[test]
fn test_cd_missing_directory() {
    let mut session = TerminalSession::default();
    run_cmd(&mut session, "cd nope");
    assert_eq!(last_response(&session), "Directory 'nope' not found.");
    assert_eq!(session.cwd(), "/");
}

#[test]
fn test_cd_up_and_pwd() {
    let mut session = TerminalSession::default();
    run_cmd(&mut session, "cd images");
    run_cmd(&mut session, "cd ..");
    run_cmd(&mut session, "pwd");
    assert_eq!(last_response(&session), "Current directory: /");
}

#[test]
fn test_run_fordjohnson_in_programs() {
    let mut session = TerminalSession::default();
    run_cmd(&mut session, "cd programs");
    run_cmd(&mut session, "run fordjohnson 5 3 8 1 2");
    assert_eq!(last_response(&session), "Sorted: 1, 2, 3, 5, 8");
    assert_eq!(session.take_visualization(), Some(vec![5, 3, 8, 1, 2]));
}

#[test]
fn test_run_fordjohnson_from_root() {
    let mut session = TerminalSession::default();
    run_cmd(&mut session, "run fordjohnson 5 3 8 1 2");
    assert_eq!(
        last_response(&session),
        "Error: Program fordjohnson not found in /."
    );
    assert_eq!(session.take_visualization(), None);
}

#[test]
fn test_input_capacity() {
    let mut session = TerminalSession::default();
    let typed: String = ('a'..='z').cycle().take(60).collect();
    for ch in typed.chars() {
        press(&mut session, &ch.to_string());
    }
    assert_eq!(session.input().len(), 50);
    assert_eq!(session.input().text(), &typed[..50]);
}

#[test]
fn test_history_recall_and_rerun() {
    let mut session = TerminalSession::default();
    run_cmd(&mut session, "cd files");
    run_cmd(&mut session, "cd ..");

    press(&mut session, "ArrowUp");
    press(&mut session, "ArrowUp");
    assert_eq!(session.input().text(), "cd files");
    press(&mut session, "Enter");
    assert_eq!(session.cwd(), "/files");
}

// ============================================================================
// Loading content
// ============================================================================

#[test]
fn test_cat_reads_from_content_root() {
    let root = content_dir("cat");
    std::fs::write(root.join("files/Notes.txt"), "  first  \nsecond\n").unwrap();

    let mut session = TerminalSession::default();
    let source = LocalContentSource::new(&root);
    run_cmd(&mut session, "cd files");
    run_cmd(&mut session, "cat Notes.txt");

    let request = session.take_load_request().unwrap();
    session.complete_load(block_on(fulfil(request, &source)));

    let lines = screen(&session);
    assert_eq!(lines[0], "first");
    assert_eq!(lines[1], "second");
    assert_eq!(lines.last().unwrap(), &session.config().viewer_hint);

    press(&mut session, "q");
    assert!(screen(&session)[0].starts_with("Welcome"));

    let _ = std::fs::remove_dir_all(&root);
}

#[test]
fn test_cat_missing_content_shows_error_page() {
    let root = content_dir("missing");
    let mut session = TerminalSession::default();
    let source = LocalContentSource::new(&root);
    run_cmd(&mut session, "cd files");
    run_cmd(&mut session, "cat Bible.txt");

    let request = session.take_load_request().unwrap();
    session.complete_load(block_on(fulfil(request, &source)));

    assert!(session.viewer().is_active());
    assert_eq!(
        session.viewer().content_lines(),
        ["Error loading /files/Bible.txt: /files/Bible.txt not found"]
    );

    let _ = std::fs::remove_dir_all(&root);
}

#[test]
fn test_view_image() {
    let root = content_dir("view");
    std::fs::write(root.join("images/Workstation.jpg"), [0xFF, 0xD8, 0xFF]).unwrap();

    let mut session = TerminalSession::default();
    let source = LocalContentSource::new(&root);
    run_cmd(&mut session, "cd images");
    run_cmd(&mut session, "view Workstation.jpg");

    let request = session.take_load_request().unwrap();
    session.complete_load(block_on(fulfil(request, &source)));

    let mut sink = PlainTextSink::new();
    sink.paint(&session.frame(&MonospaceMeasurer::new()));
    assert_eq!(sink.image.as_deref(), Some("/images/Workstation.jpg"));
    assert_eq!(sink.lines, vec![session.config().image_hint.clone()]);

    let _ = std::fs::remove_dir_all(&root);
}

#[test]
fn test_newer_load_wins() {
    let root = content_dir("race");
    std::fs::write(root.join("files/AboutMe.txt"), "about").unwrap();
    std::fs::write(root.join("files/Notes.txt"), "notes").unwrap();

    let mut session = TerminalSession::default();
    let source = LocalContentSource::new(&root);
    run_cmd(&mut session, "cd files");
    run_cmd(&mut session, "cat AboutMe.txt");
    let first = session.take_load_request().unwrap();
    run_cmd(&mut session, "cat Notes.txt");
    let second = session.take_load_request().unwrap();

    // Completions arrive out of order
    session.complete_load(block_on(fulfil(second, &source)));
    assert!(!session.complete_load(block_on(fulfil(first, &source))));
    assert_eq!(session.viewer().content_lines(), ["notes"]);

    let _ = std::fs::remove_dir_all(&root);
}

// ============================================================================
// Screen
// ============================================================================

#[test]
fn test_clear_leaves_banner() {
    let mut session = TerminalSession::default();
    run_cmd(&mut session, "help");
    run_cmd(&mut session, "clear");
    assert_eq!(
        screen(&session),
        vec![
            "Welcome to Ngaurama-Linux 1.8 LTS",
            ">> Type \"help\" to get started",
            "evaluator@42:/ ~$ ",
        ]
    );
}

#[test]
fn test_long_history_scrolls() {
    let mut session = TerminalSession::default();
    for _ in 0..30 {
        run_cmd(&mut session, "pwd");
    }
    let lines = screen(&session);
    let config = session.config();
    // Banner, 16 scrollback rows, prompt
    assert_eq!(lines.len(), config.banner.len() + config.screen.row_budget() + 1);
    assert_eq!(lines[lines.len() - 2], "Current directory: /");
    assert_eq!(lines[lines.len() - 1], "evaluator@42:/ ~$ ");
}

#[test]
fn test_custom_config_and_tree() {
    let config = TerminalConfig::from_json(r#"{"prompt_host": "guest@retro", "input_capacity": 8}"#)
        .unwrap();
    let tree = DirectoryTree::from_json(r#"{"/": ["docs"], "/docs": ["readme.txt"]}"#).unwrap();
    let mut session = TerminalSession::new(config, tree);

    run_cmd(&mut session, "cd docs");
    assert_eq!(session.prompt(), "guest@retro:/docs ~$ ");
    run_cmd(&mut session, "ls");
    assert_eq!(last_response(&session), "Directory /docs: readme.txt");

    for ch in "abcdefghijk".chars() {
        press(&mut session, &ch.to_string());
    }
    assert_eq!(session.input().text(), "abcdefgh");
}

// ============================================================================
// Layout properties
// ============================================================================

#[test]
fn test_wrap_rows_fit_unless_single_word() {
    let samples = [
        "",
        "a",
        "the quick brown fox jumps over the lazy dog",
        "supercalifragilisticexpialidocious is long",
        "  leading and  double  spaces ",
    ];
    for text in samples {
        for width in [10.0, 35.0, 80.0, 200.0] {
            let rows = wrap_words(text, width, chars10);
            assert!(!rows.is_empty());
            for row in &rows {
                assert!(chars10(row) <= width || !row.contains(' '), "{:?} at {}", row, width);
            }
            assert_eq!(rows.join(" "), text);
        }
    }
}

#[test]
fn test_cursor_row_in_range() {
    let text = "cd files and then some more words to wrap";
    for width in [60.0, 120.0, 300.0] {
        let rows = retroterm::layout::break_chars(text, 50.0, width, chars10).len();
        for index in 0..=text.chars().count() {
            let pos = locate_cursor(text, index, 50.0, width, chars10);
            assert!(pos.row < rows, "index {} width {}", index, width);
        }
    }
}

#[test]
fn test_scrollback_fit_is_maximal() {
    let lines: Vec<OutputLine> = (0..12)
        .map(|i| OutputLine::Plain("word ".repeat(i * 3).trim_end().to_string()))
        .collect();
    let rows_of = |l: &OutputLine| line_rows(l, 100.0, &chars10);

    for budget in 0..20 {
        let shown = fit_scrollback(&lines, budget, rows_of);
        let used: usize = shown.iter().map(rows_of).sum();
        assert!(used <= budget);
        if shown.len() < lines.len() {
            let next = &lines[lines.len() - shown.len() - 1];
            assert!(used + rows_of(next) > budget);
        }
    }
}
