//! retroterm CLI - the terminal engine on a plain console
//!
//! Each input line is typed into the session and submitted. While the pager
//! is open a line is a key instead: `q` closes it, `k` scrolls up, anything
//! else scrolls down.
//!
//! Usage: retroterm-cli [--config <file>] [--tree <file>] [--root <dir>]

use futures::executor::block_on;
use retroterm::config::TerminalConfig;
use retroterm::layout::MonospaceMeasurer;
use retroterm::platform::{KeyEvent, LocalContentSource};
use retroterm::render::{PlainTextSink, RenderSink};
use retroterm::shell::{fulfil, TerminalSession};
use retroterm::vfs::DirectoryTree;
use std::io::{self, BufRead, Write};
use std::time::Instant;

struct Args {
    config: Option<String>,
    tree: Option<String>,
    root: String,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args {
        config: None,
        tree: None,
        root: ".".to_string(),
    };

    let mut iter = std::env::args().skip(1);
    while let Some(flag) = iter.next() {
        let mut value = || iter.next().ok_or_else(|| format!("{} needs a value", flag));
        match flag.as_str() {
            "--config" => args.config = Some(value()?),
            "--tree" => args.tree = Some(value()?),
            "--root" => args.root = value()?,
            other => return Err(format!("unknown argument '{}'", other)),
        }
    }
    Ok(args)
}

fn load_session(args: &Args) -> Result<TerminalSession, String> {
    let config = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path).map_err(|e| format!("{}: {}", path, e))?;
            TerminalConfig::from_json(&json).map_err(|e| format!("{}: {}", path, e))?
        }
        None => TerminalConfig::default(),
    };
    let tree = match &args.tree {
        Some(path) => {
            let json = std::fs::read_to_string(path).map_err(|e| format!("{}: {}", path, e))?;
            DirectoryTree::from_json(&json).map_err(|e| format!("{}: {}", path, e))?
        }
        None => DirectoryTree::default(),
    };
    Ok(TerminalSession::new(config, tree))
}

fn main() {
    let args = match parse_args().and_then(|a| load_session(&a).map(|s| (a, s))) {
        Ok(ok) => ok,
        Err(e) => {
            eprintln!("retroterm-cli: {}", e);
            std::process::exit(2);
        }
    };
    let (args, mut session) = args;

    let source = LocalContentSource::new(&args.root);
    let measurer = MonospaceMeasurer::new();
    let started = Instant::now();

    for line in &session.config().banner {
        println!("{}", line);
    }
    println!();

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut shown = 0;

    loop {
        if !session.viewer().is_active() {
            print!("{}", session.prompt());
        } else {
            print!(": ");
        }
        let _ = stdout.flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => {
                // EOF
                println!();
                break;
            }
            Ok(_) => {}
            Err(e) => {
                eprintln!("Error reading input: {}", e);
                break;
            }
        }
        let line = line.trim_end_matches(['\r', '\n']);
        let now = started.elapsed().as_secs_f64() * 1000.0;

        if session.viewer().is_active() {
            let key = match line.trim() {
                "q" => "q",
                "k" => "ArrowUp",
                _ => "ArrowDown",
            };
            session.handle_key(&KeyEvent::plain(key), now);
        } else {
            for ch in line.chars() {
                session.handle_key(&KeyEvent::plain(ch.to_string()), now);
            }
            session.handle_key(&KeyEvent::plain("Enter"), now);
        }

        if let Some(request) = session.take_load_request() {
            let completion = block_on(fulfil(request, &source));
            session.complete_load(completion);
        }
        let _ = session.take_visualization();

        if session.viewer().is_active() {
            let mut sink = PlainTextSink::new();
            sink.paint(&session.frame(&measurer));
            if let Some(image) = &sink.image {
                println!("[image {}]", image);
            }
            println!("{}", sink.text());
            continue;
        }

        // Print what the command added; the echo line is already on screen
        let lines = session.lines();
        if lines.len() < shown {
            shown = 0;
        }
        for output in lines.iter().skip(shown + 1) {
            println!("{}", output.text());
        }
        shown = lines.len();
    }
}
