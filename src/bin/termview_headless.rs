//! termview Headless Runner
//!
//! Feeds bytes from stdin or a file through the in-memory engine into a
//! `TerminalView`, renders one frame against a recording sink, and prints
//! the resulting layout (and optionally the draw commands).

use std::io::{self, Read};
use std::process::ExitCode;
use std::sync::Arc;

use serde::Serialize;
use termview::config::ViewConfig;
use termview::render::{CellSize, DrawCommand, LayoutRow, PaintRecorder};
use termview::{MemoryClipboard, MemoryTerminal, TerminalView};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Cell size the recording sink reports
const CELL: CellSize = CellSize::new(8.0, 16.0);

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args: Vec<String> = std::env::args().collect();

    let mut cols = 80usize;
    let mut rows = 24usize;
    let mut input_file: Option<String> = None;
    let mut output_format = OutputFormat::Text;
    let mut paint = false;
    let mut show_help = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-c" | "--cols" => {
                i += 1;
                if i < args.len() {
                    cols = args[i].parse().unwrap_or(80);
                }
            },
            "-r" | "--rows" => {
                i += 1;
                if i < args.len() {
                    rows = args[i].parse().unwrap_or(24);
                }
            },
            "-f" | "--file" => {
                i += 1;
                if i < args.len() {
                    input_file = Some(args[i].clone());
                }
            },
            "-j" | "--json" => output_format = OutputFormat::Json,
            "-t" | "--text" => output_format = OutputFormat::Text,
            "-p" | "--paint" => paint = true,
            "-h" | "--help" => show_help = true,
            _ => {
                if input_file.is_none() && !args[i].starts_with('-') {
                    input_file = Some(args[i].clone());
                }
            },
        }
        i += 1;
    }

    if show_help {
        print_help();
        return ExitCode::SUCCESS;
    }

    let input_data = match &input_file {
        Some(path) => match std::fs::read(path) {
            Ok(data) => data,
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path, e);
                return ExitCode::FAILURE;
            },
        },
        None => {
            let mut data = Vec::new();
            if let Err(e) = io::stdin().read_to_end(&mut data) {
                eprintln!("Error reading stdin: {}", e);
                return ExitCode::FAILURE;
            }
            data
        },
    };

    let cols = cols.max(1);
    let rows = rows.max(1);
    let config = ViewConfig {
        raw_text_capture: false,
        ..ViewConfig::default()
    };
    let mut view = TerminalView::new(
        MemoryTerminal::new(cols, rows),
        config,
        Arc::new(MemoryClipboard::new()),
    );
    view.set_bounds(cols as f64 * CELL.width, rows as f64 * CELL.height);
    view.data_sink().apply(&input_data);

    let mut sink = PaintRecorder::new(CELL);
    let Some(frame) = view.frame(&mut sink) else {
        eprintln!("Error: nothing to render");
        return ExitCode::FAILURE;
    };
    if paint {
        termview::render::paint_frame(&frame, &mut sink);
    }

    match output_format {
        OutputFormat::Text => {
            println!("Terminal View ({}x{}), top row {}:", cols, rows, frame.view_top);
            if let Some(cursor) = &frame.cursor {
                println!("Cursor: ({}, {})", cursor.view_row, cursor.column);
            }
            println!("---");
            for row in &frame.rows {
                let text: String = row
                    .iter()
                    .flat_map(|r| r.spans.iter())
                    .map(|span| span.text.as_str())
                    .collect();
                println!("{}", text.trim_end());
            }
            println!("---");
            if paint {
                println!("{} draw commands", sink.commands().len());
            }
        },
        OutputFormat::Json => {
            let output = Output {
                columns: cols,
                rows,
                view_top: frame.view_top,
                layout: &frame.rows,
                commands: paint.then(|| sink.commands()),
            };
            match serde_json::to_string_pretty(&output) {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    eprintln!("Error serializing layout: {}", e);
                    return ExitCode::FAILURE;
                },
            }
        },
    }

    ExitCode::SUCCESS
}

#[derive(Serialize)]
struct Output<'a> {
    columns: usize,
    rows: usize,
    view_top: usize,
    layout: &'a [Option<LayoutRow>],
    #[serde(skip_serializing_if = "Option::is_none")]
    commands: Option<&'a [DrawCommand]>,
}

#[derive(Clone, Copy)]
enum OutputFormat {
    Text,
    Json,
}

fn print_help() {
    println!("termview Headless Runner");
    println!();
    println!("Usage: termview-headless [OPTIONS] [INPUT_FILE]");
    println!();
    println!("Options:");
    println!("  -c, --cols <N>     Set grid width (default: 80)");
    println!("  -r, --rows <N>     Set grid height (default: 24)");
    println!("  -f, --file <PATH>  Read input from file");
    println!("  -j, --json         Output layout as JSON");
    println!("  -t, --text         Output layout as text (default)");
    println!("  -p, --paint        Also paint the frame and report draw commands");
    println!("  -h, --help         Show this help message");
    println!();
    println!("If no input file is specified, reads from stdin.");
    println!();
    println!("Examples:");
    println!("  printf 'hello\\r\\nworld' | termview-headless");
    println!("  termview-headless -c 120 -r 40 --json --paint input.txt");
}
