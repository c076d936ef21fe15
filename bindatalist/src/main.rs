//! Datalist command-line tool for checking and inspecting datalist documents.
//!
//! Usage: datalist [OPTIONS] [FILE|DIR]
//!
//! Options:
//!   --check              Check if input is valid (exit 0 if valid, 1 if invalid)
//!   --tokens             Print the token stream instead of the value tree
//!   --max-depth <N>      Maximum bracket nesting [default: 256]
//!   -h, --help           Print help
//!   -V, --version        Print version

use libdatalist::{parse_with_options, tokenize, ParseOptions, TokenKind};
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use std::process;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Print,
    Check,
    Tokens,
}

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let mut mode = Mode::Print;
    let mut options = ParseOptions::default();
    let mut input_path: Option<&str> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_help();
                return;
            }
            "-V" | "--version" => {
                println!("datalist {}", env!("CARGO_PKG_VERSION"));
                return;
            }
            "--check" => {
                mode = Mode::Check;
            }
            "--tokens" => {
                mode = Mode::Tokens;
            }
            "--max-depth" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --max-depth requires an argument");
                    process::exit(1);
                }
                match args[i].parse::<usize>() {
                    Ok(depth) => options = options.with_max_depth(depth),
                    Err(_) => {
                        eprintln!("Error: Invalid depth: {}", args[i]);
                        process::exit(1);
                    }
                }
            }
            "-" => {
                // Explicit stdin
                // input_path stays None, which means stdin
            }
            arg if arg.starts_with('-') => {
                eprintln!("Error: Unknown option: {}", arg);
                process::exit(1);
            }
            _ => {
                if input_path.is_some() {
                    eprintln!("Error: Multiple input paths not supported");
                    process::exit(1);
                }
                input_path = Some(&args[i]);
            }
        }
        i += 1;
    }

    if let Some(path) = input_path {
        if Path::new(path).is_dir() {
            if mode != Mode::Check {
                eprintln!("Error: directory input requires --check");
                process::exit(1);
            }
            process::exit(check_directory(path, &options));
        }
    }

    let input: Vec<u8> = match input_path {
        Some(path) => match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                eprintln!("Error reading {}: {}", path, e);
                process::exit(1);
            }
        },
        None => {
            let mut buffer = Vec::new();
            if let Err(e) = io::stdin().read_to_end(&mut buffer) {
                eprintln!("Error reading stdin: {}", e);
                process::exit(1);
            }
            buffer
        }
    };

    process::exit(process_input(&input, input_path, mode, &options));
}

/// Handle one document. Returns the process exit code.
fn process_input(input: &[u8], path: Option<&str>, mode: Mode, options: &ParseOptions) -> i32 {
    let filename = path.map(|p| {
        Path::new(p)
            .file_name()
            .map_or_else(|| p.to_string(), |n| n.to_string_lossy().to_string())
    });

    if mode == Mode::Tokens {
        return print_tokens(input);
    }

    match parse_with_options(input, options, filename.as_deref()) {
        Ok(value) => {
            match mode {
                Mode::Check => println!("ok"),
                _ => println!("{:#?}", value),
            }
            0
        }
        Err(e) => {
            eprintln!("{}", e);
            1
        }
    }
}

fn print_tokens(input: &[u8]) -> i32 {
    let tokens = match tokenize(input) {
        Ok(tokens) => tokens,
        Err(e) => {
            eprintln!("{}", e.with_location(&Default::default(), input));
            return 1;
        }
    };
    for token in tokens {
        let text = token.text(input).escape_ascii();
        match token.kind {
            TokenKind::Layer => {
                let depth = token.layer_depth(input).unwrap_or_default();
                println!("{:<14} {} ({})", "Layer", text, depth);
            }
            kind => println!("{:<14} {}", format!("{:?}", kind), text),
        }
    }
    0
}

/// Check every `.dl` file in a directory. Returns the process exit code.
fn check_directory(dir_path: &str, options: &ParseOptions) -> i32 {
    let entries = match fs::read_dir(dir_path) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("Error reading directory {}: {}", dir_path, e);
            return 1;
        }
    };

    let mut paths: Vec<_> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.extension().map(|e| e == "dl").unwrap_or(false))
        .collect();
    paths.sort();

    let mut had_errors = false;
    for path in paths {
        let path_str = path.to_string_lossy();
        let input = match fs::read(&path) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("Error reading {}: {}", path_str, e);
                had_errors = true;
                continue;
            }
        };
        let filename = path.file_name().map(|n| n.to_string_lossy());
        match parse_with_options(&input, options, filename.as_deref()) {
            Ok(_) => println!("{}: ok", path_str),
            Err(e) => {
                eprintln!("{}: {}", path_str, e);
                had_errors = true;
            }
        }
    }

    if had_errors {
        1
    } else {
        0
    }
}

fn print_help() {
    println!(
        "datalist {}

Usage: datalist [OPTIONS] [FILE|DIR]

Reads a datalist document from FILE (or stdin) and prints its value tree.

Options:
      --check          Check if input is valid (exit 0 if valid, 1 if invalid)
                       With a directory, checks every .dl file in it
      --tokens         Print the token stream instead of the value tree
      --max-depth <N>  Maximum bracket nesting [default: {}]
  -h, --help           Print help
  -V, --version        Print version",
        env!("CARGO_PKG_VERSION"),
        libdatalist::MAX_DEPTH
    );
}
