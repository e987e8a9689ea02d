//! Command-line interface for parinfer
//! Reads a file (or stdin) and prints the text transformed by one of the
//! three modes, or the full result as JSON.
//!
//! Usage:
//!   parinfer <path> [--mode <mode>] [--json] [--cursor-line N --cursor-x N]
//!   parinfer - --mode paren        - read from stdin

use std::io::Read;

use clap::{Arg, ArgAction, Command};

use parinfer::{indent_mode, paren_mode, smart_mode, Options};

fn main() {
    let matches = Command::new("parinfer")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Reconcile S-expression structure with indentation")
        .arg_required_else_help(true)
        .arg(
            Arg::new("path")
                .help("Path to the source file, or '-' for stdin")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("mode")
                .long("mode")
                .short('m')
                .help("Transform mode: indent, paren, or smart")
                .default_value("indent"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print the full result as JSON instead of just the text")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("cursor-line")
                .long("cursor-line")
                .help("1-based cursor line")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("cursor-x")
                .long("cursor-x")
                .help("1-based cursor column")
                .value_parser(clap::value_parser!(usize)),
        )
        .get_matches();

    let path = matches
        .get_one::<String>("path")
        .expect("path is required");
    let mode = matches.get_one::<String>("mode").expect("mode has a default");
    let as_json = matches.get_flag("json");

    let text = read_input(path).unwrap_or_else(|e| {
        eprintln!("Error reading {}: {}", path, e);
        std::process::exit(1);
    });

    let options = Options {
        cursor_line: matches.get_one::<usize>("cursor-line").copied(),
        cursor_x: matches.get_one::<usize>("cursor-x").copied(),
        ..Options::default()
    };

    let answer = match mode.as_str() {
        "indent" => indent_mode(&text, &options),
        "paren" => paren_mode(&text, &options),
        "smart" => smart_mode(&text, &options),
        other => {
            eprintln!("Unknown mode '{}'", other);
            eprintln!("Available modes: indent, paren, smart");
            std::process::exit(1);
        }
    };

    if as_json {
        let json = serde_json::to_string_pretty(&answer).unwrap_or_else(|e| {
            eprintln!("Error formatting result: {}", e);
            std::process::exit(1);
        });
        println!("{}", json);
        return;
    }

    if let Some(error) = &answer.error {
        eprintln!("{}", error);
        std::process::exit(1);
    }
    print!("{}", answer.text);
}

fn read_input(path: &str) -> std::io::Result<String> {
    if path == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        Ok(text)
    } else {
        std::fs::read_to_string(path)
    }
}
