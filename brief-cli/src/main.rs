// Command-line interface for brief
//
// The brief program works on article content outside the editor: converting between the
// HTML the editor stores and the Markdown twin, checking that a document survives the
// round trip, and dumping the IR for debugging conversions.
//
// The source format is auto-detected from the file extension and can be overridden with
// --from. Reading from stdin ("-") requires --from.
//
// Usage:
//  brief <input> --to <format> [--from <format>] [--output <file>]  - Convert (default command)
//  brief convert <input> --to <format> [--from <format>] [--output <file>]
//  brief check <input> [--from <format>]  - Verify the HTML/Markdown round trip is stable
//  brief inspect <input> [--from <format>] - Print the IR as JSON
//  brief formats                           - List available formats
//  brief config [--config <file>]          - Print the effective configuration as JSON
//
// Logging goes to stderr. BRIEF_LOG takes an EnvFilter directive; --verbose raises the
// default level to debug.

use brief_babel::{canonical_html, try_to_html, try_to_markdown, FormatError, FormatRegistry};
use brief_config::{BriefConfig, Loader};
use clap::{Arg, ArgAction, Command, ValueHint};
use std::fs;
use std::io::{self, Read};
use tracing_subscriber::EnvFilter;

const SUBCOMMANDS: &[&str] = &["convert", "check", "inspect", "formats", "config", "help"];

fn build_cli() -> Command {
    Command::new("brief")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert article content between HTML and Markdown")
        .long_about(
            "brief converts article content between the canonical editor HTML and Markdown.\n\n\
            Commands:\n  \
            - convert: Transform between html and markdown (default command)\n  \
            - check:   Verify that a document round-trips without drifting\n  \
            - inspect: Print the intermediate representation as JSON\n  \
            - formats: List the available formats\n  \
            - config:  Print the effective configuration\n\n\
            Examples:\n  \
            brief post.md --to html                 # Markdown to HTML (stdout)\n  \
            brief post.html --to markdown -o post.md\n  \
            cat post.html | brief - --from html --to markdown\n  \
            brief check post.md                     # Exit 1 if the round trip drifts",
        )
        .arg_required_else_help(true)
        .subcommand_required(false)
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log debug output to stderr")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a brief.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert between html and markdown (default command)")
                .arg(input_arg())
                .arg(from_arg())
                .arg(
                    Arg::new("to")
                        .long("to")
                        .help("Target format (required)")
                        .required(true)
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Output file path (defaults to stdout)")
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("check")
                .about("Check that a document round-trips through Markdown without drifting")
                .long_about(
                    "Converts the input to canonical HTML and Markdown, then runs the Markdown\n\
                    through HTML again. The check fails when the second pass differs from the\n\
                    first, or when the canonical HTML is not stable under re-normalization.\n\n\
                    Underline and alignment are dropped by Markdown; that loss is expected and\n\
                    does not fail the check.",
                )
                .arg(input_arg())
                .arg(from_arg()),
        )
        .subcommand(
            Command::new("inspect")
                .about("Print the intermediate representation as JSON")
                .arg(input_arg())
                .arg(from_arg()),
        )
        .subcommand(Command::new("formats").about("List available formats"))
        .subcommand(
            Command::new("config")
                .about("Print the effective configuration as JSON")
                .long_about(
                    "Prints the built-in defaults merged with ./brief.toml (when present)\n\
                    and the file given with --config.",
                ),
        )
}

fn input_arg() -> Arg {
    Arg::new("input")
        .help("Input file path, or - for stdin")
        .required(true)
        .index(1)
        .value_hint(ValueHint::FilePath)
}

fn from_arg() -> Arg {
    Arg::new("from")
        .long("from")
        .help("Source format (auto-detected from file extension if not specified)")
        .value_hint(ValueHint::Other)
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env("BRIEF_LOG").unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let cli = build_cli();
    let matches = match cli.clone().try_get_matches_from(&args) {
        Ok(m) => m,
        Err(e) => {
            // A bare input path means "convert"
            if args.len() > 1
                && (args[1] == "-" || !args[1].starts_with('-'))
                && !SUBCOMMANDS.contains(&args[1].as_str())
            {
                let mut new_args = vec![args[0].clone(), "convert".to_string()];
                new_args.extend_from_slice(&args[1..]);
                match cli.try_get_matches_from(&new_args) {
                    Ok(m) => m,
                    Err(e2) => e2.exit(),
                }
            } else {
                e.exit();
            }
        }
    };

    // Global flags land on the subcommand's matches when given after it
    let verbose = matches.get_flag("verbose")
        || matches
            .subcommand()
            .is_some_and(|(_, sub_matches)| sub_matches.get_flag("verbose"));
    init_tracing(verbose);
    let registry = FormatRegistry::default();

    match matches.subcommand() {
        Some(("convert", sub_matches)) => {
            let input = required(sub_matches, "input");
            let to = required(sub_matches, "to");
            let from = resolve_from(&registry, input, sub_matches.get_one::<String>("from"));
            let output = sub_matches.get_one::<String>("output").map(|s| s.as_str());
            handle_convert_command(&registry, input, &from, to, output);
        }
        Some(("check", sub_matches)) => {
            let input = required(sub_matches, "input");
            let from = resolve_from(&registry, input, sub_matches.get_one::<String>("from"));
            handle_check_command(&registry, input, &from);
        }
        Some(("inspect", sub_matches)) => {
            let input = required(sub_matches, "input");
            let from = resolve_from(&registry, input, sub_matches.get_one::<String>("from"));
            handle_inspect_command(&registry, input, &from);
        }
        Some(("formats", _)) => handle_formats_command(&registry),
        Some(("config", sub_matches)) => {
            let config =
                load_cli_config(sub_matches.get_one::<String>("config").map(|s| s.as_str()));
            handle_config_command(&config);
        }
        _ => {
            eprintln!("Unknown subcommand. Use --help for usage information.");
            std::process::exit(1);
        }
    }
}

fn required<'a>(matches: &'a clap::ArgMatches, name: &str) -> &'a str {
    match matches.get_one::<String>(name) {
        Some(value) => value.as_str(),
        None => fail(&format!("--{name} is required")),
    }
}

fn fail(message: &str) -> ! {
    eprintln!("Error: {message}");
    std::process::exit(1);
}

fn resolve_from(registry: &FormatRegistry, input: &str, explicit: Option<&String>) -> String {
    if let Some(from) = explicit {
        return from.clone();
    }
    if input == "-" {
        fail("reading from stdin requires --from");
    }
    match registry.detect_format_from_filename(input) {
        Some(detected) => detected,
        None => {
            eprintln!("Error: Could not detect format from filename '{input}'");
            eprintln!("Please specify --from explicitly");
            std::process::exit(1);
        }
    }
}

fn read_input(input: &str) -> String {
    if input == "-" {
        let mut source = String::new();
        if let Err(e) = io::stdin().read_to_string(&mut source) {
            fail(&format!("reading stdin: {e}"));
        }
        return source;
    }
    fs::read_to_string(input).unwrap_or_else(|e| fail(&format!("reading file '{input}': {e}")))
}

/// Handle the convert command
fn handle_convert_command(
    registry: &FormatRegistry,
    input: &str,
    from: &str,
    to: &str,
    output: Option<&str>,
) {
    for format in [from, to] {
        if let Err(e) = registry.get(format) {
            fail(&e.to_string());
        }
    }

    let source = read_input(input);
    tracing::debug!(%input, %from, %to, bytes = source.len(), "converting");
    let converted = registry
        .convert(&source, from, to)
        .unwrap_or_else(|e| fail(&e.to_string()));

    match output {
        Some(path) => {
            let mut contents = converted;
            if !contents.ends_with('\n') {
                contents.push('\n');
            }
            fs::write(path, contents)
                .unwrap_or_else(|e| fail(&format!("writing file '{path}': {e}")));
        }
        None => println!("{converted}"),
    }
}

#[derive(Debug, PartialEq)]
enum RoundTrip {
    Stable,
    MarkdownDrift { first: String, second: String },
    HtmlDrift { first: String, second: String },
}

fn round_trip(
    registry: &FormatRegistry,
    source: &str,
    from: &str,
) -> Result<RoundTrip, FormatError> {
    let doc = registry.parse(source, from)?;
    let html = registry.serialize(&doc, "html")?;

    let renormalized = canonical_html(&html);
    if renormalized != html {
        return Ok(RoundTrip::HtmlDrift {
            first: html,
            second: renormalized,
        });
    }

    let markdown = try_to_markdown(&html)?;
    let markdown_again = try_to_markdown(&try_to_html(&markdown)?)?;
    if markdown != markdown_again {
        return Ok(RoundTrip::MarkdownDrift {
            first: markdown,
            second: markdown_again,
        });
    }
    Ok(RoundTrip::Stable)
}

/// Handle the check command
fn handle_check_command(registry: &FormatRegistry, input: &str, from: &str) {
    let source = read_input(input);
    let result = round_trip(registry, &source, from).unwrap_or_else(|e| fail(&e.to_string()));
    match result {
        RoundTrip::Stable => println!("{input}: stable"),
        RoundTrip::MarkdownDrift { first, second } => {
            eprintln!("{input}: markdown changed on the second round trip");
            eprintln!("--- first\n{first}\n--- second\n{second}");
            std::process::exit(1);
        }
        RoundTrip::HtmlDrift { first, second } => {
            eprintln!("{input}: canonical html is not stable");
            eprintln!("--- first\n{first}\n--- second\n{second}");
            std::process::exit(1);
        }
    }
}

/// Handle the inspect command
fn handle_inspect_command(registry: &FormatRegistry, input: &str, from: &str) {
    let source = read_input(input);
    let doc = registry
        .parse(&source, from)
        .unwrap_or_else(|e| fail(&e.to_string()));
    let json = serde_json::to_string_pretty(&doc)
        .unwrap_or_else(|e| fail(&format!("serializing IR: {e}")));
    println!("{json}");
}

/// Handle the formats command
fn handle_formats_command(registry: &FormatRegistry) {
    println!("Available formats:\n");
    for name in registry.list_formats() {
        if let Ok(format) = registry.get(&name) {
            println!(
                "  {:<10} {} (.{})",
                name,
                format.description(),
                format.file_extensions().join(", .")
            );
        }
    }
}

/// Handle the config command
fn handle_config_command(config: &BriefConfig) {
    let json = serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| fail(&format!("serializing configuration: {e}")));
    println!("{json}");
}

fn load_cli_config(explicit_path: Option<&str>) -> BriefConfig {
    let loader = Loader::new().with_optional_file("brief.toml");
    let loader = if let Some(path) = explicit_path {
        loader.with_file(path)
    } else {
        loader
    };

    loader.build().unwrap_or_else(|err| {
        eprintln!("Failed to load configuration: {err}");
        std::process::exit(1);
    })
}
