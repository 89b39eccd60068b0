use std::io::{self, Write};
use std::process::ExitCode;
use std::str::FromStr;

use argh::FromArgs;
use log::{error, info};
use stack_xml::{Node, Parser};

use crate::std_fs::StdFileSource;

mod std_fs;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Mode {
    File,
    Memory,
    Interface,
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "file" => Ok(Mode::File),
            "memory" => Ok(Mode::Memory),
            "interface" => Ok(Mode::Interface),
            _ => Err(format!("Unrecognized read mode keyword: {s}")),
        }
    }
}

#[derive(FromArgs)]
/// Dump the nodes of an XML document
struct Args {
    /// XML file to dump
    #[argh(positional)]
    filename: String,

    /// how to read the file: file, memory or interface
    #[argh(option, short = 'm', default = "Mode::File")]
    mode: Mode,
}

fn indent(out: &mut impl Write, level: usize) -> io::Result<()> {
    write!(out, "{:width$}", "", width = level * 4)
}

/// Writes every node of the document, indented by nesting level.
/// Returns false if parsing stopped on an error.
fn dump(parser: &mut Parser<'_>, out: &mut impl Write) -> io::Result<bool> {
    let mut level = 1;
    while let Ok(Some(node)) = parser.next_node() {
        match node {
            Node::Begin {
                name,
                offset,
                attributes,
            } => {
                indent(out, level)?;
                writeln!(out, "BEGIN '{name}', offset={offset}")?;
                for (i, attr) in attributes.iter().enumerate() {
                    indent(out, level + 1)?;
                    match &attr.value {
                        Some(value) => writeln!(out, "ATTRIBUTE {i}:  '{}'='{value}'", attr.name)?,
                        None => writeln!(out, "ATTRIBUTE {i}:  '{}'", attr.name)?,
                    }
                }
                level += 1;
            }
            Node::Value { name, text } => {
                indent(out, level)?;
                writeln!(out, "NAME '{name}', VALUE '{text}'")?;
            }
            Node::End { name } => {
                level = level.saturating_sub(1);
                indent(out, level)?;
                writeln!(out, "END '{name}'")?;
            }
        }
    }

    if parser.last_error().is_some() {
        writeln!(out, "Error:  {}", parser.error_info())?;
        writeln!(out, "Near offset:  {}", parser.offset())?;
        return Ok(false);
    }
    Ok(true)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Args = argh::from_env();
    info!("Dumping {} ({:?} mode)", args.filename, args.mode);

    let data: Vec<u8>;
    let mut parser = Parser::new();
    let started = match args.mode {
        Mode::File => parser.begin_from_file(&args.filename),
        Mode::Memory => {
            data = match std::fs::read(&args.filename) {
                Ok(data) => data,
                Err(e) => {
                    error!("Failed reading {}: {e}", args.filename);
                    return ExitCode::FAILURE;
                }
            };
            parser.begin_from_memory(&data)
        }
        Mode::Interface => {
            StdFileSource::open(&args.filename).and_then(|source| parser.begin_from_source(&source))
        }
    };
    if let Err(e) = started {
        error!("Failed to begin parsing file {}: {e}", args.filename);
        return ExitCode::FAILURE;
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let result = writeln!(out, "BEGIN DUMP OF FILE '{}'", args.filename)
        .and_then(|_| dump(&mut parser, &mut out))
        .and_then(|ok| {
            if ok {
                writeln!(out, "END DUMP OF FILE '{}'", args.filename)?;
            } else {
                writeln!(out, "Terminating with error.")?;
            }
            Ok(ok)
        });
    parser.reset();

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("Failed writing output: {e}");
            ExitCode::FAILURE
        }
    }
}
