//! CLI entry point for the SMA16 virtual machine.

mod demo;
mod signal;
mod terminal;
mod trace;

use std::env;
use std::ffi::OsString;
use std::io::{self, IsTerminal};
use std::path::PathBuf;

use sma16_core::{load_image_file, ConsoleDevice, CoreConfig, Machine, Memory, NoTrace};
#[cfg(test)]
use tempfile as _;
use tracing_subscriber::EnvFilter;

use crate::terminal::TerminalEnvironment;
use crate::trace::DebugTrace;

const VERSION_TEXT: &str = "sma16 v0.1";

const USAGE_TEXT: &str = "\
Usage: sma16vm [options] input_memory_file

Options:
  -v, --version  Display version.
  -h, --help     Display this message.
  -d, --debug    Display debug information.
  -t, --time     Display execution time.
      --demo     Run the built-in demo program instead of a file.

Environment:
  SMA16_LOG      Diagnostic log filter on stderr (default: warn)";

const LOG_ENV: &str = "SMA16_LOG";

const EXIT_USAGE: i32 = 1;
const EXIT_IMAGE: i32 = 2;
const EXIT_TERMINAL: i32 = 3;

#[derive(Debug, PartialEq, Eq)]
enum ImageSource {
    File(PathBuf),
    Demo,
}

#[derive(Debug, PartialEq, Eq)]
struct RunArgs {
    image: Option<ImageSource>,
    debug: bool,
    timed: bool,
}

#[derive(Debug, PartialEq, Eq)]
enum ParseResult {
    Run(RunArgs),
    Help,
    Version,
}

fn parse_args(args: impl Iterator<Item = OsString>) -> Result<ParseResult, String> {
    let mut input: Option<PathBuf> = None;
    let mut demo = false;
    let mut debug = false;
    let mut timed = false;
    let mut help = false;
    let mut version = false;

    for arg in args {
        let text = arg.to_string_lossy().into_owned();
        match text.as_str() {
            "-h" | "--help" => help = true,
            "-v" | "--version" => version = true,
            "-d" | "--debug" => debug = true,
            "-t" | "--time" | "--timed" => timed = true,
            "--demo" => demo = true,
            other if other.starts_with('-') => {
                return Err(format!("unknown option: {other}"));
            }
            _ => {
                if input.is_some() {
                    return Err("multiple input paths provided".to_string());
                }
                input = Some(PathBuf::from(arg));
            }
        }
    }

    if version {
        return Ok(ParseResult::Version);
    }
    if help {
        return Ok(ParseResult::Help);
    }
    if demo && input.is_some() {
        return Err("--demo does not take an input path".to_string());
    }

    let image = if demo {
        Some(ImageSource::Demo)
    } else {
        input.map(ImageSource::File)
    };

    Ok(ParseResult::Run(RunArgs {
        image,
        debug,
        timed,
    }))
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .try_init();
}

fn load_memory(source: &ImageSource) -> Result<Memory, i32> {
    match source {
        ImageSource::Demo => Ok(demo::demo_memory()),
        ImageSource::File(path) => match load_image_file(path) {
            Ok(image) => Ok(image.memory),
            Err(err) => {
                eprintln!("error: {err}");
                Err(EXIT_IMAGE)
            }
        },
    }
}

fn run(args: &RunArgs) -> Result<(), i32> {
    let Some(source) = &args.image else {
        eprintln!("No input file.");
        return Err(EXIT_USAGE);
    };
    let memory = load_memory(source)?;

    let console = ConsoleDevice::new(io::stdout()).with_escaped_newlines(args.debug);
    let config = CoreConfig {
        line_terminated_markers: !args.debug,
        ..CoreConfig::default()
    };
    let mut machine = Machine::new(memory, console, config);

    if let Err(err) = signal::install_sigint(machine.stop_signal()) {
        tracing::warn!(%err, "SIGINT handler not installed");
    }

    let mut env = TerminalEnvironment::detect(args.timed);
    let outcome = if args.debug {
        machine.run_session(&mut DebugTrace::new(io::stdout()), &mut env)
    } else {
        machine.run_session(&mut NoTrace, &mut env)
    };
    tracing::debug!(
        runs = outcome.runs,
        steps = outcome.steps,
        pc = outcome.last.pc,
        "session finished"
    );

    if let Some(err) = env.take_failure() {
        eprintln!("error: terminal input failed: {err}");
        return Err(EXIT_TERMINAL);
    }
    Ok(())
}

fn main() {
    init_logging();

    let exit_code = match parse_args(env::args_os().skip(1)) {
        Ok(ParseResult::Version) => {
            println!("{VERSION_TEXT}");
            0
        }
        Ok(ParseResult::Help) => {
            println!("{USAGE_TEXT}");
            0
        }
        Ok(ParseResult::Run(args)) => match run(&args) {
            Ok(()) => 0,
            Err(code) => code,
        },
        Err(error) => {
            eprintln!("error: {error}");
            eprintln!("{USAGE_TEXT}");
            EXIT_USAGE
        }
    };

    std::process::exit(exit_code);
}
