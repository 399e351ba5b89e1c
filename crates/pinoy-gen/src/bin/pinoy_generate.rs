//! Offline generator for Philippine-localised test person records.
//!
//! This binary delegates to `pinoy_gen::generate_cli` for parsing and
//! generation, keeping the CLI behaviour testable without spawning a process.

use std::env;
use std::io::{self, Write};
use std::process::ExitCode;

use pinoy_gen::generate_cli::{
    CliError, ParseOutcome, generate, parse_args, render_envelope, success_message, write_output,
};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let Err(write_err) = writeln!(io::stderr().lock(), "{err}") {
                drop(write_err);
            }
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), CliError> {
    match parse_args(env::args().skip(1))? {
        ParseOutcome::Help => {
            print_usage(io::stdout().lock());
            Ok(())
        }
        ParseOutcome::Options(options) => {
            let envelope = generate(&options)?;
            let rendered = render_envelope(&envelope)?;
            match options.output() {
                Some(path) => {
                    write_output(path, &rendered)?;
                    write_stdout(&success_message(&envelope, path));
                }
                None => write_stdout(rendered.trim_end()),
            }
            Ok(())
        }
    }
}

fn print_usage(mut out: impl Write) {
    let usage = concat!(
        "Usage: pinoy-generate [options]\n",
        "\n",
        "Options:\n",
        "  --count <n>            Number of records (defaults to 1)\n",
        "  --seed <seed>          Seed to replay (defaults to a fresh random seed)\n",
        "  --year <yyyy>          Reference year for ages (defaults to the current year)\n",
        "  --version-label <v>    Version echoed in the envelope (defaults to debug)\n",
        "  --dataset <path>       Reference dataset JSON (defaults to the bundled data)\n",
        "  --output <path>        Write the envelope here instead of stdout\n",
        "  -h, --help             Print this help output\n",
    );
    if let Err(err) = out.write_all(usage.as_bytes()) {
        drop(err);
    }
}

fn write_stdout(message: &str) {
    if let Err(err) = writeln!(io::stdout().lock(), "{message}") {
        drop(err);
    }
}
