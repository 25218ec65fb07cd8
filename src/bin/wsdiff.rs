//! wsdiff -- colorized, whitespace-aware diff of two files.
//!
//! Usage: wsdiff [OPTIONS] FILE1 FILE2

use std::process::ExitCode;

fn main() -> ExitCode {
    let args = match wsdiff::cli::parse(std::env::args_os()) {
        Ok(args) => args,
        Err(code) => return code,
    };

    // Tracing goes to stderr so it never mixes with the diff on stdout.
    let default_level = if args.debug { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    wsdiff::cli::execute(&args)
}
