//! Command-line surface and the top-level diff run.
//!
//! Usage: `wsdiff [OPTIONS] FILE1 FILE2`
//!
//! Exit codes follow `sysexits.h`: 64 for usage errors, 66 when an input
//! cannot be loaded, 70 for an unrecognized option, and 74 when the diff
//! cannot be written out.

use std::ffi::OsString;
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use tracing::info;

use crate::engine::{DEFAULT_TIMEOUT_SECS, Diff};
use crate::error::DiffError;
use crate::loader::{self, DEFAULT_MAX_FILE_SIZE, LoadedFile};
use crate::render::classify::CrPolicy;
use crate::render::{RenderOptions, Renderer};

/// Process exit statuses.
pub mod exit {
    pub const SUCCESS: u8 = 0;
    /// Wrong number of files or a malformed option value.
    pub const USAGE: u8 = 64;
    /// An input file could not be loaded.
    pub const NO_INPUT: u8 = 66;
    /// An option that is not recognized.
    pub const UNKNOWN_OPTION: u8 = 70;
    /// Writing the rendered diff failed.
    pub const IO_ERROR: u8 = 74;
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "wsdiff",
    version,
    about = "Colorized character diff that tells whitespace changes apart"
)]
pub struct Args {
    /// Verbose tracing on stderr.
    #[arg(short, long)]
    pub debug: bool,

    /// Collapse runs of spaces and tabs before diffing.
    #[arg(short = 'w', long)]
    pub ignore_whitespace: bool,

    /// Omit lines that are entirely unchanged.
    #[arg(short, long)]
    pub skip_equal_lines: bool,

    /// Prefix each output line with its number.
    #[arg(short = 'l', long)]
    pub show_line_numbers: bool,

    /// Fold unchanged gaps shorter than N bytes into the surrounding edits.
    #[arg(short, long, value_name = "N", default_value_t = 0)]
    pub merge_window: usize,

    /// Diff computation deadline in seconds; 0 disables it.
    #[arg(short, long, value_name = "SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: f32,

    /// Style carriage returns like spaces and tabs instead of as text.
    #[arg(long)]
    pub cr_as_whitespace: bool,

    /// Refuse inputs larger than this many bytes.
    #[arg(long, value_name = "BYTES", default_value_t = DEFAULT_MAX_FILE_SIZE)]
    pub max_size: u64,

    /// The two files to compare.
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,
}

impl Args {
    pub const fn render_options(&self) -> RenderOptions {
        RenderOptions {
            ignore_whitespace: self.ignore_whitespace,
            skip_equal_lines: self.skip_equal_lines,
            show_line_numbers: self.show_line_numbers,
            merge_window: self.merge_window,
            cr_policy: if self.cr_as_whitespace {
                CrPolicy::Whitespace
            } else {
                CrPolicy::Content
            },
        }
    }
}

/// Wrong number of positional arguments.
#[derive(Debug, thiserror::Error)]
#[error("expected exactly two files, got {count}")]
pub struct UsageError {
    pub count: usize,
}

/// Load outcome of one input, for the failure diagnostic.
#[derive(Debug)]
pub struct FileStatus {
    pub path: PathBuf,
    pub error: Option<DiffError>,
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error {
            None => write!(f, "{}: ok (status 0)", self.path.display()),
            Some(err) => write!(f, "{err} (status {})", err.status_code()),
        }
    }
}

/// At least one input failed to load.
#[derive(Debug, thiserror::Error)]
#[error("cannot load inputs: {first}; {second}")]
pub struct LoadFailure {
    pub first: FileStatus,
    pub second: FileStatus,
}

/// Parse arguments, or report why not and the status to exit with.
pub fn parse<I, T>(argv: I) -> Result<Args, ExitCode>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    Args::try_parse_from(argv).map_err(|err| {
        let code = match err.kind() {
            ErrorKind::DisplayHelp
            | ErrorKind::DisplayVersion
            | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => exit::SUCCESS,
            ErrorKind::UnknownArgument => exit::UNKNOWN_OPTION,
            _ => exit::USAGE,
        };
        // Nothing sensible to do if stderr is gone.
        let _ = err.print();
        ExitCode::from(code)
    })
}

/// Run the diff for parsed `args`, writing to stdout.
pub fn execute(args: &Args) -> ExitCode {
    let stdout = std::io::stdout();
    match run(args, stdout.lock()) {
        Ok(_) => ExitCode::from(exit::SUCCESS),
        Err(err) => {
            eprintln!("wsdiff: {err:#}");
            let code = exit_code(&err);
            if code == exit::USAGE {
                eprintln!("{}", Args::command().render_usage());
            }
            ExitCode::from(code)
        }
    }
}

/// Diff the two files named in `args` and render into `out`.
///
/// Both inputs are released before this returns, on success or failure.
pub fn run<W: Write>(args: &Args, out: W) -> Result<W> {
    let [first, second] = args.files.as_slice() else {
        return Err(UsageError {
            count: args.files.len(),
        }
        .into());
    };

    let (old, new) = load_pair(first, second, args.max_size)?;
    let options = args.render_options();
    let engine = options.engine_options(args.timeout);
    info!(
        old = %old.path().display(),
        new = %new.path().display(),
        old_len = old.len(),
        new_len = new.len(),
        "diff starting"
    );

    let diff = Diff::new(&engine, &old, &new);
    let mut renderer = Renderer::new(out, options);
    diff.for_each_edit(&mut renderer).context("failed to write diff output")?;
    let stats = renderer.stats();
    let out = renderer.finish().context("failed to flush diff output")?;

    info!(
        runs = stats.runs,
        transitions = stats.transitions,
        skipped_lines = stats.skipped_lines,
        "diff finished"
    );
    Ok(out)
}

/// Exit status for an error returned by [`run`].
pub fn exit_code(err: &anyhow::Error) -> u8 {
    if err.downcast_ref::<UsageError>().is_some() {
        exit::USAGE
    } else if err.downcast_ref::<LoadFailure>().is_some() {
        exit::NO_INPUT
    } else {
        exit::IO_ERROR
    }
}

/// Load both inputs, attempting the second even if the first fails so the
/// diagnostic can report both.
fn load_pair(
    first: &Path,
    second: &Path,
    max_size: u64,
) -> Result<(LoadedFile, LoadedFile), LoadFailure> {
    match (loader::load(first, max_size), loader::load(second, max_size)) {
        (Ok(old), Ok(new)) => Ok((old, new)),
        (old, new) => Err(LoadFailure {
            first: FileStatus {
                path: first.to_path_buf(),
                error: old.err(),
            },
            second: FileStatus {
                path: second.to_path_buf(),
                error: new.err(),
            },
        }),
    }
}
