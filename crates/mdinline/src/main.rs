//! mdinline CLI - Markdown region inlining.
//!
//! Rewrites regions between `<!-- <inline ...> -->` and `<!-- </inline> -->`
//! marker comments with content sliced from external source files, writing
//! the result to stdout or back to the input file.

mod error;
mod output;

use std::io::{Read as _, Write as _};
use std::path::{Path, PathBuf};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use error::CliError;
use mdinline_engine::{Rewriter, RewriterConfig};
use output::Output;

/// Inline external files into markdown presentations.
#[derive(Parser)]
#[command(name = "mdinline", version, about)]
struct Cli {
    /// Input markdown file (use - or omit to read standard input).
    input: Option<PathBuf>,

    /// Modify the input file in place instead of writing to stdout.
    #[arg(short, long)]
    in_place: bool,

    /// Extension for the backup copy written before an in-place rewrite.
    #[arg(short = 'b', long, value_name = "EXT", requires = "in_place")]
    backup_ext: Option<String>,

    /// Empty all region bodies without reading any source files.
    #[arg(short, long)]
    clean: bool,

    /// Base directory for resolving src paths.
    #[arg(long, value_name = "DIR", default_value = ".")]
    base_dir: PathBuf,

    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose forces INFO level, otherwise the filter comes from RUST_LOG
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(err) = run(&cli, &output) {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

/// Read the input, rewrite it in memory, then write it out.
///
/// Nothing is written (stdout, backup, or target) until the whole document
/// has been rewritten successfully.
fn run(cli: &Cli, output: &Output) -> Result<(), CliError> {
    let file = cli.input.as_deref().filter(|p| *p != Path::new("-"));
    if cli.in_place && file.is_none() {
        return Err(CliError::Validation(
            "standard input is not a valid input when using --in-place or -i".to_owned(),
        ));
    }

    let original = match file {
        Some(path) => std::fs::read_to_string(path).map_err(|source| CliError::ReadInput {
            path: path.to_path_buf(),
            source,
        })?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let mut rewriter = Rewriter::with_config(
        RewriterConfig::new()
            .with_base_dir(&cli.base_dir)
            .with_clean(cli.clean),
    );
    let result = rewriter.process(&original)?;

    for warning in rewriter.warnings() {
        output.warning(warning);
    }

    match file {
        Some(path) if cli.in_place => {
            write_in_place(path, &original, &result, cli.backup_ext.as_deref())?;
        }
        _ => std::io::stdout().write_all(result.as_bytes())?,
    }
    Ok(())
}

/// Overwrite `path` with the rewritten document, copying the original
/// content to `<path>.<ext>` first when a backup extension was requested.
fn write_in_place(
    path: &Path,
    original: &str,
    result: &str,
    backup_ext: Option<&str>,
) -> Result<(), CliError> {
    if let Some(ext) = backup_ext {
        let backup = backup_path(path, ext);
        std::fs::write(&backup, original).map_err(|source| CliError::WriteOutput {
            path: backup.clone(),
            source,
        })?;
        tracing::info!(backup = %backup.display(), "wrote backup");
    }
    std::fs::write(path, result).map_err(|source| CliError::WriteOutput {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), "rewrote in place");
    Ok(())
}

/// `<path>.<ext>`, keeping the original file name intact.
fn backup_path(path: &Path, ext: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(ext);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cli(input: Option<PathBuf>, base_dir: PathBuf) -> Cli {
        Cli {
            input,
            in_place: true,
            backup_ext: None,
            clean: false,
            base_dir,
            verbose: false,
        }
    }

    #[test]
    fn test_backup_path_appends_extension() {
        assert_eq!(
            backup_path(Path::new("slides.md"), "bak"),
            PathBuf::from("slides.md.bak")
        );
        assert_eq!(
            backup_path(Path::new("dir/slides.md"), "orig"),
            PathBuf::from("dir/slides.md.orig")
        );
    }

    #[test]
    fn test_in_place_rejects_stdin() {
        let output = Output::new();

        let result = run(&cli(None, PathBuf::from(".")), &output);
        assert!(matches!(result, Err(CliError::Validation(_))));

        let result = run(&cli(Some(PathBuf::from("-")), PathBuf::from(".")), &output);
        assert!(matches!(result, Err(CliError::Validation(_))));
    }

    #[test]
    fn test_in_place_rewrite_with_backup() {
        let temp_dir = tempfile::tempdir().unwrap();
        let target = temp_dir.path().join("slides.md");
        let original = "<!-- <inline src=\"s.txt\"> -->\nstale\n<!-- </inline> -->\n";
        std::fs::write(&target, original).unwrap();
        std::fs::write(temp_dir.path().join("s.txt"), "fresh\n").unwrap();

        let mut args = cli(Some(target.clone()), temp_dir.path().to_path_buf());
        args.backup_ext = Some("bak".to_owned());
        run(&args, &Output::new()).unwrap();

        let rewritten = std::fs::read_to_string(&target).unwrap();
        assert_eq!(
            rewritten,
            "<!-- <inline src=\"s.txt\"> -->\nfresh\n<!-- </inline> -->\n"
        );
        let backup = std::fs::read_to_string(temp_dir.path().join("slides.md.bak")).unwrap();
        assert_eq!(backup, original);
    }

    #[test]
    fn test_failed_run_leaves_target_untouched() {
        let temp_dir = tempfile::tempdir().unwrap();
        let target = temp_dir.path().join("slides.md");
        let original = "<!-- <inline src=\"missing.txt\"> -->\nstale\n<!-- </inline> -->\n";
        std::fs::write(&target, original).unwrap();

        let args = cli(Some(target.clone()), temp_dir.path().to_path_buf());
        let result = run(&args, &Output::new());
        assert!(matches!(result, Err(CliError::Inline(_))));
        assert_eq!(std::fs::read_to_string(&target).unwrap(), original);
    }

    #[test]
    fn test_clean_mode_ignores_missing_sources() {
        let temp_dir = tempfile::tempdir().unwrap();
        let target = temp_dir.path().join("slides.md");
        std::fs::write(
            &target,
            "<!-- <inline src=\"missing.txt\"> -->\nstale\n<!-- </inline> -->\n",
        )
        .unwrap();

        let mut args = cli(Some(target.clone()), temp_dir.path().to_path_buf());
        args.clean = true;
        run(&args, &Output::new()).unwrap();

        assert_eq!(
            std::fs::read_to_string(&target).unwrap(),
            "<!-- <inline src=\"missing.txt\"> -->\n<!-- </inline> -->\n"
        );
    }
}
