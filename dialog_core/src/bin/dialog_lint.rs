//! dialog-lint - validate dialog content before it ships.

use clap::Parser;
use dialog_content::{builtin, ContentModule};
use dialog_core::{DialogLibrary, ValidationConfig, Validator};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

/// Exit code when content passed validation.
const EXIT_OK: u8 = 0;
/// Exit code when content failed validation.
const EXIT_INVALID: u8 = 1;
/// Exit code when content could not be loaded or assembled.
const EXIT_LOAD_FAILED: u8 = 2;

#[derive(Parser)]
#[command(name = "dialog-lint")]
#[command(about = "Check dialog trees for dangling links, loops and unreachable content", long_about = None)]
struct Cli {
    /// Extra content modules (TOML) to merge with the built-in content
    paths: Vec<PathBuf>,

    /// Include the game's built-in content (default)
    #[arg(long, overrides_with = "no_builtin")]
    builtin: bool,

    /// Skip the game's built-in content
    #[arg(long, overrides_with = "builtin")]
    no_builtin: bool,

    /// Fail on warnings as well as errors
    #[arg(long)]
    deny_warnings: bool,

    /// Do not report unreachable nodes and choices
    #[arg(long)]
    no_unreachable: bool,
}

impl Cli {
    fn config(&self) -> ValidationConfig {
        ValidationConfig {
            report_unreachable: !self.no_unreachable,
            deny_warnings: self.deny_warnings,
        }
    }

    fn include_builtin(&self) -> bool {
        !self.no_builtin
    }

    fn load_modules(&self) -> dialog_core::Result<Vec<ContentModule>> {
        let mut modules = if self.include_builtin() {
            builtin::modules()?
        } else {
            Vec::new()
        };
        for path in &self.paths {
            modules.push(ContentModule::from_toml_file(path)?);
        }
        Ok(modules)
    }
}

/// Load, assemble and validate; returns the process exit code.
fn run(cli: &Cli) -> u8 {
    let library = match cli.load_modules().and_then(|modules| DialogLibrary::assemble(modules)) {
        Ok(library) => library,
        Err(err) => {
            error!("Failed to assemble dialog content: {}", err);
            return EXIT_LOAD_FAILED;
        }
    };

    let report = Validator::new(cli.config()).validate(&library);
    println!("{}", report);

    match report.into_result() {
        Ok(_) => EXIT_OK,
        Err(err) => {
            error!("{}", err);
            EXIT_INVALID
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    ExitCode::from(run(&Cli::parse()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    const DANGLING: &str = r#"
[trees.broken]
name = "Broken"
start_id = "broken_start"

[nodes.broken_start]
text = "Leads nowhere."
next_id = "broken_missing"
"#;

    const ORPHAN_ONLY: &str = r#"
[trees.lonely]
name = "Lonely"
start_id = "lonely_start"

[nodes.lonely_start]
text = "Hello."

[nodes.lonely_orphan]
text = "Nobody links here."
"#;

    fn write_module(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("dialog-lint").chain(args.iter().copied())).unwrap()
    }

    fn cli_with(flags: &[&str], path: &Path) -> Cli {
        let path = path.to_str().unwrap();
        let mut args: Vec<&str> = flags.to_vec();
        args.push(path);
        cli(&args)
    }

    #[test]
    fn test_builtin_content_passes() {
        assert_eq!(run(&cli(&[])), EXIT_OK);
    }

    #[test]
    fn test_dangling_module_fails_validation() {
        let dir = TempDir::new().unwrap();
        let path = write_module(&dir, "broken.toml", DANGLING);

        assert_eq!(run(&cli_with(&[], &path)), EXIT_INVALID);
    }

    #[test]
    fn test_missing_file_fails_loading() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("not_there.toml");

        assert_eq!(run(&cli_with(&[], &path)), EXIT_LOAD_FAILED);
    }

    #[test]
    fn test_duplicate_ids_fail_loading() {
        let dir = TempDir::new().unwrap();
        let (_, fuel) = builtin::SOURCES
            .iter()
            .find(|(name, _)| *name == "fuel")
            .unwrap();
        let path = write_module(&dir, "fuel_again.toml", fuel);

        assert_eq!(run(&cli_with(&[], &path)), EXIT_LOAD_FAILED);
    }

    #[test]
    fn test_deny_warnings() {
        let dir = TempDir::new().unwrap();
        let path = write_module(&dir, "lonely.toml", ORPHAN_ONLY);

        assert_eq!(run(&cli_with(&["--no-builtin"], &path)), EXIT_OK);
        assert_eq!(
            run(&cli_with(&["--no-builtin", "--deny-warnings"], &path)),
            EXIT_INVALID
        );
        assert_eq!(
            run(&cli_with(&["--no-builtin", "--deny-warnings", "--no-unreachable"], &path)),
            EXIT_OK
        );
    }

    #[test]
    fn test_config_mapping() {
        assert_eq!(cli(&[]).config(), ValidationConfig::default());

        let config = cli(&["--deny-warnings", "--no-unreachable"]).config();
        assert!(config.deny_warnings);
        assert!(!config.report_unreachable);
    }

    #[test]
    fn test_builtin_flags_override_each_other() {
        assert!(cli(&[]).include_builtin());
        assert!(cli(&["--builtin"]).include_builtin());
        assert!(!cli(&["--no-builtin"]).include_builtin());
        assert!(cli(&["--no-builtin", "--builtin"]).include_builtin());
        assert!(!cli(&["--builtin", "--no-builtin"]).include_builtin());
    }
}
