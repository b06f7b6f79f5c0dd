use clap::Parser;

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `cadence` binary.
#[derive(Debug, Parser)]
#[command(name = "cadence", version, about = "Cadence - daily task unlocks for internship courses")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, table, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Max results to return
    #[arg(short, long, global = true)]
    pub limit: Option<u32>,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Project root path (defaults to auto-detect via .cadence)
    #[arg(short, long, global = true)]
    pub project: Option<String>,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            limit: self.limit,
            quiet: self.quiet,
            verbose: self.verbose,
            project: self.project.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::subcommands::{AdminCommands, CatalogCommands};
    use super::{Cli, Commands, GlobalFlags, OutputFormat};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from([
            "cadence", "--format", "table", "--limit", "10", "--verbose", "tasks", "user-1",
        ])
        .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Table);
        assert_eq!(cli.limit, Some(10));
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Tasks(ref args) if args.user_id == "user-1"));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["cadence", "today", "user-1", "--format", "raw", "--quiet"])
            .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Raw);
        assert!(cli.quiet);
        assert!(matches!(cli.command, Commands::Today(_)));
    }

    #[test]
    fn output_format_rejects_invalid_value() {
        let parsed = Cli::try_parse_from(["cadence", "--format", "xml", "tasks", "u"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn submit_parses_all_fields() {
        let cli = Cli::try_parse_from([
            "cadence",
            "submit",
            "user-1",
            "--course",
            "rust-101",
            "--day",
            "2",
            "--description",
            "wrote the parser",
            "--file-ref",
            "uploads/abc.zip",
        ])
        .expect("cli should parse");

        let Commands::Submit(args) = cli.command else {
            panic!("expected submit");
        };
        assert_eq!(args.course, "rust-101");
        assert_eq!(args.day, 2);
        assert_eq!(args.file_ref.as_deref(), Some("uploads/abc.zip"));
    }

    #[test]
    fn admin_unlock_requires_course_and_day() {
        let cli = Cli::try_parse_from([
            "cadence", "admin", "unlock", "user-1", "--course", "c", "--day", "3",
        ])
        .expect("cli should parse");
        assert!(matches!(
            cli.command,
            Commands::Admin {
                action: AdminCommands::Unlock { day: 3, .. }
            }
        ));

        assert!(Cli::try_parse_from(["cadence", "admin", "unlock", "user-1", "--day", "3"]).is_err());
    }

    #[test]
    fn admin_enrollment_needs_a_change() {
        assert!(
            Cli::try_parse_from(["cadence", "admin", "enrollment", "u", "--course", "c"]).is_err()
        );
        let cli = Cli::try_parse_from([
            "cadence",
            "admin",
            "enrollment",
            "u",
            "--course",
            "c",
            "--timezone",
            "Europe/Berlin",
        ])
        .expect("cli should parse");
        assert!(matches!(
            cli.command,
            Commands::Admin {
                action: AdminCommands::Enrollment { .. }
            }
        ));
    }

    #[test]
    fn catalog_task_parses_optional_text() {
        let cli = Cli::try_parse_from([
            "cadence", "catalog", "task", "rust-101", "--day", "1", "--title", "Hello",
        ])
        .expect("cli should parse");
        let Commands::Catalog {
            action: CatalogCommands::Task { exercise, test, .. },
        } = cli.command
        else {
            panic!("expected catalog task");
        };
        assert!(exercise.is_none());
        assert!(test.is_none());
    }

    #[test]
    fn global_flags_extraction_copies_values() {
        let cli = Cli::try_parse_from(["cadence", "--project", "/tmp/demo", "admin", "status"])
            .expect("cli should parse");
        let flags: GlobalFlags = cli.global_flags();
        assert_eq!(flags.project.as_deref(), Some("/tmp/demo"));
    }
}
