//! blogsmith CLI
//!
//! Static blog generator for markdown posts.
//!
//! This is the binary entry point. The library functionality is in `lib.rs`.

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;

/// Command-line interface for blogsmith.
#[derive(Parser)]
#[command(
    name = "blogsmith",
    version,
    about = "A static blog generator for markdown posts"
)]
struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(clap::Subcommand)]
enum Commands {
    /// Build the blog
    Build {
        /// Project root holding the sources and `.env`
        #[arg(short, long, default_value = ".")]
        root: PathBuf,
        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Override the site URL (e.g., https://example.com)
        #[arg(long)]
        site_url: Option<String>,
    },
    /// Validate configuration and posts without writing output
    Check {
        /// Project root holding the sources and `.env`
        #[arg(short, long, default_value = ".")]
        root: PathBuf,
        /// Treat warnings, including skipped posts, as errors
        #[arg(long)]
        strict: bool,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    blogsmith::init_tracing(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Build {
            root,
            output,
            site_url,
        } => {
            blogsmith::cmd::build::run(&root, output.as_deref(), site_url.as_deref())?;
        }
        Commands::Check { root, strict } => {
            blogsmith::cmd::check::run(&root, strict)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn test_cli_build_command_parsing() {
        let args = ["blogsmith", "build", "--output", "public"];
        let cli = Cli::parse_from(args);

        assert_eq!(cli.verbose, 0);
        assert!(!cli.quiet);

        match cli.command {
            Commands::Build {
                root,
                output,
                site_url,
            } => {
                assert_eq!(root, PathBuf::from("."));
                assert_eq!(output, Some(PathBuf::from("public")));
                assert!(site_url.is_none());
            }
            _ => panic!("Expected Build command"),
        }
    }

    #[test]
    fn test_cli_build_defaults() {
        let cli = Cli::parse_from(["blogsmith", "build"]);

        match cli.command {
            Commands::Build { output, .. } => assert!(output.is_none()),
            _ => panic!("Expected Build command"),
        }
    }

    #[test]
    fn test_cli_build_with_root_and_site_url() {
        let args = [
            "blogsmith",
            "build",
            "--root",
            "site",
            "--site-url",
            "https://example.com",
        ];
        let cli = Cli::parse_from(args);

        match cli.command {
            Commands::Build { root, site_url, .. } => {
                assert_eq!(root, PathBuf::from("site"));
                assert_eq!(site_url.as_deref(), Some("https://example.com"));
            }
            _ => panic!("Expected Build command"),
        }
    }

    #[test]
    fn test_cli_check_command_parsing() {
        let args = ["blogsmith", "check", "--strict"];
        let cli = Cli::parse_from(args);

        match cli.command {
            Commands::Check { root, strict } => {
                assert_eq!(root, PathBuf::from("."));
                assert!(strict);
            }
            _ => panic!("Expected Check command"),
        }
    }

    #[test]
    fn test_cli_verbosity_flags() {
        let cli = Cli::parse_from(["blogsmith", "-vv", "build"]);
        assert_eq!(cli.verbose, 2);

        let cli = Cli::parse_from(["blogsmith", "build", "-v"]);
        assert_eq!(cli.verbose, 1);
    }

    #[test]
    fn test_cli_quiet_flag() {
        let cli = Cli::parse_from(["blogsmith", "-q", "check"]);
        assert!(cli.quiet);
    }

    #[test]
    fn test_cli_quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["blogsmith", "-q", "-v", "build"]);
        assert!(result.is_err());
    }
}
