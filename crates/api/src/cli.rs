//! Command-line definition

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// EventRelay CLI
#[derive(Debug, Parser)]
#[command(name = "eventrelay")]
#[command(author, version, about = "Relay upcoming calendar bookings to a webhook", long_about = None)]
pub struct Cli {
    /// JSON or TOML config file. Without it, configuration comes from
    /// `EVENTRELAY_*` variables, then the standard file locations.
    #[arg(short, long, global = true, env = "EVENTRELAY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Verbosity level (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Fetch upcoming events once, notify eligible bookings and print a summary
    Run,

    /// Poll on the configured schedule until Ctrl-C
    Watch {
        /// Skip the immediate pass even if `schedule.run_on_start` is set
        #[arg(long)]
        no_initial_run: bool,
    },

    /// Show the name and phone the extractor finds in a description
    ///
    /// Reads standard input when `--text` is not given.
    /// Example: printf 'Name: Jane\nPhone: 555' | eventrelay extract
    Extract {
        /// Description text
        #[arg(short, long)]
        text: Option<String>,
    },

    /// Show whether a start time falls inside the lead window
    ///
    /// Example: eventrelay check-window 2024-01-02T09:00:00
    CheckWindow {
        /// Start value as the calendar reports it (RFC 3339, naive or date)
        timestamp: String,

        /// Reference instant (RFC 3339); defaults to the current time
        #[arg(long)]
        now: Option<String>,

        /// IANA zone for offset-less values; defaults to `calendar.timezone`
        #[arg(long)]
        timezone: Option<String>,
    },
}

impl Commands {
    /// Whether the command needs the calendar and webhook wired up.
    pub fn needs_delivery(&self) -> bool {
        matches!(self, Self::Run | Self::Watch { .. })
    }
}

/// Log filter override from verbosity count; `None` keeps the configured level.
pub const fn log_level_from_verbosity(verbose: u8) -> Option<&'static str> {
    match verbose {
        0 => None,
        1 => Some("debug"),
        _ => Some("trace"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(args)
    }

    #[test]
    fn parses_run() {
        let cli = parse(&["eventrelay", "run"]).unwrap();
        assert!(matches!(cli.command, Commands::Run));
        assert_eq!(cli.verbose, 0);
        assert!(cli.command.needs_delivery());
    }

    #[test]
    fn global_flags_work_after_subcommand() {
        let cli = parse(&["eventrelay", "watch", "-vv", "--config", "relay.toml"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("relay.toml")));
        assert!(matches!(cli.command, Commands::Watch { no_initial_run: false }));
    }

    #[test]
    fn parses_watch_without_initial_run() {
        let cli = parse(&["eventrelay", "watch", "--no-initial-run"]).unwrap();
        assert!(matches!(cli.command, Commands::Watch { no_initial_run: true }));
    }

    #[test]
    fn parses_extract_with_and_without_text() {
        let cli = parse(&["eventrelay", "extract", "--text", "Name: Jane"]).unwrap();
        match cli.command {
            Commands::Extract { text } => assert_eq!(text.as_deref(), Some("Name: Jane")),
            other => panic!("unexpected command {other:?}"),
        }

        let cli = parse(&["eventrelay", "extract"]).unwrap();
        assert!(matches!(cli.command, Commands::Extract { text: None }));
        assert!(!cli.command.needs_delivery());
    }

    #[test]
    fn parses_check_window() {
        let cli = parse(&[
            "eventrelay",
            "check-window",
            "2024-01-02",
            "--now",
            "2024-01-01T00:00:00Z",
            "--timezone",
            "Europe/Berlin",
        ])
        .unwrap();

        match cli.command {
            Commands::CheckWindow { timestamp, now, timezone } => {
                assert_eq!(timestamp, "2024-01-02");
                assert_eq!(now.as_deref(), Some("2024-01-01T00:00:00Z"));
                assert_eq!(timezone.as_deref(), Some("Europe/Berlin"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn check_window_requires_timestamp() {
        assert!(parse(&["eventrelay", "check-window"]).is_err());
    }

    #[test]
    fn subcommand_is_required() {
        assert!(parse(&["eventrelay"]).is_err());
    }

    #[test]
    fn verbosity_maps_to_level() {
        assert_eq!(log_level_from_verbosity(0), None);
        assert_eq!(log_level_from_verbosity(1), Some("debug"));
        assert_eq!(log_level_from_verbosity(5), Some("trace"));
    }
}
