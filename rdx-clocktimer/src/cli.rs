use clap::Parser;
use clocktimer::prelude::TimerConfiguration;
use std::path::PathBuf;

/// Runs the clock and, optionally, a single countdown, logging every event.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Configuration file to layer over the defaults.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Countdown hours, coerced like the form input (0-23).
    #[arg(requires_all = ["minutes", "seconds"], allow_negative_numbers = true)]
    pub hours: Option<String>,

    /// Countdown minutes (0-59).
    #[arg(requires = "seconds", allow_negative_numbers = true)]
    pub minutes: Option<String>,

    /// Countdown seconds (0-59).
    #[arg(allow_negative_numbers = true)]
    pub seconds: Option<String>,
}

impl Args {
    /// The requested countdown, if all three fields were given.
    pub fn duration(&self) -> Option<TimerConfiguration> {
        match (&self.hours, &self.minutes, &self.seconds) {
            (Some(h), Some(m), Some(s)) => Some(TimerConfiguration::from_inputs(h, m, s)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn config_accepts_both_spellings() {
        let spaced = Args::try_parse_from(["clockdev", "--config", "a.toml"]).unwrap();
        let joined = Args::try_parse_from(["clockdev", "--config=a.toml"]).unwrap();
        assert_eq!(spaced.config, Some(PathBuf::from("a.toml")));
        assert_eq!(joined.config, spaced.config);
        assert_eq!(joined.duration(), None);
    }

    #[test]
    fn three_fields_become_a_coerced_countdown() {
        let args = Args::try_parse_from(["clockdev", "1", "75", "-4"]).unwrap();
        assert_eq!(args.config, None);
        assert_eq!(args.duration(), Some(TimerConfiguration::new(1, 59, 0)));
    }

    #[test]
    fn partial_durations_and_unknown_flags_are_rejected() {
        assert!(Args::try_parse_from(["clockdev", "1", "2"]).is_err());
        assert!(Args::try_parse_from(["clockdev", "--verbose"]).is_err());
        assert!(Args::try_parse_from(["clockdev", "1", "2", "3", "4"]).is_err());
    }

    #[test]
    fn help_is_rendered_instead_of_failing() {
        let err = Args::try_parse_from(["clockdev", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }
}
