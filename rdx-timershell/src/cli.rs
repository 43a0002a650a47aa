use clap::Parser;
use std::path::PathBuf;

/// Interactive shell for the digital clock and countdown timer.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Configuration file to layer over the defaults.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Skip the startup banner.
    #[arg(short, long)]
    pub quiet: bool,
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
    fn config_and_quiet_are_parsed() {
        let args = Args::try_parse_from(["timershell", "--config=shell.toml", "-q"]).unwrap();
        assert_eq!(args.config, Some(PathBuf::from("shell.toml")));
        assert!(args.quiet);

        let args = Args::try_parse_from(["timershell"]).unwrap();
        assert_eq!(args.config, None);
        assert!(!args.quiet);
    }

    #[test]
    fn stray_arguments_are_rejected() {
        assert!(Args::try_parse_from(["timershell", "--verbose"]).is_err());
        assert!(Args::try_parse_from(["timershell", "extra"]).is_err());
    }
}
