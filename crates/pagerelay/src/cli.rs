use std::fmt::Display;
use std::path::PathBuf;

use clap::{error::ErrorKind, CommandFactory, Parser};

/// Standard input filename
const STDIN_FILE: &str = "-";

/// Default configuration file
const DEFAULT_CONFIG: &str = "config/config.json";

const USAGE_SHORT: &str = r#"
This program reads the text output of multimon-ng, decodes any POCSAG, FLEX, and SAME/EAS messages that are present, and relays them to a PagerMon server.

See --help for more details.
"#;

const USAGE_LONG: &str = r#"
This program reads the text output of multimon-ng, decodes any POCSAG, FLEX, and SAME/EAS messages that are present, and relays them to a PagerMon server.

Pipe multimon-ng into this program:

    rtl_fm -f 148.5625M -s 22050 \
        | multimon-ng -t raw -a POCSAG512 -a POCSAG1200 \
            -a FLEX -a EAS -f alpha - \
        | pagerelay

If the --config file does not exist, it is created with default settings and the program exits. Set your server's hostname and API key in the file and run again.

Messages which fail to deliver are retried with exponential back-off, up to ten times. When the input closes, the program waits for pending deliveries to finish. Press Ctrl+C to abandon them.
"#;

/// Top-level program arguments
#[derive(Parser, Clone, Debug)]
#[command(version)]
#[command(about, long_about = None)]
#[command(after_help = USAGE_SHORT, after_long_help = USAGE_LONG)]
#[command(max_term_width = 100)]
pub struct Args {
    /// Verbosity level (-vvv for more)
    #[arg(short, long, default_value_t = 0, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Print NOTHING, not even decoded messages
    ///
    /// Logging is disabled too, including the notice that the
    /// input has closed.
    #[arg(short, long)]
    pub quiet: bool,

    /// Configuration file (JSON)
    ///
    /// Created with default settings if it does not exist.
    #[arg(short, long, default_value = DEFAULT_CONFIG)]
    pub config: PathBuf,

    /// Input file (or "-" for stdin)
    ///
    /// The input is multimon-ng text output, one message per line.
    #[arg(long, default_value_t = STDIN_FILE.to_string())]
    pub file: String,

    /// Embedded message timestamps are UTC
    ///
    /// By default, timestamps found in message text are taken
    /// to be in the local time zone.
    #[arg(long)]
    pub utc: bool,
}

impl Args {
    /// Return true if the user requests input from stdin
    pub fn input_is_stdin(&self) -> bool {
        self.file == STDIN_FILE
    }
}

/// A program-level error with exit code
#[derive(Debug)]
pub struct CliError {
    error: anyhow::Error,
    exit_code: i32,
}

impl CliError {
    /// Create new error with a custom exit code
    pub fn new(error: anyhow::Error, code: i32) -> CliError {
        CliError {
            error,
            exit_code: code,
        }
    }

    /// Print this error to the terminal
    ///
    /// Errors from clap are printed verbatim. Other types of errors
    /// are printed indirectly via clap's fancy formatter.
    pub fn print(&self) -> std::io::Result<()> {
        if let Some(e) = self.error.downcast_ref::<clap::Error>() {
            e.print()
        } else {
            Args::command()
                .error(ErrorKind::Format, self.to_string())
                .print()
        }
    }

    /// Print this error to the terminal and exit
    pub fn exit(&self) -> ! {
        drop(self.print());
        std::process::exit(self.exit_code);
    }
}

impl Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.error)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> CliError {
        CliError::new(err, 1)
    }
}

impl From<clap::Error> for CliError {
    fn from(err: clap::Error) -> CliError {
        let code = if err.use_stderr() { 1 } else { 0 };
        CliError::new(err.into(), code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clap() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["pagerelay"]).expect("parse");
        assert!(args.input_is_stdin());
        assert_eq!(args.config, PathBuf::from(DEFAULT_CONFIG));
        assert!(!args.utc);

        let args = Args::try_parse_from(["pagerelay", "-vv", "--file", "capture.txt", "--utc"])
            .expect("parse");
        assert_eq!(args.verbose, 2);
        assert!(!args.input_is_stdin());
        assert!(args.utc);
    }

    #[test]
    fn test_quiet() {
        let args = Args::try_parse_from(["pagerelay", "-q"]).expect("parse");
        assert!(args.quiet);

        let cmd = Args::command();
        let quiet = cmd
            .get_arguments()
            .find(|arg| arg.get_id() == "quiet")
            .expect("quiet argument");
        let help = quiet.get_long_help().expect("long help").to_string();
        assert!(help.contains("input has closed"), "{}", help);
    }
}
