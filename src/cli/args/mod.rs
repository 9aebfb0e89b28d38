use std::fmt::Write;
use std::path::PathBuf;

use clap::{
    ArgAction, ColorChoice, Command, CommandFactory, FromArgMatches, Parser, ValueEnum,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use usersearch::app_dirs;

#[cfg(test)]
mod tests;

/// Produce the full version banner including the config directory.
fn long_version() -> &'static str {
    let config_dir = match app_dirs::get_config_dir() {
        Ok(path) => path.display().to_string(),
        Err(err) => format!("unavailable ({err})"),
    };

    let mut details = format!("usersearch {}", env!("CARGO_PKG_VERSION"));
    let _ = writeln!(details);
    let _ = writeln!(details, "config directory: {config_dir}");

    Box::leak(details.into_boxed_str())
}

fn cli_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
        .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
        .literal(AnsiColor::Cyan.on_default())
        .placeholder(AnsiColor::Yellow.on_default())
}

/// Parse command line arguments into [`CliArgs`].
pub(crate) fn parse_cli() -> CliArgs {
    let mut matches = cli_command().get_matches();
    CliArgs::from_arg_matches_mut(&mut matches).unwrap_or_else(|err| err.exit())
}

fn cli_command() -> Command {
    CliArgs::command()
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Plain,
    Json,
}

/// Where candidate records come from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum SourceKind {
    Http,
    File,
    Static,
}

impl SourceKind {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::File => "file",
            Self::Static => "static",
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "usersearch",
    version,
    long_version = long_version(),
    about = "Debounced user search against a JSON directory",
    color = ColorChoice::Auto,
    styles = cli_styles()
)]
/// Command-line arguments accepted by the `usersearch` binary.
pub(crate) struct CliArgs {
    #[arg(
        value_name = "QUERY",
        help = "Inputs to submit in order, as if typed; the last one is reported"
    )]
    pub(crate) queries: Vec<String>,
    #[arg(
        short,
        long,
        conflicts_with = "queries",
        help = "Read inputs from stdin, one per line, and print every state change"
    )]
    pub(crate) interactive: bool,
    #[arg(
        short,
        long = "config",
        value_name = "FILE",
        env = "USERSEARCH_CONFIG",
        action = ArgAction::Append,
        help = "Additional configuration file to merge (default: none)"
    )]
    pub(crate) config: Vec<PathBuf>,
    #[arg(
        short = 'n',
        long = "no-config",
        help = "Skip loading default configuration files (default: disabled)"
    )]
    pub(crate) no_config: bool,
    #[arg(long, help = "Print the effective configuration before searching")]
    pub(crate) print_config: bool,
    #[arg(
        short,
        long,
        value_enum,
        value_name = "SOURCE",
        help = "Record source to search (default: http)"
    )]
    pub(crate) source: Option<SourceKind>,
    #[arg(
        long,
        value_name = "URL",
        help = "Endpoint returning a JSON array of users (default: jsonplaceholder)"
    )]
    pub(crate) endpoint: Option<String>,
    #[arg(
        long,
        value_name = "PATH",
        help = "JSON file of users for the file source"
    )]
    pub(crate) file: Option<PathBuf>,
    #[arg(
        long,
        value_name = "N",
        help = "Minimum number of letters before searching (default: 3)"
    )]
    pub(crate) min_length: Option<usize>,
    #[arg(
        long,
        value_name = "MS",
        help = "Quiet period after the last input before searching (default: 300)"
    )]
    pub(crate) quiet_period_ms: Option<u64>,
    #[arg(
        long,
        value_name = "MS",
        help = "Lookup request timeout (default: 10000)"
    )]
    pub(crate) timeout_ms: Option<u64>,
    #[arg(
        long,
        value_name = "MS",
        help = "Delay between positional inputs (default: 0)"
    )]
    pub(crate) keystroke_delay_ms: Option<u64>,
    #[arg(
        short,
        long,
        value_enum,
        default_value_t = OutputFormat::Plain,
        help = "Output format"
    )]
    pub(crate) output: OutputFormat,
    #[arg(short, long, help = "Log gate activity to stderr")]
    pub(crate) verbose: bool,
}
