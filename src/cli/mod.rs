mod args;
mod output;

pub(crate) use args::{CliArgs, OutputFormat, SourceKind, parse_cli};
pub(crate) use output::{print_json, print_plain};
