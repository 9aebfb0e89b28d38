mod cli;
mod settings;
mod workflow;

use anyhow::Result;
use cli::parse_cli;
use workflow::SearchWorkflow;

fn main() -> Result<()> {
    let cli = parse_cli();
    usersearch::logging::initialize(cli.verbose);

    let resolved = settings::load(&cli)?;

    if cli.print_config {
        resolved.print_summary();
    }

    let workflow = SearchWorkflow::from_config(resolved, cli.output)?;
    if cli.interactive {
        workflow.run_interactive()
    } else {
        workflow.run_queries(&cli.queries)
    }
}
