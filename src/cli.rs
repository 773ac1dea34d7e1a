use clap::Parser;

#[derive(Parser)]
#[command(
    name = "btksorgu",
    version,
    about = "Queries Turkey's BTK registry for domain access-block decisions"
)]
pub struct Cli {
    /// Domains to look up
    pub domains: Vec<String>,

    /// Read the domain list from a file (one per line, # comments allowed)
    #[arg(long = "liste", value_name = "FILE")]
    pub list_file: Option<String>,

    /// Emit one JSON object per result instead of formatted output
    #[arg(long)]
    pub json: bool,

    /// Run the interactive terminal UI
    #[arg(long)]
    pub tui: bool,
}
