use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use perfdoc_cli::{OutputFormat, commands};
use perfdoc_core::metrics::ResourceType;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "perfdoc")]
#[command(author, version, about, long_about = None)]
#[command(
    about = "Diagnose a page load and explain its performance problems in plain language",
    long_about = "perfdoc reads a HAR export of a page load, optionally together with the page's \
                  navigation timing and in-page metrics, and turns them into a prioritized list of \
                  performance issues with a 0-100 health score."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "pretty")]
    format: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Diagnose a page load and print the health report
    Analyze {
        /// Path to the HAR file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Navigation timing JSON (a serialized PerformanceNavigationTiming entry).
        /// Derived from the HAR when omitted.
        #[arg(long, value_name = "FILE", env = "PERFDOC_NAVIGATION")]
        navigation: Option<PathBuf>,

        /// In-page metrics JSON: {longTasks, frameworks, domNodes, title}
        #[arg(long, value_name = "FILE", env = "PERFDOC_PAGE_METRICS")]
        page_metrics: Option<PathBuf>,

        /// Include the technical detail line for each issue
        #[arg(long)]
        technical: bool,
    },

    /// List the resources of a page load as the analyzer sees them
    Resources {
        /// Path to the HAR file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Only these resource types (image, stylesheet, script, font, other)
        #[arg(long = "type", value_name = "TYPE", value_delimiter = ',')]
        types: Vec<ResourceType>,

        /// Only resources from these hosts (supports globs like *.example.com)
        #[arg(long = "host", value_name = "PATTERN")]
        hosts: Vec<String>,

        /// Only resources of at least this many bytes
        #[arg(long, value_name = "BYTES")]
        min_size: Option<u64>,

        /// Only resources that took at least this many milliseconds
        #[arg(long, value_name = "MS")]
        min_time: Option<f64>,
    },

    /// Generate shell completion scripts
    #[command(long_about = "Generate shell completion scripts for perfdoc.

SUPPORTED SHELLS:
    bash, zsh, fish, powershell, elvish

INSTALLATION:
    Bash:  perfdoc completion --shell bash >> ~/.bashrc
    Zsh:   perfdoc completion --shell zsh > ~/.zfunc/_perfdoc
           (then add `fpath=(~/.zfunc $fpath)` to ~/.zshrc)
    Fish:  perfdoc completion --shell fish > ~/.config/fish/completions/perfdoc.fish")]
    Completion {
        /// Shell to generate completions for
        #[arg(long, value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    match cli.command {
        Commands::Analyze {
            file,
            navigation,
            page_metrics,
            technical,
        } => commands::analyze::execute(
            &file,
            navigation.as_deref(),
            page_metrics.as_deref(),
            technical,
            cli.format,
        ),
        Commands::Resources {
            file,
            types,
            hosts,
            min_size,
            min_time,
        } => commands::resources::execute(&file, types, hosts, min_size, min_time, cli.format),
        Commands::Completion { shell } => commands::completion::execute(shell, &mut Cli::command()),
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("perfdoc=debug,perfdoc_cli=debug,perfdoc_core=debug,perfdoc_detectors=debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("perfdoc=info,perfdoc_cli=info,perfdoc_core=warn"))
    };

    // Logs go to stderr so json/table output stays machine readable
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
