use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use pokedex_viewer::app::App;
use pokedex_viewer::catalog::CatalogHttpClient;
use pokedex_viewer::config::ConfigLoader;
use pokedex_viewer::domain::RecordKey;
use pokedex_viewer::error::DexError;
use pokedex_viewer::output::{JsonOutput, OutputMode, TextOutput};
use pokedex_viewer::tui::Tui;

#[derive(Parser)]
#[command(name = "pokedex")]
#[command(about = "Browse the Pokemon catalog from the terminal")]
#[command(version, author)]
struct Cli {
    #[arg(long, global = true)]
    non_interactive: bool,

    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "List records from the start of the catalog")]
    List(ListArgs),
    #[command(about = "Search loaded records by name, number, type or ability")]
    Search(SearchArgs),
    #[command(about = "Show one record with its evolution line")]
    Show(ShowArgs),
}

#[derive(Args)]
struct ListArgs {
    #[arg(long, default_value_t = 1)]
    pages: usize,
}

#[derive(Args)]
struct SearchArgs {
    query: String,

    #[arg(long)]
    max_pages: Option<usize>,
}

#[derive(Args)]
struct ShowArgs {
    /// National dex number or name.
    key: String,
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(dex) = report.downcast_ref::<DexError>() {
            return ExitCode::from(map_exit_code(dex));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &DexError) -> u8 {
    match error {
        DexError::RecordNotFound(_) | DexError::InvalidQuery(_) => 2,
        DexError::CatalogStatus { status: 404, .. } => 2,
        DexError::CatalogHttp(_)
        | DexError::CatalogStatus { .. }
        | DexError::CatalogDecode { .. } => 3,
        _ => 1,
    }
}

fn run() -> miette::Result<()> {
    let cli = Cli::parse();
    let output_mode = if cli.non_interactive {
        OutputMode::NonInteractive
    } else {
        OutputMode::Interactive
    };

    let browsing = cli.command.is_none() && matches!(output_mode, OutputMode::Interactive);
    if !browsing {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    let settings = ConfigLoader::resolve(cli.config.as_deref())?;
    let client = CatalogHttpClient::new(&settings.base_url, settings.timeout)?;
    let app = App::new(client, settings);

    match cli.command {
        Some(Commands::List(args)) => run_list(&app, args, output_mode),
        Some(Commands::Search(args)) => run_search(&app, args, output_mode),
        Some(Commands::Show(args)) => run_show(&app, args, output_mode),
        None => {
            if browsing {
                let mut tui = Tui::new(app.catalog(), app.settings().clone());
                tui.run()
            } else {
                Err(miette::Report::msg(
                    "command required (try `pokedex --help`)",
                ))
            }
        }
    }
}

fn run_list(
    app: &App<CatalogHttpClient>,
    args: ListArgs,
    output_mode: OutputMode,
) -> miette::Result<()> {
    match output_mode {
        OutputMode::NonInteractive => {
            let result = app.list(args.pages, &JsonOutput)?;
            JsonOutput::print_list(&result).into_diagnostic()
        }
        OutputMode::Interactive => {
            let result = app.list(args.pages, &TextOutput)?;
            TextOutput::print_list(&result).into_diagnostic()
        }
    }
}

fn run_search(
    app: &App<CatalogHttpClient>,
    args: SearchArgs,
    output_mode: OutputMode,
) -> miette::Result<()> {
    match output_mode {
        OutputMode::NonInteractive => {
            let result = app.search(&args.query, args.max_pages, &JsonOutput)?;
            JsonOutput::print_search(&result).into_diagnostic()
        }
        OutputMode::Interactive => {
            let result = app.search(&args.query, args.max_pages, &TextOutput)?;
            TextOutput::print_search(&result).into_diagnostic()
        }
    }
}

fn run_show(
    app: &App<CatalogHttpClient>,
    args: ShowArgs,
    output_mode: OutputMode,
) -> miette::Result<()> {
    let key: RecordKey = args.key.parse()?;
    match output_mode {
        OutputMode::NonInteractive => {
            let result = app.show(&key, &JsonOutput)?;
            JsonOutput::print_detail(&result).into_diagnostic()
        }
        OutputMode::Interactive => {
            let result = app.show(&key, &TextOutput)?;
            TextOutput::print_detail(&result).into_diagnostic()
        }
    }
}
