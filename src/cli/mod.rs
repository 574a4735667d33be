use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum, error::ErrorKind};
use tracing::debug;

use crate::api::ApiClient;
use crate::config::DashboardConfig;
use crate::dashboard::{Dashboard, SectionFilter};
use crate::error::CliError;
use crate::output;
use crate::record::Record;
use crate::table::{
    PAGE_SIZE_OPTIONS, SortDirection, SortState, TableState, is_page_size_option,
};

#[derive(Clone, Debug, ValueEnum)]
enum OutputArg {
    Table,
    Json,
    Yaml,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
enum SectionArg {
    #[default]
    All,
    Production,
    Orders,
    Stock,
    Teams,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum CollectionArg {
    Productions,
    Orders,
    Stocks,
    Teams,
}

#[derive(Parser, Debug)]
#[command(name = "dashkpi")]
#[command(about = "Dashboard KPIs and sortable tables over the BI backend")]
#[command(version)]
struct CliArgs {
    #[arg(
        short = 'o',
        long = "output",
        default_value = "table",
        value_enum,
        ignore_case = true,
        global = true
    )]
    output: OutputArg,

    /// Overrides `base_url` from the config file.
    #[arg(long = "base-url", env = "DASHKPI_BASE_URL", global = true)]
    base_url: Option<String>,

    #[arg(long = "config", value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// Request timeout in seconds.
    #[arg(long = "timeout", value_name = "SECS", global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Derive the dashboard KPIs from every collection.
    Kpis {
        #[arg(long = "section", value_enum, default_value = "all", ignore_case = true)]
        section: SectionArg,
    },
    /// Show one page of a collection as a sortable table.
    Table(TableArgs),
}

#[derive(Args, Debug)]
struct TableArgs {
    #[arg(value_enum, ignore_case = true)]
    collection: CollectionArg,

    /// Field path to sort on, e.g. `quantite` or `commande.client`.
    #[arg(long = "sort", value_name = "PATH")]
    sort: Option<String>,

    #[arg(long = "desc")]
    desc: bool,

    /// 1-based page number.
    #[arg(long = "page", default_value_t = 1)]
    page: usize,

    #[arg(long = "page-size")]
    page_size: Option<usize>,

    /// Read productions with their order nested under `commande`.
    #[arg(long = "joined")]
    joined: bool,
}

pub async fn run_async() -> Result<(), CliError> {
    let Some(args) = parse_cli_args()? else {
        return Ok(());
    };

    let mut config = DashboardConfig::load(args.config.as_deref())?;
    if let Some(base_url) = args.base_url {
        config.base_url = base_url;
    }
    if let Some(timeout) = args.timeout {
        if timeout == 0 {
            return Err(CliError::InvalidArgs("--timeout must be greater than zero".to_string()));
        }
        config.timeout_secs = Some(timeout);
    }
    debug!(?config, "resolved configuration");

    let client = ApiClient::new(&config.base_url, config.timeout())?;
    let format = map_output_format(args.output);

    match args.command {
        Command::Kpis { section } => {
            let mut dashboard = Dashboard::new(client, config.kpi_settings());
            let report = dashboard.refresh(map_section(section)).await;
            output::print_report(&report, format)?;
        }
        Command::Table(table) => {
            let pending = pending_table(&table, config.page_size)?;
            match table.collection {
                CollectionArg::Productions if table.joined => {
                    print_table(&client.fetch_joined_productions().await?, pending, format)?
                }
                CollectionArg::Productions => {
                    print_table(&client.fetch_productions().await?, pending, format)?
                }
                CollectionArg::Orders => {
                    print_table(&client.fetch_orders().await?, pending, format)?
                }
                CollectionArg::Stocks => {
                    print_table(&client.fetch_stocks().await?, pending, format)?
                }
                CollectionArg::Teams => {
                    print_table(&client.fetch_teams().await?, pending, format)?
                }
            }
        }
    }

    Ok(())
}

fn parse_cli_args() -> Result<Option<CliArgs>, CliError> {
    match CliArgs::try_parse() {
        Ok(args) => Ok(Some(args)),
        Err(error) => {
            if matches!(
                error.kind(),
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion
            ) {
                print!("{error}");
                return Ok(None);
            }
            Err(CliError::InvalidArgs(error.to_string()))
        }
    }
}

/// Validated table arguments; the default sort column depends on the record type.
fn pending_table(
    args: &TableArgs,
    default_page_size: usize,
) -> Result<PendingTable, CliError> {
    if args.page == 0 {
        return Err(CliError::InvalidArgs("--page starts at 1".to_string()));
    }
    let page_size = args.page_size.unwrap_or(default_page_size);
    if !is_page_size_option(page_size) {
        return Err(CliError::InvalidArgs(format!(
            "--page-size must be one of {PAGE_SIZE_OPTIONS:?}, got {page_size}"
        )));
    }

    Ok(PendingTable {
        sort: args.sort.clone(),
        direction: if args.desc {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        },
        page: args.page - 1,
        page_size,
    })
}

#[derive(Debug, PartialEq, Eq)]
struct PendingTable {
    sort: Option<String>,
    direction: SortDirection,
    page: usize,
    page_size: usize,
}

impl PendingTable {
    fn into_state<R: Record>(self) -> TableState {
        let mut state = TableState::for_record::<R>();
        state.set_page_size(self.page_size);
        if let Some(column) = self.sort {
            state.sort = SortState::new(column);
        }
        state.sort.direction = self.direction;
        state.set_page(self.page);
        state
    }
}

fn print_table<R: Record>(
    records: &[R],
    pending: PendingTable,
    format: output::OutputFormat,
) -> Result<(), CliError> {
    let state = pending.into_state::<R>();
    let page = state.view(records);
    output::print_page(&page, format)?;
    Ok(())
}

fn map_output_format(format: OutputArg) -> output::OutputFormat {
    match format {
        OutputArg::Table => output::OutputFormat::Table,
        OutputArg::Json => output::OutputFormat::Json,
        OutputArg::Yaml => output::OutputFormat::Yaml,
    }
}

fn map_section(section: SectionArg) -> SectionFilter {
    match section {
        SectionArg::All => SectionFilter::All,
        SectionArg::Production => SectionFilter::Production,
        SectionArg::Orders => SectionFilter::Orders,
        SectionArg::Stock => SectionFilter::Stock,
        SectionArg::Teams => SectionFilter::Teams,
    }
}
