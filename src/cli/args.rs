use clap::{ArgAction, Parser};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "pokeview",
    version,
    about = "terminal catalog viewer for the Pokémon REST API",
    long_about = "Pokeview fetches the Pokémon catalog from a REST API, then lets you page through it and search by name or id.\n\nExamples:\n  pokeview\n  pokeview --ids 1-151 --search saur\n  pokeview -i --concurrency 20 --rate 100\n  pokeview --ids 1-151 -o ./kanto.html\n\nTip: Use --config to persist settings and keep CLI invocations short."
)]
pub struct CliArgs {
    #[arg(
        short = 'v',
        long = "vb",
        visible_alias = "verbose",
        action = ArgAction::Count,
        help_heading = "Output",
        help = "Increase log verbosity (-v warn, -vv info, -vvv debug)."
    )]
    pub verbose: u8,

    #[arg(
        short = 'c',
        long = "clr",
        visible_alias = "color",
        help_heading = "Output",
        help = "Enable colored output (overrides --no-color)."
    )]
    pub color: bool,

    #[arg(
        short = 'n',
        long = "nc",
        visible_alias = "no-color",
        help_heading = "Output",
        help = "Disable colored output."
    )]
    pub no_color: bool,

    #[arg(
        short = 'o',
        long = "out",
        visible_alias = "output",
        value_name = "FILE",
        help_heading = "Output",
        help = "Export the searched records to a file (text, json or html)."
    )]
    pub output: Option<String>,

    #[arg(
        short = 'O',
        long = "of",
        visible_alias = "output-format",
        value_name = "FORMAT",
        help_heading = "Output",
        help = "Export format: text, json or html (inferred from the file extension when omitted)."
    )]
    pub output_format: Option<String>,

    #[arg(
        short = 'u',
        long = "api",
        visible_alias = "api-url",
        value_name = "URL",
        help_heading = "Input",
        help = "Base URL of the pokemon resource (ids are appended)."
    )]
    pub api_url: Option<String>,

    #[arg(
        long = "fi",
        visible_alias = "first-id",
        value_name = "ID",
        help_heading = "Input",
        help = "First id to fetch."
    )]
    pub first_id: Option<u32>,

    #[arg(
        short = 'm',
        long = "li",
        visible_aliases = ["last-id", "max-id"],
        value_name = "ID",
        help_heading = "Input",
        help = "Last id to fetch (inclusive)."
    )]
    pub last_id: Option<u32>,

    #[arg(
        short = 'R',
        long = "ids",
        value_name = "START-END",
        help_heading = "Input",
        help = "Id range to fetch, e.g. 1-151 (overrides --first-id/--last-id)."
    )]
    pub ids: Option<String>,

    #[arg(
        short = 'C',
        long = "cfg",
        visible_alias = "config",
        value_name = "FILE",
        help_heading = "Input",
        help = "Path to config file (defaults to ~/.pokeview/config.yml when present)."
    )]
    pub config: Option<String>,

    #[arg(
        long = "init-config",
        help_heading = "Input",
        help = "Write a commented default config file and exit."
    )]
    pub init_config: bool,

    #[arg(
        short = 'r',
        long = "rt",
        visible_alias = "rate",
        value_name = "RPS",
        help_heading = "Performance",
        help = "Request rate limit (requests per second)."
    )]
    pub rate: Option<u32>,

    #[arg(
        short = 't',
        long = "cc",
        visible_alias = "concurrency",
        value_name = "N",
        help_heading = "Performance",
        help = "Maximum in-flight requests (1 fetches strictly one id at a time)."
    )]
    pub concurrency: Option<usize>,

    #[arg(
        short = 'T',
        long = "to",
        visible_alias = "timeout",
        value_name = "SECONDS",
        help_heading = "Performance",
        help = "Per-request timeout in seconds."
    )]
    pub timeout: Option<usize>,

    #[arg(
        short = 'w',
        long = "wk",
        visible_alias = "workers",
        value_name = "N",
        help_heading = "Performance",
        help = "Runtime worker threads."
    )]
    pub workers: Option<usize>,

    #[arg(
        short = 'p',
        long = "px",
        visible_alias = "proxy",
        value_name = "URL",
        help_heading = "HTTP",
        help = "HTTP proxy URL (e.g. http://127.0.0.1:8080)."
    )]
    pub proxy: Option<String>,

    #[arg(
        short = 'A',
        long = "ua",
        visible_alias = "user-agent",
        value_name = "UA",
        help_heading = "HTTP",
        help = "User-Agent header sent with every request."
    )]
    pub user_agent: Option<String>,

    #[arg(
        short = 's',
        long = "sr",
        visible_alias = "search",
        value_name = "TERM",
        help_heading = "View",
        help = "Search by name (case-insensitive substring) or exact id."
    )]
    pub search: Option<String>,

    #[arg(
        short = 'P',
        long = "pg",
        visible_alias = "page",
        value_name = "N",
        help_heading = "View",
        help = "Page to print (1-based)."
    )]
    pub page: Option<usize>,

    #[arg(
        short = 'N',
        long = "pp",
        visible_alias = "per-page",
        value_name = "N",
        help_heading = "View",
        help = "Records per page."
    )]
    pub per_page: Option<usize>,

    #[arg(
        short = 'B',
        long = "pb",
        visible_alias = "page-basis",
        value_name = "BASIS",
        help_heading = "View",
        help = "Count pages from the searched list (filtered) or the whole catalog (unfiltered)."
    )]
    pub page_basis: Option<String>,

    #[arg(
        short = 'i',
        long = "it",
        visible_alias = "interactive",
        help_heading = "View",
        help = "Browse the catalog interactively after loading."
    )]
    pub interactive: bool,
}
