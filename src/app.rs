use std::time::Duration;

use clap::{error::ErrorKind, CommandFactory, Parser};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use itertools::Itertools;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::time::Instant;

use crate::browse;
use crate::catalog::{self, PageCountBasis, ViewState, DEFAULT_ITEMS_PER_PAGE};
use crate::cli::args::CliArgs;
use crate::cli::validation;
use crate::config::{self, ConfigFile};
use crate::fetcher::DEFAULT_LAST_ID;
use crate::loading::{LoadingIndicator, LoadingState, DEFAULT_STATUS_INTERVAL};
use crate::logging::{self, BarWriter};
use crate::model::PokemonRecord;
use crate::output::{self, OutputFormat};
use crate::runner::{Options, Runner};

fn print_banner() {
    const BANNER: &str = r#"
                 __
    ____  ____  / /_____ _   __(_)__ _      __
   / __ \/ __ \/ //_/ _ \ | / / / _ \ | /| / /
  / /_/ / /_/ / ,< /  __/ |/ / /  __/ |/ |/ /
 / .___/\____/_/|_|\___/|___/_/\___/|__/|__/
/_/
       v0.1.0 - pokémon catalog viewer
    "#;
    print!("{}", BANNER.bold().yellow());
    println!();
}

fn format_kv_line(label: &str, value: &str) {
    println!(":: {:<10}: {}", label, value);
}

fn render_custom_help() -> String {
    let cmd = CliArgs::command();
    let mut out = String::new();

    out.push_str(cmd.get_name());
    if let Some(version) = cmd.get_version() {
        out.push(' ');
        out.push_str(version);
    }
    out.push('\n');
    if let Some(long_about) = cmd.get_long_about().or(cmd.get_about()) {
        out.push_str(&long_about.to_string());
        out.push('\n');
    }
    out.push_str(&format!("\nUsage: {} [OPTIONS]\n\n", cmd.get_name()));

    let visible = cmd.get_arguments().filter(|a| !a.is_hide_set());
    let grouped = visible.into_group_map_by(|a| a.get_help_heading().unwrap_or("Options"));
    let headings = cmd
        .get_arguments()
        .filter_map(|a| a.get_help_heading())
        .chain(std::iter::once("Options"))
        .unique();

    for heading in headings {
        let Some(args) = grouped.get(heading) else {
            continue;
        };
        out.push_str(heading);
        out.push_str(":\n");
        for arg in args {
            let short = arg.get_short().map(|s| format!("-{s}"));
            let long = arg.get_long().map(|l| format!("--{l}"));
            let aliases = arg
                .get_visible_aliases()
                .unwrap_or_default()
                .into_iter()
                .map(|a| format!("--{a}"));
            let mut flags = short.into_iter().chain(long).chain(aliases).join(", ");
            if arg.get_action().takes_values() {
                let value_name = arg
                    .get_value_names()
                    .and_then(|names| names.first())
                    .map(|name| name.as_str())
                    .unwrap_or("VALUE");
                flags.push_str(&format!(" <{value_name}>"));
            }
            out.push_str(&format!("  {flags}\n"));
            if let Some(help) = arg.get_help() {
                out.push_str(&format!("          {}\n", help.to_string().trim()));
            }
            out.push('\n');
        }
    }
    out
}

#[derive(Clone, Debug)]
struct RunConfig {
    runner: Runner,
    workers: usize,
    per_page: usize,
    page_basis: PageCountBasis,
    search: String,
    page: usize,
    interactive: bool,
    output: Option<String>,
    output_format: Option<OutputFormat>,
    no_color: bool,
    force_color: bool,
    verbose: u8,
}

fn build_run_config(args: CliArgs, cfg: ConfigFile) -> Result<RunConfig, String> {
    validation::validate(&args)?;

    let force_color = args.color;
    let no_color = if args.color {
        false
    } else {
        args.no_color || cfg.no_color.unwrap_or(false)
    };

    let cli_range = args
        .ids
        .as_deref()
        .map(crate::utils::parse_id_range)
        .transpose()
        .map_err(|e| format!("invalid --ids: {e}"))?;
    let cfg_range = cfg
        .ids
        .as_deref()
        .map(crate::utils::parse_id_range)
        .transpose()
        .map_err(|e| format!("invalid ids in config: {e}"))?;
    let (first_id, last_id) = match cli_range {
        Some(range) => (*range.start(), *range.end()),
        None => {
            let first_id = args
                .first_id
                .or(cfg_range.as_ref().map(|r| *r.start()))
                .or(cfg.first_id)
                .unwrap_or(1);
            let last_id = args
                .last_id
                .or(cfg_range.as_ref().map(|r| *r.end()))
                .or(cfg.last_id)
                .unwrap_or(DEFAULT_LAST_ID);
            (first_id, last_id)
        }
    };

    let defaults = Options::default();
    let api_url = args.api_url.or(cfg.api_url).unwrap_or(defaults.api_url);
    let rate = args.rate.or(cfg.rate).unwrap_or(defaults.rate);
    let concurrency = args
        .concurrency
        .or(cfg.concurrency)
        .unwrap_or(defaults.concurrency);
    let timeout = args.timeout.or(cfg.timeout).unwrap_or(defaults.timeout_seconds);
    let workers = args.workers.or(cfg.workers).unwrap_or(4);
    if workers == 0 {
        return Err("invalid workers, expected positive integer".to_string());
    }
    let proxy = args.proxy.or(cfg.proxy).filter(|p| !p.trim().is_empty());
    let user_agent = args.user_agent.or(cfg.user_agent);

    let per_page = args
        .per_page
        .or(cfg.per_page)
        .unwrap_or(DEFAULT_ITEMS_PER_PAGE);
    if per_page == 0 {
        return Err("invalid per-page, expected positive integer".to_string());
    }
    let page_basis = match args.page_basis.or(cfg.page_basis) {
        Some(raw) => PageCountBasis::parse(&raw)
            .ok_or_else(|| format!("invalid page basis '{raw}', expected filtered or unfiltered"))?,
        None => PageCountBasis::default(),
    };
    let search = args.search.or(cfg.search).unwrap_or_default();
    let page = args.page.unwrap_or(1);
    let interactive = args.interactive || cfg.interactive.unwrap_or(false);

    let output = args
        .output
        .or(cfg.output)
        .map(|p| config::expand_tilde_string(&p));
    let output_format = match args.output_format.or(cfg.output_format) {
        Some(raw) => Some(
            OutputFormat::parse(&raw)
                .ok_or_else(|| format!("invalid output format '{raw}'"))?,
        ),
        None => None,
    };

    let runner = Runner::new(Options {
        api_url,
        first_id,
        last_id,
        concurrency,
        rate,
        timeout_seconds: timeout,
        proxy,
        user_agent,
    })
    .map_err(|e| e.to_string())?;

    Ok(RunConfig {
        runner,
        workers,
        per_page,
        page_basis,
        search,
        page,
        interactive,
        output,
        output_format,
        no_color,
        force_color,
        verbose: args.verbose,
    })
}

fn progress_bar() -> Result<ProgressBar, String> {
    let pb = ProgressBar::new(0);
    pb.set_draw_target(ProgressDrawTarget::stderr());
    let style = ProgressStyle::with_template(
        "{spinner:.blue} {msg:<11} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
    )
    .map_err(|e| format!("invalid progress template: {e}"))?
    .progress_chars("#>-");
    pb.set_style(style);
    pb.enable_steady_tick(Duration::from_millis(120));
    Ok(pb)
}

fn resolve_output_format(path: &str, explicit: Option<OutputFormat>) -> OutputFormat {
    explicit
        .or_else(|| output::infer_format_from_path(path))
        .unwrap_or(OutputFormat::Text)
}

async fn write_output(
    path: &str,
    format: OutputFormat,
    records: &[&PokemonRecord],
    per_page: usize,
) -> Result<(), String> {
    let rendered = output::render(format, records, per_page);
    let mut outfile = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
        .await
        .map_err(|e| format!("failed to open output file '{path}': {e}"))?;
    outfile
        .write_all(&rendered)
        .await
        .map_err(|e| format!("failed to write output file '{path}': {e}"))?;
    outfile
        .flush()
        .await
        .map_err(|e| format!("failed to write output file '{path}': {e}"))
}

async fn run_async(run: RunConfig, log_writer: BarWriter) -> Result<(), String> {
    if run.no_color {
        colored::control::set_override(false);
    } else if run.force_color {
        colored::control::set_override(true);
    }
    print_banner();

    let now = Instant::now();
    let runner = &run.runner;
    let opts = runner.options();
    format_kv_line("API", &opts.api_url);
    format_kv_line("Ids", &format!("{}-{}", opts.first_id, opts.last_id));
    format_kv_line("Rate", &format!("{}/s", opts.rate));
    format_kv_line("Parallel", &opts.concurrency.to_string());
    format_kv_line("Timeout", &format!("{}s", opts.timeout_seconds));
    if let Some(proxy) = opts.proxy.as_deref() {
        format_kv_line("Proxy", proxy);
    }
    format_kv_line("Per page", &run.per_page.to_string());
    format_kv_line("Pages", run.page_basis.label());
    if !run.search.is_empty() {
        format_kv_line("Search", &run.search);
    }
    if let Some(path) = run.output.as_deref() {
        format_kv_line("Output", path);
    }
    println!();

    let pb = progress_bar()?;
    log_writer.attach(&pb);
    let loading = LoadingState::new();
    let indicator = LoadingIndicator::start(pb.clone(), "Loading", DEFAULT_STATUS_INTERVAL);
    let acquired = runner.run_with_progress(&pb, &loading).await;
    indicator.stop();
    pb.finish_and_clear();
    log_writer.detach();
    let catalog = acquired.map_err(|e| e.to_string())?;

    println!(
        "{} {} records loaded, {} failed of {} requested in {}s",
        "::".bold().white(),
        catalog.len().to_string().bold().green(),
        catalog.failed.to_string().bold().red(),
        catalog.requested,
        catalog.elapsed.as_secs(),
    );

    let mut state = ViewState::new(run.per_page);
    state.set_search(&run.search);
    let total_pages = catalog::page_count(&catalog.records, &state, run.page_basis);
    state.go_to(run.page, total_pages);

    if run.interactive {
        println!("{}", "type a name or id to search, n/p to page, ? for help, q to quit".dimmed());
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        let mut stdout = tokio::io::stdout();
        state = browse::run_session(&catalog.records, state, run.page_basis, stdin, &mut stdout)
            .await
            .map_err(|e| format!("interactive session failed: {e}"))?;
    } else {
        let view = catalog::render(&catalog.records, &state, run.page_basis);
        println!();
        print!("{}", output::render_page_table(&view));
    }

    if let Some(path) = run.output.as_deref() {
        let format = resolve_output_format(path, run.output_format);
        let filtered = catalog::filter_records(&catalog.records, state.search_term());
        write_output(path, format, &filtered, run.per_page).await?;
        println!(
            "{} {} records written to {}",
            "::".bold().white(),
            filtered.len(),
            path.bold().blue()
        );
    }

    let elapsed_time = now.elapsed();

    println!();
    println!(":: Completed :: took {}s ::", elapsed_time.as_secs());

    Ok(())
}

fn load_run_config_file(args: &CliArgs) -> Result<ConfigFile, String> {
    match args.config.as_deref() {
        Some(path) => config::load_config(&config::expand_tilde(path), false),
        None => match config::default_config_path() {
            Some(path) => config::load_config(&path, true),
            None => Ok(ConfigFile::default()),
        },
    }
}

fn init_config(args: &CliArgs) -> Result<(), String> {
    let path = match args.config.as_deref() {
        Some(path) => config::expand_tilde(path),
        None => config::default_config_path()
            .ok_or_else(|| "could not determine home directory for config".to_string())?,
    };
    if config::ensure_default_config_file(&path)? {
        println!(":: wrote default config to {}", path.display());
    } else {
        println!(":: config already exists at {}", path.display());
    }
    Ok(())
}

pub fn run_cli() -> Result<(), String> {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp => {
                print!("{}", render_custom_help());
                return Ok(());
            }
            ErrorKind::DisplayVersion => {
                let cmd = CliArgs::command();
                print!("{}", cmd.render_version());
                return Ok(());
            }
            _ => return Err(e.to_string()),
        },
    };

    if args.init_config {
        return init_config(&args);
    }

    let cfg = load_run_config_file(&args)?;
    let run = build_run_config(args, cfg)?;
    let log_writer = logging::init_logging(run.verbose);

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .worker_threads(run.workers)
        .build()
        .map_err(|e| format!("failed to build runtime: {e}"))?;

    rt.block_on(run_async(run, log_writer))?;
    Ok(())
}
