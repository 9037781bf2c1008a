use colored::Colorize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::catalog::{self, PageCountBasis, ViewState};
use crate::model::PokemonRecord;
use crate::output;

const HELP: &str = "commands:
  <text>           search by name or id (same as `search <text>`)
  /<text>          search by name or id
  search <text>    search by name or id
  clear            clear the search
  n, next          next page
  p, prev          previous page
  page <n>         jump to page n
  ?, help          show this help
  q, quit          leave
";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BrowseCommand {
    Next,
    Previous,
    Search(String),
    Clear,
    Page(usize),
    Help,
    Quit,
    Redraw,
    Invalid(String),
}

pub fn parse_command(line: &str) -> BrowseCommand {
    let line = line.trim();
    if line.is_empty() {
        return BrowseCommand::Redraw;
    }
    if let Some(term) = line.strip_prefix('/') {
        return BrowseCommand::Search(term.trim().to_string());
    }

    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };
    match (head.to_lowercase().as_str(), rest) {
        ("n" | "next", "") => BrowseCommand::Next,
        ("p" | "prev" | "previous", "") => BrowseCommand::Previous,
        ("q" | "quit" | "exit", "") => BrowseCommand::Quit,
        ("?" | "help", "") => BrowseCommand::Help,
        ("clear", "") => BrowseCommand::Clear,
        ("search", term) => BrowseCommand::Search(term.to_string()),
        ("page", raw) => match crate::utils::parse_page_number(raw) {
            Ok(page) => BrowseCommand::Page(page),
            Err(e) => BrowseCommand::Invalid(e),
        },
        // anything else is typed straight into the search box
        _ => BrowseCommand::Search(line.to_string()),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue { changed: bool },
    Quit,
}

pub fn apply_command(state: &mut ViewState, command: &BrowseCommand, total_pages: usize) -> Flow {
    let changed = match command {
        BrowseCommand::Next => state.next(total_pages),
        BrowseCommand::Previous => state.previous(),
        BrowseCommand::Search(term) => {
            let before = state.clone();
            state.set_search(term);
            *state != before
        }
        BrowseCommand::Clear => {
            let before = state.clone();
            state.set_search("");
            *state != before
        }
        BrowseCommand::Page(page) => state.go_to(*page, total_pages),
        BrowseCommand::Quit => return Flow::Quit,
        BrowseCommand::Help | BrowseCommand::Redraw | BrowseCommand::Invalid(_) => false,
    };
    Flow::Continue { changed }
}

/// Interactive loop: renders the current page, reads one command per line
/// from `input` and re-renders when the view changed (or on an empty line). Returns the final view state on quit or EOF.
pub async fn run_session<R, W>(
    records: &[PokemonRecord],
    mut state: ViewState,
    basis: PageCountBasis,
    input: R,
    output: &mut W,
) -> std::io::Result<ViewState>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    write_page(records, &state, basis, output).await?;

    loop {
        output.write_all(b"> ").await?;
        output.flush().await?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        let command = parse_command(&line);
        let total = catalog::page_count(records, &state, basis);
        let changed = match apply_command(&mut state, &command, total) {
            Flow::Quit => break,
            Flow::Continue { changed } => changed,
        };

        match &command {
            BrowseCommand::Help => output.write_all(HELP.as_bytes()).await?,
            BrowseCommand::Invalid(message) => {
                let line = format!("{}\n", message.red());
                output.write_all(line.as_bytes()).await?;
            }
            BrowseCommand::Redraw => write_page(records, &state, basis, output).await?,
            _ if changed => write_page(records, &state, basis, output).await?,
            // page or search unchanged, keep the table on screen
            _ => {}
        }
    }

    output.flush().await?;
    Ok(state)
}

async fn write_page<W>(
    records: &[PokemonRecord],
    state: &ViewState,
    basis: PageCountBasis,
    output: &mut W,
) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let view = catalog::render(records, state, basis);
    let table = output::render_page_table(&view);
    output.write_all(b"\n").await?;
    output.write_all(table.as_bytes()).await?;
    output.flush().await
}
