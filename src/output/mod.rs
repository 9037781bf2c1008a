pub mod report;

use colored::Colorize;
use itertools::Itertools;

use crate::catalog::PageView;
use crate::model::PokemonRecord;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Html,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "text" | "txt" | "tsv" => Some(Self::Text),
            "json" => Some(Self::Json),
            "html" | "htm" => Some(Self::Html),
            _ => None,
        }
    }
}

pub fn infer_format_from_path(path: &str) -> Option<OutputFormat> {
    let lower = path.trim().to_lowercase();
    if lower.ends_with(".json") {
        return Some(OutputFormat::Json);
    }
    if lower.ends_with(".html") || lower.ends_with(".htm") {
        return Some(OutputFormat::Html);
    }
    if lower.ends_with(".txt") || lower.ends_with(".tsv") {
        return Some(OutputFormat::Text);
    }
    None
}

const NAME_WIDTH: usize = 18;
const TYPE_WIDTH: usize = 10;

fn table_header() -> String {
    format!(
        "{:>5}  {:<NAME_WIDTH$}  {:<TYPE_WIDTH$}  {:>5}  {:>4}  {:>4}  {}",
        "#", "Name", "Type", "CP", "Atk", "Def", "Sprite"
    )
}

fn table_row(r: &PokemonRecord) -> String {
    let name = format!("{:<NAME_WIDTH$}", r.name);
    let kind = format!("{:<TYPE_WIDTH$}", r.primary_type);
    format!(
        "{:>5}  {}  {}  {:>5}  {:>4}  {:>4}  {}",
        r.id,
        name.bold().white(),
        kind.cyan(),
        r.combat_power,
        r.attack,
        r.defense,
        r.image_url.as_deref().unwrap_or("-").dimmed(),
    )
}

fn nav_label(label: &str, enabled: bool) -> String {
    if enabled {
        label.bold().blue().to_string()
    } else {
        label.dimmed().to_string()
    }
}

/// Renders one page of the view as a terminal table, followed by the
/// `Page X of Y` footer and the navigation hints.
pub fn render_page_table(view: &PageView<'_>) -> String {
    let mut out = String::new();
    out.push_str(&table_header().bold().to_string());
    out.push('\n');
    if view.items.is_empty() {
        out.push_str(&"  no matching records".yellow().to_string());
        out.push('\n');
    } else {
        out.push_str(&view.items.iter().map(|r| table_row(r)).join("\n"));
        out.push('\n');
    }
    out.push('\n');

    let search = if view.search_term.is_empty() {
        String::new()
    } else {
        format!(" :: search '{}'", view.search_term)
    };
    out.push_str(&format!(
        "{}  Page {} of {}  {} :: {} of {} records{}\n",
        nav_label("[p]revious", view.has_previous()),
        view.page,
        view.total_pages,
        nav_label("[n]ext", view.has_next()),
        view.filtered_count,
        view.total_count,
        search,
    ));
    out
}

pub fn render_text(records: &[&PokemonRecord]) -> Vec<u8> {
    let mut out = String::new();
    for r in records {
        let line = [
            r.id.to_string(),
            r.name.clone(),
            r.primary_type.clone(),
            r.combat_power.to_string(),
            r.attack.to_string(),
            r.defense.to_string(),
            r.image_url.clone().unwrap_or_default(),
        ]
        .iter()
        .join("\t");
        out.push_str(&line);
        out.push('\n');
    }
    out.into_bytes()
}

pub fn render_json(records: &[&PokemonRecord]) -> Vec<u8> {
    serde_json::to_vec_pretty(records).unwrap_or_else(|_| b"[]\n".to_vec())
}

pub fn render_html(records: &[&PokemonRecord], items_per_page: usize) -> Vec<u8> {
    report::render_html(records, items_per_page)
}

pub fn render(format: OutputFormat, records: &[&PokemonRecord], items_per_page: usize) -> Vec<u8> {
    match format {
        OutputFormat::Text => render_text(records),
        OutputFormat::Json => render_json(records),
        OutputFormat::Html => render_html(records, items_per_page),
    }
}
