//! Report types and formatters for the preview and active commands

use clap::ValueEnum;
use comfy_table::{Cell, Color, ContentArrangement, Row, Table};
use headernav_core::active_link::{current_page_name, is_active_href};
use headernav_core::submenu::BuiltSubmenu;
use headernav_core::{SubmenuItem, SubmenuOutcome, SubmenuSpec};
use serde::Serialize;

// ============================================================================
// Output Format
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// Pretty-printed JSON report
    Json,
    /// The `<li>` markup the widget would inject
    Markup,
}

// ============================================================================
// Preview Report
// ============================================================================

/// Result of building one submenu outside the browser
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewReport {
    pub source: String,
    pub resolved_url: String,
    pub item_selector: String,
    pub title_selector: String,
    pub max_items: usize,
    /// `fetched`, `cached` or `fallback`
    pub outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<String>,
    pub items: Vec<SubmenuItem>,
    pub markup: String,
}

impl PreviewReport {
    pub fn new(spec: &SubmenuSpec, resolved_url: String, built: BuiltSubmenu) -> Self {
        let (outcome, fallback_reason) = match built.outcome {
            SubmenuOutcome::Fetched { .. } => ("fetched", None),
            SubmenuOutcome::Cached { .. } => ("cached", None),
            SubmenuOutcome::Fallback { reason } => ("fallback", Some(reason)),
        };
        Self {
            source: spec.source.clone(),
            resolved_url,
            item_selector: spec.item_selector.clone(),
            title_selector: spec.title_selector.clone(),
            max_items: spec.max_items,
            outcome,
            fallback_reason,
            items: built.items,
            markup: built.markup,
        }
    }
}

// ============================================================================
// Formatters
// ============================================================================

pub fn format_preview(report: &PreviewReport, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
        }
        OutputFormat::Markup => report.markup.clone(),
        OutputFormat::Table => format_preview_table(report),
    }
}

fn format_preview_table(report: &PreviewReport) -> String {
    let mut lines = vec![
        format!("Source:    {} ({})", report.source, report.resolved_url),
        format!(
            "Selectors: items '{}', titles '{}', max {}",
            report.item_selector, report.title_selector, report.max_items
        ),
        format!("Outcome:   {}", report.outcome),
    ];
    if let Some(reason) = &report.fallback_reason {
        lines.push(format!("Reason:    {}", reason));
    }

    if report.items.is_empty() {
        lines.push(String::new());
        lines.push(report.markup.clone());
        return lines.join("\n");
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("#").fg(Color::Cyan),
        Cell::new("Title").fg(Color::Cyan),
        Cell::new("Link").fg(Color::Cyan),
    ]);
    for (i, item) in report.items.iter().enumerate() {
        table.add_row(Row::from(vec![
            (i + 1).to_string(),
            item.title.clone(),
            item.anchor.clone(),
        ]));
    }

    lines.push(String::new());
    lines.push(table.to_string());
    lines.join("\n")
}

/// Active-link classification of candidate hrefs for one page path
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveReport {
    pub current_page: String,
    pub links: Vec<ActiveLink>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActiveLink {
    pub href: String,
    pub active: bool,
}

impl ActiveReport {
    pub fn new(page_path: &str, home_page: &str, hrefs: &[String]) -> Self {
        let current_page = current_page_name(page_path, home_page);
        let links = hrefs
            .iter()
            .map(|href| ActiveLink {
                href: href.clone(),
                active: is_active_href(href, &current_page),
            })
            .collect();
        Self {
            current_page,
            links,
        }
    }
}

pub fn format_active(report: &ActiveReport, json: bool) -> String {
    if json {
        return serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Href").fg(Color::Cyan),
        Cell::new("Active").fg(Color::Cyan),
    ]);
    for link in &report.links {
        let active = if link.active {
            Cell::new("yes").fg(Color::Green)
        } else {
            Cell::new("-")
        };
        table.add_row(vec![Cell::new(&link.href), active]);
    }
    format!("Current page: {}\n\n{}", report.current_page, table)
}
