use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::chart::{FinancialSeries, HeatmapCell, NamedValue};
use crate::dashboard::{DashboardReport, Section};
use crate::error::OutputError;
use crate::kpi::{KpiTile, OrderKpis, ProductionKpis, StockKpis, TeamKpis, format_number};
use crate::record::Record;
use crate::table::TablePage;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Yaml,
}

pub fn print_page<R: Record>(
    page: &TablePage<'_, R>,
    format: OutputFormat,
) -> Result<(), OutputError> {
    println!("{}", render_page(page, format)?);
    Ok(())
}

pub fn print_report(
    report: &DashboardReport,
    format: OutputFormat,
) -> Result<(), OutputError> {
    println!("{}", render_report(report, format)?);
    Ok(())
}

pub fn render_page<R: Record>(
    page: &TablePage<'_, R>,
    format: OutputFormat,
) -> Result<String, OutputError> {
    match format {
        OutputFormat::Table => Ok(page_table(page)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(page)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(page)?),
    }
}

#[derive(Serialize)]
struct ReportView<'a> {
    tiles: Vec<KpiTile>,
    #[serde(flatten)]
    report: &'a DashboardReport,
}

pub fn render_report(
    report: &DashboardReport,
    format: OutputFormat,
) -> Result<String, OutputError> {
    let view = ReportView {
        tiles: all_tiles(report),
        report,
    };
    match format {
        OutputFormat::Table => Ok(report_table(report)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&view)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(&view)?),
    }
}

fn all_tiles(report: &DashboardReport) -> Vec<KpiTile> {
    let mut tiles = report.headline_tiles();
    tiles.extend(report.detail_tiles());
    tiles
}

fn page_table<R: Record>(page: &TablePage<'_, R>) -> String {
    if page.columns.is_empty() {
        return "items: 0".to_string();
    }

    let headers: Vec<String> = page.columns.iter().map(|column| column.label.clone()).collect();
    let rows: Vec<Vec<String>> = page
        .rows
        .iter()
        .map(|record| {
            page.columns
                .iter()
                .map(|column| {
                    record
                        .field(&column.id)
                        .as_ref()
                        .map(value_to_cell)
                        .unwrap_or_else(|| "-".to_string())
                })
                .collect()
        })
        .collect();

    let mut out = render_rows(&headers, &rows);
    out.push('\n');
    out.push_str(&format!(
        "page {}/{}, items: {}",
        page.page + 1,
        page.page_count.max(1),
        page.total
    ));
    out
}

fn report_table(report: &DashboardReport) -> String {
    let mut blocks = Vec::new();

    let tiles = all_tiles(report);
    if !tiles.is_empty() {
        blocks.push(titled("KPIs", &tile_table(&tiles)));
    }

    section_block(&mut blocks, "production", &report.production, production_blocks);
    section_block(&mut blocks, "orders", &report.orders, order_blocks);
    section_block(&mut blocks, "stock", &report.stock, stock_blocks);
    section_block(&mut blocks, "teams", &report.teams, team_blocks);

    if blocks.is_empty() {
        return "no sections".to_string();
    }
    blocks.join("\n\n")
}

fn section_block<T>(
    blocks: &mut Vec<String>,
    name: &str,
    section: &Section<T>,
    render: impl Fn(&T) -> Vec<String>,
) {
    match section {
        Section::Ready(kpis) => {
            blocks.push(format!("== {name} =="));
            blocks.extend(render(kpis));
        }
        Section::Unavailable { message } => {
            blocks.push(format!("== {name} ==\nunavailable: {message}"));
        }
        Section::Skipped => {}
    }
}

fn production_blocks(kpis: &ProductionKpis) -> Vec<String> {
    let occurrences: Vec<Vec<String>> = kpis
        .quantity_occurrences
        .iter()
        .map(|occurrence| {
            vec![
                format_number(occurrence.quantity),
                occurrence.runs.to_string(),
            ]
        })
        .collect();

    vec![
        titled(
            &format!("Production status ({} unclassified)", kpis.status.unclassified()),
            &named_table(&kpis.status_chart()),
        ),
        titled(
            &format!(
                "Quantity by product (mean {})",
                format_number(kpis.average_product_quantity)
            ),
            &named_table(&kpis.quantity_by_product),
        ),
        titled(
            "Quantity occurrences",
            &render_rows(&headers(&["quantity", "runs"]), &occurrences),
        ),
        titled("Cost, revenue and gain by product", &financial_table(&kpis.financials)),
    ]
}

fn order_blocks(kpis: &OrderKpis) -> Vec<String> {
    vec![
        titled("Order status", &named_table(&kpis.status_chart())),
        titled("Quantity by client", &named_table(&kpis.quantity_by_client)),
    ]
}

fn stock_blocks(kpis: &StockKpis) -> Vec<String> {
    let mut columns = vec!["material".to_string()];
    columns.extend(kpis.locations.iter().cloned());
    let rows: Vec<Vec<String>> = kpis
        .by_material
        .iter()
        .map(|row| {
            let mut cells = vec![row.label.clone()];
            cells.extend(kpis.locations.iter().map(|location| {
                format_number(row.values.get(location).copied().unwrap_or(0.0))
            }));
            cells
        })
        .collect();

    let totals: Vec<Vec<String>> = kpis
        .material_totals
        .iter()
        .map(|total| vec![total.label.clone(), format_number(total.total_quantity)])
        .collect();

    vec![
        titled("Stock by location", &named_table(&kpis.by_location)),
        titled("Stock by material and location", &render_rows(&columns, &rows)),
        titled(
            "Stock by material",
            &render_rows(&headers(&["material", "total"]), &totals),
        ),
    ]
}

fn team_blocks(kpis: &TeamKpis) -> Vec<String> {
    vec![
        titled("Availability", &heatmap_table(&kpis.availability)),
        titled("Hours worked", &heatmap_table(&kpis.work_hours)),
        titled("Staff", &heatmap_table(&kpis.staff)),
    ]
}

fn tile_table(tiles: &[KpiTile]) -> String {
    let rows: Vec<Vec<String>> = tiles
        .iter()
        .map(|tile| vec![tile.label.clone(), tile.value.clone()])
        .collect();
    render_rows(&headers(&["kpi", "value"]), &rows)
}

fn named_table(values: &[NamedValue]) -> String {
    let rows: Vec<Vec<String>> = values
        .iter()
        .map(|value| vec![value.name.clone(), format_number(value.value)])
        .collect();
    render_rows(&headers(&["name", "value"]), &rows)
}

fn financial_table(series: &FinancialSeries) -> String {
    let rows: Vec<Vec<String>> = (0..series.len())
        .filter_map(|idx| {
            let (cost, revenue, gain) = series.lookup(idx)?;
            Some(vec![
                idx.to_string(),
                series.name(idx)?.to_string(),
                format_number(cost),
                format_number(revenue),
                format_number(gain),
            ])
        })
        .collect();
    render_rows(&headers(&["idx", "product", "cost", "revenue", "gain"]), &rows)
}

/// Teams down, days across.
fn heatmap_table(cells: &[HeatmapCell]) -> String {
    let mut days: Vec<i64> = cells.iter().map(|cell| cell.x).collect();
    days.sort_unstable();
    days.dedup();

    let mut grid: IndexMap<&str, BTreeMap<i64, f64>> = IndexMap::new();
    for cell in cells {
        grid.entry(cell.y.as_str()).or_default().insert(cell.x, cell.value);
    }

    let mut columns = vec!["team".to_string()];
    columns.extend(days.iter().map(|day| format!("day {day}")));
    let rows: Vec<Vec<String>> = grid
        .iter()
        .map(|(team, values)| {
            let mut row = vec![(*team).to_string()];
            row.extend(days.iter().map(|day| {
                values
                    .get(day)
                    .map(|value| format_number(*value))
                    .unwrap_or_else(|| "-".to_string())
            }));
            row
        })
        .collect();
    render_rows(&columns, &rows)
}

fn titled(
    title: &str,
    body: &str,
) -> String {
    format!("{title}\n{body}")
}

fn headers(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| (*name).to_string()).collect()
}

fn render_rows(
    headers: &[String],
    rows: &[Vec<String>],
) -> String {
    let widths = compute_widths(headers, rows);
    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(format_row(headers, &widths));
    lines.push(format_separator(&widths));
    for row in rows {
        lines.push(format_row(row, &widths));
    }
    lines.join("\n")
}

fn compute_widths(
    headers: &[String],
    rows: &[Vec<String>],
) -> Vec<usize> {
    headers
        .iter()
        .enumerate()
        .map(|(index, header)| {
            rows.iter()
                .filter_map(|row| row.get(index))
                .map(|cell| display_width(cell))
                .fold(display_width(header), usize::max)
        })
        .collect()
}

fn display_width(cell: &str) -> usize {
    cell.chars().count()
}

fn value_to_cell(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::String(s) => s.clone(),
        Value::Number(number) => match number.as_f64() {
            Some(float) if number.is_f64() && float.fract() != 0.0 => format!("{float:.2}"),
            Some(float) if number.is_f64() => format!("{float:.0}"),
            _ => number.to_string(),
        },
        _ => value.to_string(),
    }
}

fn format_row(
    cells: &[String],
    widths: &[usize],
) -> String {
    let mut out = String::new();
    out.push('|');
    for (index, width) in widths.iter().enumerate() {
        let cell = cells.get(index).map(String::as_str).unwrap_or("");
        out.push(' ');
        out.push_str(cell);
        let padding = width.saturating_sub(display_width(cell));
        for _ in 0..padding {
            out.push(' ');
        }
        out.push(' ');
        out.push('|');
    }
    out
}

fn format_separator(widths: &[usize]) -> String {
    let mut out = String::new();
    out.push('|');
    for width in widths {
        out.push(' ');
        for _ in 0..*width {
            out.push('-');
        }
        out.push(' ');
        out.push('|');
    }
    out
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{OutputFormat, render_page, render_report, value_to_cell};
    use crate::api::ApiClient;
    use crate::dashboard::{Collections, Dashboard};
    use crate::error::FetchError;
    use crate::kpi::KpiSettings;
    use crate::record::{ProductionRecord, StockRecord, TeamRecord};
    use crate::table::TableState;

    fn productions() -> Vec<ProductionRecord> {
        serde_json::from_value(json!([
            {"id_production": 2, "produit": "Harnais", "quantite": 3, "prix_unitaire": 12.5},
            {"id_production": 1, "produit": "Câble", "quantite": 10, "prix_unitaire": 4}
        ]))
        .expect("fixture must decode")
    }

    #[test]
    fn renders_page_with_labels_and_footer() {
        let records = productions();
        let state = TableState::for_record::<ProductionRecord>();
        let out = render_page(&state.view(&records), OutputFormat::Table).expect("must render");

        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].contains("| Id Production |"));
        assert!(lines[0].contains("Prix Unitaire"));
        assert!(lines[2].starts_with("| 1 "));
        assert!(lines[2].contains("Câble"));
        assert!(lines[3].contains("12.50"));
        assert!(out.contains(" - "));
        assert_eq!(lines.last().copied(), Some("page 1/1, items: 2"));

        let widths: Vec<usize> = lines[..lines.len() - 1]
            .iter()
            .map(|line| line.chars().count())
            .collect();
        assert!(widths.windows(2).all(|pair| pair[0] == pair[1]));
    }

    #[test]
    fn empty_page_prints_zero_items() {
        let records: Vec<StockRecord> = Vec::new();
        let state = TableState::for_record::<StockRecord>();
        let out = render_page(&state.view(&records), OutputFormat::Table).expect("must render");
        assert_eq!(out, "items: 0");
    }

    #[test]
    fn renders_page_as_json() {
        let records = productions();
        let state = TableState::for_record::<ProductionRecord>();
        let out = render_page(&state.view(&records), OutputFormat::Json).expect("must render");
        let value: serde_json::Value = serde_json::from_str(&out).expect("must be json");

        assert_eq!(value["total"], 2);
        assert_eq!(value["columns"][0]["label"], "Id Production");
        assert_eq!(value["rows"][0]["id_production"], 1);
    }

    #[test]
    fn cells_format_numbers_and_missing_values() {
        assert_eq!(value_to_cell(&json!(12.0)), "12");
        assert_eq!(value_to_cell(&json!(12.346)), "12.35");
        assert_eq!(value_to_cell(&json!(7)), "7");
        assert_eq!(value_to_cell(&json!(null)), "-");
        assert_eq!(value_to_cell(&json!(true)), "true");
    }

    fn report() -> crate::dashboard::DashboardReport {
        let client = ApiClient::new("http://127.0.0.1:9", None).expect("valid url");
        let mut dashboard = Dashboard::new(client, KpiSettings::default());
        dashboard.ingest(Collections {
            productions: Some(Ok(productions())),
            orders: Some(Err(FetchError::Status {
                endpoint: "/commandes".to_string(),
                status: 503,
            })),
            stocks: None,
            teams: Some(Ok(vec![
                TeamRecord {
                    id: Some(1),
                    name: Some("T1".to_string()),
                    availability: Some("Disponible".to_string()),
                    ..TeamRecord::default()
                },
                TeamRecord {
                    id: Some(2),
                    name: Some("T1".to_string()),
                    availability: Some("Partielle".to_string()),
                    ..TeamRecord::default()
                },
            ])),
        })
    }

    #[test]
    fn report_table_lists_sections_and_failures() {
        let out = render_report(&report(), OutputFormat::Table).expect("must render");

        assert!(out.contains("== production =="));
        assert!(out.contains("Production status (2 unclassified)"));
        assert!(out.contains("Produit le plus fabriqué"));
        assert!(out.contains("Câble"));
        assert!(out.contains("== orders ==\nunavailable: /commandes answered with status 503"));
        assert!(!out.contains("== stock =="));
        assert!(out.contains("| team | day 1 | day 2 |"));
        assert!(out.contains("| T1   | 2     | 1     |"));
    }

    #[test]
    fn report_serializes_tiles_and_sections() {
        let json = render_report(&report(), OutputFormat::Json).expect("must render");
        let value: serde_json::Value = serde_json::from_str(&json).expect("must be json");
        assert_eq!(value["tiles"][0]["label"], "Produit le plus fabriqué");
        assert_eq!(value["orders"]["state"], "unavailable");
        assert!(value.get("stock").is_none());

        let yaml = render_report(&report(), OutputFormat::Yaml).expect("must render");
        assert!(yaml.contains("state: ready"));
        assert!(yaml.contains("most_produced:"));
    }
}
