use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use polars::prelude::{AnyValue, DataFrame};

use cohort_ingest::any_to_string;
use cohort_model::{AgeSummary, BuildReport, FlagCrosstab, SchemaEntry};

use cohort_cli::pipeline::BuildResult;

pub fn print_summary(result: &BuildResult, preview: Option<usize>) {
    println!("Data: {}", result.data_path.display());
    println!("Schema: {}", result.schema_path.display());
    println!("{}", stage_table(&result.report));
    println!("{}", flag_table(&result.report.flags));
    println!("{}", age_table(&result.report.ages));
    println!("{}", endpoint_table(&result.report));
    println!("Formula ({}): {}", result.endpoint.label(), result.design.formula());
    println!("Digest: {}", result.report.digest);
    if let Some(rows) = preview {
        println!("{}", preview_table(result.cohort.data(), rows));
    }
}

pub fn print_schema(entries: &[SchemaEntry]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Name"),
        header_cell("Type"),
        header_cell("Recoded"),
        header_cell("Column"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Center);
    for entry in entries {
        let column = match entry.selected_column() {
            Some(name) => Cell::new(name).fg(Color::Green),
            None => dim_cell("-"),
        };
        table.add_row(vec![
            Cell::new(&entry.name),
            Cell::new(entry.kind.as_str()),
            Cell::new(if entry.recoded { "yes" } else { "no" }),
            column,
        ]);
    }
    println!("{table}");
}

fn stage_table(report: &BuildReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Step"),
        header_cell("Rows"),
        header_cell("Columns"),
        header_cell("Dropped"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    let mut previous: Option<usize> = None;
    for count in &report.stages {
        let dropped = previous.map_or(0, |rows| rows.saturating_sub(count.rows));
        table.add_row(vec![
            Cell::new(count.stage.label()),
            Cell::new(count.rows),
            Cell::new(count.columns),
            count_cell(dropped, Color::Yellow),
        ]);
        previous = Some(count.rows);
    }
    table
}

fn flag_table(flags: &FlagCrosstab) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell(&flags.column),
        header_cell("Records"),
        header_cell("Action"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for entry in &flags.counts {
        let value = entry
            .value
            .map_or_else(|| "missing".to_string(), |value| value.to_string());
        let action = if matches!(entry.value, None | Some(0)) {
            Cell::new("keep").fg(Color::Green)
        } else {
            Cell::new("drop").fg(Color::Red)
        };
        table.add_row(vec![Cell::new(value), Cell::new(entry.count), action]);
    }
    table.add_row(vec![
        Cell::new("TOTAL").add_attribute(Attribute::Bold),
        Cell::new(flags.total()).add_attribute(Attribute::Bold),
        dim_cell(format!("{} dropped", flags.dropped())),
    ]);
    table
}

fn age_table(ages: &[AgeSummary]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Age column"),
        header_cell("N"),
        header_cell("Missing"),
        header_cell("Min"),
        header_cell("Max"),
        header_cell("Mean"),
        header_cell("Median"),
    ]);
    apply_table_style(&mut table);
    for index in 1..7 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for summary in ages {
        table.add_row(vec![
            Cell::new(&summary.column),
            Cell::new(summary.count),
            Cell::new(summary.missing),
            stat_cell(summary.min),
            stat_cell(summary.max),
            stat_cell(summary.mean),
            stat_cell(summary.median),
        ]);
    }
    table
}

fn endpoint_table(report: &BuildReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Endpoint"),
        header_cell("Subjects"),
        header_cell("Events"),
        header_cell("Censored"),
        header_cell("Event rate"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 1..5 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for summary in &report.endpoints {
        table.add_row(vec![
            Cell::new(summary.endpoint.label()).fg(Color::Cyan),
            Cell::new(summary.subjects),
            count_cell(summary.events, Color::Red),
            Cell::new(summary.censored),
            Cell::new(format_rate(summary.event_rate())),
        ]);
    }
    table
}

fn preview_table(df: &DataFrame, rows: usize) -> Table {
    let mut table = Table::new();
    table.set_header(
        df.get_column_names()
            .iter()
            .map(|name| header_cell(name.as_str()))
            .collect::<Vec<_>>(),
    );
    apply_table_style(&mut table);
    for idx in 0..rows.min(df.height()) {
        let row: Vec<Cell> = df
            .get_columns()
            .iter()
            .map(|column| match column.get(idx).unwrap_or(AnyValue::Null) {
                AnyValue::Null => dim_cell("null"),
                value => Cell::new(any_to_string(value)),
            })
            .collect();
        table.add_row(row);
    }
    table
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count == 0 {
        dim_cell(count)
    } else {
        Cell::new(count).fg(color)
    }
}

fn stat_cell(value: Option<f64>) -> Cell {
    match value {
        Some(value) => Cell::new(format!("{value:.1}")),
        None => dim_cell("-"),
    }
}

fn format_rate(rate: Option<f64>) -> String {
    rate.map_or_else(|| "-".to_string(), |rate| format!("{:.1}%", rate * 100.0))
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
