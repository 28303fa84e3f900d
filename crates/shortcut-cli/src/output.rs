use serde::Serialize;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

/// Two aligned columns, one `key  value` pair per line.
pub fn print_fields(fields: &[(&str, String)]) {
    let width = fields.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    for (key, value) in fields {
        println!("{:width$}  {}", key, value);
    }
}

pub fn print_table(headers: &[&str], rows: Vec<Vec<String>>) {
    print!("{}", render_table(headers, &rows));
}

/// Header, dashed rule, then rows; each column padded to its widest cell.
/// Cells beyond the header count are dropped.
fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let widths: Vec<usize> = (0..headers.len())
        .map(|col| {
            rows.iter()
                .filter_map(|row| row.get(col))
                .map(|cell| cell.chars().count())
                .chain(std::iter::once(headers[col].chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let rule: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    let mut out = table_line(headers.iter().copied(), &widths);
    out.push_str(&table_line(rule.iter().map(String::as_str), &widths));
    for row in rows {
        out.push_str(&table_line(row.iter().map(String::as_str), &widths));
    }
    out
}

fn table_line<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .zip(widths)
        .map(|(cell, &w)| format!("{cell:w$}"))
        .collect();
    format!("{}\n", padded.join("  ").trim_end())
}
