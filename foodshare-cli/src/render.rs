//! Plain-text and JSON rendering of query results.

use std::io::{self, Write};

use foodshare_store_db::{DisplayHint, QueryDef, ResultSet, Value};
use serde::Serialize;

const BAR_WIDTH: f64 = 40.0;

#[derive(Serialize)]
struct JsonOutput<'a> {
    query: &'a str,
    title: &'a str,
    hint: DisplayHint,
    rows: &'a ResultSet,
}

impl<'a> JsonOutput<'a> {
    fn new(def: &'a QueryDef, rs: &'a ResultSet) -> Self {
        Self {
            query: def.name,
            title: def.title,
            hint: def.hint,
            rows: rs,
        }
    }
}

pub(crate) fn write_json(
    out: &mut impl Write,
    def: &QueryDef,
    rs: &ResultSet,
) -> serde_json::Result<()> {
    serde_json::to_writer_pretty(&mut *out, &JsonOutput::new(def, rs))?;
    writeln!(out).map_err(serde_json::Error::io)
}

/// Several results as one JSON array, in the order given.
pub(crate) fn write_json_all(
    out: &mut impl Write,
    results: &[(&QueryDef, ResultSet)],
) -> serde_json::Result<()> {
    let all: Vec<JsonOutput<'_>> = results
        .iter()
        .map(|(def, rs)| JsonOutput::new(def, rs))
        .collect();
    serde_json::to_writer_pretty(&mut *out, &all)?;
    writeln!(out).map_err(serde_json::Error::io)
}

pub(crate) fn write_text(out: &mut impl Write, def: &QueryDef, rs: &ResultSet) -> io::Result<()> {
    writeln!(out, "{}. {}", def.label, def.title)?;

    match def.hint {
        DisplayHint::Metric { label, column } => {
            let value = rs
                .records()
                .next()
                .and_then(|r| r.get(column))
                .map_or_else(|| "0".to_string(), Value::to_string);
            writeln!(out, "{label}: {value}")?;
        }
        DisplayHint::Table => write_table(out, rs, None)?,
        DisplayHint::Bar { index, limit } => {
            write_table(out, rs, limit)?;
            if let Some(metric) = rs.columns().iter().find(|c| c.as_str() != index) {
                writeln!(out)?;
                write_bars(out, rs, index, metric, limit)?;
            }
        }
        DisplayHint::Pie { labels, values } => {
            write_table(out, rs, None)?;
            writeln!(out)?;
            write_shares(out, rs, labels, values)?;
        }
    }
    writeln!(out)
}

fn write_table(out: &mut impl Write, rs: &ResultSet, limit: Option<usize>) -> io::Result<()> {
    if rs.is_empty() {
        return writeln!(out, "(no rows)");
    }
    let shown = limit.unwrap_or(usize::MAX).min(rs.len());
    let cells: Vec<Vec<String>> = rs
        .records()
        .take(shown)
        .map(|r| r.values().iter().map(Value::to_string).collect())
        .collect();

    let mut widths: Vec<usize> = rs.columns().iter().map(|c| c.chars().count()).collect();
    for row in &cells {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let header: Vec<String> = rs
        .columns()
        .iter()
        .zip(&widths)
        .map(|(c, w)| format!("{c:<w$}"))
        .collect();
    writeln!(out, "{}", header.join(" | ").trim_end())?;
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    writeln!(out, "{}", rule.join("-+-"))?;
    for row in &cells {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{c:<w$}"))
            .collect();
        writeln!(out, "{}", line.join(" | ").trim_end())?;
    }
    if shown < rs.len() {
        writeln!(out, "({} more rows)", rs.len() - shown)?;
    }
    Ok(())
}

fn write_bars(
    out: &mut impl Write,
    rs: &ResultSet,
    index: &str,
    metric: &str,
    limit: Option<usize>,
) -> io::Result<()> {
    let points: Vec<(String, f64)> = rs
        .records()
        .take(limit.unwrap_or(usize::MAX))
        .map(|r| {
            let label = r.get(index).map(Value::to_string).unwrap_or_default();
            let value = r.get(metric).and_then(Value::as_f64).unwrap_or(0.0);
            (label, value)
        })
        .collect();
    let max = points.iter().map(|(_, v)| *v).fold(0.0_f64, f64::max);
    let label_width = points.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0);

    for (label, value) in &points {
        let len = if max > 0.0 {
            (value / max * BAR_WIDTH).round() as usize
        } else {
            0
        };
        writeln!(out, "{label:<label_width$} | {} {value}", "#".repeat(len))?;
    }
    Ok(())
}

fn write_shares(
    out: &mut impl Write,
    rs: &ResultSet,
    labels: &str,
    values: &str,
) -> io::Result<()> {
    for record in rs.records() {
        let label = record.get(labels).map(Value::to_string).unwrap_or_default();
        let share = record.get(values).and_then(Value::as_f64).unwrap_or(0.0);
        writeln!(out, "{label}: {share:.1}%")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use foodshare_store_db::{FoodDb, QueryParams, catalog};

    fn seeded() -> FoodDb {
        let db = FoodDb::open_memory().unwrap();
        db.connection()
            .execute_batch(
                r#"
                INSERT INTO providers VALUES (1, 'A', 'Restaurant', 'x', 'Delhi', '1');
                INSERT INTO providers VALUES (2, 'B', 'Restaurant', 'y', 'Delhi', '2');
                INSERT INTO providers VALUES (3, 'C', 'Restaurant', 'z', 'Mumbai', '3');
                INSERT INTO claims VALUES (1, 1, 1, 'Completed', NULL);
                INSERT INTO claims VALUES (2, 1, 1, 'Pending', NULL);
                "#,
            )
            .unwrap();
        db
    }

    fn render(def: &QueryDef, db: &FoodDb) -> String {
        let rs = db.run(def, &QueryParams::new()).unwrap();
        let mut buf = Vec::new();
        write_text(&mut buf, def, &rs).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_metric() {
        let db = FoodDb::open_memory().unwrap();
        let text = render(catalog::lookup("Q5").unwrap(), &db);
        assert!(text.starts_with("Q5. Total quantity of food available\n"));
        assert!(text.contains("Total Food Available: 0\n"));
    }

    #[test]
    fn test_bar_chart_scales_to_max() {
        let db = seeded();
        let text = render(catalog::lookup("Q1").unwrap(), &db);
        assert!(text.contains("City   | provider_count"));
        let full = "#".repeat(40);
        let half = "#".repeat(20);
        assert!(text.contains(&format!("Delhi  | {full} 2")), "{text}");
        assert!(text.contains(&format!("Mumbai | {half} 1")), "{text}");
    }

    #[test]
    fn test_pie_shares() {
        let db = seeded();
        let text = render(catalog::lookup("Q10").unwrap(), &db);
        assert!(text.contains("Completed: 50.0%"));
        assert!(text.contains("Pending: 50.0%"));
    }

    #[test]
    fn test_empty_table() {
        let db = FoodDb::open_memory().unwrap();
        let text = render(catalog::lookup("Q4").unwrap(), &db);
        assert!(text.contains("(no rows)"));
    }

    #[test]
    fn test_json_output() {
        let db = seeded();
        let def = catalog::lookup("Q1").unwrap();
        let rs = db.run(def, &QueryParams::new()).unwrap();
        let mut buf = Vec::new();
        write_json(&mut buf, def, &rs).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(json["query"], "q1_providers_per_city");
        assert_eq!(json["hint"]["kind"], "bar");
        assert_eq!(json["hint"]["index"], "City");
        assert_eq!(json["rows"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_json_report_is_one_document() {
        let db = seeded();
        let results: Vec<_> = ["Q1", "Q5", "Q10"]
            .into_iter()
            .map(|label| {
                let def = catalog::lookup(label).unwrap();
                (def, db.run(def, &QueryParams::new()).unwrap())
            })
            .collect();
        let mut buf = Vec::new();
        write_json_all(&mut buf, &results).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        let entries = json.as_array().unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[1]["query"], "q5_total_quantity_available");
        assert_eq!(entries[2]["hint"]["kind"], "pie");
    }
}
