//! Plain aligned tables built from serialized responses.

use serde_json::Value;

/// A rectangular grid of rendered cells.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Lists of records become one row per record. A single record becomes
    /// `field`/`value` rows. Anything else is a one-cell table.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Array(items) => Self::from_records(items),
            Value::Object(map) => Self {
                headers: vec!["field".into(), "value".into()],
                rows: map
                    .into_iter()
                    .map(|(field, value)| vec![field, cell(&value)])
                    .collect(),
            },
            scalar => Self {
                headers: vec!["value".into()],
                rows: vec![vec![cell(&scalar)]],
            },
        }
    }

    fn from_records(items: Vec<Value>) -> Self {
        let mut headers: Vec<String> = Vec::new();
        for key in items.iter().filter_map(Value::as_object).flat_map(|m| m.keys()) {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
        if headers.is_empty() {
            headers.push("value".into());
        }

        let rows = items
            .iter()
            .map(|item| match item.as_object() {
                Some(map) => headers
                    .iter()
                    .map(|h| map.get(h).map_or_else(|| "-".to_string(), cell))
                    .collect(),
                None => vec![cell(item)],
            })
            .collect();
        Self { headers, rows }
    }

    #[must_use]
    pub fn render(&self) -> String {
        if self.rows.is_empty() {
            return "(no rows)".to_string();
        }

        let widths: Vec<usize> = (0..self.headers.len())
            .map(|col| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(col))
                    .chain(std::iter::once(&self.headers[col]))
                    .map(|text| text.chars().count())
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let header = join_cells(&self.headers, &widths);
        let mut lines = vec![header.clone(), "-".repeat(header.chars().count())];
        lines.extend(self.rows.iter().map(|row| join_cells(row, &widths)));
        lines.join("\n")
    }
}

fn join_cells(cells: &[String], widths: &[usize]) -> String {
    widths
        .iter()
        .enumerate()
        .map(|(col, &width)| {
            let text = cells.get(col).map_or("-", String::as_str);
            if is_number(text) {
                format!("{text:>width$}")
            } else {
                format!("{text:<width$}")
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
}

fn is_number(text: &str) -> bool {
    text.parse::<f64>().is_ok_and(f64::is_finite)
}

fn cell(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::String(text) => text.clone(),
        Value::Bool(_) | Value::Number(_) | Value::Array(_) | Value::Object(_) => {
            value.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn record_list_uses_field_columns() {
        let table = Table::from_value(json!([
            {"email": "jane@mart.io", "balance": 110.0},
            {"email": "john@mart.io", "balance": 5.5, "is_active": false},
        ]));
        let rendered = table.render();
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("email") && lines[0].contains("is_active"));
        assert!(lines[1].chars().all(|c| c == '-'));
        assert!(lines[2].trim_end().ends_with('-'), "missing field: {}", lines[2]);
        assert_eq!(lines[2].chars().count(), lines[3].chars().count());
    }

    #[test]
    fn single_record_is_field_value_pairs() {
        let rendered = Table::from_value(json!({"status": "failure", "reason": "closed"})).render();
        assert!(rendered.starts_with("field"));
        assert!(
            rendered
                .lines()
                .any(|l| l.starts_with("reason") && l.trim_end().ends_with("closed"))
        );
    }

    #[test]
    fn nested_values_render_as_json() {
        let rendered = Table::from_value(json!([{"answers": ["a", "b"]}])).render();
        assert!(rendered.contains(r#"["a","b"]"#));
    }

    #[test]
    fn numbers_align_right() {
        assert_eq!(join_cells(&["10".into(), "ok".into()], &[6, 4]), "    10  ok  ");
    }

    #[test]
    fn empty_list_has_placeholder() {
        assert_eq!(Table::from_value(json!([])).render(), "(no rows)");
    }
}
