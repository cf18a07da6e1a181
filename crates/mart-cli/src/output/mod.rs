use serde::Serialize;

use crate::cli::OutputFormat;

pub mod table;

/// Render a serializable response to a string in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Table => Ok(table::Table::from_value(serde_json::to_value(value)?).render()),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
    }
}

/// Print a serializable response in the requested format.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use mart_core::enums::Collection;
    use mart_core::responses::WriteStatus;
    use pretty_assertions::assert_eq;
    use serde::Serialize;

    use super::render;
    use crate::cli::OutputFormat;

    #[derive(Serialize)]
    struct PingRow {
        collection: Collection,
        reachable: bool,
    }

    #[test]
    fn json_render_is_valid_json() {
        let out = render(&WriteStatus::failure("no user"), OutputFormat::Json)
            .expect("json render should work");
        let parsed: serde_json::Value = serde_json::from_str(&out).expect("json should parse");
        assert_eq!(parsed["status"], "failure");
        assert_eq!(parsed["reason"], "no user");
    }

    #[test]
    fn raw_render_is_single_line_json() {
        let out = render(&WriteStatus::Success, OutputFormat::Raw).expect("raw render should work");
        assert_eq!(out, r#"{"status":"success"}"#);
    }

    #[test]
    fn table_render_for_rows_uses_field_headers() {
        let rows = vec![
            PingRow {
                collection: Collection::Users,
                reachable: true,
            },
            PingRow {
                collection: Collection::Transactions,
                reachable: false,
            },
        ];
        let out = render(&rows, OutputFormat::Table).expect("table render should work");
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("collection") && lines[0].contains("reachable"));
        assert!(lines[3].contains("transactions"));
    }
}
