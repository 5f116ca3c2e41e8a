//! Template Renderer (C1): decodes a hex-encoded SQL template, substitutes
//! `${namespace.field}` placeholders, and applies the handful of
//! dialect-specific shaping rules the Agent's SQL layer depends on.

use crate::error::{OrchestrationError, Result, TemplateErrorKind};
use crate::model::connection::Dialect;

use std::collections::HashMap;

/// A flat placeholder table: `"dbactormgt.dbuser"` -> `"app_reader"`. Callers
/// build this per-entity before rendering; the renderer itself has no
/// knowledge of where values come from.
pub type PlaceholderValues = HashMap<String, String>;

/// Decodes `hex_sql` and substitutes every `${namespace.field}` occurrence
/// found in `values`, failing if any placeholder is left unresolved.
pub fn render(hex_sql: &str, values: &PlaceholderValues) -> Result<String> {
    let raw = decode_hex_sql(hex_sql)?;
    substitute_placeholders(&raw, values)
}

pub fn decode_hex_sql(hex_sql: &str) -> Result<String> {
    let bytes = hex::decode(hex_sql)
        .map_err(|e| OrchestrationError::Template(TemplateErrorKind::DecodeError(e.to_string())))?;
    String::from_utf8(bytes)
        .map_err(|e| OrchestrationError::Template(TemplateErrorKind::DecodeError(e.to_string())))
}

pub fn encode_hex_sql(sql: &str) -> String {
    hex::encode(sql.as_bytes())
}

fn substitute_placeholders(template: &str, values: &PlaceholderValues) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("${") {
        let Some(end_offset) = rest[start..].find('}') else {
            out.push_str(rest);
            return Ok(out);
        };
        let end = start + end_offset;
        out.push_str(&rest[..start]);

        let key = &rest[start + 2..end];
        let value = values.get(key).ok_or_else(|| {
            OrchestrationError::Template(TemplateErrorKind::MissingPlaceholder(key.to_string()))
        })?;
        out.push_str(value);

        rest = &rest[end + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

/// Builds the `'user'@'ip'` composite MySQL account identifier from its two
/// placeholder values, the one substitution that spans a quoted literal
/// rather than a single field.
pub fn mysql_account_identifier(db_user: &str, ip_address: &str) -> String {
    format!("'{}'@'{}'", escape_mysql_literal(db_user), escape_mysql_literal(ip_address))
}

fn escape_mysql_literal(s: &str) -> String {
    s.replace('\'', "''")
}

/// Strips a single trailing `;` and surrounding whitespace from an
/// Oracle-rendered statement -- the Agent rejects a dangling semicolon on
/// some DDL forms.
pub fn strip_oracle_trailing_semicolon(sql: &str) -> String {
    sql.trim().trim_end_matches(';').trim_end().to_string()
}

pub fn escape_oracle_literal(s: &str) -> String {
    s.replace('\'', "''")
}

/// Joins multiple rendered Oracle statements the way a single Agent
/// submission expects them: each terminated by `;`, separated by a bare
/// `/` on its own line.
pub fn join_oracle_statements<'a>(statements: impl IntoIterator<Item = &'a str>) -> String {
    statements
        .into_iter()
        .map(|s| format!("{};", strip_oracle_trailing_semicolon(s)))
        .collect::<Vec<_>>()
        .join("\n/\n")
}

/// Dialect-aware finishing pass applied after placeholder substitution.
pub fn finalize(dialect: Dialect, sql: String) -> String {
    match dialect {
        Dialect::Oracle => strip_oracle_trailing_semicolon(&sql),
        Dialect::Mysql => sql,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_and_substitutes_a_placeholder() {
        let hex = encode_hex_sql("CREATE USER ${dbactormgt.dbuser}@'%'");
        let mut values = PlaceholderValues::new();
        values.insert("dbactormgt.dbuser".to_string(), "app_reader".to_string());
        let rendered = render(&hex, &values).unwrap();
        assert_eq!(rendered, "CREATE USER app_reader@'%'");
    }

    #[test]
    fn missing_placeholder_is_an_error() {
        let hex = encode_hex_sql("DROP USER ${dbactormgt.dbuser}");
        let err = render(&hex, &PlaceholderValues::new()).unwrap_err();
        match err {
            OrchestrationError::Template(TemplateErrorKind::MissingPlaceholder(key)) => {
                assert_eq!(key, "dbactormgt.dbuser");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn invalid_hex_is_a_decode_error() {
        let err = decode_hex_sql("not-hex").unwrap_err();
        assert!(matches!(
            err,
            OrchestrationError::Template(TemplateErrorKind::DecodeError(_))
        ));
    }

    #[test]
    fn builds_composite_account_identifier() {
        assert_eq!(
            mysql_account_identifier("app_reader", "10.0.0.%"),
            "'app_reader'@'10.0.0.%'"
        );
    }

    #[test]
    fn composite_identifier_escapes_embedded_quotes() {
        assert_eq!(mysql_account_identifier("o'brien", "%"), "'o''brien'@'%'");
    }

    #[test]
    fn strips_oracle_trailing_semicolon_and_whitespace() {
        assert_eq!(strip_oracle_trailing_semicolon("  DROP USER foo;  \n"), "DROP USER foo");
    }

    #[test]
    fn joins_oracle_statements_with_slash_separator() {
        let joined = join_oracle_statements(["DROP USER a", "DROP USER b;"]);
        assert_eq!(joined, "DROP USER a;\n/\nDROP USER b;");
    }

    #[test]
    fn finalize_only_strips_semicolon_for_oracle() {
        assert_eq!(finalize(Dialect::Oracle, "DROP USER a;".to_string()), "DROP USER a");
        assert_eq!(finalize(Dialect::Mysql, "DROP USER a;".to_string()), "DROP USER a;");
    }
}
