//! Canned logging section appended to documents that lack one.
//!
//! The placeholders `<tmp>`, `<table>` and `<fname>` are filled in by the
//! pipeline executor, never here.

use tracing::debug;

/// Heading that marks a document as already carrying its logging section.
pub const AUTO_LOGS_MARKER: &str = "# AUTO_LOGS";

/// Title of the appended section.
pub const AUTO_LOGS_TITLE: &str = "AUTO_LOGS";

/// The appended section, verbatim.
pub const AUTO_LOGS_SECTION: &str = r#"# AUTO_LOGS

```yaml metadata
name: LOGS
description: "Pipeline run log sink"
table: logs
connection: "duckdb:"
before_sql:
  - "LOAD sqlite"
  - "ATTACH '<tmp>/pipeline_logs.db' AS pipeline_logs (TYPE SQLITE)"
  - "USE pipeline_logs"
  - "LOAD json"
save_log_sql: save_logs
save_on_err_patt: '(?i)table.+with.+name.+(\w+).+does.+not.+exist'
save_on_err_sql: create_logs_table
after_sql:
  - "USE memory"
  - "DETACH pipeline_logs"
active: true
```

```sql
-- save_logs
INSERT INTO "pipeline_logs"."<table>" BY NAME
SELECT *
FROM READ_JSON('<fname>');
```

```sql
-- create_logs_table
CREATE TABLE "pipeline_logs"."<table>" AS
SELECT *
FROM READ_JSON('<fname>');
```
"#;

/// Append [`AUTO_LOGS_SECTION`] unless `disabled` or the marker is already present.
///
/// Idempotent: feeding the output back in returns it unchanged.
pub fn inject_auto_logs(document: &str, disabled: bool) -> String {
    if disabled || document.contains(AUTO_LOGS_MARKER) {
        return document.to_string();
    }

    debug!("appending auto-logs section");

    let separator = match document {
        "" => "",
        d if d.ends_with("\n\n") => "",
        d if d.ends_with('\n') => "\n",
        _ => "\n\n",
    };
    format!("{document}{separator}{AUTO_LOGS_SECTION}")
}
