//! Reader-view HTML rendering.
//!
//! Produces a small self-contained page around extracted article content.
//! Title and content are inserted as given; extraction output is trusted.

use chrono::DateTime;

const STYLE: &str = "body{margin:40px auto;max-width:650px;line-height:1.6;font-size:18px;color:#333;padding:0 10px}\
h1,h2,h3{line-height:1.2}\
img{max-width:100%;height:auto}\
pre{padding:1em;overflow-x:auto}\
.cached{color:#777}";

/// Render a reader-view document.
///
/// `cached_at` is the epoch-millisecond write time of a cached page; when
/// present a "Cached on" notice is shown under the source link.
pub fn render_page(source_url: &str, title: &str, content: &str, cached_at: Option<i64>) -> String {
    let notice = cached_at
        .map(|ts| format!("\n      <p class=\"cached\"><small>Cached on {}</small></p>", format_cached_at(ts)))
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{STYLE}</style>
  </head>
  <body>
    <header>
      <small><a href="{source_url}">Link to original content</a></small>{notice}
      <h1>{title}</h1>
    </header>
    <main>
{content}
    </main>
  </body>
</html>
"#
    )
}

/// Human-readable UTC date for a cache timestamp.
pub fn format_cached_at(millis: i64) -> String {
    match DateTime::from_timestamp_millis(millis) {
        Some(dt) => dt.format("%B %-d, %Y at %H:%M UTC").to_string(),
        None => format!("{millis} ms since epoch"),
    }
}
