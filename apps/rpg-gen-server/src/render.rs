//! HTML fragments returned to the browser frontend

use std::fmt::Write;

/// Escape text for use in HTML element content and quoted attributes.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// `<option>` elements for the category dropdown.
pub fn category_options<'a, I>(names: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut html = String::new();
    for name in names {
        let name = escape_html(name);
        let _ = write!(html, r#"<option value="{name}">{name}</option>"#);
    }
    html
}

/// `<li>` elements for sampled results.
pub fn result_items<'a, I>(values: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut html = String::new();
    for value in values {
        let _ = write!(html, "<li>{}</li>", escape_html(value));
    }
    html
}

/// Submits the page's form with `fetch` and fills `#results` with the
/// returned `<li>` fragments instead of navigating away.
const RESULTS_SCRIPT: &str = r#"<script>
    document.querySelector("form").addEventListener("submit", (event) => {
      event.preventDefault();
      const params = new URLSearchParams(new FormData(event.target));
      fetch("/api/random?" + params)
        .then((r) => r.text())
        .then((html) => { document.getElementById("results").innerHTML = html; });
    });
  </script>"#;

/// Standalone page for a single generator.
pub fn generator_page(name: &str, max_count: usize) -> String {
    let name = escape_html(name);
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>{name}</title>
</head>
<body>
  <h1>{name}</h1>
  <form action="/api/random" method="get">
    <input type="hidden" name="category" value="{name}">
    <label>Count <input type="number" name="count" min="1" max="{max_count}" value="1"></label>
    <button type="submit">Generate</button>
  </form>
  <ul id="results"></ul>
  {RESULTS_SCRIPT}
</body>
</html>
"#
    )
}
