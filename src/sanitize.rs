//! Escaping of server-supplied text before it is placed into markup.

/// Escape `&`, `<`, `>`, `"` and `'` as character entities.
///
/// Absent input becomes the empty string.
///
/// # Examples
///
/// ```
/// use web_drive::sanitize::escape_html;
///
/// assert_eq!(escape_html(Some("<b>\"Tom\" & 'Jerry'</b>")),
///            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;");
/// assert_eq!(escape_html(None), "");
/// ```
pub fn escape_html(text: Option<&str>) -> String {
    let text = text.unwrap_or_default();
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
