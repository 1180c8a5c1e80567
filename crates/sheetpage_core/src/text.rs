//! Escaping and paragraph reflow for sheet-sourced text.

/// Escape the five HTML-significant characters. Every sheet-sourced value
/// passes through here on its way into markup, element text and attribute
/// values alike.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Reflow multi-line cell text into paragraph markup. A run of one or
/// more blank lines is a single paragraph boundary; a lone line break
/// inside a paragraph becomes `<br>`. The text itself is escaped. Blank
/// input yields an empty string so callers can skip the whole block.
pub fn reflow_html(raw: &str) -> String {
    let normalized = raw.replace("\r\n", "\n").replace('\r', "\n");
    let mut paragraphs: Vec<Vec<&str>> = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in normalized.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            if !current.is_empty() {
                paragraphs.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        paragraphs.push(current);
    }

    let mut out = String::new();
    for lines in &paragraphs {
        out.push_str("<p>");
        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                out.push_str("<br>");
            }
            out.push_str(&escape_html(line));
        }
        out.push_str("</p>");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_all_five_significant_characters() {
        assert_eq!(
            escape_html(r#"<a href="x">&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn blank_line_runs_collapse_to_one_paragraph_break() {
        assert_eq!(reflow_html("one\n\n\n\ntwo"), "<p>one</p><p>two</p>");
    }

    #[test]
    fn single_breaks_stay_inside_the_paragraph() {
        assert_eq!(reflow_html("one\ntwo"), "<p>one<br>two</p>");
    }

    #[test]
    fn blank_input_yields_nothing() {
        assert_eq!(reflow_html("  \n \n"), "");
    }
}
