//! Narrative text to HTML.
//!
//! Line rules: bullet markers (`•`, `-`, `*`) become list items, lines with
//! `**` or `#` become headings with those markers removed, anything else is a
//! paragraph. Blank lines are dropped.

/// Escape text for use inside HTML elements and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsightLine {
    Bullet(String),
    Heading(String),
    Paragraph(String),
}

pub fn classify_line(line: &str) -> Option<InsightLine> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some(rest) = ['•', '-', '*']
        .iter()
        .find_map(|marker| trimmed.strip_prefix(*marker))
    {
        return Some(InsightLine::Bullet(rest.trim().to_string()));
    }

    if trimmed.contains("**") || trimmed.contains('#') {
        let heading: String = trimmed.chars().filter(|c| *c != '*' && *c != '#').collect();
        return Some(InsightLine::Heading(heading));
    }

    Some(InsightLine::Paragraph(trimmed.to_string()))
}

/// Render one section's text. Empty text gets a placeholder paragraph.
pub fn insights_to_html(text: &str) -> String {
    let lines: Vec<InsightLine> = text.lines().filter_map(classify_line).collect();
    if lines.is_empty() {
        return r#"<p class="empty">No insights available</p>"#.to_string();
    }

    let mut html = String::new();
    let mut in_list = false;
    for line in lines {
        let is_bullet = matches!(line, InsightLine::Bullet(_));
        if is_bullet && !in_list {
            html.push_str("<ul>\n");
        } else if !is_bullet && in_list {
            html.push_str("</ul>\n");
        }
        in_list = is_bullet;

        match line {
            InsightLine::Bullet(item) => {
                html.push_str(&format!("  <li>{}</li>\n", escape_html(&item)))
            }
            InsightLine::Heading(h) => html.push_str(&format!("<h4>{}</h4>\n", escape_html(&h))),
            InsightLine::Paragraph(p) => html.push_str(&format!("<p>{}</p>\n", escape_html(&p))),
        }
    }
    if in_list {
        html.push_str("</ul>\n");
    }
    html
}
