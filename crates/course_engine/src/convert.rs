pub trait Converter: Send + Sync {
    fn to_markdown(&self, html: &str) -> String;
}

/// `html2md` conversion with headings normalized to ATX style.
#[derive(Debug, Default, Clone, Copy)]
pub struct Html2MdConverter;

impl Converter for Html2MdConverter {
    fn to_markdown(&self, html: &str) -> String {
        atx_headings(&html2md::parse_html(html))
    }
}

/// Rewrites setext headings (a text line underlined with `===` or `---`) as
/// `#` / `##` headings. Fenced code blocks are left alone.
///
/// A `<br>` inside a heading comes out of the converter as hard-broken lines
/// (trailing double space) ahead of the heading line; those are folded back
/// into a single heading.
pub fn atx_headings(markdown: &str) -> String {
    let lines: Vec<&str> = markdown.lines().collect();
    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    let mut in_fence = false;
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        if is_fence(line) {
            in_fence = !in_fence;
        } else if !in_fence {
            if let Some((level, text)) = atx_heading(line) {
                push_heading(&mut out, level, text);
                i += 1;
                continue;
            }
            if can_be_heading_text(line) {
                if let Some(level) = lines.get(i + 1).and_then(|next| setext_level(next)) {
                    push_heading(&mut out, level, line);
                    i += 2;
                    continue;
                }
            }
        }
        out.push(line.to_string());
        i += 1;
    }

    let mut result = out.join("\n");
    if markdown.ends_with('\n') {
        result.push('\n');
    }
    result
}

fn push_heading(out: &mut Vec<String>, level: usize, text: &str) {
    let mut broken = Vec::new();
    while out.last().is_some_and(|prev| is_hard_broken(prev)) {
        if let Some(prev) = out.pop() {
            broken.push(prev);
        }
    }
    let parts: Vec<&str> = broken
        .iter()
        .rev()
        .map(|part| part.trim())
        .chain(std::iter::once(text.trim()))
        .collect();
    out.push(format!("{} {}", "#".repeat(level), parts.join(" ")));
}

fn is_hard_broken(line: &str) -> bool {
    line.ends_with("  ") && can_be_heading_text(line)
}

fn atx_heading(line: &str) -> Option<(usize, &str)> {
    let level = line.chars().take_while(|c| *c == '#').count();
    let rest = &line[level..];
    ((1..=6).contains(&level) && rest.starts_with(' ')).then_some((level, rest))
}

fn is_fence(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with("```") || trimmed.starts_with("~~~")
}

fn can_be_heading_text(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty()
        && !line.starts_with("    ")
        && !trimmed.starts_with(['#', '>', '|', '-', '*', '+'])
}

fn setext_level(line: &str) -> Option<usize> {
    let trimmed = line.trim();
    if trimmed.len() < 3 {
        return None;
    }
    if trimmed.chars().all(|c| c == '=') {
        Some(1)
    } else if trimmed.chars().all(|c| c == '-') {
        Some(2)
    } else {
        None
    }
}
