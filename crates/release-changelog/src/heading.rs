const FENCES: [&str; 2] = ["```", "~~~"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Heading<'a> {
    /// Byte offset of the first character of the heading line.
    pub(crate) start: usize,
    /// Byte offset just past the heading line, including its line ending.
    pub(crate) end: usize,
    pub(crate) depth: usize,
    pub(crate) text: &'a str,
}

/// Collects ATX headings (`#` to `######`), ignoring lines inside fenced code.
pub(crate) fn scan_headings(content: &str) -> Vec<Heading<'_>> {
    let mut headings = Vec::new();
    let mut open_fence: Option<&str> = None;
    let mut offset = 0;

    for line in content.split_inclusive('\n') {
        let start = offset;
        offset += line.len();

        let stripped = strip_indent(line.trim_end_matches(['\n', '\r']));

        if let Some(fence) = open_fence {
            if stripped.starts_with(fence) {
                open_fence = None;
            }
            continue;
        }

        if let Some(fence) = FENCES.iter().find(|f| stripped.starts_with(**f)) {
            open_fence = Some(*fence);
            continue;
        }

        if let Some((depth, text)) = parse_atx(stripped) {
            headings.push(Heading {
                start,
                end: offset,
                depth,
                text,
            });
        }
    }

    headings
}

fn strip_indent(line: &str) -> &str {
    let indent = line.len() - line.trim_start_matches(' ').len();
    if indent <= 3 { &line[indent..] } else { line }
}

fn parse_atx(line: &str) -> Option<(usize, &str)> {
    let depth = line.len() - line.trim_start_matches('#').len();
    if !(1..=6).contains(&depth) {
        return None;
    }

    let rest = &line[depth..];
    if !rest.is_empty() && !rest.starts_with([' ', '\t']) {
        return None;
    }

    let text = rest.trim();
    let text = match text.trim_end_matches('#') {
        trimmed if trimmed.is_empty() || trimmed.ends_with([' ', '\t']) => trimmed.trim_end(),
        _ => text,
    };

    Some((depth, text))
}
