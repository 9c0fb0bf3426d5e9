use regex::Regex;
use std::sync::OnceLock;

/// A classified, renderable unit of assistant text. Blocks are recomputed on
/// every render and never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayBlock {
    Heading { level: u8, text: String },
    BulletList { items: Vec<String> },
    NumberedList { items: Vec<String> },
    Paragraph { spans: Vec<Inline> },
}

/// Inline emphasis resolved into tagged nodes, never raw markup strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Plain(String),
    Strong(String),
    Emphasis(String),
}

impl Inline {
    pub fn text(&self) -> &str {
        match self {
            Inline::Plain(t) | Inline::Strong(t) | Inline::Emphasis(t) => t,
        }
    }
}

fn numbered_item_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n[0-9]+\. ").expect("valid numbered-list pattern"))
}

fn strong_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\*\*(.*?)\*\*").expect("valid strong pattern"))
}

fn emphasis_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\*(.*?)\*").expect("valid emphasis pattern"))
}

/// Turn raw answer text into an ordered sequence of display blocks.
///
/// Total and deterministic: unparseable input degrades to a paragraph, and
/// every blank-line-separated candidate maps to exactly one block, in input
/// order. Empty input yields an empty sequence.
pub fn render(text: &str) -> Vec<DisplayBlock> {
    if text.is_empty() {
        return Vec::new();
    }
    text.split("\n\n").map(classify).collect()
}

/// Classification is an ordered rule list, first match wins: heading markers
/// (longest first), then bullet list, then numbered list, then paragraph.
/// The heading check covers the whole candidate, so list markers on later
/// lines of a heading-prefixed candidate stay literal inside the remainder.
fn classify(candidate: &str) -> DisplayBlock {
    if let Some(rest) = candidate.strip_prefix("### ") {
        return DisplayBlock::Heading { level: 3, text: rest.to_string() };
    }
    if let Some(rest) = candidate.strip_prefix("## ") {
        return DisplayBlock::Heading { level: 2, text: rest.to_string() };
    }
    if let Some(rest) = candidate.strip_prefix("# ") {
        return DisplayBlock::Heading { level: 1, text: rest.to_string() };
    }

    if candidate.contains("\n- ") {
        let items = candidate
            .split("\n- ")
            .filter(|item| !item.trim().is_empty())
            .map(str::to_string)
            .collect();
        return DisplayBlock::BulletList { items };
    }

    if numbered_item_re().is_match(candidate) {
        let items = numbered_item_re()
            .split(candidate)
            .filter(|item| !item.trim().is_empty())
            .map(str::to_string)
            .collect();
        return DisplayBlock::NumberedList { items };
    }

    DisplayBlock::Paragraph { spans: parse_inline(candidate) }
}

/// Resolve inline emphasis, longest pattern first: one pass for `**strong**`
/// spans, then a second pass for `*light*` spans over the text left between
/// them. Naive left-to-right, non-overlapping.
fn parse_inline(text: &str) -> Vec<Inline> {
    let mut spans = Vec::new();
    let mut last = 0;

    for cap in strong_re().captures_iter(text) {
        let whole = cap.get(0).expect("match always has group 0");
        if whole.start() > last {
            parse_emphasis(&text[last..whole.start()], &mut spans);
        }
        spans.push(Inline::Strong(cap[1].to_string()));
        last = whole.end();
    }
    if last < text.len() {
        parse_emphasis(&text[last..], &mut spans);
    }

    spans
}

fn parse_emphasis(text: &str, spans: &mut Vec<Inline>) {
    let mut last = 0;

    for cap in emphasis_re().captures_iter(text) {
        let whole = cap.get(0).expect("match always has group 0");
        if whole.start() > last {
            spans.push(Inline::Plain(text[last..whole.start()].to_string()));
        }
        spans.push(Inline::Emphasis(cap[1].to_string()));
        last = whole.end();
    }
    if last < text.len() {
        spans.push(Inline::Plain(text[last..].to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paragraph(spans: Vec<Inline>) -> DisplayBlock {
        DisplayBlock::Paragraph { spans }
    }

    #[test]
    fn test_empty_input_yields_no_blocks() {
        assert!(render("").is_empty());
    }

    #[test]
    fn test_plain_text_is_one_paragraph() {
        let blocks = render("Texto simples");
        assert_eq!(
            blocks,
            vec![paragraph(vec![Inline::Plain("Texto simples".to_string())])]
        );
    }

    #[test]
    fn test_heading_levels() {
        assert_eq!(
            render("# Um"),
            vec![DisplayBlock::Heading { level: 1, text: "Um".to_string() }]
        );
        assert_eq!(
            render("## Dois"),
            vec![DisplayBlock::Heading { level: 2, text: "Dois".to_string() }]
        );
        assert_eq!(
            render("### Três"),
            vec![DisplayBlock::Heading { level: 3, text: "Três".to_string() }]
        );
    }

    #[test]
    fn test_heading_keeps_trailing_line_without_blank_separator() {
        // "# Título\nTexto" is a single candidate: the heading rule wins and
        // the second line stays inside the heading text.
        let blocks = render("# Título\nTexto");
        assert_eq!(
            blocks,
            vec![DisplayBlock::Heading { level: 1, text: "Título\nTexto".to_string() }]
        );
    }

    #[test]
    fn test_blank_line_separates_heading_and_paragraph() {
        let blocks = render("# Título\n\nTexto");
        assert_eq!(blocks.len(), 2);
        assert_eq!(
            blocks[0],
            DisplayBlock::Heading { level: 1, text: "Título".to_string() }
        );
        assert_eq!(
            blocks[1],
            paragraph(vec![Inline::Plain("Texto".to_string())])
        );
    }

    #[test]
    fn test_heading_check_precedes_list_check() {
        // List markers inside a heading-prefixed candidate are literal text.
        let blocks = render("### Lista\n- item um\n- item dois");
        assert_eq!(
            blocks,
            vec![DisplayBlock::Heading {
                level: 3,
                text: "Lista\n- item um\n- item dois".to_string(),
            }]
        );
    }

    #[test]
    fn test_bullet_list_keeps_nonempty_lead_and_drops_empty_items() {
        let blocks = render("Veja:\n- primeiro\n- segundo\n- ");
        assert_eq!(
            blocks,
            vec![DisplayBlock::BulletList {
                items: vec![
                    "Veja:".to_string(),
                    "primeiro".to_string(),
                    "segundo".to_string(),
                ],
            }]
        );
    }

    #[test]
    fn test_bullet_list_drops_empty_lead() {
        let blocks = render("\n- a\n- b");
        assert_eq!(
            blocks,
            vec![DisplayBlock::BulletList {
                items: vec!["a".to_string(), "b".to_string()],
            }]
        );
    }

    #[test]
    fn test_numbered_list_split() {
        let blocks = render("Passos:\n1. um\n2. dois\n10. dez");
        assert_eq!(
            blocks,
            vec![DisplayBlock::NumberedList {
                items: vec![
                    "Passos:".to_string(),
                    "um".to_string(),
                    "dois".to_string(),
                    "dez".to_string(),
                ],
            }]
        );
    }

    #[test]
    fn test_numbered_marker_needs_trailing_space() {
        // "1.5" is not a list marker.
        let blocks = render("Cresceu\n1.5 por cento");
        assert!(matches!(blocks[0], DisplayBlock::Paragraph { .. }));
    }

    #[test]
    fn test_strong_span() {
        let blocks = render("Olá **mundo**");
        assert_eq!(
            blocks,
            vec![paragraph(vec![
                Inline::Plain("Olá ".to_string()),
                Inline::Strong("mundo".to_string()),
            ])]
        );
    }

    #[test]
    fn test_emphasis_span() {
        let blocks = render("algo *leve* aqui");
        assert_eq!(
            blocks,
            vec![paragraph(vec![
                Inline::Plain("algo ".to_string()),
                Inline::Emphasis("leve".to_string()),
                Inline::Plain(" aqui".to_string()),
            ])]
        );
    }

    #[test]
    fn test_strong_resolved_before_emphasis() {
        let blocks = render("**forte** e *leve*");
        assert_eq!(
            blocks,
            vec![paragraph(vec![
                Inline::Strong("forte".to_string()),
                Inline::Plain(" e ".to_string()),
                Inline::Emphasis("leve".to_string()),
            ])]
        );
    }

    #[test]
    fn test_bare_double_star_becomes_empty_emphasis() {
        // Two adjacent stars fail the strong pattern but match the emphasis
        // pattern with empty content; naive replacement keeps it that way.
        let blocks = render("a **b");
        assert_eq!(
            blocks,
            vec![paragraph(vec![
                Inline::Plain("a ".to_string()),
                Inline::Emphasis(String::new()),
                Inline::Plain("b".to_string()),
            ])]
        );
    }

    #[test]
    fn test_block_count_matches_candidate_count() {
        let text = "# T\n\npar um\n\n\n\nVeja:\n- a\n- b";
        let candidates = text.split("\n\n").count();
        assert_eq!(render(text).len(), candidates);
    }

    #[test]
    fn test_list_items_never_empty_after_trim() {
        let text = "Lista:\n- \n- ok\n-  \n\nOrdem:\n1.  \n2. dois";
        for block in render(text) {
            match block {
                DisplayBlock::BulletList { items } | DisplayBlock::NumberedList { items } => {
                    assert!(items.iter().all(|i| !i.trim().is_empty()));
                }
                _ => {}
            }
        }
    }
}
