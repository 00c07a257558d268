use ratatui::text::Span;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Truncate to `max_cells` terminal cells, ending in `…` when cut
pub(super) fn truncate_to_width(s: &str, max_cells: usize) -> String {
    if UnicodeWidthStr::width(s) <= max_cells {
        return s.to_string();
    }
    if max_cells == 0 {
        return String::new();
    }
    let budget = max_cells - 1; // reserve 1 cell for '…'
    let mut width = 0;
    let mut result = String::new();
    for grapheme in s.graphemes(true) {
        let gw = UnicodeWidthStr::width(grapheme);
        if width + gw > budget {
            break;
        }
        width += gw;
        result.push_str(grapheme);
    }
    result.push('\u{2026}');
    result
}

/// Compute total display width of a slice of spans
pub(super) fn spans_width(spans: &[Span]) -> usize {
    spans
        .iter()
        .map(|s| UnicodeWidthStr::width(s.content.as_ref()))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_respects_cell_width() {
        assert_eq!(truncate_to_width("sales@acme.test", 40), "sales@acme.test");
        assert_eq!(truncate_to_width("sales@acme.test", 6), "sales\u{2026}");
        assert_eq!(truncate_to_width("日本語", 4), "日\u{2026}");
        assert_eq!(truncate_to_width("abc", 0), "");
    }

    #[test]
    fn spans_width_sums_cells() {
        let spans = [Span::raw("★ "), Span::raw("日本")];
        assert_eq!(spans_width(&spans), 6);
    }
}
