//! Active-filter chip line.
//!
//! Shows the debounced query and every active filter as removable chips,
//! mirroring the criteria the next request will carry. Disappears (renders
//! empty) when nothing is active.

use ratatui::text::{Line, Span};

use backdesk_core::FilterValue;

use crate::theme;

/// Build the chip line from the active query and filter criteria.
pub fn chips_line(query: Option<&str>, filters: &[(String, FilterValue)]) -> Line<'static> {
    let mut spans: Vec<Span<'static>> = Vec::new();

    if let Some(q) = query {
        spans.push(Span::styled(format!(" \u{1f50d} {q} "), theme::chip()));
        spans.push(Span::raw(" "));
    }

    for (field, value) in filters {
        spans.push(Span::styled(
            format!(" {field}: {} \u{2715} ", value.chip_text()),
            theme::chip(),
        ));
        spans.push(Span::raw(" "));
    }

    if spans.is_empty() {
        return Line::default();
    }

    let mut all = vec![Span::styled("filters: ", theme::key_hint())];
    all.extend(spans);
    Line::from(all)
}
