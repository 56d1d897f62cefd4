// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Evomap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

pub(crate) fn truncate_with_ellipsis(text: &str, max_len: usize) -> String {
    if max_len == 0 {
        return String::new();
    }

    let len = text_len(text);
    if len <= max_len {
        return text.to_owned();
    }

    if max_len == 1 {
        return "…".to_owned();
    }

    let mut out: String = text.chars().take(max_len - 1).collect();
    out.push('…');
    out
}

pub(crate) fn text_len(text: &str) -> usize {
    text.chars().count()
}

/// Centers `text` on `center` within `[0, width)`, shifting it inward at the edges.
pub(crate) fn centered_start(center: usize, len: usize, width: usize) -> usize {
    let start = center.saturating_sub(len / 2);
    start.min(width.saturating_sub(len))
}

#[cfg(test)]
mod tests {
    use super::{centered_start, text_len, truncate_with_ellipsis};

    #[test]
    fn truncate_with_ellipsis_handles_small_widths() {
        assert_eq!(truncate_with_ellipsis("hello", 0), "");
        assert_eq!(truncate_with_ellipsis("hello", 1), "…");
        assert_eq!(truncate_with_ellipsis("h", 1), "h");
        assert_eq!(truncate_with_ellipsis("hello", 2), "h…");
    }

    #[test]
    fn truncate_with_ellipsis_counts_chars_not_bytes() {
        assert_eq!(text_len("αβγ"), 3);
        assert_eq!(truncate_with_ellipsis("αβγ", 2), "α…");
    }

    #[test]
    fn centered_start_stays_inside_the_row() {
        assert_eq!(centered_start(10, 4, 40), 8);
        assert_eq!(centered_start(1, 6, 40), 0);
        assert_eq!(centered_start(39, 6, 40), 34);
        assert_eq!(centered_start(3, 10, 5), 0);
    }
}
