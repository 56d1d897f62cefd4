// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Evomap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Fuzzy ranking for the map list filter.

struct SubsequenceStats {
    first: usize,
    span: usize,
    consecutive: usize,
    start_boundary: bool,
}

/// Indices of `names` matching `query`, best match first. An empty query keeps every name in its
/// original order.
pub(crate) fn rank<'a>(query: &str, names: impl IntoIterator<Item = &'a str>) -> Vec<usize> {
    let needle = query.trim().to_lowercase();
    let names = names.into_iter().map(str::to_lowercase);
    if needle.is_empty() {
        return names.enumerate().map(|(idx, _)| idx).collect();
    }

    let mut scored = names
        .enumerate()
        .filter_map(|(idx, haystack)| fuzzy_score(&needle, &haystack).map(|score| (score, idx)))
        .collect::<Vec<_>>();
    // Stable: ties keep the caller's order.
    scored.sort_by(|(a, _), (b, _)| b.cmp(a));
    scored.into_iter().map(|(_, idx)| idx).collect()
}

fn fuzzy_score(needle: &str, haystack: &str) -> Option<i64> {
    let subseq = subsequence_stats(needle, haystack)?;
    let ratio = rapidfuzz::fuzz::ratio(needle.chars(), haystack.chars());
    let mut score = (ratio * 1000.0).round() as i64;
    score -= subseq.span as i64;
    score -= (subseq.first as i64) / 4;
    score += (subseq.consecutive as i64) * 40;
    if subseq.start_boundary {
        score += 150;
    }
    if haystack.contains(needle) {
        score += 2000;
    }
    Some(score)
}

fn subsequence_stats(needle: &str, haystack: &str) -> Option<SubsequenceStats> {
    let mut wanted = needle.chars().peekable();
    let mut first = None;
    let mut last = 0;
    let mut prev_match: Option<usize> = None;
    let mut consecutive = 0;
    let mut start_boundary = false;
    let mut prev_hay: Option<char> = None;

    for (idx, ch) in haystack.chars().enumerate() {
        let Some(&want) = wanted.peek() else {
            break;
        };
        if ch == want {
            wanted.next();
            if first.is_none() {
                first = Some(idx);
                start_boundary = prev_hay.map_or(true, is_boundary_char);
            }
            if prev_match.is_some_and(|prev| idx == prev + 1) {
                consecutive += 1;
            }
            prev_match = Some(idx);
            last = idx;
        }
        prev_hay = Some(ch);
    }

    if wanted.peek().is_some() {
        return None;
    }
    let first = first?;
    Some(SubsequenceStats {
        first,
        span: last - first + 1,
        consecutive,
        start_boundary,
    })
}

fn is_boundary_char(ch: char) -> bool {
    matches!(ch, ' ' | '-' | '_' | '(' | '/')
}

#[cfg(test)]
mod tests {
    use super::rank;

    #[test]
    fn empty_query_keeps_everything_in_order() {
        assert_eq!(rank("  ", ["b", "a", "c"]), vec![0, 1, 2]);
    }

    #[test]
    fn non_matching_names_are_dropped() {
        assert_eq!(rank("gpu", ["AI Inference Map", "GPU Fleet"]), vec![1]);
    }

    #[test]
    fn contiguous_matches_rank_first() {
        let names = ["My Fancy Map", "Inference (Copy)", "AI Inference Map"];
        let ranked = rank("inf", names);
        assert_eq!(ranked.len(), 2);
        assert!(!ranked.contains(&0));

        let ranked = rank("aim", ["Auxiliary Inventory Metrics", "AIM"]);
        assert_eq!(ranked[0], 1);
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(rank("MAP", ["my map"]), vec![0]);
    }
}
