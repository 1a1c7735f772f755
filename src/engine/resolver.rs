//! Fuzzy resolution of free-text queries to catalog titles.
//!
//! Titles are scored with the Ratcliff/Obershelp ratio: twice the number of
//! characters in matching blocks divided by the combined length. Matching blocks
//! are found by taking the longest common run and recursing on both sides of it.
//! Comparison is case-insensitive.

use crate::models::ResolvedTitle;

/// Minimum ratio a title needs to count as a match
pub const DEFAULT_MATCH_CUTOFF: f64 = 0.6;

/// Queries at or below this many characters get no substring suggestions
const MIN_SUGGESTION_QUERY_CHARS: usize = 2;

/// Longest common run of `a[alo..ahi]` and `b[blo..bhi]` as `(i, j, len)`.
///
/// Among equally long runs the one starting earliest in `a`, then in `b`, wins.
fn longest_match(
    a: &[char],
    b: &[char],
    (alo, ahi): (usize, usize),
    (blo, bhi): (usize, usize),
) -> (usize, usize, usize) {
    let mut best = (alo, blo, 0);
    // prev[k] holds the length of the common run ending at a[i - 1], b[blo + k - 1]
    let mut prev = vec![0usize; bhi - blo + 1];
    let mut cur = vec![0usize; bhi - blo + 1];

    for i in alo..ahi {
        for j in blo..bhi {
            let k = j - blo + 1;
            cur[k] = if a[i] == b[j] { prev[k - 1] + 1 } else { 0 };
            if cur[k] > best.2 {
                best = (i + 1 - cur[k], j + 1 - cur[k], cur[k]);
            }
        }
        std::mem::swap(&mut prev, &mut cur);
    }

    best
}

/// Total length of all matching blocks between `a` and `b`
fn matching_characters(a: &[char], b: &[char]) -> usize {
    let mut total = 0;
    let mut pending = vec![((0, a.len()), (0, b.len()))];

    while let Some(((alo, ahi), (blo, bhi))) = pending.pop() {
        if alo >= ahi || blo >= bhi {
            continue;
        }
        let (i, j, len) = longest_match(a, b, (alo, ahi), (blo, bhi));
        if len == 0 {
            continue;
        }
        total += len;
        pending.push(((alo, i), (blo, j)));
        pending.push(((i + len, ahi), (j + len, bhi)));
    }

    total
}

/// Similarity ratio of two strings in [0, 1], ignoring case and surrounding whitespace.
///
/// Two empty strings are identical (1.0).
pub fn match_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.trim().to_lowercase().chars().collect();
    let b: Vec<char> = b.trim().to_lowercase().chars().collect();
    let combined = a.len() + b.len();
    if combined == 0 {
        return 1.0;
    }
    2.0 * matching_characters(&a, &b) as f64 / combined as f64
}

/// Finds the catalog title closest to `query`.
///
/// A title identical to the query, as given or trimmed, resolves to itself.
/// Otherwise the title with the highest ratio at or above `cutoff` wins, ties
/// going to the earliest catalog position. Returns `None` when nothing clears
/// the cutoff or the query is blank.
pub fn resolve<S: AsRef<str>>(query: &str, titles: &[S], cutoff: f64) -> Option<ResolvedTitle> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some(resolved) = exact_title(query, titles).or_else(|| exact_title(trimmed, titles)) {
        return Some(resolved);
    }

    let mut best: Option<(usize, f64)> = None;
    for (index, title) in titles.iter().enumerate() {
        let score = match_ratio(trimmed, title.as_ref());
        if score < cutoff {
            continue;
        }
        if best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((index, score));
        }
    }

    best.map(|(index, score)| ResolvedTitle {
        index,
        title: titles[index].as_ref().to_string(),
        score,
    })
}

fn exact_title<S: AsRef<str>>(query: &str, titles: &[S]) -> Option<ResolvedTitle> {
    titles
        .iter()
        .position(|t| t.as_ref() == query)
        .map(|index| ResolvedTitle {
            index,
            title: query.to_string(),
            score: 1.0,
        })
}

/// Titles containing `query` as a case-insensitive substring, in catalog order.
///
/// Duplicate titles are listed once. Queries of two characters or fewer get no
/// suggestions.
pub fn suggest<S: AsRef<str>>(query: &str, titles: &[S], limit: usize) -> Vec<String> {
    let needle = query.trim().to_lowercase();
    if needle.chars().count() <= MIN_SUGGESTION_QUERY_CHARS {
        return Vec::new();
    }

    let mut suggestions: Vec<String> = Vec::new();
    for title in titles {
        if suggestions.len() >= limit {
            break;
        }
        let title = title.as_ref();
        if title.to_lowercase().contains(&needle) && !suggestions.iter().any(|s| s == title) {
            suggestions.push(title.to_string());
        }
    }
    suggestions
}
