//! Keyword matching over a knowledge snapshot
//!
//! Two cheap, model-free lookups:
//! - [`direct_answer`]: a stored Question/Answer pair whose question matches
//!   the query exactly or by word overlap
//! - [`relevant_context`]: top-scoring entries rendered as `field: value` lines

use std::borrow::Cow;

use support_agent_config::constants::{retrieval, thresholds};
use support_agent_core::{KnowledgeEntry, KnowledgeSnapshot};

/// Field names holding question/answer pairs
pub const QUESTION_FIELD: &str = "Question";
pub const ANSWER_FIELD: &str = "Answer";

/// Words for opening hours that should match each other
const SCHEDULE_TERMS: &[&str] = &[
    "hour", "hours", "open", "opens", "opening", "close", "closes", "closing", "closed", "time",
    "times", "timing", "timings", "schedule",
];

/// Strip surrounding punctuation; fold schedule vocabulary to "hours"
fn canonical_term(word: &str) -> Cow<'_, str> {
    let trimmed = word.trim_matches(|c: char| !c.is_alphanumeric());
    if SCHEDULE_TERMS.contains(&trimmed) {
        Cow::Borrowed("hours")
    } else {
        Cow::Borrowed(trimmed)
    }
}

/// Lowercased words longer than the minimum term length
pub fn search_terms(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split_whitespace()
        .filter(|w| w.chars().count() > thresholds::MIN_TERM_LEN)
        .map(|w| w.to_string())
        .collect()
}

/// Answer of the first Question/Answer row matching `query`.
///
/// Matches on a case-insensitive exact question, or when at least 70% of the
/// query's long words appear (as substrings, either direction) among the
/// question's long words.
pub fn direct_answer(snapshot: &KnowledgeSnapshot, query: &str) -> Option<String> {
    let query_lower = query.trim().to_lowercase();
    if query_lower.is_empty() {
        return None;
    }

    let query_terms: Vec<String> = search_terms(&query_lower)
        .iter()
        .map(|w| canonical_term(w).into_owned())
        .filter(|w| !w.is_empty())
        .collect();

    for row in &snapshot.rows {
        let (question, answer) = match (row.get(QUESTION_FIELD), row.get(ANSWER_FIELD)) {
            (Some(q), Some(a)) if !q.trim().is_empty() && !a.trim().is_empty() => (q, a),
            _ => continue,
        };

        let question_lower = question.trim().to_lowercase();
        if question_lower == query_lower {
            return Some(answer.to_string());
        }

        if query_terms.is_empty() {
            continue;
        }

        let question_terms: Vec<String> = search_terms(&question_lower)
            .iter()
            .map(|w| canonical_term(w).into_owned())
            .filter(|w| !w.is_empty())
            .collect();

        let matched = query_terms
            .iter()
            .filter(|qw| {
                question_terms
                    .iter()
                    .any(|w| w.contains(qw.as_str()) || qw.contains(w.as_str()))
            })
            .count();

        if matched as f32 / query_terms.len() as f32 >= thresholds::DIRECT_ANSWER_WORD_RATIO {
            return Some(answer.to_string());
        }
    }

    None
}

fn entry_text(headers: &[String], entry: &KnowledgeEntry) -> String {
    headers
        .iter()
        .filter_map(|h| entry.get(h))
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn score_entry(text: &str, query_lower: &str, terms: &[String]) -> u32 {
    let mut score = 0;
    if !query_lower.is_empty() && text.contains(query_lower) {
        score += retrieval::EXACT_MATCH_SCORE;
    }
    for term in terms {
        if text.contains(term.as_str()) {
            score += retrieval::TERM_MATCH_SCORE;
        }
    }
    score
}

/// Render the best-matching entries for `query`, at most `max_length` chars.
///
/// Falls back to the first entries when nothing scores.
pub fn relevant_context(snapshot: &KnowledgeSnapshot, query: &str, max_length: usize) -> String {
    let query_lower = query.trim().to_lowercase();
    let terms = search_terms(&query_lower);

    let mut scored: Vec<(u32, &KnowledgeEntry)> = snapshot
        .rows
        .iter()
        .map(|row| (score_entry(&entry_text(&snapshot.headers, row), &query_lower, &terms), row))
        .filter(|(score, _)| *score > 0)
        .collect();
    // stable: equal scores keep source order
    scored.sort_by(|a, b| b.0.cmp(&a.0));

    let selected: Vec<&KnowledgeEntry> = if scored.is_empty() {
        snapshot.rows.iter().take(retrieval::FALLBACK_ENTRIES).collect()
    } else {
        scored
            .into_iter()
            .take(retrieval::TOP_K)
            .map(|(_, row)| row)
            .collect()
    };

    let mut context = String::from("Relevant Information:\n\n");
    for row in selected {
        if context.chars().count() > max_length {
            break;
        }
        for header in &snapshot.headers {
            if let Some(value) = row.get(header).filter(|v| !v.is_empty()) {
                context.push_str(&format!("{}: {}\n", header, value));
            }
        }
        context.push('\n');
    }

    truncate_chars(&context, max_length)
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(rows: &[(&str, &str)]) -> KnowledgeSnapshot {
        let entries = rows
            .iter()
            .map(|(q, a)| KnowledgeEntry::new().with("Question", *q).with("Answer", *a))
            .collect();
        KnowledgeSnapshot::new(vec!["Question".into(), "Answer".into()], entries)
    }

    #[test]
    fn test_exact_question_match() {
        let kb = snapshot(&[("Do you deliver?", "Yes, citywide.")]);
        assert_eq!(direct_answer(&kb, "  do you DELIVER?  ").as_deref(), Some("Yes, citywide."));
    }

    #[test]
    fn test_schedule_vocabulary_matches_hours_question() {
        let kb = snapshot(&[
            ("Do you deliver?", "Yes"),
            ("What are your hours?", "9am-5pm"),
        ]);
        assert_eq!(direct_answer(&kb, "what time do you open").as_deref(), Some("9am-5pm"));
        assert_eq!(direct_answer(&kb, "When do you close?").as_deref(), Some("9am-5pm"));
    }

    #[test]
    fn test_partial_overlap_below_ratio() {
        let kb = snapshot(&[("What are your hours?", "9am-5pm")]);
        // "closed" folds to hours, "sunday" does not match: 1 of 2
        assert_eq!(direct_answer(&kb, "are you closed on sunday"), None);
    }

    #[test]
    fn test_rows_without_answer_are_skipped() {
        let kb = snapshot(&[("What are your hours?", "")]);
        assert_eq!(direct_answer(&kb, "What are your hours?"), None);
    }

    #[test]
    fn test_short_words_only_needs_exact_match() {
        let kb = snapshot(&[("Who are you?", "A bakery")]);
        assert_eq!(direct_answer(&kb, "who are you"), None);
        assert_eq!(direct_answer(&kb, "who are you?").as_deref(), Some("A bakery"));
    }

    #[test]
    fn test_context_ranks_by_score() {
        let kb = snapshot(&[
            ("Where is the shop?", "Main street"),
            ("Do you sell bread?", "Fresh bread daily"),
            ("Do you sell cakes?", "Cakes on order"),
        ]);
        let context = relevant_context(&kb, "bread", 3000);
        assert!(context.starts_with("Relevant Information:\n\n"));
        assert!(context.contains("Answer: Fresh bread daily"));
        assert!(!context.contains("Main street"));
    }

    #[test]
    fn test_context_ties_keep_source_order() {
        let kb = snapshot(&[
            ("Cakes?", "cakes one"),
            ("Cakes again?", "cakes two"),
        ]);
        let context = relevant_context(&kb, "cakes", 3000);
        let first = context.find("cakes one").unwrap();
        let second = context.find("cakes two").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_context_falls_back_to_first_entries() {
        let kb = snapshot(&[("a?", "1"), ("b?", "2"), ("c?", "3"), ("d?", "4")]);
        let context = relevant_context(&kb, "zzzz", 3000);
        assert!(context.contains("Answer: 3"));
        assert!(!context.contains("Answer: 4"));
    }

    #[test]
    fn test_context_top_five_only() {
        let rows: Vec<(String, String)> = (0..8)
            .map(|i| (format!("bread {i}?"), format!("answer {i}")))
            .collect();
        let refs: Vec<(&str, &str)> = rows.iter().map(|(q, a)| (q.as_str(), a.as_str())).collect();
        let context = relevant_context(&snapshot(&refs), "bread", 3000);
        assert!(context.contains("answer 4"));
        assert!(!context.contains("answer 5"));
    }

    #[test]
    fn test_context_truncates_on_char_boundary() {
        let kb = snapshot(&[("ساعات العمل؟", "من التاسعة صباحاً إلى الخامسة مساءً")]);
        let context = relevant_context(&kb, "ساعات", 30);
        assert_eq!(context.chars().count(), 30);
    }
}
