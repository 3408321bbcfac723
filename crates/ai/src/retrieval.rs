//! Keyword relevance scoring for document lookup.

use serde::{Deserialize, Serialize};

pub const DEFAULT_TOP_K: usize = 3;
pub const SNIPPET_CHARS: usize = 240;

/// A stored document as read from the `documents` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub doc_id: i64,
    pub title: String,
    pub body: String,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetrievedDocument {
    pub doc_id: i64,
    pub title: String,
    pub category: String,
    pub score: usize,
    pub snippet: String,
}

/// Lower-cased query terms of two or more characters.
pub fn query_terms(query: &str) -> Vec<String> {
    let mut terms: Vec<String> = query
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.chars().count() >= 2)
        .map(str::to_lowercase)
        .collect();
    terms.sort();
    terms.dedup();
    terms
}

/// Total occurrences of the query terms in `text`, case-insensitive.
pub fn score_text(text: &str, query: &str) -> usize {
    let haystack = text.to_lowercase();
    query_terms(query)
        .iter()
        .map(|term| haystack.matches(term.as_str()).count())
        .sum()
}

fn snippet(body: &str) -> String {
    body.chars().take(SNIPPET_CHARS).collect()
}

/// Score every document against `query` and return the best `k` with a
/// positive score, highest first. Equal scores keep their input order.
pub fn rank(documents: &[Document], query: &str, k: usize) -> Vec<RetrievedDocument> {
    let mut scored: Vec<RetrievedDocument> = documents
        .iter()
        .filter_map(|doc| {
            let score = score_text(&format!("{}\n{}", doc.title, doc.body), query);
            (score > 0).then(|| RetrievedDocument {
                doc_id: doc.doc_id,
                title: doc.title.clone(),
                category: doc.category.clone(),
                score,
                snippet: snippet(&doc.body),
            })
        })
        .collect();

    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored.truncate(k);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: i64, title: &str, body: &str) -> Document {
        Document {
            doc_id: id,
            title: title.to_string(),
            body: body.to_string(),
            category: "policy".to_string(),
        }
    }

    #[test]
    fn scoring_counts_term_occurrences() {
        assert_eq!(score_text("Refund policy. Refunds within 30 days.", "refund"), 2);
        assert_eq!(score_text("nothing relevant", "refund policy"), 0);
        assert!(query_terms("a refund, Refund!").iter().eq(["refund"].iter()));
    }

    #[test]
    fn rank_orders_by_score_and_truncates() {
        let docs = vec![
            doc(1, "Travel", "Travel expenses need receipts."),
            doc(2, "Refunds", "Refund requests: a refund is issued within 30 days."),
            doc(3, "Returns", "Returned goods may be refunded."),
            doc(4, "Holidays", "Office closed."),
        ];

        let hits = rank(&docs, "refund", 2);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].doc_id, 2);
        assert_eq!(hits[1].doc_id, 3);
        assert!(rank(&docs, "payroll", DEFAULT_TOP_K).is_empty());
    }

    #[test]
    fn snippet_is_bounded() {
        let long = "x".repeat(1000);
        let hits = rank(&[doc(9, "x", &long)], "x", 1);
        assert!(hits.is_empty());
        let hits = rank(&[doc(9, "xx", &long)], "xx", 1);
        assert_eq!(hits[0].snippet.chars().count(), SNIPPET_CHARS);
    }
}
