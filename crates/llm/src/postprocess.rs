//! Outbound response cleanup and inspection.

use std::sync::LazyLock;

use regex::Regex;

use crate::preprocess::{Intent, MessageSignals, Sentiment};

/// Quality concerns flagged on a generated response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityFlag {
    /// Under 50 characters.
    TooShort,
    /// Over 1500 characters.
    TooLong,
    /// User sentiment was negative and the response carries no acknowledgment.
    NegativeSentimentUnacknowledged,
    /// User made a statement and the response asks nothing back.
    NoFollowUpQuestion,
}

/// Cleaned response plus extracted structure.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedResponse {
    pub content: String,
    pub contains_question: bool,
    pub action_items: Vec<String>,
    pub signals_transition: bool,
    pub quality_flags: Vec<QualityFlag>,
}

const MIN_RESPONSE_LEN: usize = 50;
const MAX_RESPONSE_LEN: usize = 1500;

static ROLE_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?mi)^\s*(assistant|ai|quento)\s*:\s*").expect("role label pattern")
});

static EXCESS_NEWLINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("newline pattern"));

static NUMBERED_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*\d+[.)]\s+(.+)$").expect("numbered item pattern"));

static BULLET_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*[-*•]\s+(.+)$").expect("bullet item pattern"));

static LABELED_ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?mi)^\s*(?:priority|action|step|task)\s*:\s*(.+)$").expect("label pattern")
});

static ENGAGEMENT_CUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(let me know|tell me|what do you think|share your)\b")
        .expect("engagement pattern")
});

static ACKNOWLEDGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(understand|i hear you|sorry|i know|frustrating|appreciate|tough)\b")
        .expect("acknowledgment pattern")
});

static TRANSITION_PHRASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(ready to (discover|plan|execute|optimize)|move to the (discover|plan|execute|optimize)|next phase)\b",
    )
    .expect("transition pattern")
});

/// Clean a raw model response and extract structure and quality flags.
///
/// `user_signals` are the pre-processing results for the message that
/// prompted this response.
#[must_use]
pub fn postprocess_response(raw: &str, user_signals: MessageSignals) -> ProcessedResponse {
    let without_labels = ROLE_LABEL.replace_all(raw, "");
    let content = EXCESS_NEWLINES.replace_all(without_labels.trim(), "\n\n").into_owned();

    let contains_question = content.contains('?') || ENGAGEMENT_CUE.is_match(&content);
    let action_items = extract_action_items(&content);
    let signals_transition = TRANSITION_PHRASE.is_match(&content);

    let mut quality_flags = Vec::new();
    if content.chars().count() < MIN_RESPONSE_LEN {
        quality_flags.push(QualityFlag::TooShort);
    }
    if content.chars().count() > MAX_RESPONSE_LEN {
        quality_flags.push(QualityFlag::TooLong);
    }
    if user_signals.sentiment == Sentiment::Negative && !ACKNOWLEDGMENT.is_match(&content) {
        quality_flags.push(QualityFlag::NegativeSentimentUnacknowledged);
    }
    if user_signals.intent == Intent::Statement && !contains_question {
        quality_flags.push(QualityFlag::NoFollowUpQuestion);
    }

    ProcessedResponse {
        content,
        contains_question,
        action_items,
        signals_transition,
        quality_flags,
    }
}

/// Extract action-item-shaped lines via three independent pattern families:
/// numbered lists, bullet lists, and Priority/Action/Step/Task labels.
fn extract_action_items(content: &str) -> Vec<String> {
    let mut items = Vec::new();
    for pattern in [&*NUMBERED_ITEM, &*BULLET_ITEM, &*LABELED_ITEM] {
        for capture in pattern.captures_iter(content) {
            if let Some(item) = capture.get(1) {
                let text = item.as_str().trim().to_owned();
                if !text.is_empty() && !items.contains(&text) {
                    items.push(text);
                }
            }
        }
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocess::{analyze_message, LengthBucket};

    fn neutral_signals() -> MessageSignals {
        MessageSignals {
            intent: Intent::Question,
            sentiment: Sentiment::Neutral,
            length: LengthBucket::Medium,
            references_history: false,
        }
    }

    #[test]
    fn strips_role_labels_and_collapses_newlines() {
        let raw = "Assistant: Here is my advice.\n\n\n\nStart with your homepage, what does it say?";
        let processed = postprocess_response(raw, neutral_signals());
        assert!(!processed.content.contains("Assistant:"));
        assert!(!processed.content.contains("\n\n\n"));
        assert!(processed.content.contains("\n\n"));
    }

    #[test]
    fn extracts_all_three_action_item_families() {
        let raw = "Here's what I suggest so we can move forward together:\n\
                   1. Rewrite your title tag\n\
                   - Add alt text to product photos\n\
                   Task: publish one blog post this week\n\
                   What feels most doable?";
        let processed = postprocess_response(raw, neutral_signals());
        assert_eq!(processed.action_items.len(), 3);
        assert!(processed.action_items.contains(&"Rewrite your title tag".to_owned()));
        assert!(processed
            .action_items
            .contains(&"publish one blog post this week".to_owned()));
    }

    #[test]
    fn flags_short_responses() {
        let processed = postprocess_response("Sounds good!", neutral_signals());
        assert!(processed.quality_flags.contains(&QualityFlag::TooShort));
    }

    #[test]
    fn flags_long_responses() {
        let raw = "a".repeat(1600);
        let processed = postprocess_response(&raw, neutral_signals());
        assert!(processed.quality_flags.contains(&QualityFlag::TooLong));
    }

    #[test]
    fn flags_unacknowledged_negative_sentiment() {
        let signals = analyze_message("this has been a terrible, frustrating month for sales");
        assert_eq!(signals.sentiment, Sentiment::Negative);

        let cold = postprocess_response(
            "Your SEO score is 60 out of 100. Improving title tags would help with rankings.",
            signals,
        );
        assert!(cold
            .quality_flags
            .contains(&QualityFlag::NegativeSentimentUnacknowledged));

        let warm = postprocess_response(
            "I understand this month has been hard. Your SEO score is 60, and there are \
             clear ways to lift it - want to walk through them?",
            signals,
        );
        assert!(!warm
            .quality_flags
            .contains(&QualityFlag::NegativeSentimentUnacknowledged));
    }

    #[test]
    fn flags_statement_without_follow_up() {
        let signals = analyze_message("we moved our shop to a new domain last month");
        assert_eq!(signals.intent, Intent::Statement);
        let processed = postprocess_response(
            "A domain move can shift rankings for a while. Redirects and resubmitted \
             sitemaps usually settle it within weeks.",
            signals,
        );
        assert!(processed.quality_flags.contains(&QualityFlag::NoFollowUpQuestion));
        assert!(!processed.contains_question);
    }

    #[test]
    fn detects_transition_phrase() {
        let processed = postprocess_response(
            "We've covered a lot of ground on your fundamentals - I think we're ready to \
             discover where your market is heading. Shall we?",
            neutral_signals(),
        );
        assert!(processed.signals_transition);
    }
}
