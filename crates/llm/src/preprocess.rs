//! Inbound message classification.
//!
//! Ordered regex matching over the lowercased message. First matching
//! category wins; priority is concern > disagreement > agreement > request >
//! question, with statement as the default.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Question,
    Statement,
    Request,
    Concern,
    Agreement,
    Disagreement,
    Clarification,
    OffTopic,
}

impl Intent {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Question => "question",
            Self::Statement => "statement",
            Self::Request => "request",
            Self::Concern => "concern",
            Self::Agreement => "agreement",
            Self::Disagreement => "disagreement",
            Self::Clarification => "clarification",
            Self::OffTopic => "off_topic",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LengthBucket {
    Short,
    Medium,
    Long,
}

/// Signals extracted from one inbound user message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageSignals {
    pub intent: Intent,
    pub sentiment: Sentiment,
    pub length: LengthBucket,
    pub references_history: bool,
}

static CONCERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(worried|worry|worries|concern|concerned|afraid|scared|anxious|nervous|risky)\b")
        .expect("concern pattern")
});

static DISAGREEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(disagree|don't think|do not think|doubt|not convinced|won't work|wouldn't work|that's wrong)\b",
    )
    .expect("disagreement pattern")
});

static AGREEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(agree|agreed|sounds good|makes sense|exactly|absolutely|definitely|great idea|let's do it)\b",
    )
    .expect("agreement pattern")
});

static REQUEST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(can you|could you|would you|please|help me|i need|show me|give me)\b")
        .expect("request pattern")
});

static QUESTION_OPENER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(who|what|when|where|why|how|is|are|do|does|can|should|will)\b")
        .expect("question pattern")
});

static HISTORY_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(you said|you mentioned|earlier|before|previously|last time|as we discussed|going back to)\b",
    )
    .expect("history reference pattern")
});

const POSITIVE_WORDS: [&str; 13] = [
    "great", "good", "excellent", "love", "happy", "awesome", "fantastic", "amazing",
    "perfect", "thanks", "thank you", "helpful", "excited",
];

const NEGATIVE_WORDS: [&str; 13] = [
    "bad", "terrible", "awful", "hate", "frustrated", "angry", "disappointed", "poor",
    "worst", "problem", "struggling", "difficult", "confusing",
];

/// Classify one user message. Input casing is irrelevant.
#[must_use]
pub fn analyze_message(text: &str) -> MessageSignals {
    let lower = text.to_lowercase();
    let trimmed = lower.trim();

    MessageSignals {
        intent: classify_intent(trimmed),
        sentiment: classify_sentiment(trimmed),
        length: bucket_length(trimmed),
        references_history: HISTORY_REFERENCE.is_match(trimmed),
    }
}

fn classify_intent(lower: &str) -> Intent {
    if CONCERN.is_match(lower) {
        Intent::Concern
    } else if DISAGREEMENT.is_match(lower) {
        Intent::Disagreement
    } else if AGREEMENT.is_match(lower) {
        Intent::Agreement
    } else if REQUEST.is_match(lower) {
        Intent::Request
    } else if lower.contains('?') || QUESTION_OPENER.is_match(lower) {
        Intent::Question
    } else {
        Intent::Statement
    }
}

fn classify_sentiment(lower: &str) -> Sentiment {
    let positive = POSITIVE_WORDS.iter().filter(|w| lower.contains(*w)).count();
    let negative = NEGATIVE_WORDS.iter().filter(|w| lower.contains(*w)).count();
    match positive.cmp(&negative) {
        std::cmp::Ordering::Greater => Sentiment::Positive,
        std::cmp::Ordering::Less => Sentiment::Negative,
        std::cmp::Ordering::Equal => Sentiment::Neutral,
    }
}

fn bucket_length(text: &str) -> LengthBucket {
    let words = text.split_whitespace().count();
    if words <= 5 {
        LengthBucket::Short
    } else if words <= 30 {
        LengthBucket::Medium
    } else {
        LengthBucket::Long
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concern_wins_over_question() {
        // Contains both a concern word and a question mark; concern has priority.
        let signals = analyze_message("I'm worried about my traffic, what should I do?");
        assert_eq!(signals.intent, Intent::Concern);
    }

    #[test]
    fn disagreement_wins_over_agreement_order() {
        let signals = analyze_message("I don't think that makes sense for us");
        assert_eq!(signals.intent, Intent::Disagreement);
    }

    #[test]
    fn request_detected() {
        let signals = analyze_message("Can you draft a content calendar for me");
        assert_eq!(signals.intent, Intent::Request);
    }

    #[test]
    fn question_by_punctuation_and_opener() {
        assert_eq!(analyze_message("does this apply to my shop?").intent, Intent::Question);
        assert_eq!(analyze_message("How large is the market").intent, Intent::Question);
    }

    #[test]
    fn statement_is_default() {
        let signals = analyze_message("We sell handmade furniture in Austin");
        assert_eq!(signals.intent, Intent::Statement);
    }

    #[test]
    fn sentiment_by_count_comparison() {
        assert_eq!(analyze_message("this is great, thanks!").sentiment, Sentiment::Positive);
        assert_eq!(
            analyze_message("the rollout was terrible and I'm frustrated").sentiment,
            Sentiment::Negative
        );
        assert_eq!(analyze_message("we ship on tuesdays").sentiment, Sentiment::Neutral);
        // One positive and one negative word cancel out.
        assert_eq!(analyze_message("good idea but bad timing").sentiment, Sentiment::Neutral);
    }

    #[test]
    fn length_buckets() {
        assert_eq!(analyze_message("ok").length, LengthBucket::Short);
        assert_eq!(analyze_message("one two three four five").length, LengthBucket::Short);
        assert_eq!(
            analyze_message("one two three four five six").length,
            LengthBucket::Medium
        );
        let long = "word ".repeat(31);
        assert_eq!(analyze_message(&long).length, LengthBucket::Long);
    }

    #[test]
    fn history_reference_detected() {
        assert!(analyze_message("as we discussed, margins are thin").references_history);
        assert!(!analyze_message("margins are thin").references_history);
    }
}
