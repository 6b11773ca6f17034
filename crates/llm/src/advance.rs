//! Phase-advancement heuristic.
//!
//! Purely advisory: callers surface the signal, the stored phase changes only
//! through the explicit update operation.

use quento_core::{Message, MessageRole, RingPhase};

/// Advisory signal describing whether a conversation looks ready to move to
/// the next phase.
#[derive(Debug, Clone, PartialEq)]
pub struct AdvancementSignal {
    pub should_advance: bool,
    pub confidence: f64,
    pub reason: String,
}

impl AdvancementSignal {
    fn hold(reason: String) -> Self {
        Self { should_advance: false, confidence: 0.0, reason }
    }
}

/// Confidence assigned when the latest assistant response contains an
/// explicit transition phrase.
const PHRASE_CONFIDENCE: f64 = 0.85;

/// Cap on keyword-coverage confidence.
const COVERAGE_CONFIDENCE_CAP: f64 = 0.9;

/// Minimum user/assistant exchanges before a phase may signal advancement.
const fn min_exchanges(phase: RingPhase) -> usize {
    match phase {
        RingPhase::Core | RingPhase::Execute => 4,
        RingPhase::Discover | RingPhase::Plan | RingPhase::Optimize => 3,
    }
}

/// Phase-specific keyword list scanned over the whole transcript, and the
/// number of distinct matches required for coverage.
const fn phase_keywords(phase: RingPhase) -> (&'static [&'static str], usize) {
    match phase {
        RingPhase::Core => (
            &[
                "business", "customers", "audience", "value", "goals", "products",
                "services", "challenges",
            ],
            3,
        ),
        RingPhase::Discover => (
            &["competitors", "opportunity", "market", "strengths", "weaknesses", "traffic", "seo"],
            3,
        ),
        RingPhase::Plan => {
            (&["plan", "priority", "timeline", "budget", "milestone", "resources"], 2)
        },
        RingPhase::Execute => {
            (&["done", "implemented", "launched", "progress", "completed", "finished"], 2)
        },
        RingPhase::Optimize => {
            (&["results", "metrics", "improved", "conversion", "learnings", "iterate"], 2)
        },
    }
}

/// Transition phrases that, when present in the latest assistant response,
/// directly indicate readiness to move on.
const fn transition_phrases(phase: RingPhase) -> &'static [&'static str] {
    match phase {
        RingPhase::Core => {
            &["ready to discover", "move to the discover", "moving to discovery", "discover phase"]
        },
        RingPhase::Discover => &["ready to plan", "move to the plan", "plan phase"],
        RingPhase::Plan => {
            &["ready to execute", "move to the execute", "start executing", "execute phase"]
        },
        RingPhase::Execute => {
            &["ready to optimize", "move to the optimize", "optimize phase"]
        },
        RingPhase::Optimize => &[],
    }
}

/// Evaluate the advancement heuristic over the full message history.
///
/// An exchange is one user turn; both signals require the phase's minimum
/// exchange count before firing.
#[must_use]
pub fn evaluate_advancement(phase: RingPhase, messages: &[Message]) -> AdvancementSignal {
    if phase == RingPhase::Optimize {
        return AdvancementSignal::hold("already at the final phase".to_owned());
    }

    let exchanges = messages.iter().filter(|m| m.role == MessageRole::User).count();
    let needed = min_exchanges(phase);
    if exchanges < needed {
        return AdvancementSignal::hold(format!(
            "need more discussion ({exchanges}/{needed} exchanges)"
        ));
    }

    // Explicit transition phrase in the latest assistant response.
    if let Some(last_assistant) =
        messages.iter().rev().find(|m| m.role == MessageRole::Assistant)
    {
        let lower = last_assistant.content.to_lowercase();
        if let Some(phrase) =
            transition_phrases(phase).iter().find(|p| lower.contains(*p))
        {
            return AdvancementSignal {
                should_advance: true,
                confidence: PHRASE_CONFIDENCE,
                reason: format!("assistant signaled transition (\"{phrase}\")"),
            };
        }
    }

    // Keyword coverage over the concatenated transcript.
    let transcript = messages
        .iter()
        .map(|m| m.content.to_lowercase())
        .collect::<Vec<_>>()
        .join("\n");
    let (keywords, threshold) = phase_keywords(phase);
    let matched = keywords.iter().filter(|k| transcript.contains(*k)).count();

    if matched >= threshold {
        let ratio = matched as f64 / keywords.len() as f64;
        AdvancementSignal {
            should_advance: true,
            confidence: ratio.min(COVERAGE_CONFIDENCE_CAP),
            reason: format!("{matched}/{} phase keywords covered", keywords.len()),
        }
    } else {
        AdvancementSignal::hold(format!(
            "phase topics not yet covered ({matched}/{threshold} keywords)"
        ))
    }
}
