//! Hardcoded competitor and social outputs.
//!
//! These are deliberate placeholders behind the request flags; real search
//! and social integrations are out of scope.

use quento_core::{Competitor, SocialPresence};

#[must_use]
pub fn placeholder_competitors() -> Vec<Competitor> {
    vec![
        Competitor {
            name: "Competitor A".to_owned(),
            url: "https://competitor-a.com".to_owned(),
            strengths: vec!["Strong SEO".to_owned(), "Active blog".to_owned()],
            seo_score: 78,
        },
        Competitor {
            name: "Competitor B".to_owned(),
            url: "https://competitor-b.com".to_owned(),
            strengths: vec!["Social media presence".to_owned(), "Fast website".to_owned()],
            seo_score: 72,
        },
    ]
}

#[must_use]
pub fn placeholder_social() -> SocialPresence {
    SocialPresence {
        platforms_found: vec!["linkedin".to_owned(), "twitter".to_owned()],
        activity_level: "moderate".to_owned(),
        recommendations: vec![
            "Increase posting frequency".to_owned(),
            "Add social sharing buttons to website".to_owned(),
        ],
    }
}
