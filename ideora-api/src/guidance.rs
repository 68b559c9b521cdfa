//! Inspiration quotes and per-dream action plans.

use rand::seq::SliceRandom;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::openapi::{
    aide::axum::{routing::get, ApiRouter, IntoApiResponse},
    Json,
};

pub const INSPIRATION: [&str; 6] = [
    "Dream big. Start small. Act now.",
    "An idea is just the beginning. Take action!",
    "Your imagination is limitless, your execution shouldn't be.",
    "Find a problem, create a solution, change the world.",
    "Small steps lead to big achievements.",
    "The best way to predict the future is to create it.",
];

static DEFAULT_PLAN: [&str; 4] = [
    "Define your first step",
    "Set a deadline for your first milestone",
    "Find inspiration from successful projects",
    "Break it down into small, actionable tasks",
];

static KNOWN_PLANS: [(&str, [&str; 4]); 3] = [
    (
        "Start a YouTube channel",
        [
            "Get a camera (or use your phone)",
            "Invest in a good microphone",
            "Create a content schedule",
            "Learn video editing (DaVinci, Premiere, etc.)",
        ],
    ),
    (
        "Learn Japanese",
        [
            "Study Hiragana & Katakana first",
            "Find a language partner",
            "Watch anime or dramas with subtitles",
            "Listen to Japanese music & podcasts",
        ],
    ),
    (
        "Build a startup",
        [
            "Validate your idea with market research",
            "Create a simple business plan",
            "Find a co-founder or mentor",
            "Secure funding (Bootstrap, Investors, Grants)",
        ],
    ),
];

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct Inspiration {
    pub quote: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActionPlan {
    pub dream_id: Uuid,
    pub title: String,
    pub steps: Vec<String>,
}

/// Steps for a dream title. Only exact titles have a tailored plan.
pub fn action_steps(title: &str) -> Vec<String> {
    let steps = KNOWN_PLANS
        .iter()
        .find(|(known, _)| *known == title)
        .map(|(_, steps)| steps)
        .unwrap_or(&DEFAULT_PLAN);

    steps.iter().map(|s| s.to_string()).collect()
}

pub fn random_inspiration() -> Inspiration {
    let quote = INSPIRATION.choose(&mut rand::thread_rng()).copied().unwrap_or(INSPIRATION[0]);
    Inspiration { quote: quote.into() }
}

pub fn router() -> ApiRouter {
    ApiRouter::new().api_route("/api/inspiration", get(inspiration))
}

async fn inspiration() -> impl IntoApiResponse {
    Json(random_inspiration())
}
