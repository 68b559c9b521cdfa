use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_CATEGORY: &str = "General";
pub const DEFAULT_VISIBILITY: &str = "private";
pub const CONVERTED_STATUS: &str = "In Progress";

/// An idea, or once `is_goal` is set, a goal being worked on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    /// Free text. Unlike dreams, goals do not restrict it to private/public.
    pub visibility: String,
    pub is_goal: bool,
    pub status: Option<String>,
    pub buddy: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateGoal {
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub visibility: Option<String>,
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGoal {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub visibility: Option<String>,
    pub is_goal: Option<bool>,
    pub status: Option<String>,
    pub buddy: Option<String>,
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GoalFilter {
    pub is_goal: Option<bool>,
    pub visibility: Option<String>,
    pub category: Option<String>,
}
