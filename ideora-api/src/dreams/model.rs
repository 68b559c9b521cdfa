use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    #[default]
    Private,
    Public,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Private => "private",
            Visibility::Public => "public",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Dream {
    pub id: Uuid,
    pub title: String,
    pub visibility: Visibility,
    pub buddy: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateDream {
    pub title: String,
    pub visibility: Option<Visibility>,
    pub buddy: Option<String>,
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct UpdateDream {
    pub title: Option<String>,
    pub visibility: Option<Visibility>,
    pub buddy: Option<String>,
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct DreamFilter {
    pub visibility: Option<Visibility>,
}
