use crate::{
    app::AppState,
    ctx::BaseParams,
    openapi::{
        aide::{
            axum::{
                routing::{get, post, put},
                ApiRouter, IntoApiResponse,
            },
            NoApi,
        },
        Json, Path, Query,
    },
};
use axum::http::StatusCode;

use schemars::JsonSchema;

use serde::Deserialize;
use uuid::Uuid;

use super::{CreateGoal, Goal, GoalFilter, UpdateGoal};

use super::handlers;

#[derive(Debug, Deserialize, JsonSchema)]
struct GoalIdPath {
    id: Uuid,
}

pub fn router(state: AppState) -> ApiRouter {
    ApiRouter::new()
        .api_route(
            "/api/goals",
            get(find_goals).post_with(create_goal, |t| t.response::<201, Json<Goal>>()),
        )
        .api_route("/api/goals/{id}", get(get_goal).put(update_goal).delete(delete_goal))
        .api_route("/api/goals/{id}/convert", put(convert_goal))
        .api_route("/api/goals/{id}/buddy", post(assign_buddy))
        .with_state(state)
}

async fn find_goals(NoApi(base): NoApi<BaseParams>, Query(filter): Query<GoalFilter>) -> impl IntoApiResponse {
    handlers::find_goals(filter, base).await.map(Json)
}

async fn create_goal(NoApi(base): NoApi<BaseParams>, Json(args): Json<CreateGoal>) -> impl IntoApiResponse {
    handlers::create_goal(args, base)
        .await
        .map(|r| (StatusCode::CREATED, Json(r)))
}

async fn get_goal(Path(GoalIdPath { id }): Path<GoalIdPath>, NoApi(base): NoApi<BaseParams>) -> impl IntoApiResponse {
    handlers::get_goal(id, base).await.map(Json)
}

async fn update_goal(
    Path(GoalIdPath { id }): Path<GoalIdPath>,
    NoApi(base): NoApi<BaseParams>,
    Json(args): Json<UpdateGoal>,
) -> impl IntoApiResponse {
    handlers::update_goal(id, args, base).await.map(Json)
}

async fn convert_goal(
    Path(GoalIdPath { id }): Path<GoalIdPath>,
    NoApi(base): NoApi<BaseParams>,
) -> impl IntoApiResponse {
    handlers::convert_goal(id, base).await.map(Json)
}

async fn assign_buddy(
    Path(GoalIdPath { id }): Path<GoalIdPath>,
    NoApi(base): NoApi<BaseParams>,
) -> impl IntoApiResponse {
    handlers::assign_buddy(id, base).await.map(Json)
}

async fn delete_goal(
    Path(GoalIdPath { id }): Path<GoalIdPath>,
    NoApi(base): NoApi<BaseParams>,
) -> impl IntoApiResponse {
    handlers::delete_goal(id, base).await.map(Json)
}

#[cfg(test)]
mod tests {
    use crate::{
        buddies::BUDDY_NAMES,
        db::{init_test_db, DB},
        errors::{ErrorResponse, Result},
        goals::Goal,
    };
    use axum_test::TestServer;
    use serde_json::{json, Value};

    const GOAL_ID: &str = "018f6138-5b4f-722d-97c5-29b927cedbd4";

    async fn seed_goal(db: &DB) {
        db.call(|conn| {
            conn.execute_batch(&format!(
                "INSERT INTO goals (id, title, description) VALUES (uuid_blob('{GOAL_ID}'), 'Learn Rust', 'the book first');"
            ))
            .unwrap();
            Ok(())
        })
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn find_goals() -> Result<()> {
        let db = init_test_db().await?;

        db.call(|conn| {
            conn.execute_batch(
                r#"
                INSERT INTO goals (title) VALUES ('first');
                INSERT INTO goals (title, is_goal, status) VALUES ('second', 1, 'In Progress');
                INSERT INTO goals (title) VALUES ('third');
                "#,
            )
            .unwrap();
            Ok(())
        })
        .await
        .unwrap();

        let server = test_server(db).await?;
        let response = server.get("/api/goals").await;

        assert_eq!(response.status_code(), 200);
        let goals = response.json::<Vec<Goal>>();
        assert_eq!(
            goals.iter().map(|g| g.title.as_str()).collect::<Vec<_>>(),
            vec!["first", "second", "third"]
        );

        let response = server.get("/api/goals").add_query_param("isGoal", true).await;
        let goals = response.json::<Vec<Goal>>();
        assert_eq!(goals.len(), 1);
        assert_eq!(goals[0].status.as_deref(), Some("In Progress"));
        Ok(())
    }

    #[tokio::test]
    async fn create_goal_starts_as_idea() -> Result<()> {
        let db = init_test_db().await?;

        let server = test_server(db).await?;
        let response = server
            .post("/api/goals")
            .json(&json!({
                "title": "Learn Japanese",
                "description": "N5 by summer",
                "visibility": "friends",
                "isGoal": true
            }))
            .await;

        assert_eq!(response.status_code(), 201);
        let body = response.json::<Value>();
        assert!(body.get("id").is_some());
        assert!(body.get("_id").is_none());
        assert_eq!(body["isGoal"], json!(false));
        assert_eq!(body["category"], json!("General"));
        assert_eq!(body["visibility"], json!("friends"));
        assert_eq!(body["description"], json!("N5 by summer"));
        Ok(())
    }

    #[tokio::test]
    async fn create_goal_requires_title() -> Result<()> {
        let db = init_test_db().await?;
        let server = test_server(db).await?;

        let response = server.post("/api/goals").json(&json!({ "description": "no title" })).await;
        assert_eq!(response.status_code(), 400);
        assert_eq!(response.json::<ErrorResponse>().error, "json_validation");

        let response = server.post("/api/goals").json(&json!({ "title": "" })).await;
        assert_eq!(response.status_code(), 400);
        assert_eq!(response.json::<ErrorResponse>().error, "validation");
        Ok(())
    }

    #[tokio::test]
    async fn get_goal() -> Result<()> {
        let db = init_test_db().await?;
        seed_goal(&db).await;

        let server = test_server(db).await?;
        let response = server.get(&format!("/api/goals/{GOAL_ID}")).await;

        assert_eq!(response.status_code(), 200);
        let goal = response.json::<Goal>();
        assert_eq!(goal.title, "Learn Rust");
        assert_eq!(goal.id.to_string(), GOAL_ID);
        Ok(())
    }

    #[tokio::test]
    async fn get_missing_goal() -> Result<()> {
        let db = init_test_db().await?;
        let server = test_server(db).await?;

        let response = server.get(&format!("/api/goals/{GOAL_ID}")).await;
        assert_eq!(response.status_code(), 404);
        assert_eq!(response.json::<ErrorResponse>().message.as_deref(), Some("Goal not found"));

        let response = server.get("/api/goals/not-a-uuid").await;
        assert_eq!(response.status_code(), 400);
        assert_eq!(response.json::<ErrorResponse>().error, "path_validation");
        Ok(())
    }

    #[tokio::test]
    async fn convert_goal_is_idempotent() -> Result<()> {
        let db = init_test_db().await?;
        seed_goal(&db).await;

        let server = test_server(db).await?;
        for _ in 0..2 {
            let response = server.put(&format!("/api/goals/{GOAL_ID}/convert")).await;

            assert_eq!(response.status_code(), 200);
            let goal = response.json::<Goal>();
            assert!(goal.is_goal);
            assert_eq!(goal.status.as_deref(), Some("In Progress"));
            assert_eq!(goal.title, "Learn Rust");
        }
        Ok(())
    }

    #[tokio::test]
    async fn convert_missing_goal() -> Result<()> {
        let db = init_test_db().await?;
        let server = test_server(db).await?;

        let response = server.put(&format!("/api/goals/{GOAL_ID}/convert")).await;

        assert_eq!(response.status_code(), 404);
        Ok(())
    }

    #[tokio::test]
    async fn missing_goal() -> Result<()> {
        let db = init_test_db().await?;
        let server = test_server(db).await?;

        for response in [
            server
                .put(&format!("/api/goals/{GOAL_ID}"))
                .json(&json!({ "visibility": "public" }))
                .await,
            server.post(&format!("/api/goals/{GOAL_ID}/buddy")).await,
            server.delete(&format!("/api/goals/{GOAL_ID}")).await,
        ] {
            assert_eq!(response.status_code(), 404);
            let error = response.json::<ErrorResponse>();
            assert_eq!(error.error, "not_found");
            assert_eq!(error.message.as_deref(), Some("Goal not found"));
        }
        Ok(())
    }

    #[tokio::test]
    async fn store_failures() -> Result<()> {
        let db = init_test_db().await?;
        seed_goal(&db).await;

        let server = test_server(db.clone()).await?;

        db.call(|conn| {
            conn.execute_batch("DROP TABLE goals;").unwrap();
            Ok(())
        })
        .await
        .unwrap();

        let cases: [(_, u16, &str, &str); 4] = [
            (server.get("/api/goals").await, 500, "store_read", "Error fetching goals"),
            (
                server.get(&format!("/api/goals/{GOAL_ID}")).await,
                500,
                "store_read",
                "Error fetching goal",
            ),
            (
                server.post("/api/goals").json(&json!({ "title": "Learn Rust" })).await,
                400,
                "store_write",
                "Error creating idea",
            ),
            (
                server.put(&format!("/api/goals/{GOAL_ID}/convert")).await,
                400,
                "store_write",
                "Error converting idea to goal",
            ),
        ];

        for (response, status, kind, message) in cases {
            assert_eq!(response.status_code(), status, "{message}");
            let error = response.json::<ErrorResponse>();
            assert_eq!(error.error, kind);
            assert_eq!(error.message.as_deref(), Some(message));
        }
        Ok(())
    }

    #[tokio::test]
    async fn update_goal() -> Result<()> {
        let db = init_test_db().await?;
        seed_goal(&db).await;

        let server = test_server(db).await?;
        let response = server
            .put(&format!("/api/goals/{GOAL_ID}"))
            .json(&json!({
                "visibility": "public",
                "buddy": "Casey"
            }))
            .await;

        assert_eq!(response.status_code(), 200);
        let goal = response.json::<Goal>();
        assert_eq!(goal.visibility, "public");
        assert_eq!(goal.buddy.as_deref(), Some("Casey"));
        assert_eq!(goal.description.as_deref(), Some("the book first"));
        assert!(!goal.is_goal);
        Ok(())
    }

    #[tokio::test]
    async fn assign_buddy() -> Result<()> {
        let db = init_test_db().await?;
        seed_goal(&db).await;

        let server = test_server(db).await?;
        let response = server.post(&format!("/api/goals/{GOAL_ID}/buddy")).await;

        assert_eq!(response.status_code(), 200);
        let buddy = response.json::<Goal>().buddy.unwrap();
        assert!(BUDDY_NAMES.contains(&buddy.as_str()));

        let stored = server.get(&format!("/api/goals/{GOAL_ID}")).await.json::<Goal>();
        assert_eq!(stored.buddy, Some(buddy));
        Ok(())
    }

    #[tokio::test]
    async fn delete_goal() -> Result<()> {
        let db = init_test_db().await?;
        seed_goal(&db).await;

        let server = test_server(db.clone()).await?;
        let response = server.delete(&format!("/api/goals/{GOAL_ID}")).await;

        assert_eq!(response.status_code(), 200);
        assert_eq!(response.json::<Goal>().title, "Learn Rust");

        let count = db
            .call(|conn| {
                conn.query_row::<u32, _, _>("select count(*) from goals", [], |r| r.get(0))
                    .map_err(|e| e.into())
            })
            .await
            .unwrap();

        assert_eq!(count, 0);

        Ok(())
    }

    async fn test_server(db: DB) -> Result<TestServer> {
        crate::tests::test_server(db, super::router).await
    }
}
