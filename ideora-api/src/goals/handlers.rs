use rusqlite::{params, Row};
use uuid::Uuid;

use crate::{
    buddies,
    ctx::BaseParams,
    db::{self, NOW},
    errors::ensure_title,
    Error, Result,
};

use super::{CreateGoal, Goal, GoalFilter, UpdateGoal, CONVERTED_STATUS, DEFAULT_CATEGORY, DEFAULT_VISIBILITY};

const COLUMNS: &str = "id, title, description, category, visibility, is_goal, status, buddy, created_at, updated_at";

impl<'a> TryFrom<&Row<'a>> for Goal {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'a>) -> std::result::Result<Self, Self::Error> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            category: row.get(3)?,
            visibility: row.get(4)?,
            is_goal: row.get(5)?,
            status: row.get(6)?,
            buddy: row.get(7)?,
            created_at: row.get(8)?,
            updated_at: row.get(9)?,
        })
    }
}

pub async fn find_goals(filter: GoalFilter, BaseParams { db, .. }: BaseParams) -> Result<Vec<Goal>> {
    db.call(move |conn| {
        let GoalFilter {
            is_goal,
            visibility,
            category,
        } = filter;

        let goals = conn
            .prepare(&format!(
                r#"SELECT {COLUMNS} FROM goals
                WHERE (?1 IS NULL OR is_goal = ?1)
                AND (?2 IS NULL OR visibility = ?2)
                AND (?3 IS NULL OR category = ?3)
                ORDER BY rowid"#
            ))?
            .query_map(params![is_goal, visibility, category], |row| Goal::try_from(row))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(goals)
    })
    .await
    .map_err(db::Error::from)
    .map_err(Error::from)
    .map_err(|e| e.on_read("Error fetching goals"))
}

pub async fn get_goal(goal_id: Uuid, BaseParams { db, .. }: BaseParams) -> Result<Goal> {
    db.call(move |conn| {
        let goal = conn.query_row(
            &format!("SELECT {COLUMNS} FROM goals WHERE id = ?"),
            params![goal_id],
            |row| Goal::try_from(row),
        )?;
        Ok(goal)
    })
    .await
    .map_err(db::Error::from)
    .map_err(|e| db::Error::not_found_message(e, "Goal not found"))
    .map_err(Error::from)
    .map_err(|e| e.on_read("Error fetching goal"))
}

/// New entries always start as ideas; promotion goes through [`convert_goal`].
pub async fn create_goal(
    CreateGoal {
        title,
        description,
        category,
        visibility,
    }: CreateGoal,
    BaseParams { db, ctx }: BaseParams,
) -> Result<Goal> {
    ensure_title(&title)?;

    let category = category.unwrap_or_else(|| DEFAULT_CATEGORY.into());
    let visibility = visibility.unwrap_or_else(|| DEFAULT_VISIBILITY.into());

    let goal = db
        .call(move |conn| {
            conn.query_row(
                &format!(
                    r#"INSERT INTO goals (title, description, category, visibility, is_goal) VALUES (?, ?, ?, ?, 0)
                    RETURNING {COLUMNS}"#
                ),
                params![title, description, category, visibility],
                |row| Goal::try_from(row),
            )
            .map_err(|e| e.into())
        })
        .await
        .map_err(db::Error::from)
        .map_err(Error::from)
        .map_err(|e| e.on_write("Error creating idea"))?;

    tracing::info!(request_id = ctx.request_id(), goal_id = %goal.id, "idea created");
    Ok(goal)
}

pub async fn update_goal(goal_id: Uuid, update: UpdateGoal, BaseParams { db, ctx }: BaseParams) -> Result<Goal> {
    if let Some(title) = &update.title {
        ensure_title(title)?;
    }

    let UpdateGoal {
        title,
        description,
        category,
        visibility,
        is_goal,
        status,
        buddy,
    } = update;

    let goal = db
        .call(move |conn| {
            conn.query_row(
                &format!(
                    r#"UPDATE goals SET
                        title = coalesce(?, title),
                        description = coalesce(?, description),
                        category = coalesce(?, category),
                        visibility = coalesce(?, visibility),
                        is_goal = coalesce(?, is_goal),
                        status = coalesce(?, status),
                        buddy = coalesce(?, buddy),
                        updated_at = {NOW}
                    WHERE id = ?
                    RETURNING {COLUMNS}"#
                ),
                params![
                    title,
                    description,
                    category,
                    visibility,
                    is_goal,
                    status,
                    buddy,
                    goal_id
                ],
                |row| Goal::try_from(row),
            )
            .map_err(|e| e.into())
        })
        .await
        .map_err(db::Error::from)
        .map_err(|e| db::Error::not_found_message(e, "Goal not found"))
        .map_err(Error::from)
        .map_err(|e| e.on_write("Error updating goal"))?;

    tracing::info!(request_id = ctx.request_id(), goal_id = %goal.id, "goal updated");
    Ok(goal)
}

/// Promotes an idea. Repeating it leaves the goal as it is, apart from `updated_at`.
pub async fn convert_goal(goal_id: Uuid, BaseParams { db, ctx }: BaseParams) -> Result<Goal> {
    let goal = db
        .call(move |conn| {
            conn.query_row(
                &format!(
                    r#"UPDATE goals SET is_goal = 1, status = ?, updated_at = {NOW}
                    WHERE id = ?
                    RETURNING {COLUMNS}"#
                ),
                params![CONVERTED_STATUS, goal_id],
                |row| Goal::try_from(row),
            )
            .map_err(|e| e.into())
        })
        .await
        .map_err(db::Error::from)
        .map_err(|e| db::Error::not_found_message(e, "Goal not found"))
        .map_err(Error::from)
        .map_err(|e| e.on_write("Error converting idea to goal"))?;

    tracing::info!(request_id = ctx.request_id(), goal_id = %goal.id, "idea converted to goal");
    Ok(goal)
}

pub async fn assign_buddy(goal_id: Uuid, BaseParams { db, ctx }: BaseParams) -> Result<Goal> {
    let buddy = buddies::random_buddy();

    let goal = db
        .call(move |conn| {
            conn.query_row(
                &format!(
                    r#"UPDATE goals SET buddy = ?, updated_at = {NOW}
                    WHERE id = ?
                    RETURNING {COLUMNS}"#
                ),
                params![buddy, goal_id],
                |row| Goal::try_from(row),
            )
            .map_err(|e| e.into())
        })
        .await
        .map_err(db::Error::from)
        .map_err(|e| db::Error::not_found_message(e, "Goal not found"))
        .map_err(Error::from)
        .map_err(|e| e.on_write("Error assigning buddy"))?;

    tracing::info!(request_id = ctx.request_id(), goal_id = %goal.id, buddy = ?goal.buddy, "buddy assigned");
    Ok(goal)
}

pub async fn delete_goal(goal_id: Uuid, BaseParams { db, ctx }: BaseParams) -> Result<Goal> {
    let goal = db
        .call(move |conn| {
            conn.query_row(
                &format!(
                    r#"DELETE FROM goals
                    WHERE id = ?
                    RETURNING {COLUMNS}"#
                ),
                params![goal_id],
                |row| Goal::try_from(row),
            )
            .map_err(|e| e.into())
        })
        .await
        .map_err(db::Error::from)
        .map_err(|e| db::Error::not_found_message(e, "Goal not found"))
        .map_err(Error::from)
        .map_err(|e| e.on_write("Error deleting goal"))?;

    tracing::info!(request_id = ctx.request_id(), goal_id = %goal.id, "goal deleted");
    Ok(goal)
}
