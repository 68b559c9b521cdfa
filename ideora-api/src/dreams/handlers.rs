use rusqlite::{
    params,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
    Row, ToSql,
};
use uuid::Uuid;

use crate::{
    buddies,
    ctx::BaseParams,
    db::{self, NOW},
    errors::ensure_title,
    guidance::{self, ActionPlan},
    Error, Result,
};

use super::{CreateDream, Dream, DreamFilter, UpdateDream, Visibility};

const COLUMNS: &str = "id, title, visibility, buddy, created_at, updated_at";

impl ToSql for Visibility {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Visibility {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "private" => Ok(Visibility::Private),
            "public" => Ok(Visibility::Public),
            other => Err(FromSqlError::Other(format!("unknown visibility {other:?}").into())),
        }
    }
}

impl<'a> TryFrom<&Row<'a>> for Dream {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'a>) -> std::result::Result<Self, Self::Error> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            visibility: row.get(2)?,
            buddy: row.get(3)?,
            created_at: row.get(4)?,
            updated_at: row.get(5)?,
        })
    }
}

pub async fn find_dreams(DreamFilter { visibility }: DreamFilter, BaseParams { db, .. }: BaseParams) -> Result<Vec<Dream>> {
    db.call(move |conn| {
        let dreams = conn
            .prepare(&format!(
                "SELECT {COLUMNS} FROM dreams WHERE (?1 IS NULL OR visibility = ?1) ORDER BY rowid"
            ))?
            .query_map(params![visibility], |row| Dream::try_from(row))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(dreams)
    })
    .await
    .map_err(db::Error::from)
    .map_err(Error::from)
    .map_err(|e| e.on_read("Error fetching dreams"))
}

pub async fn get_dream(dream_id: Uuid, BaseParams { db, .. }: BaseParams) -> Result<Dream> {
    db.call(move |conn| {
        let dream = conn.query_row(
            &format!("SELECT {COLUMNS} FROM dreams WHERE id = ?"),
            params![dream_id],
            |row| Dream::try_from(row),
        )?;
        Ok(dream)
    })
    .await
    .map_err(db::Error::from)
    .map_err(|e| db::Error::not_found_message(e, "Dream not found"))
    .map_err(Error::from)
    .map_err(|e| e.on_read("Error fetching dream"))
}

pub async fn create_dream(
    CreateDream {
        title,
        visibility,
        buddy,
    }: CreateDream,
    BaseParams { db, ctx }: BaseParams,
) -> Result<Dream> {
    ensure_title(&title)?;

    let visibility = visibility.unwrap_or_default();

    let dream = db
        .call(move |conn| {
            conn.query_row(
                &format!(
                    r#"INSERT INTO dreams (title, visibility, buddy) VALUES (?, ?, ?)
                    RETURNING {COLUMNS}"#
                ),
                params![title, visibility, buddy],
                |row| Dream::try_from(row),
            )
            .map_err(|e| e.into())
        })
        .await
        .map_err(db::Error::from)
        .map_err(Error::from)
        .map_err(|e| e.on_write("Error creating dream"))?;

    tracing::info!(request_id = ctx.request_id(), dream_id = %dream.id, "dream created");
    Ok(dream)
}

pub async fn update_dream(
    dream_id: Uuid,
    UpdateDream {
        title,
        visibility,
        buddy,
    }: UpdateDream,
    BaseParams { db, ctx }: BaseParams,
) -> Result<Dream> {
    if let Some(title) = &title {
        ensure_title(title)?;
    }

    let dream = db
        .call(move |conn| {
            conn.query_row(
                &format!(
                    r#"UPDATE dreams SET
                        title = coalesce(?, title),
                        visibility = coalesce(?, visibility),
                        buddy = coalesce(?, buddy),
                        updated_at = {NOW}
                    WHERE id = ?
                    RETURNING {COLUMNS}"#
                ),
                params![title, visibility, buddy, dream_id],
                |row| Dream::try_from(row),
            )
            .map_err(|e| e.into())
        })
        .await
        .map_err(db::Error::from)
        .map_err(|e| db::Error::not_found_message(e, "Dream not found"))
        .map_err(Error::from)
        .map_err(|e| e.on_write("Error updating dream"))?;

    tracing::info!(request_id = ctx.request_id(), dream_id = %dream.id, "dream updated");
    Ok(dream)
}

pub async fn assign_buddy(dream_id: Uuid, BaseParams { db, ctx }: BaseParams) -> Result<Dream> {
    let buddy = buddies::random_buddy();

    let dream = db
        .call(move |conn| {
            conn.query_row(
                &format!(
                    r#"UPDATE dreams SET buddy = ?, updated_at = {NOW}
                    WHERE id = ?
                    RETURNING {COLUMNS}"#
                ),
                params![buddy, dream_id],
                |row| Dream::try_from(row),
            )
            .map_err(|e| e.into())
        })
        .await
        .map_err(db::Error::from)
        .map_err(|e| db::Error::not_found_message(e, "Dream not found"))
        .map_err(Error::from)
        .map_err(|e| e.on_write("Error assigning buddy"))?;

    tracing::info!(request_id = ctx.request_id(), dream_id = %dream.id, buddy = ?dream.buddy, "buddy assigned");
    Ok(dream)
}

pub async fn action_plan(dream_id: Uuid, base: BaseParams) -> Result<ActionPlan> {
    let dream = get_dream(dream_id, base).await?;

    Ok(ActionPlan {
        dream_id: dream.id,
        steps: guidance::action_steps(&dream.title),
        title: dream.title,
    })
}

pub async fn delete_dream(dream_id: Uuid, BaseParams { db, ctx }: BaseParams) -> Result<Dream> {
    let dream = db
        .call(move |conn| {
            conn.query_row(
                &format!(
                    r#"DELETE FROM dreams
                    WHERE id = ?
                    RETURNING {COLUMNS}"#
                ),
                params![dream_id],
                |row| Dream::try_from(row),
            )
            .map_err(|e| e.into())
        })
        .await
        .map_err(db::Error::from)
        .map_err(|e| db::Error::not_found_message(e, "Dream not found"))
        .map_err(Error::from)
        .map_err(|e| e.on_write("Error deleting dream"))?;

    tracing::info!(request_id = ctx.request_id(), dream_id = %dream.id, "dream deleted");
    Ok(dream)
}
