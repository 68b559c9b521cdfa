use lazy_static::lazy_static;
use rusqlite_migration::{Migrations, M};

lazy_static! {
    pub static ref MIGRATIONS: Migrations<'static> = Migrations::new(vec![
        M::up(
            r#"
            CREATE TABLE dreams (
                id BLOB PRIMARY KEY CHECK(length(id) = 16) NOT NULL UNIQUE DEFAULT (uuid7_now()),

                title TEXT NOT NULL CHECK(length(title) > 0),
                visibility TEXT NOT NULL DEFAULT 'private' CHECK(visibility IN ('private', 'public')),
                buddy TEXT,

                created_at DATETIME NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now')),
                updated_at DATETIME
            );
        "#
        ),
        M::up(
            r#"
            CREATE TABLE goals (
                id BLOB PRIMARY KEY CHECK(length(id) = 16) NOT NULL UNIQUE DEFAULT (uuid7_now()),

                title TEXT NOT NULL CHECK(length(title) > 0),
                description TEXT,
                category TEXT NOT NULL DEFAULT 'General',
                visibility TEXT NOT NULL DEFAULT 'private', -- free text, unlike dreams
                is_goal INTEGER NOT NULL DEFAULT 0,
                status TEXT,

                created_at DATETIME NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now')),
                updated_at DATETIME
            );
        "#
        ),
        M::up("ALTER TABLE goals ADD COLUMN buddy TEXT;"),
    ]);
}
