use std::str::FromStr;

use sqlx::Row;
use sqlx::pool::PoolConnection;
use sqlx::sqlite::{Sqlite, SqliteConnectOptions, SqliteConnection, SqlitePool, SqlitePoolOptions, SqliteRow};

use handle_errors::{Error, ErrorCode};

use crate::types::question::{Question, QuestionId, split_tags};

#[derive(Debug, Clone)]
pub struct Store {
    pub connection: SqlitePool,
}

impl Store {
    pub async fn new(db_url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(db_url)?.create_if_missing(true);
        let db_pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        Ok(Store {
            connection: db_pool,
        })
    }

    pub fn from_pool(pool: SqlitePool) -> Self {
        Store { connection: pool }
    }

    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!().run(&self.connection).await
    }

    /// Checks out a connection for a single request. It goes back to the pool when dropped.
    pub async fn acquire(&self) -> Result<PoolConnection<Sqlite>, Error> {
        self.connection.acquire().await.map_err(database_error)
    }
}

fn database_error(error: sqlx::Error) -> Error {
    tracing::event!(tracing::Level::ERROR, "{:?}", error);
    Error::database("Database error", error, ErrorCode::DatabaseError)
}

fn question_from_row(row: SqliteRow) -> Question {
    let tags: Option<String> = row.get("tags");
    Question {
        id: QuestionId(row.get("id")),
        title: row.get("title"),
        content: row.get("content"),
        tags: split_tags(tags.as_deref()),
    }
}

pub async fn get_question(
    connection: &mut SqliteConnection,
    id: QuestionId,
) -> Result<Option<Question>, Error> {
    sqlx::query("SELECT id, title, content, tags FROM questions WHERE id = ?")
        .bind(id.0)
        .map(question_from_row)
        .fetch_optional(connection)
        .await
        .map_err(database_error)
}

/// Outer `None` means no such question.
pub async fn get_solution(
    connection: &mut SqliteConnection,
    id: QuestionId,
) -> Result<Option<Option<String>>, Error> {
    sqlx::query("SELECT solution FROM questions WHERE id = ?")
        .bind(id.0)
        .map(|row: SqliteRow| row.get::<Option<String>, _>("solution"))
        .fetch_optional(connection)
        .await
        .map_err(database_error)
}

/// Substring match on the raw `tags` column, so "go" also hits "algo".
pub async fn get_questions_by_tag(
    connection: &mut SqliteConnection,
    tag: &str,
    limit: Option<u32>,
) -> Result<Vec<Question>, Error> {
    // a negative LIMIT means no limit in SQLite
    let limit = limit.map(i64::from).unwrap_or(-1);

    sqlx::query("SELECT id, title, content, tags FROM questions WHERE tags LIKE '%' || ? || '%' LIMIT ?")
        .bind(tag)
        .bind(limit)
        .map(question_from_row)
        .fetch_all(connection)
        .await
        .map_err(database_error)
}
