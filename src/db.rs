use std::str::FromStr;

use anyhow::Context;
use chrono::{Duration, NaiveDate};
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::{ConnectOptions, Connection, Row};
use tracing::{debug, info};

use crate::models::{ChangeBucket, DailyActiveUsers, ItemChangeCount};

const SEED_USERS: i64 = 30;
const SEED_CARDS: i64 = 40;
const SEED_STATUSES: [&str; 3] = ["backlog", "in-progress", "complete"];

/// Opens the event store for analysis. The handle never writes.
pub async fn open_read_only(database_url: &str) -> anyhow::Result<SqliteConnection> {
    let options = SqliteConnectOptions::from_str(database_url)
        .with_context(|| format!("invalid database url {database_url}"))?
        .read_only(true);

    let conn = options
        .connect()
        .await
        .with_context(|| format!("failed to open {database_url}"))?;
    info!(database_url, "opened event store read-only");
    Ok(conn)
}

/// Opens the event store for schema setup and seeding, creating the file when missing.
pub async fn open_for_setup(database_url: &str) -> anyhow::Result<SqliteConnection> {
    let options = SqliteConnectOptions::from_str(database_url)
        .with_context(|| format!("invalid database url {database_url}"))?
        .create_if_missing(true);

    options
        .connect()
        .await
        .with_context(|| format!("failed to open {database_url}"))
}

pub async fn init_db(conn: &mut SqliteConnection) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(&mut *conn).await?;
    Ok(())
}

/// Inserts a deterministic demo data set around `release_date`. Returns the
/// number of inserted rows, or zero when the store already holds events.
pub async fn seed(
    conn: &mut SqliteConnection,
    release_date: NaiveDate,
) -> anyhow::Result<usize> {
    let existing: i64 = sqlx::query(
        r#"
        SELECT (SELECT COUNT(*) FROM login_history)
             + (SELECT COUNT(*) FROM card_change_history) AS total
        "#,
    )
    .fetch_one(&mut *conn)
    .await?
    .try_get("total")?;

    if existing > 0 {
        info!(existing, "event tables already populated, skipping seed");
        return Ok(0);
    }

    let start = release_date - Duration::days(121);
    let end = release_date + Duration::days(90);
    let release_ts = midnight_utc(release_date);
    let mut inserted = 0usize;
    let mut tx = conn.begin().await?;

    let mut day = start;
    let mut day_index = 0i64;
    while day <= end {
        let threshold = if day < release_date { 3 } else { 5 };
        for user_id in 1..=SEED_USERS {
            if (user_id * 7 + day_index * 3) % 10 >= threshold {
                continue;
            }
            let login_timestamp = midnight_utc(day) + (user_id * 2_221) % 86_400;
            sqlx::query("INSERT INTO login_history (user_id, login_timestamp) VALUES (?, ?)")
                .bind(user_id)
                .bind(login_timestamp)
                .execute(&mut *tx)
                .await?;
            inserted += 1;
        }
        day += Duration::days(1);
        day_index += 1;
    }

    for card_id in 1..=SEED_CARDS {
        let created_at = release_ts + card_id * 3_600;
        let creation_status = if card_id % 2 == 0 { None } else { Some("") };
        sqlx::query(
            r#"
            INSERT INTO card_change_history (cardID, oldStatus, newStatus, timestamp)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(card_id)
        .bind(creation_status)
        .bind(SEED_STATUSES[0])
        .bind(created_at)
        .execute(&mut *tx)
        .await?;
        inserted += 1;

        let changes = card_id % 6 + 1;
        for step in 0..changes {
            let from = SEED_STATUSES[(step % 3) as usize];
            let to = SEED_STATUSES[((step + 1) % 3) as usize];
            sqlx::query(
                r#"
                INSERT INTO card_change_history (cardID, oldStatus, newStatus, timestamp)
                VALUES (?, ?, ?, ?)
                "#,
            )
            .bind(card_id)
            .bind(from)
            .bind(to)
            .bind(created_at + (step + 1) * 600)
            .execute(&mut *tx)
            .await?;
            inserted += 1;
        }
    }

    tx.commit().await?;
    Ok(inserted)
}

pub async fn fetch_daily_active_users(
    conn: &mut SqliteConnection,
) -> anyhow::Result<Vec<DailyActiveUsers>> {
    let rows = sqlx::query(
        r#"
        SELECT
            date(login_timestamp, 'unixepoch') AS login_date,
            COUNT(DISTINCT user_id) AS daily_active_users,
            MIN(login_timestamp) AS first_login_at
        FROM login_history
        GROUP BY login_date
        ORDER BY login_date
        "#,
    )
    .fetch_all(&mut *conn)
    .await
    .context("failed to query daily active users")?;

    let mut days = Vec::with_capacity(rows.len());
    for row in rows {
        days.push(DailyActiveUsers {
            date: row.try_get("login_date")?,
            active_users: row.try_get("daily_active_users")?,
            first_login_at: row.try_get("first_login_at")?,
        });
    }

    debug!(days = days.len(), "fetched daily active users");
    Ok(days)
}

pub async fn fetch_changes_by_item(
    conn: &mut SqliteConnection,
) -> anyhow::Result<Vec<ItemChangeCount>> {
    let rows = sqlx::query(
        r#"
        SELECT
            cardID AS item_id,
            COUNT(*) AS total_status_changes
        FROM card_change_history
        WHERE oldStatus IS NOT NULL AND oldStatus != ''
        GROUP BY cardID
        ORDER BY total_status_changes DESC, cardID ASC
        "#,
    )
    .fetch_all(&mut *conn)
    .await
    .context("failed to query status changes per card")?;

    let mut totals = Vec::with_capacity(rows.len());
    for row in rows {
        totals.push(ItemChangeCount {
            item_id: row.try_get("item_id")?,
            total_changes: row.try_get("total_status_changes")?,
        });
    }

    debug!(items = totals.len(), "fetched status changes per card");
    Ok(totals)
}

pub async fn fetch_change_distribution(
    conn: &mut SqliteConnection,
) -> anyhow::Result<Vec<ChangeBucket>> {
    let rows = sqlx::query(
        r#"
        SELECT
            total_status_changes,
            COUNT(*) AS number_of_cards
        FROM (
            SELECT cardID, COUNT(*) AS total_status_changes
            FROM card_change_history
            WHERE oldStatus IS NOT NULL AND oldStatus != ''
            GROUP BY cardID
        )
        GROUP BY total_status_changes
        ORDER BY total_status_changes
        "#,
    )
    .fetch_all(&mut *conn)
    .await
    .context("failed to query status change distribution")?;

    let mut buckets = Vec::with_capacity(rows.len());
    for row in rows {
        buckets.push(ChangeBucket {
            total_changes: row.try_get("total_status_changes")?,
            item_count: row.try_get("number_of_cards")?,
        });
    }

    debug!(buckets = buckets.len(), "fetched status change distribution");
    Ok(buckets)
}

fn midnight_utc(date: NaiveDate) -> i64 {
    date.and_time(chrono::NaiveTime::MIN).and_utc().timestamp()
}
