//! Postgres repository implementation using Diesel.
//!
//! ## Features
//!
//! - Connection pooling with r2d2
//! - Automatic retry for transient failures
//! - Automatic migration execution
//!
//! ## Configuration
//!
//! Environment variables:
//! - `DATABASE_URL` or `PG_DATABASE_URL`: Connection string (required)
//! - `PG_POOL_MAX`: Maximum pool size (default: 10)
//! - `PG_POOL_MIN`: Minimum pool size (default: 1)
//! - `PG_CONN_TIMEOUT_SEC`: Connection timeout in seconds (default: 30)
//! - `PG_IDLE_TIMEOUT_SEC`: Idle connection timeout in seconds (default: 600)
//! - `PG_MAX_RETRIES`: Maximum retry attempts for transient failures (default: 3)
//! - `PG_RETRY_DELAY_MS`: Initial retry delay in milliseconds (default: 100)

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::dsl::{count, max, min};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_query;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::time::Duration;
use tokio::task;

use crate::db::repository::{
    AnalyticsRepository, ErrorContext, RepositoryError, RepositoryResult, TicketRepository,
};
use crate::models::{
    NewTicket, Ticket, TicketChanges, TicketCounts, TicketFilter, TicketId, OPEN_STATUS,
};

mod models;
mod schema;

use models::*;
use schema::tickets;

type PgPool = Pool<ConnectionManager<PgConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("src/db/repositories/postgres/migrations");

/// Configuration for connecting to Postgres.
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub database_url: String,
    /// Maximum number of connections in the pool
    pub max_pool_size: u32,
    /// Minimum number of connections in the pool
    pub min_pool_size: u32,
    /// Connection timeout in seconds
    pub connection_timeout_sec: u64,
    /// Idle connection timeout in seconds
    pub idle_timeout_sec: u64,
    /// Maximum number of retry attempts for transient failures
    pub max_retries: u32,
    /// Initial retry delay in milliseconds (doubles with each retry)
    pub retry_delay_ms: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_pool_size: 10,
            min_pool_size: 1,
            connection_timeout_sec: 30,
            idle_timeout_sec: 600,
            max_retries: 3,
            retry_delay_ms: 100,
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

impl PostgresConfig {
    /// Create configuration from environment variables (see module docs).
    pub fn from_env() -> Result<Self, String> {
        let database_url = std::env::var("DATABASE_URL")
            .or_else(|_| std::env::var("PG_DATABASE_URL"))
            .map_err(|_| "DATABASE_URL or PG_DATABASE_URL must be set".to_string())?;

        let defaults = Self::default();
        Ok(Self {
            database_url,
            max_pool_size: env_or("PG_POOL_MAX", defaults.max_pool_size),
            min_pool_size: env_or("PG_POOL_MIN", defaults.min_pool_size),
            connection_timeout_sec: env_or("PG_CONN_TIMEOUT_SEC", defaults.connection_timeout_sec),
            idle_timeout_sec: env_or("PG_IDLE_TIMEOUT_SEC", defaults.idle_timeout_sec),
            max_retries: env_or("PG_MAX_RETRIES", defaults.max_retries),
            retry_delay_ms: env_or("PG_RETRY_DELAY_MS", defaults.retry_delay_ms),
        })
    }

    /// Create a new configuration with a database URL.
    pub fn with_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Default::default()
        }
    }
}

/// Pool health statistics.
#[derive(Debug, Clone, Default)]
pub struct PoolStats {
    /// Number of connections currently in use
    pub connections_in_use: u32,
    /// Number of idle connections
    pub idle_connections: u32,
    /// Maximum pool size
    pub max_size: u32,
}

/// Diesel-backed ticket repository.
#[derive(Clone, Debug)]
pub struct PostgresRepository {
    pool: PgPool,
    config: PostgresConfig,
}

impl PostgresRepository {
    /// Create a new repository and run pending migrations.
    pub fn new(config: PostgresConfig) -> RepositoryResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(&config.database_url);

        let pool = Pool::builder()
            .max_size(config.max_pool_size)
            .min_idle(Some(config.min_pool_size))
            .connection_timeout(Duration::from_secs(config.connection_timeout_sec))
            .idle_timeout(Some(Duration::from_secs(config.idle_timeout_sec)))
            .test_on_check_out(true)
            .build(manager)
            .map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("create_pool")
                        .with_details(format!("max_size={}", config.max_pool_size)),
                )
            })?;

        {
            let mut conn = pool.get().map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("get_connection_for_migrations"),
                )
            })?;
            conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
                RepositoryError::internal_with_context(
                    format!("Migration failed: {}", e),
                    ErrorContext::new("run_migrations"),
                )
            })?;
        }

        log::info!(
            "Postgres repository ready (pool max={}, min={})",
            config.max_pool_size,
            config.min_pool_size
        );
        Ok(Self { pool, config })
    }

    /// Execute a database operation on a pooled connection.
    ///
    /// Runs on the blocking thread pool. Only a failure to check out a
    /// connection is retried, up to `max_retries` times with exponential
    /// backoff; query errors are returned on the first attempt.
    async fn with_conn<T, F>(&self, f: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> RepositoryResult<T> + Send + 'static + Clone,
    {
        let pool = self.pool.clone();
        let max_retries = self.config.max_retries;
        let mut retry_delay = Duration::from_millis(self.config.retry_delay_ms);

        task::spawn_blocking(move || {
            let mut last_error = None;

            for attempt in 0..=max_retries {
                if attempt > 0 {
                    std::thread::sleep(retry_delay);
                    retry_delay *= 2;
                }

                let result = pool
                    .get()
                    .map_err(|e| {
                        RepositoryError::connection_with_context(
                            e.to_string(),
                            ErrorContext::new("get_connection")
                                .with_details(format!("attempt={}", attempt + 1)),
                        )
                    })
                    .and_then(|mut conn| f.clone()(&mut conn));

                match result {
                    Err(e) if e.is_retryable() && attempt < max_retries => {
                        log::warn!("Retrying after transient database error: {}", e);
                        last_error = Some(e);
                    }
                    other => return other,
                }
            }

            Err(last_error.unwrap_or_else(|| {
                RepositoryError::internal("Max retries exceeded with no error captured")
            }))
        })
        .await
        .map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Task join error: {}", e),
                ErrorContext::new("spawn_blocking"),
            )
        })?
    }

    /// Current pool usage, for monitoring.
    pub fn get_pool_stats(&self) -> PoolStats {
        let state = self.pool.state();
        PoolStats {
            connections_in_use: state.connections - state.idle_connections,
            idle_connections: state.idle_connections,
            max_size: self.config.max_pool_size,
        }
    }
}

fn map_diesel_error(err: diesel::result::Error) -> RepositoryError {
    RepositoryError::from(err)
}

/// Escape `LIKE` metacharacters so user input is matched literally.
fn like_pattern(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len() + 2);
    escaped.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

#[async_trait]
impl TicketRepository for PostgresRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        self.with_conn(|conn| {
            sql_query("SELECT 1")
                .execute(conn)
                .map(|_| true)
                .map_err(map_diesel_error)
        })
        .await
    }

    async fn create_ticket(&self, ticket: NewTicket) -> RepositoryResult<Ticket> {
        let row = NewTicketRow::from(ticket);
        self.with_conn(move |conn| {
            diesel::insert_into(tickets::table)
                .values(&row)
                .returning(TicketRow::as_returning())
                .get_result::<TicketRow>(conn)
                .map_err(|e| map_diesel_error(e).with_operation("create_ticket"))?
                .into_ticket()
        })
        .await
    }

    async fn get_ticket(&self, id: TicketId) -> RepositoryResult<Ticket> {
        self.with_conn(move |conn| {
            tickets::table
                .find(id.value())
                .select(TicketRow::as_select())
                .first::<TicketRow>(conn)
                .optional()
                .map_err(map_diesel_error)?
                .ok_or_else(|| RepositoryError::ticket_not_found("get_ticket", id))?
                .into_ticket()
        })
        .await
    }

    async fn list_tickets(&self, filter: &TicketFilter) -> RepositoryResult<Vec<Ticket>> {
        let filter = filter.clone();
        self.with_conn(move |conn| {
            let mut query = tickets::table.select(TicketRow::as_select()).into_boxed();

            if let Some(category) = filter.category {
                query = query.filter(tickets::category.eq(category.as_str()));
            }
            if let Some(priority) = filter.priority {
                query = query.filter(tickets::priority.eq(priority.as_str()));
            }
            if let Some(status) = filter.status.clone() {
                query = query.filter(tickets::status.eq(status));
            }
            if let Some(search) = filter.search.as_deref() {
                let pattern = like_pattern(search);
                query = query.filter(
                    tickets::title
                        .ilike(pattern.clone())
                        .or(tickets::description.ilike(pattern)),
                );
            }

            let rows = query
                .order((tickets::created_at.desc(), tickets::id.desc()))
                .load::<TicketRow>(conn)
                .map_err(|e| map_diesel_error(e).with_operation("list_tickets"))?;

            rows.into_iter().map(TicketRow::into_ticket).collect()
        })
        .await
    }

    async fn update_ticket(
        &self,
        id: TicketId,
        changes: TicketChanges,
    ) -> RepositoryResult<Ticket> {
        if changes.is_empty() {
            // Diesel rejects an empty changeset; an empty update is a read.
            return self.get_ticket(id).await;
        }

        let changeset = TicketChangeset::from(changes);
        self.with_conn(move |conn| {
            diesel::update(tickets::table.find(id.value()))
                .set(&changeset)
                .returning(TicketRow::as_returning())
                .get_result::<TicketRow>(conn)
                .optional()
                .map_err(|e| map_diesel_error(e).with_operation("update_ticket"))?
                .ok_or_else(|| RepositoryError::ticket_not_found("update_ticket", id))?
                .into_ticket()
        })
        .await
    }

    async fn delete_ticket(&self, id: TicketId) -> RepositoryResult<()> {
        self.with_conn(move |conn| {
            let deleted = diesel::delete(tickets::table.find(id.value()))
                .execute(conn)
                .map_err(|e| map_diesel_error(e).with_operation("delete_ticket"))?;
            if deleted == 0 {
                return Err(RepositoryError::ticket_not_found("delete_ticket", id));
            }
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl AnalyticsRepository for PostgresRepository {
    async fn ticket_counts(&self) -> RepositoryResult<TicketCounts> {
        self.with_conn(|conn| {
            conn.transaction(|tx| {
                let total: i64 = tickets::table.count().get_result(tx)?;
                let open: i64 = tickets::table
                    .filter(tickets::status.eq(OPEN_STATUS))
                    .count()
                    .get_result(tx)?;
                let (first_created_at, last_created_at): (
                    Option<DateTime<Utc>>,
                    Option<DateTime<Utc>>,
                ) = tickets::table
                    .select((min(tickets::created_at), max(tickets::created_at)))
                    .first(tx)?;
                let by_priority: Vec<(String, i64)> = tickets::table
                    .group_by(tickets::priority)
                    .select((tickets::priority, count(tickets::id)))
                    .load(tx)?;
                let by_category: Vec<(String, i64)> = tickets::table
                    .group_by(tickets::category)
                    .select((tickets::category, count(tickets::id)))
                    .load(tx)?;

                Ok(TicketCounts {
                    total,
                    open,
                    first_created_at,
                    last_created_at,
                    by_priority,
                    by_category,
                })
            })
            .map_err(|e: diesel::result::Error| map_diesel_error(e).with_operation("ticket_counts"))
        })
        .await
    }
}
