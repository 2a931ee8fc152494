//! Postgres repository implementation using Diesel.
//!
//! Implements the repository traits against PostgreSQL. Conflict-guarded
//! reservation writes run the overlap scan and the row write inside a
//! SERIALIZABLE transaction; a partial unique index on active rows backs the
//! guard up at the schema level.
//!
//! ## Features
//!
//! - Connection pooling with r2d2
//! - Automatic retry for transient failures
//! - Connection health monitoring
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
use chrono::{NaiveDate, NaiveTime, Utc};
use diesel::dsl::count_star;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_query;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::task;

use crate::booking::{self, ConflictInfo, TimeRange};
use crate::db::repository::{
    ClientRepository, CourtRepository, GuardedWrite, PaymentRepository, ReportingRepository,
    RepositoryError, RepositoryResult, ReservationFact, ReservationRepository, SystemRepository,
    TournamentRepository,
};
use crate::models::{
    Client, ClientId, Court, CourtId, NewClient, NewCourt, NewPayment, NewReservation,
    NewTournament, Payment, PaymentFilter, PaymentId, Reservation, ReservationFilter,
    ReservationId, ReservationStatus, ReservationUpdate, SlotId, SlotTemplate, TimeSlot,
    Tournament, TournamentId,
};

mod models;
mod schema;

use models::*;
use schema::*;

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

impl PostgresConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    /// - `DATABASE_URL` or `PG_DATABASE_URL`: Connection string (required)
    /// - `PG_POOL_MAX`: Maximum pool size (default: 10)
    /// - `PG_POOL_MIN`: Minimum pool size (default: 1)
    /// - `PG_CONN_TIMEOUT_SEC`: Connection timeout in seconds (default: 30)
    /// - `PG_IDLE_TIMEOUT_SEC`: Idle connection timeout in seconds (default: 600)
    /// - `PG_MAX_RETRIES`: Maximum retry attempts (default: 3)
    /// - `PG_RETRY_DELAY_MS`: Initial retry delay in milliseconds (default: 100)
    pub fn from_env() -> Result<Self, String> {
        let database_url = std::env::var("DATABASE_URL")
            .or_else(|_| std::env::var("PG_DATABASE_URL"))
            .map_err(|_| "DATABASE_URL or PG_DATABASE_URL must be set".to_string())?;

        let max_pool_size = std::env::var("PG_POOL_MAX")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(10);

        let min_pool_size = std::env::var("PG_POOL_MIN")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(1);

        let connection_timeout_sec = std::env::var("PG_CONN_TIMEOUT_SEC")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(30);

        let idle_timeout_sec = std::env::var("PG_IDLE_TIMEOUT_SEC")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(600);

        let max_retries = std::env::var("PG_MAX_RETRIES")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(3);

        let retry_delay_ms = std::env::var("PG_RETRY_DELAY_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(100);

        Ok(Self {
            database_url,
            max_pool_size,
            min_pool_size,
            connection_timeout_sec,
            idle_timeout_sec,
            max_retries,
            retry_delay_ms,
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
    /// Total number of connections in the pool
    pub total_connections: u32,
    /// Maximum pool size
    pub max_size: u32,
    /// Total successful queries executed
    pub total_queries: u64,
    /// Total failed queries
    pub failed_queries: u64,
    /// Total retried operations
    pub retried_operations: u64,
}

/// Diesel-backed repository for Postgres.
///
/// Provides connection pooling with configurable limits, automatic retry for
/// transient failures, and automatic schema migrations on startup.
#[derive(Clone, Debug)]
pub struct PostgresRepository {
    pool: PgPool,
    config: PostgresConfig,
    // Metrics counters
    total_queries: std::sync::Arc<AtomicU64>,
    failed_queries: std::sync::Arc<AtomicU64>,
    retried_operations: std::sync::Arc<AtomicU64>,
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
            .map_err(|e| RepositoryError::connection(e.to_string()).with_operation("create_pool"))?;

        // Run migrations once during initialization
        {
            let mut conn = pool.get().map_err(|e| {
                RepositoryError::connection(e.to_string())
                    .with_operation("get_connection_for_migrations")
            })?;
            Self::run_migrations(&mut conn)?;
        }

        let repo = Self {
            pool,
            config,
            total_queries: std::sync::Arc::new(AtomicU64::new(0)),
            failed_queries: std::sync::Arc::new(AtomicU64::new(0)),
            retried_operations: std::sync::Arc::new(AtomicU64::new(0)),
        };

        let stats = repo.get_pool_stats();
        tracing::debug!(
            total = stats.total_connections,
            idle = stats.idle_connections,
            max = stats.max_size,
            "postgres connection pool initialised"
        );

        Ok(repo)
    }

    /// Run pending database migrations.
    fn run_migrations(conn: &mut PgConnection) -> RepositoryResult<()> {
        conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
            RepositoryError::internal(format!("Migration failed: {}", e))
                .with_operation("run_migrations")
        })?;

        Ok(())
    }

    /// Execute a database operation with automatic retry for transient failures.
    ///
    /// Retries up to `max_retries` times when a retryable error occurs
    /// (connection loss, timeouts, serialization failures). Each retry reruns
    /// the closure on a fresh connection, so guarded writes re-read committed
    /// state before deciding again.
    async fn with_conn<T, F>(&self, f: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> RepositoryResult<T> + Send + 'static + Clone,
    {
        let pool = self.pool.clone();
        let max_retries = self.config.max_retries;
        let retry_delay_ms = self.config.retry_delay_ms;
        let total_queries = self.total_queries.clone();
        let failed_queries = self.failed_queries.clone();
        let retried_operations = self.retried_operations.clone();

        task::spawn_blocking(move || {
            let mut last_error = None;
            let mut retry_delay = Duration::from_millis(retry_delay_ms);

            for attempt in 0..=max_retries {
                if attempt > 0 {
                    retried_operations.fetch_add(1, Ordering::Relaxed);
                    std::thread::sleep(retry_delay);
                    retry_delay *= 2; // Exponential backoff
                }

                // Get connection
                let mut conn = match pool.get() {
                    Ok(c) => c,
                    Err(e) => {
                        let err = RepositoryError::from(e).with_operation("get_connection");
                        if attempt < max_retries {
                            last_error = Some(err);
                            continue;
                        }
                        failed_queries.fetch_add(1, Ordering::Relaxed);
                        return Err(err);
                    }
                };

                // Execute the operation
                total_queries.fetch_add(1, Ordering::Relaxed);
                match f.clone()(&mut conn) {
                    Ok(result) => return Ok(result),
                    Err(e) if e.is_retryable() && attempt < max_retries => {
                        last_error = Some(e);
                        continue;
                    }
                    Err(e) => {
                        failed_queries.fetch_add(1, Ordering::Relaxed);
                        return Err(e);
                    }
                }
            }

            failed_queries.fetch_add(1, Ordering::Relaxed);
            Err(last_error.unwrap_or_else(|| {
                RepositoryError::internal("Max retries exceeded with no error captured")
            }))
        })
        .await
        .map_err(|e| {
            RepositoryError::internal(format!("Task join error: {}", e))
                .with_operation("spawn_blocking")
        })?
    }

    /// Get pool health statistics.
    pub fn get_pool_stats(&self) -> PoolStats {
        let state = self.pool.state();
        PoolStats {
            connections_in_use: state.connections - state.idle_connections,
            idle_connections: state.idle_connections,
            total_connections: state.connections,
            max_size: self.config.max_pool_size,
            total_queries: self.total_queries.load(Ordering::Relaxed),
            failed_queries: self.failed_queries.load(Ordering::Relaxed),
            retried_operations: self.retried_operations.load(Ordering::Relaxed),
        }
    }

    /// Check if the database connection is healthy.
    pub async fn is_healthy(&self) -> bool {
        self.health_check().await.is_ok()
    }

    /// Resolve the active reservation occupying the given interval, if any.
    /// Used after a backstop index rejection to report the winning row.
    async fn find_overlap(
        &self,
        court_id: CourtId,
        date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
        exclude: Option<ReservationId>,
    ) -> RepositoryResult<Option<ConflictInfo>> {
        self.with_conn(move |conn| {
            let range = stored_range(start_time, end_time)?;
            let existing = load_court_day(conn, court_id, date)?;
            Ok(booking::find_conflict(&range, exclude, &existing)
                .map(ConflictInfo::for_reservation))
        })
        .await
    }
}

fn map_diesel_error(err: diesel::result::Error) -> RepositoryError {
    RepositoryError::from(err)
}

/// Replace a database-level conflict report (unique or foreign key violation
/// message) with a domain-level one, keeping other errors untouched.
fn conflict_message(err: RepositoryError, entity: &str, message: &str) -> RepositoryError {
    if err.is_conflict() {
        RepositoryError::conflict(entity, message)
    } else {
        err
    }
}

/// Interval sanity re-check at the storage boundary; the service layer has
/// already validated the pair.
fn stored_range(start: NaiveTime, end: NaiveTime) -> RepositoryResult<TimeRange> {
    TimeRange::new(start, end).map_err(|e| RepositoryError::validation(e.to_string()))
}

fn row_to_client(row: ClientRow) -> Client {
    Client {
        id: ClientId(row.client_id),
        first_name: row.first_name,
        last_name: row.last_name,
        phone: row.phone,
        email: row.email,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

fn row_to_court(row: CourtRow) -> RepositoryResult<Court> {
    let kind = row.court_kind.parse().map_err(|e| {
        RepositoryError::internal(format!("stored court {} is corrupt: {e}", row.court_id))
    })?;
    Ok(Court {
        id: CourtId(row.court_id),
        name: row.court_name,
        kind,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn row_to_slot(row: SlotRow) -> TimeSlot {
    TimeSlot {
        id: SlotId(row.slot_id),
        court_id: CourtId(row.court_id),
        start_time: row.start_time,
        end_time: row.end_time,
        open: row.is_open,
        created_at: row.created_at,
    }
}

fn row_to_reservation(row: ReservationRow) -> RepositoryResult<Reservation> {
    let status: ReservationStatus = row.status.parse().map_err(|e| {
        RepositoryError::internal(format!(
            "stored reservation {} is corrupt: {e}",
            row.reservation_id
        ))
    })?;
    Ok(Reservation {
        id: ReservationId(row.reservation_id),
        client_id: ClientId(row.client_id),
        court_id: CourtId(row.court_id),
        date: row.reserved_on,
        start_time: row.start_time,
        end_time: row.end_time,
        status,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn row_to_tournament(row: TournamentRow) -> Tournament {
    Tournament {
        id: TournamentId(row.tournament_id),
        name: row.tournament_name,
        starts_on: row.starts_on,
        ends_on: row.ends_on,
        description: row.description,
        created_at: row.created_at,
    }
}

fn row_to_payment(row: PaymentRow) -> RepositoryResult<Payment> {
    let status = row.status.parse().map_err(|e| {
        RepositoryError::internal(format!("stored payment {} is corrupt: {e}", row.payment_id))
    })?;
    Ok(Payment {
        id: PaymentId(row.payment_id),
        reservation_id: ReservationId(row.reservation_id),
        amount: row.amount,
        status,
        paid_on: row.paid_on,
        created_at: row.created_at,
    })
}

fn ensure_client_exists(conn: &mut PgConnection, id: ClientId) -> RepositoryResult<()> {
    let count: i64 = clients::table
        .filter(clients::client_id.eq(id.value()))
        .select(count_star())
        .first(conn)
        .map_err(map_diesel_error)?;
    if count == 0 {
        return Err(RepositoryError::not_found("client", id));
    }
    Ok(())
}

fn ensure_court_exists(conn: &mut PgConnection, id: CourtId) -> RepositoryResult<()> {
    let count: i64 = courts::table
        .filter(courts::court_id.eq(id.value()))
        .select(count_star())
        .first(conn)
        .map_err(map_diesel_error)?;
    if count == 0 {
        return Err(RepositoryError::not_found("court", id));
    }
    Ok(())
}

fn ensure_tournament_exists(conn: &mut PgConnection, id: TournamentId) -> RepositoryResult<()> {
    let count: i64 = tournaments::table
        .filter(tournaments::tournament_id.eq(id.value()))
        .select(count_star())
        .first(conn)
        .map_err(map_diesel_error)?;
    if count == 0 {
        return Err(RepositoryError::not_found("tournament", id));
    }
    Ok(())
}

/// Every reservation of one court/date partition, all statuses, ordered by
/// start time. This is the read feeding the overlap decision.
fn load_court_day(
    conn: &mut PgConnection,
    court_id: CourtId,
    date: NaiveDate,
) -> RepositoryResult<Vec<Reservation>> {
    let rows = reservations::table
        .filter(reservations::court_id.eq(court_id.value()))
        .filter(reservations::reserved_on.eq(date))
        .order((
            reservations::start_time.asc(),
            reservations::reservation_id.asc(),
        ))
        .select(ReservationRow::as_select())
        .load::<ReservationRow>(conn)
        .map_err(map_diesel_error)?;
    rows.into_iter().map(row_to_reservation).collect()
}

#[async_trait]
impl ClientRepository for PostgresRepository {
    async fn store_client(&self, new: NewClient) -> RepositoryResult<Client> {
        let conflict = format!("email {} already registered", new.email);
        let result = self
            .with_conn(move |conn| {
                let row: ClientRow = diesel::insert_into(clients::table)
                    .values(&NewClientRow {
                        first_name: new.first_name.clone(),
                        last_name: new.last_name.clone(),
                        phone: new.phone.clone(),
                        email: new.email.clone(),
                    })
                    .returning(ClientRow::as_returning())
                    .get_result(conn)
                    .map_err(map_diesel_error)?;
                Ok(row_to_client(row))
            })
            .await;
        result.map_err(|e| conflict_message(e, "client", &conflict).with_operation("store_client"))
    }

    async fn fetch_client(&self, id: ClientId) -> RepositoryResult<Client> {
        self.with_conn(move |conn| {
            let row = clients::table
                .filter(clients::client_id.eq(id.value()))
                .select(ClientRow::as_select())
                .first::<ClientRow>(conn)
                .optional()
                .map_err(map_diesel_error)?
                .ok_or_else(|| RepositoryError::not_found("client", id))?;
            Ok(row_to_client(row))
        })
        .await
        .map_err(|e| e.with_operation("fetch_client"))
    }

    async fn fetch_clients(&self) -> RepositoryResult<Vec<Client>> {
        self.with_conn(|conn| {
            let rows = clients::table
                .order(clients::client_id.asc())
                .select(ClientRow::as_select())
                .load::<ClientRow>(conn)
                .map_err(map_diesel_error)?;
            Ok(rows.into_iter().map(row_to_client).collect())
        })
        .await
    }

    async fn update_client(&self, id: ClientId, fields: NewClient) -> RepositoryResult<Client> {
        let conflict = format!("email {} already registered", fields.email);
        let result = self
            .with_conn(move |conn| {
                let row: ClientRow =
                    diesel::update(clients::table.filter(clients::client_id.eq(id.value())))
                        .set((
                            clients::first_name.eq(fields.first_name.clone()),
                            clients::last_name.eq(fields.last_name.clone()),
                            clients::phone.eq(fields.phone.clone()),
                            clients::email.eq(fields.email.clone()),
                            clients::updated_at.eq(Utc::now()),
                        ))
                        .returning(ClientRow::as_returning())
                        .get_result(conn)
                        .optional()
                        .map_err(map_diesel_error)?
                        .ok_or_else(|| RepositoryError::not_found("client", id))?;
                Ok(row_to_client(row))
            })
            .await;
        result.map_err(|e| conflict_message(e, "client", &conflict).with_operation("update_client"))
    }

    async fn delete_client(&self, id: ClientId) -> RepositoryResult<()> {
        self.with_conn(move |conn| {
            conn.transaction(|tx| {
                let referenced: i64 = reservations::table
                    .filter(reservations::client_id.eq(id.value()))
                    .select(count_star())
                    .first(tx)
                    .map_err(map_diesel_error)?;
                if referenced > 0 {
                    return Err(RepositoryError::conflict(
                        "client",
                        format!("client {id} still has reservations"),
                    ));
                }
                let deleted =
                    diesel::delete(clients::table.filter(clients::client_id.eq(id.value())))
                        .execute(tx)
                        .map_err(map_diesel_error)?;
                if deleted == 0 {
                    return Err(RepositoryError::not_found("client", id));
                }
                Ok(())
            })
        })
        .await
        .map_err(|e| e.with_operation("delete_client"))
    }
}

#[async_trait]
impl CourtRepository for PostgresRepository {
    async fn store_court(
        &self,
        new: NewCourt,
        slots: Vec<SlotTemplate>,
    ) -> RepositoryResult<Court> {
        let conflict = format!("court name '{}' already in use", new.name);
        let result = self
            .with_conn(move |conn| {
                conn.transaction(|tx| {
                    let row: CourtRow = diesel::insert_into(courts::table)
                        .values(&NewCourtRow {
                            court_name: new.name.clone(),
                            court_kind: new.kind.as_str().to_string(),
                        })
                        .returning(CourtRow::as_returning())
                        .get_result(tx)
                        .map_err(map_diesel_error)?;

                    let slot_rows: Vec<NewSlotRow> = slots
                        .iter()
                        .map(|s| NewSlotRow {
                            court_id: row.court_id,
                            start_time: s.start_time,
                            end_time: s.end_time,
                            is_open: s.open,
                        })
                        .collect();
                    if !slot_rows.is_empty() {
                        diesel::insert_into(court_slots::table)
                            .values(&slot_rows)
                            .execute(tx)
                            .map_err(map_diesel_error)?;
                    }

                    row_to_court(row)
                })
            })
            .await;
        result.map_err(|e| conflict_message(e, "court", &conflict).with_operation("store_court"))
    }

    async fn fetch_court(&self, id: CourtId) -> RepositoryResult<Court> {
        self.with_conn(move |conn| {
            let row = courts::table
                .filter(courts::court_id.eq(id.value()))
                .select(CourtRow::as_select())
                .first::<CourtRow>(conn)
                .optional()
                .map_err(map_diesel_error)?
                .ok_or_else(|| RepositoryError::not_found("court", id))?;
            row_to_court(row)
        })
        .await
        .map_err(|e| e.with_operation("fetch_court"))
    }

    async fn fetch_courts(&self) -> RepositoryResult<Vec<Court>> {
        self.with_conn(|conn| {
            let rows = courts::table
                .order(courts::court_name.asc())
                .select(CourtRow::as_select())
                .load::<CourtRow>(conn)
                .map_err(map_diesel_error)?;
            rows.into_iter().map(row_to_court).collect()
        })
        .await
    }

    async fn update_court(&self, id: CourtId, fields: NewCourt) -> RepositoryResult<Court> {
        let conflict = format!("court name '{}' already in use", fields.name);
        let result = self
            .with_conn(move |conn| {
                let row: CourtRow =
                    diesel::update(courts::table.filter(courts::court_id.eq(id.value())))
                        .set((
                            courts::court_name.eq(fields.name.clone()),
                            courts::court_kind.eq(fields.kind.as_str()),
                            courts::updated_at.eq(Utc::now()),
                        ))
                        .returning(CourtRow::as_returning())
                        .get_result(conn)
                        .optional()
                        .map_err(map_diesel_error)?
                        .ok_or_else(|| RepositoryError::not_found("court", id))?;
                row_to_court(row)
            })
            .await;
        result.map_err(|e| conflict_message(e, "court", &conflict).with_operation("update_court"))
    }

    async fn delete_court(&self, id: CourtId) -> RepositoryResult<()> {
        self.with_conn(move |conn| {
            conn.transaction(|tx| {
                let referenced: i64 = reservations::table
                    .filter(reservations::court_id.eq(id.value()))
                    .select(count_star())
                    .first(tx)
                    .map_err(map_diesel_error)?;
                if referenced > 0 {
                    return Err(RepositoryError::conflict(
                        "court",
                        format!("court {id} still has reservations"),
                    ));
                }
                // Slot rows and tournament links go with the court via
                // ON DELETE CASCADE.
                let deleted =
                    diesel::delete(courts::table.filter(courts::court_id.eq(id.value())))
                        .execute(tx)
                        .map_err(map_diesel_error)?;
                if deleted == 0 {
                    return Err(RepositoryError::not_found("court", id));
                }
                Ok(())
            })
        })
        .await
        .map_err(|e| e.with_operation("delete_court"))
    }

    async fn fetch_slots(&self, court_id: CourtId) -> RepositoryResult<Vec<TimeSlot>> {
        self.with_conn(move |conn| {
            ensure_court_exists(conn, court_id)?;
            let rows = court_slots::table
                .filter(court_slots::court_id.eq(court_id.value()))
                .order((court_slots::start_time.asc(), court_slots::slot_id.asc()))
                .select(SlotRow::as_select())
                .load::<SlotRow>(conn)
                .map_err(map_diesel_error)?;
            Ok(rows.into_iter().map(row_to_slot).collect())
        })
        .await
        .map_err(|e| e.with_operation("fetch_slots"))
    }

    async fn fetch_slot(&self, id: SlotId) -> RepositoryResult<TimeSlot> {
        self.with_conn(move |conn| {
            let row = court_slots::table
                .filter(court_slots::slot_id.eq(id.value()))
                .select(SlotRow::as_select())
                .first::<SlotRow>(conn)
                .optional()
                .map_err(map_diesel_error)?
                .ok_or_else(|| RepositoryError::not_found("slot", id))?;
            Ok(row_to_slot(row))
        })
        .await
        .map_err(|e| e.with_operation("fetch_slot"))
    }

    async fn store_slot(
        &self,
        court_id: CourtId,
        slot: SlotTemplate,
    ) -> RepositoryResult<TimeSlot> {
        self.with_conn(move |conn| {
            ensure_court_exists(conn, court_id)?;
            let row: SlotRow = diesel::insert_into(court_slots::table)
                .values(&NewSlotRow {
                    court_id: court_id.value(),
                    start_time: slot.start_time,
                    end_time: slot.end_time,
                    is_open: slot.open,
                })
                .returning(SlotRow::as_returning())
                .get_result(conn)
                .map_err(map_diesel_error)?;
            Ok(row_to_slot(row))
        })
        .await
        .map_err(|e| e.with_operation("store_slot"))
    }

    async fn update_slot(&self, id: SlotId, fields: SlotTemplate) -> RepositoryResult<TimeSlot> {
        self.with_conn(move |conn| {
            let row: SlotRow =
                diesel::update(court_slots::table.filter(court_slots::slot_id.eq(id.value())))
                    .set((
                        court_slots::start_time.eq(fields.start_time),
                        court_slots::end_time.eq(fields.end_time),
                        court_slots::is_open.eq(fields.open),
                    ))
                    .returning(SlotRow::as_returning())
                    .get_result(conn)
                    .optional()
                    .map_err(map_diesel_error)?
                    .ok_or_else(|| RepositoryError::not_found("slot", id))?;
            Ok(row_to_slot(row))
        })
        .await
        .map_err(|e| e.with_operation("update_slot"))
    }

    async fn delete_slot(&self, id: SlotId) -> RepositoryResult<()> {
        self.with_conn(move |conn| {
            let deleted =
                diesel::delete(court_slots::table.filter(court_slots::slot_id.eq(id.value())))
                    .execute(conn)
                    .map_err(map_diesel_error)?;
            if deleted == 0 {
                return Err(RepositoryError::not_found("slot", id));
            }
            Ok(())
        })
        .await
        .map_err(|e| e.with_operation("delete_slot"))
    }
}

#[async_trait]
impl ReservationRepository for PostgresRepository {
    async fn store_reservation_checked(
        &self,
        new: NewReservation,
    ) -> RepositoryResult<GuardedWrite> {
        let attempt = self
            .with_conn(move |conn| {
                // SERIALIZABLE keeps the scan and the insert one atomic unit.
                // Of two racing writers one aborts with a serialization
                // failure, is rerun by `with_conn`, and then observes the
                // winner's committed row.
                conn.build_transaction().serializable().run(|tx| {
                    ensure_client_exists(tx, new.client_id)?;
                    ensure_court_exists(tx, new.court_id)?;
                    let range = stored_range(new.start_time, new.end_time)?;
                    let existing = load_court_day(tx, new.court_id, new.date)?;
                    if let Some(taken) = booking::find_conflict(&range, None, &existing) {
                        return Ok(GuardedWrite::Conflict(ConflictInfo::for_reservation(taken)));
                    }
                    let row: ReservationRow = diesel::insert_into(reservations::table)
                        .values(&NewReservationRow {
                            client_id: new.client_id.value(),
                            court_id: new.court_id.value(),
                            reserved_on: new.date,
                            start_time: new.start_time,
                            end_time: new.end_time,
                            status: new.status.as_str().to_string(),
                        })
                        .returning(ReservationRow::as_returning())
                        .get_result(tx)
                        .map_err(map_diesel_error)?;
                    Ok(GuardedWrite::Committed(row_to_reservation(row)?))
                })
            })
            .await;

        match attempt {
            // The partial unique index can reject the insert before the
            // serializable check fires; resolve the winning row so the
            // caller still gets a conflict report, not a bare error.
            Err(err) if err.is_conflict() => {
                match self
                    .find_overlap(new.court_id, new.date, new.start_time, new.end_time, None)
                    .await?
                {
                    Some(info) => Ok(GuardedWrite::Conflict(info)),
                    None => Err(err.with_operation("store_reservation")),
                }
            }
            other => other.map_err(|e| e.with_operation("store_reservation")),
        }
    }

    async fn reschedule_reservation_checked(
        &self,
        id: ReservationId,
        update: ReservationUpdate,
    ) -> RepositoryResult<GuardedWrite> {
        let attempt = self
            .with_conn(move |conn| {
                conn.build_transaction().serializable().run(|tx| {
                    let current = reservations::table
                        .filter(reservations::reservation_id.eq(id.value()))
                        .select(ReservationRow::as_select())
                        .first::<ReservationRow>(tx)
                        .optional()
                        .map_err(map_diesel_error)?
                        .ok_or_else(|| RepositoryError::not_found("reservation", id))?;
                    let current = row_to_reservation(current)?;
                    if current.status == ReservationStatus::Cancelled {
                        return Err(RepositoryError::validation(format!(
                            "reservation {id} is cancelled and cannot be rescheduled"
                        )));
                    }

                    ensure_client_exists(tx, update.client_id)?;
                    ensure_court_exists(tx, update.court_id)?;
                    let range = stored_range(update.start_time, update.end_time)?;
                    let existing = load_court_day(tx, update.court_id, update.date)?;
                    if let Some(taken) = booking::find_conflict(&range, Some(id), &existing) {
                        return Ok(GuardedWrite::Conflict(ConflictInfo::for_reservation(taken)));
                    }

                    let row: ReservationRow = diesel::update(
                        reservations::table.filter(reservations::reservation_id.eq(id.value())),
                    )
                    .set((
                        reservations::client_id.eq(update.client_id.value()),
                        reservations::court_id.eq(update.court_id.value()),
                        reservations::reserved_on.eq(update.date),
                        reservations::start_time.eq(update.start_time),
                        reservations::end_time.eq(update.end_time),
                        reservations::updated_at.eq(Utc::now()),
                    ))
                    .returning(ReservationRow::as_returning())
                    .get_result(tx)
                    .map_err(map_diesel_error)?;
                    Ok(GuardedWrite::Committed(row_to_reservation(row)?))
                })
            })
            .await;

        match attempt {
            Err(err) if err.is_conflict() => {
                match self
                    .find_overlap(
                        update.court_id,
                        update.date,
                        update.start_time,
                        update.end_time,
                        Some(id),
                    )
                    .await?
                {
                    Some(info) => Ok(GuardedWrite::Conflict(info)),
                    None => Err(err.with_operation("reschedule_reservation")),
                }
            }
            other => other.map_err(|e| e.with_operation("reschedule_reservation")),
        }
    }

    async fn fetch_reservation(&self, id: ReservationId) -> RepositoryResult<Reservation> {
        self.with_conn(move |conn| {
            let row = reservations::table
                .filter(reservations::reservation_id.eq(id.value()))
                .select(ReservationRow::as_select())
                .first::<ReservationRow>(conn)
                .optional()
                .map_err(map_diesel_error)?
                .ok_or_else(|| RepositoryError::not_found("reservation", id))?;
            row_to_reservation(row)
        })
        .await
        .map_err(|e| e.with_operation("fetch_reservation"))
    }

    async fn fetch_reservations(
        &self,
        filter: ReservationFilter,
    ) -> RepositoryResult<Vec<Reservation>> {
        self.with_conn(move |conn| {
            let mut query = reservations::table
                .select(ReservationRow::as_select())
                .into_boxed();
            if let Some(court_id) = filter.court_id {
                query = query.filter(reservations::court_id.eq(court_id.value()));
            }
            if let Some(client_id) = filter.client_id {
                query = query.filter(reservations::client_id.eq(client_id.value()));
            }
            if let Some(date) = filter.date {
                query = query.filter(reservations::reserved_on.eq(date));
            }
            if let Some(status) = filter.status {
                query = query.filter(reservations::status.eq(status.as_str()));
            }
            let rows = query
                .order((
                    reservations::reserved_on.asc(),
                    reservations::start_time.asc(),
                    reservations::reservation_id.asc(),
                ))
                .load::<ReservationRow>(conn)
                .map_err(map_diesel_error)?;
            rows.into_iter().map(row_to_reservation).collect()
        })
        .await
    }

    async fn fetch_for_court_date(
        &self,
        court_id: CourtId,
        date: NaiveDate,
    ) -> RepositoryResult<Vec<Reservation>> {
        self.with_conn(move |conn| load_court_day(conn, court_id, date))
            .await
    }

    async fn set_reservation_status(
        &self,
        id: ReservationId,
        status: ReservationStatus,
    ) -> RepositoryResult<Reservation> {
        self.with_conn(move |conn| {
            let row: ReservationRow = diesel::update(
                reservations::table.filter(reservations::reservation_id.eq(id.value())),
            )
            .set((
                reservations::status.eq(status.as_str()),
                reservations::updated_at.eq(Utc::now()),
            ))
            .returning(ReservationRow::as_returning())
            .get_result(conn)
            .optional()
            .map_err(map_diesel_error)?
            .ok_or_else(|| RepositoryError::not_found("reservation", id))?;
            row_to_reservation(row)
        })
        .await
        .map_err(|e| e.with_operation("set_reservation_status"))
    }

    async fn delete_reservation(&self, id: ReservationId) -> RepositoryResult<()> {
        self.with_conn(move |conn| {
            conn.transaction(|tx| {
                let referenced: i64 = payments::table
                    .filter(payments::reservation_id.eq(id.value()))
                    .select(count_star())
                    .first(tx)
                    .map_err(map_diesel_error)?;
                if referenced > 0 {
                    return Err(RepositoryError::conflict(
                        "reservation",
                        format!("reservation {id} still has payments"),
                    ));
                }
                let deleted = diesel::delete(
                    reservations::table.filter(reservations::reservation_id.eq(id.value())),
                )
                .execute(tx)
                .map_err(map_diesel_error)?;
                if deleted == 0 {
                    return Err(RepositoryError::not_found("reservation", id));
                }
                Ok(())
            })
        })
        .await
        .map_err(|e| e.with_operation("delete_reservation"))
    }
}

#[async_trait]
impl TournamentRepository for PostgresRepository {
    async fn store_tournament(&self, new: NewTournament) -> RepositoryResult<Tournament> {
        let conflict = format!("tournament name '{}' already in use", new.name);
        let result = self
            .with_conn(move |conn| {
                let row: TournamentRow = diesel::insert_into(tournaments::table)
                    .values(&NewTournamentRow {
                        tournament_name: new.name.clone(),
                        starts_on: new.starts_on,
                        ends_on: new.ends_on,
                        description: new.description.clone(),
                    })
                    .returning(TournamentRow::as_returning())
                    .get_result(conn)
                    .map_err(map_diesel_error)?;
                Ok(row_to_tournament(row))
            })
            .await;
        result.map_err(|e| {
            conflict_message(e, "tournament", &conflict).with_operation("store_tournament")
        })
    }

    async fn fetch_tournament(&self, id: TournamentId) -> RepositoryResult<Tournament> {
        self.with_conn(move |conn| {
            let row = tournaments::table
                .filter(tournaments::tournament_id.eq(id.value()))
                .select(TournamentRow::as_select())
                .first::<TournamentRow>(conn)
                .optional()
                .map_err(map_diesel_error)?
                .ok_or_else(|| RepositoryError::not_found("tournament", id))?;
            Ok(row_to_tournament(row))
        })
        .await
        .map_err(|e| e.with_operation("fetch_tournament"))
    }

    async fn fetch_tournaments(&self) -> RepositoryResult<Vec<Tournament>> {
        self.with_conn(|conn| {
            let rows = tournaments::table
                .order((
                    tournaments::starts_on.asc(),
                    tournaments::tournament_id.asc(),
                ))
                .select(TournamentRow::as_select())
                .load::<TournamentRow>(conn)
                .map_err(map_diesel_error)?;
            Ok(rows.into_iter().map(row_to_tournament).collect())
        })
        .await
    }

    async fn update_tournament(
        &self,
        id: TournamentId,
        fields: NewTournament,
    ) -> RepositoryResult<Tournament> {
        let conflict = format!("tournament name '{}' already in use", fields.name);
        let result = self
            .with_conn(move |conn| {
                let row: TournamentRow = diesel::update(
                    tournaments::table.filter(tournaments::tournament_id.eq(id.value())),
                )
                .set((
                    tournaments::tournament_name.eq(fields.name.clone()),
                    tournaments::starts_on.eq(fields.starts_on),
                    tournaments::ends_on.eq(fields.ends_on),
                    tournaments::description.eq(fields.description.clone()),
                ))
                .returning(TournamentRow::as_returning())
                .get_result(conn)
                .optional()
                .map_err(map_diesel_error)?
                .ok_or_else(|| RepositoryError::not_found("tournament", id))?;
                Ok(row_to_tournament(row))
            })
            .await;
        result.map_err(|e| {
            conflict_message(e, "tournament", &conflict).with_operation("update_tournament")
        })
    }

    async fn delete_tournament(&self, id: TournamentId) -> RepositoryResult<()> {
        self.with_conn(move |conn| {
            // Court links go with the tournament via ON DELETE CASCADE.
            let deleted = diesel::delete(
                tournaments::table.filter(tournaments::tournament_id.eq(id.value())),
            )
            .execute(conn)
            .map_err(map_diesel_error)?;
            if deleted == 0 {
                return Err(RepositoryError::not_found("tournament", id));
            }
            Ok(())
        })
        .await
        .map_err(|e| e.with_operation("delete_tournament"))
    }

    async fn link_court(
        &self,
        tournament_id: TournamentId,
        court_id: CourtId,
    ) -> RepositoryResult<()> {
        let conflict = format!("court {court_id} already linked to tournament {tournament_id}");
        let result = self
            .with_conn(move |conn| {
                conn.transaction(|tx| {
                    ensure_tournament_exists(tx, tournament_id)?;
                    ensure_court_exists(tx, court_id)?;
                    diesel::insert_into(tournament_courts::table)
                        .values(&NewTournamentCourtRow {
                            tournament_id: tournament_id.value(),
                            court_id: court_id.value(),
                        })
                        .execute(tx)
                        .map_err(map_diesel_error)?;
                    Ok(())
                })
            })
            .await;
        result
            .map_err(|e| conflict_message(e, "tournament", &conflict).with_operation("link_court"))
    }

    async fn unlink_court(
        &self,
        tournament_id: TournamentId,
        court_id: CourtId,
    ) -> RepositoryResult<()> {
        self.with_conn(move |conn| {
            let deleted = diesel::delete(
                tournament_courts::table
                    .filter(tournament_courts::tournament_id.eq(tournament_id.value()))
                    .filter(tournament_courts::court_id.eq(court_id.value())),
            )
            .execute(conn)
            .map_err(map_diesel_error)?;
            if deleted == 0 {
                return Err(RepositoryError::not_found(
                    "tournament link",
                    format!("{tournament_id}/{court_id}"),
                ));
            }
            Ok(())
        })
        .await
        .map_err(|e| e.with_operation("unlink_court"))
    }

    async fn fetch_tournament_courts(
        &self,
        tournament_id: TournamentId,
    ) -> RepositoryResult<Vec<Court>> {
        self.with_conn(move |conn| {
            ensure_tournament_exists(conn, tournament_id)?;
            let rows = tournament_courts::table
                .inner_join(courts::table)
                .filter(tournament_courts::tournament_id.eq(tournament_id.value()))
                .order(courts::court_name.asc())
                .select(CourtRow::as_select())
                .load::<CourtRow>(conn)
                .map_err(map_diesel_error)?;
            rows.into_iter().map(row_to_court).collect()
        })
        .await
        .map_err(|e| e.with_operation("fetch_tournament_courts"))
    }
}

#[async_trait]
impl PaymentRepository for PostgresRepository {
    async fn store_payment(&self, new: NewPayment) -> RepositoryResult<Payment> {
        self.with_conn(move |conn| {
            let reservation_count: i64 = reservations::table
                .filter(reservations::reservation_id.eq(new.reservation_id.value()))
                .select(count_star())
                .first(conn)
                .map_err(map_diesel_error)?;
            if reservation_count == 0 {
                return Err(RepositoryError::not_found(
                    "reservation",
                    new.reservation_id,
                ));
            }
            let row: PaymentRow = diesel::insert_into(payments::table)
                .values(&NewPaymentRow {
                    reservation_id: new.reservation_id.value(),
                    amount: new.amount,
                    status: new.status.as_str().to_string(),
                    paid_on: new.paid_on,
                })
                .returning(PaymentRow::as_returning())
                .get_result(conn)
                .map_err(map_diesel_error)?;
            row_to_payment(row)
        })
        .await
        .map_err(|e| e.with_operation("store_payment"))
    }

    async fn fetch_payment(&self, id: PaymentId) -> RepositoryResult<Payment> {
        self.with_conn(move |conn| {
            let row = payments::table
                .filter(payments::payment_id.eq(id.value()))
                .select(PaymentRow::as_select())
                .first::<PaymentRow>(conn)
                .optional()
                .map_err(map_diesel_error)?
                .ok_or_else(|| RepositoryError::not_found("payment", id))?;
            row_to_payment(row)
        })
        .await
        .map_err(|e| e.with_operation("fetch_payment"))
    }

    async fn fetch_payments(&self, filter: PaymentFilter) -> RepositoryResult<Vec<Payment>> {
        self.with_conn(move |conn| {
            let mut query = payments::table.select(PaymentRow::as_select()).into_boxed();
            if let Some(from) = filter.from {
                query = query.filter(payments::paid_on.ge(from));
            }
            if let Some(to) = filter.to {
                query = query.filter(payments::paid_on.le(to));
            }
            if let Some(year) = filter.year {
                let first = NaiveDate::from_ymd_opt(year, 1, 1)
                    .ok_or_else(|| RepositoryError::validation(format!("year {year} out of range")))?;
                let last = NaiveDate::from_ymd_opt(year, 12, 31)
                    .ok_or_else(|| RepositoryError::validation(format!("year {year} out of range")))?;
                query = query
                    .filter(payments::paid_on.ge(first))
                    .filter(payments::paid_on.le(last));
            }
            let rows = query
                .order((payments::paid_on.asc(), payments::payment_id.asc()))
                .load::<PaymentRow>(conn)
                .map_err(map_diesel_error)?;
            rows.into_iter().map(row_to_payment).collect()
        })
        .await
    }
}

#[async_trait]
impl ReportingRepository for PostgresRepository {
    async fn fetch_reservation_facts(&self) -> RepositoryResult<Vec<ReservationFact>> {
        self.with_conn(|conn| {
            let rows = reservations::table
                .inner_join(courts::table)
                .inner_join(clients::table)
                .select((
                    reservations::reserved_on,
                    reservations::status,
                    courts::court_id,
                    courts::court_name,
                    clients::client_id,
                    clients::first_name,
                    clients::last_name,
                    clients::email,
                ))
                .load::<(NaiveDate, String, i64, String, i64, String, String, String)>(conn)
                .map_err(map_diesel_error)?;

            rows.into_iter()
                .map(
                    |(date, status, court_id, court_name, client_id, first, last, email)| {
                        let status: ReservationStatus = status.parse().map_err(|e| {
                            RepositoryError::internal(format!("stored reservation is corrupt: {e}"))
                        })?;
                        Ok(ReservationFact {
                            date,
                            status,
                            court_id: CourtId(court_id),
                            court_name,
                            client_id: ClientId(client_id),
                            client_name: format!("{first} {last}"),
                            client_email: email,
                        })
                    },
                )
                .collect()
        })
        .await
        .map_err(|e| e.with_operation("fetch_reservation_facts"))
    }
}

#[async_trait]
impl SystemRepository for PostgresRepository {
    async fn health_check(&self) -> RepositoryResult<()> {
        self.with_conn(|conn| {
            sql_query("SELECT 1")
                .execute(conn)
                .map(|_| ())
                .map_err(map_diesel_error)
        })
        .await
    }
}
