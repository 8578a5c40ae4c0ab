use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    FromRow, SqlitePool,
};
use std::str::FromStr;
use thiserror::Error;

/// A stored account.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct User {
    /// Lowercased email; the unique key.
    pub email: String,

    /// PHC-format password hash. Never the plaintext.
    pub password_hash: String,
}

/// Things that can go wrong talking to the database.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An account with this email is already stored.
    #[error("an account with this email already exists")]
    DuplicateKey,

    /// The database failed us.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// We couldn't bring the schema up to date.
    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

/// Lowercase an email so it can be used as a lookup key.
pub fn normalize_email(email: &str) -> String {
    email.to_lowercase()
}

/// Persistent storage for accounts. Emails are normalized on the way in and
/// on lookups, so the uniqueness check is case-insensitive. There is no way
/// to change or remove an account once created.
#[derive(Debug, Clone)]
pub struct Store {
    /// Database connection pool.
    pool: SqlitePool,
}

impl Store {
    /// Connect to the database at `url` (creating it if needed) and run any
    /// pending migrations.
    ///
    /// ## Errors
    ///
    /// If the URL is invalid, the database can't be opened, or migrations
    /// fail.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;

        Self::migrated(pool).await
    }

    /// A fresh private database that lives as long as the store does.
    ///
    /// ## Errors
    ///
    /// Same as `connect`.
    pub async fn in_memory() -> Result<Self, StoreError> {
        // Every SQLite memory connection is its own database, so hold on to
        // exactly one.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;

        Self::migrated(pool).await
    }

    /// Bring the schema for `pool` up to date.
    async fn migrated(pool: SqlitePool) -> Result<Self, StoreError> {
        sqlx::migrate!().run(&pool).await?;

        Ok(Self { pool })
    }

    /// Look up an account by email.
    ///
    /// ## Errors
    ///
    /// If the database fails.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT email, password_hash FROM users WHERE email = ?1 LIMIT 1",
        )
        .bind(normalize_email(email))
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Store a new account.
    ///
    /// ## Errors
    ///
    /// `StoreError::DuplicateKey` if the email is taken. The database's
    /// primary key makes this hold even for concurrent inserts.
    pub async fn create(&self, email: &str, password_hash: &str) -> Result<User, StoreError> {
        let user = User {
            email: normalize_email(email),
            password_hash: password_hash.to_string(),
        };

        let inserted = sqlx::query("INSERT INTO users (email, password_hash) VALUES (?1, ?2)")
            .bind(&user.email)
            .bind(&user.password_hash)
            .execute(&self.pool)
            .await;

        match inserted {
            Ok(_) => Ok(user),
            Err(sqlx::Error::Database(err)) if err.is_unique_violation() => {
                Err(StoreError::DuplicateKey)
            }
            Err(err) => Err(err.into()),
        }
    }
}
