use crate::password::{HashError, Hasher};
use crate::store::{Store, StoreError};
use thiserror::Error;

/// What we say when an account was created.
pub static SIGNUP_SUCCESS_MESSAGE: &str = "User created successfully! Please log in.";

/// Why a signup or login didn't go through. The messages here are safe to
/// show to clients.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    /// Email or password was missing or empty.
    #[error("Email and password are required.")]
    Validation,

    /// Someone already signed up with this email.
    #[error("User with this email already exists.")]
    AlreadyExists,

    /// This should be the same for both missing accounts and incorrect
    /// passwords so as not to give additional information about what accounts
    /// exist to someone probing the system.
    #[error("Invalid email or password.")]
    InvalidCredentials,

    /// Something went wrong which we have logged but should not expose.
    #[error("internal error")]
    Internal,
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateKey => Self::AlreadyExists,
            err => {
                tracing::error!(?err, "store error");
                Self::Internal
            }
        }
    }
}

impl From<HashError> for AuthError {
    fn from(err: HashError) -> Self {
        tracing::error!(?err, "password hashing error");
        Self::Internal
    }
}

/// Both fields have to be non-empty.
fn require<'a>(email: &'a str, password: &'a str) -> Result<(&'a str, &'a str), AuthError> {
    if email.is_empty() || password.is_empty() {
        Err(AuthError::Validation)
    } else {
        Ok((email, password))
    }
}

/// Create an account.
///
/// ## Errors
///
/// - `Validation` if either field is empty (checked before the store is touched)
/// - `AlreadyExists` if the email is taken in any casing
/// - `Internal` if storage or hashing fails
#[tracing::instrument(skip(store, hasher, password))]
pub async fn signup(
    store: &Store,
    hasher: &Hasher,
    email: &str,
    password: &str,
) -> Result<&'static str, AuthError> {
    let (email, password) = require(email, password)?;

    // Validation: don't allow a duplicate account if one exists. The store
    // enforces this again on insert, for signups racing each other.
    if store.find_by_email(email).await?.is_some() {
        return Err(AuthError::AlreadyExists);
    }

    let hash = hasher.hash(password).await?;
    let user = store.create(email, &hash).await?;

    tracing::info!(email = %user.email, "created account");

    Ok(SIGNUP_SUCCESS_MESSAGE)
}

/// Check credentials, returning the account's normalized email. No token is
/// issued.
///
/// ## Errors
///
/// - `Validation` if either field is empty (checked before the store is touched)
/// - `InvalidCredentials` for an unknown email or a wrong password alike
/// - `Internal` if storage or hashing fails
#[tracing::instrument(skip(store, hasher, password))]
pub async fn login(
    store: &Store,
    hasher: &Hasher,
    email: &str,
    password: &str,
) -> Result<String, AuthError> {
    let (email, password) = require(email, password)?;

    let user = store
        .find_by_email(email)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    if !hasher.verify(password, &user.password_hash).await? {
        return Err(AuthError::InvalidCredentials);
    }

    Ok(user.email)
}
