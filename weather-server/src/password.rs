use argon2::{
    password_hash::{self, rand_core::OsRng, PasswordHash, SaltString},
    Algorithm, Argon2, Params, PasswordHasher, PasswordVerifier, Version,
};
use thiserror::Error;
use tokio::task::{self, JoinError};

/// The default work factor: argon2 passes over memory.
pub const DEFAULT_COST: u32 = 10;

/// Things that can go wrong while hashing or verifying.
#[derive(Debug, Error)]
pub enum HashError {
    /// argon2 rejected the input or the stored hash is malformed.
    #[error("password hashing error: {0}")]
    Hash(#[from] password_hash::Error),

    /// The cost parameters are out of range.
    #[error("invalid hashing parameters: {0}")]
    Params(#[from] argon2::Error),

    /// The blocking task doing the work went away.
    #[error("hashing task failed: {0}")]
    Join(#[from] JoinError),
}

/// Salted, deliberately slow one-way password hashing. The work happens on
/// tokio's blocking pool so it doesn't stall other requests.
#[derive(Debug, Clone)]
pub struct Hasher {
    /// argon2 parameters for new hashes. Verification reads the parameters
    /// stored in each hash instead.
    params: Params,
}

impl Hasher {
    /// A hasher with the given time cost and argon2's default memory cost.
    ///
    /// ## Errors
    ///
    /// If `cost` is zero.
    pub fn new(cost: u32) -> Result<Self, HashError> {
        Ok(Self {
            params: Params::new(Params::DEFAULT_M_COST, cost, Params::DEFAULT_P_COST, None)?,
        })
    }

    /// The cheapest hasher argon2 allows. Only for tests!
    #[cfg(test)]
    pub fn cheap() -> Self {
        Self {
            params: Params::new(Params::MIN_M_COST, Params::MIN_T_COST, 1, None)
                .expect("minimum params are valid"),
        }
    }

    /// Hash a password with a fresh random salt, returning a PHC string.
    ///
    /// ## Errors
    ///
    /// If argon2 fails or the blocking task panics.
    pub async fn hash(&self, password: &str) -> Result<String, HashError> {
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone());
        let password = password.to_owned();

        task::spawn_blocking(move || -> Result<_, HashError> {
            let salt = SaltString::generate(&mut OsRng);

            Ok(argon2.hash_password(password.as_bytes(), &salt)?.to_string())
        })
        .await?
    }

    /// Check a password against a stored hash.
    ///
    /// ## Errors
    ///
    /// A mismatch is `Ok(false)`. Errors are reserved for malformed hashes
    /// and other failures that say nothing about the password.
    pub async fn verify(&self, password: &str, stored: &str) -> Result<bool, HashError> {
        let password = password.to_owned();
        let stored = stored.to_owned();

        task::spawn_blocking(move || -> Result<_, HashError> {
            let hash = PasswordHash::new(&stored)?;

            match Argon2::default().verify_password(password.as_bytes(), &hash) {
                Ok(()) => Ok(true),
                Err(password_hash::Error::Password) => Ok(false),
                Err(err) => Err(err.into()),
            }
        })
        .await?
    }
}
