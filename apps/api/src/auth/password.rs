use anyhow::Context;
use tokio::sync::OnceCell;

use crate::errors::AppError;

/// Hashes on the blocking pool.
pub async fn hash_password(password: &str, cost: u32) -> Result<String, AppError> {
    let password = password.to_owned();
    let hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .context("password hashing task failed")?
        .context("failed to hash password")?;
    Ok(hash)
}

/// A malformed stored hash counts as a mismatch rather than a server error.
pub async fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let password = password.to_owned();
    let hash = hash.to_owned();
    let matches = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .context("password verification task failed")?
        .unwrap_or(false);
    Ok(matches)
}

static DECOY_HASH: OnceCell<String> = OnceCell::const_new();

/// Hash checked when a login names an unknown email, so both login failures
/// cost one bcrypt verification. Built once, at the first caller's cost.
pub async fn decoy_hash(cost: u32) -> Result<&'static str, AppError> {
    let hash = DECOY_HASH
        .get_or_try_init(|| hash_password("jobboard-decoy-password", cost))
        .await?;
    Ok(hash.as_str())
}

/// Always `false`; spends the same work as checking a real account.
pub async fn verify_decoy(password: &str, cost: u32) -> Result<bool, AppError> {
    verify_password(password, decoy_hash(cost).await?).await?;
    Ok(false)
}
