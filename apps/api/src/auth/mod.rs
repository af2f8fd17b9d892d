pub mod handlers;
pub mod password;
pub mod users;

use anyhow::Result;
use tracing::info;

use crate::config::AdminSeed;
use crate::models::user::{NewUser, Role};
use users::UserRepository;

/// Creates the configured admin account unless its email is already taken.
pub async fn bootstrap_admin(
    users: &dyn UserRepository,
    seed: &AdminSeed,
    bcrypt_cost: u32,
) -> Result<()> {
    if users.find_by_email(&seed.email).await?.is_some() {
        info!("Admin account {} already exists", seed.email);
        return Ok(());
    }

    let password_hash = password::hash_password(&seed.password, bcrypt_cost).await?;
    let created = users
        .create(NewUser {
            name: seed.name.clone(),
            email: seed.email.clone(),
            password_hash,
            role: Role::Admin,
        })
        .await?;

    if let Some(admin) = created {
        info!(user_id = admin.id, "Created admin account {}", admin.email);
    }
    Ok(())
}
