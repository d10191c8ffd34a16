//! Create an administrator account.
//!
//! Usage: create_superuser USERNAME EMAIL PASSWORD

use anyhow::{bail, Context};

use relationship_app::{
    config::AppConfig,
    connect_database, logging,
    models::user::NewUser,
    repository::Repository,
    services::{redis::RedisService, users::UsersService},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::load()?;
    logging::init(&config.logging);

    let args: Vec<String> = std::env::args().skip(1).collect();
    let [username, email, password] = args.as_slice() else {
        bail!("usage: create_superuser USERNAME EMAIL PASSWORD");
    };

    let pool = connect_database(&config.database).await?;
    // Redis is only needed for logout, so the client is never connected here
    let redis = RedisService::from_url(&config.redis.url)?;
    let users = UsersService::new(Repository::new(pool), config.auth.clone(), redis);

    let (user, role) = users
        .create_superuser(NewUser {
            username: username.clone(),
            email: email.clone(),
            password: Some(password.clone()),
            ..Default::default()
        })
        .await
        .context("failed to create superuser")?;

    println!("Superuser {} created ({})", user, role);
    Ok(())
}
