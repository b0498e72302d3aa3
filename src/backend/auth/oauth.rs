/**
 * OAuth Identity Federation
 *
 * Maps a provider identity (GitHub, Google, ...) onto a local user. The
 * frontend completes the provider handshake and posts the resulting profile;
 * this module only decides which local account it belongs to.
 *
 * # Resolution Order
 *
 * 1. An account already linked for `(provider, provider_id)` wins
 * 2. Otherwise a user with the same email gets the account linked, and empty
 *    `full_name` / `avatar_url` are filled from the profile
 * 3. Otherwise a verified, active user is created with a unique username
 *    derived from the email local part
 */

use crate::backend::auth::users::{NewOAuthAccount, NewUser, User};
use crate::backend::error::BackendError;
use crate::backend::storage::UserStore;

/// Profile handed over after a provider login
#[derive(Debug, Clone, PartialEq)]
pub struct OAuthProfile {
    pub provider: String,
    pub provider_id: String,
    pub email: String,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
}

/// Find or create the local user for a provider identity
pub async fn get_or_create_oauth_user(
    users: &dyn UserStore,
    profile: OAuthProfile,
) -> Result<User, BackendError> {
    if let Some(account) = users
        .find_oauth_account(&profile.provider, &profile.provider_id)
        .await?
    {
        return users
            .get_user(account.user_id)
            .await?
            .ok_or_else(|| BackendError::internal("linked OAuth account has no user"));
    }

    if let Some(user) = users.get_user_by_email(&profile.email).await? {
        link_account(users, &profile, &user).await?;

        let fill_name = user.full_name.is_none() && profile.name.is_some();
        let fill_avatar = user.avatar_url.is_none() && profile.avatar_url.is_some();
        if !(fill_name || fill_avatar) {
            return Ok(user);
        }

        let full_name = user.full_name.clone().or(profile.name);
        let avatar_url = user.avatar_url.clone().or(profile.avatar_url);
        tracing::info!(user_id = %user.id, "Filled profile from OAuth provider");
        return Ok(users.update_profile(user.id, full_name, avatar_url).await?);
    }

    let base = username_base(&profile);
    let username = unique_username(users, &base).await?;

    let user = users
        .create_user(NewUser {
            email: profile.email.clone(),
            username,
            full_name: profile.name.clone(),
            hashed_password: None,
            is_active: true,
            is_verified: true,
            avatar_url: profile.avatar_url.clone(),
        })
        .await?;
    link_account(users, &profile, &user).await?;

    tracing::info!(
        user_id = %user.id,
        provider = %profile.provider,
        "Created user from OAuth provider"
    );
    Ok(user)
}

async fn link_account(
    users: &dyn UserStore,
    profile: &OAuthProfile,
    user: &User,
) -> Result<(), BackendError> {
    users
        .link_oauth_account(NewOAuthAccount {
            oauth_name: profile.provider.clone(),
            account_id: profile.provider_id.clone(),
            account_email: Some(profile.email.clone()),
            user_id: user.id,
        })
        .await?;
    Ok(())
}

fn username_base(profile: &OAuthProfile) -> String {
    match profile.email.split('@').next() {
        Some(local) if !local.is_empty() => local.to_string(),
        _ => format!("{}_{}", profile.provider, profile.provider_id),
    }
}

/// `base`, or `base_1`, `base_2`, ... whichever is free first
async fn unique_username(users: &dyn UserStore, base: &str) -> Result<String, BackendError> {
    let mut candidate = base.to_string();
    let mut counter = 1;
    while users.username_exists(&candidate).await? {
        candidate = format!("{}_{}", base, counter);
        counter += 1;
    }
    Ok(candidate)
}
