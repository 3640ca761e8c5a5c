//! Sign-up, login and the signed-in user.
//!
//! Accounts are kept as a JSON list under [`USERS_KEY`]; the signed-in
//! user's public profile sits under [`CURRENT_USER_KEY`]. Emails are
//! trimmed and lowercased before they are stored or compared.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::store::{Storage, StoreError};

pub const USERS_KEY: &str = "inkwell_users";
pub const CURRENT_USER_KEY: &str = "inkwell_current_user";

/// Shown after a successful logout.
pub const LOGGED_OUT_MESSAGE: &str = "Logged out successfully.";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Please fill all sign up fields.")]
    MissingFields,
    #[error("Email already exists. Please login.")]
    EmailTaken,
    #[error("Invalid credentials. Please try again.")]
    InvalidCredentials,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A stored account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Account {
    name: String,
    email: String,
    password: String,
}

/// The public part of an account, remembered as the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub email: String,
}

impl From<&Account> for Profile {
    fn from(account: &Account) -> Self {
        Self {
            name: account.name.clone(),
            email: account.email.clone(),
        }
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn accounts(storage: &dyn Storage) -> Vec<Account> {
    storage
        .get_item(USERS_KEY)
        .and_then(|json| serde_json::from_str(&json).ok())
        .unwrap_or_default()
}

fn set_accounts(storage: &mut dyn Storage, accounts: &[Account]) -> Result<(), AuthError> {
    let json = serde_json::to_string(accounts).unwrap_or_else(|_| "[]".to_string());
    storage.set_item(USERS_KEY, &json)?;
    Ok(())
}

fn set_current_user(storage: &mut dyn Storage, profile: &Profile) -> Result<(), AuthError> {
    let json = serde_json::to_string(profile).unwrap_or_else(|_| "null".to_string());
    storage.set_item(CURRENT_USER_KEY, &json)?;
    Ok(())
}

/// The signed-in user, if any.
///
/// A missing, unparseable or email-less record reads as signed out.
pub fn current_user(storage: &dyn Storage) -> Option<Profile> {
    storage
        .get_item(CURRENT_USER_KEY)
        .and_then(|json| serde_json::from_str::<Option<Profile>>(&json).ok())
        .flatten()
        .filter(|profile| !profile.email.is_empty())
}

/// Create an account and sign it in.
///
/// # Errors
/// [`AuthError::MissingFields`] if any field is blank after trimming,
/// [`AuthError::EmailTaken`] if the email is already registered.
pub fn sign_up(
    storage: &mut dyn Storage,
    name: &str,
    email: &str,
    password: &str,
) -> Result<Profile, AuthError> {
    let name = name.trim();
    let email = normalize_email(email);
    if name.is_empty() || email.is_empty() || password.is_empty() {
        return Err(AuthError::MissingFields);
    }

    let mut all = accounts(storage);
    if all.iter().any(|account| account.email == email) {
        debug!(%email, "sign up rejected, email exists");
        return Err(AuthError::EmailTaken);
    }

    let account = Account {
        name: name.to_string(),
        email,
        password: password.to_string(),
    };
    let profile = Profile::from(&account);
    all.push(account);
    set_accounts(storage, &all)?;
    set_current_user(storage, &profile)?;
    info!(email = %profile.email, "signed up");
    Ok(profile)
}

/// Sign in with an email and password.
///
/// # Errors
/// [`AuthError::InvalidCredentials`] unless an account matches both.
pub fn log_in(storage: &mut dyn Storage, email: &str, password: &str) -> Result<Profile, AuthError> {
    let email = normalize_email(email);
    let profile = accounts(storage)
        .iter()
        .find(|account| account.email == email && account.password == password)
        .map(Profile::from)
        .ok_or(AuthError::InvalidCredentials)?;
    set_current_user(storage, &profile)?;
    info!(email = %profile.email, "logged in");
    Ok(profile)
}

/// Forget the signed-in user. Accounts and notes are kept.
///
/// # Errors
/// Returns an error if the storage cannot be updated.
pub fn log_out(storage: &mut dyn Storage) -> Result<(), AuthError> {
    storage.remove_item(CURRENT_USER_KEY)?;
    info!("logged out");
    Ok(())
}
