//! User scenarios

use petcheck_core::check::{expect_client_error, expect_field, expect_schema};
use petcheck_core::schema::user_schema;
use petcheck_core::{CheckError, User};

use crate::context::ScenarioContext;
use crate::ids;

/// The stock account under a fresh username.
#[must_use]
pub fn stock_user() -> User {
    User::sample(ids::unique_user_id(), ids::unique_username())
}

/// Create, read, update, re-read, delete, and confirm the account is gone.
///
/// # Errors
///
/// First failed check.
pub fn create_update_delete(ctx: &ScenarioContext<'_>) -> Result<(), CheckError> {
    let user = ctx.provision(stock_user())?;
    let username = user.username.as_str();

    tracing::info!("checking user {username} was created");
    let resp = ctx.client().get_user(username)?;
    ctx.expect_status(&resp, 200)?;
    expect_schema(&resp, &user_schema())?;
    expect_field(&resp, "username", username)?;

    tracing::info!("updating user {username}: firstName -> Jane, lastName -> Smith");
    let updated = user.with_names("Jane", "Smith");
    ctx.expect_status(&ctx.client().update_user(username, &updated)?, 200)?;

    tracing::info!("checking updated data of user {username}");
    let resp = ctx.client().get_user(username)?;
    ctx.expect_status(&resp, 200)?;
    expect_field(&resp, "firstName", "Jane")?;
    expect_field(&resp, "lastName", "Smith")?;

    tracing::info!("deleting user {username}");
    ctx.expect_status(&ctx.client().delete_user(username)?, 200)?;
    ctx.expect_status(&ctx.client().get_user(username)?, 404)?;
    Ok(())
}

/// Creating an account whose username is taken is a client error.
///
/// # Errors
///
/// First failed check.
pub fn duplicate_rejected(ctx: &ScenarioContext<'_>) -> Result<(), CheckError> {
    let user = ctx.provision(stock_user())?;
    tracing::info!("creating duplicate user {}", user.username);

    let resp = ctx.client().create_user(&user)?;
    expect_client_error(&resp)?;
    tracing::info!("duplicate user rejected with {}", resp.status);
    Ok(())
}

/// Two updates issued back-to-back both succeed and one of them is stored.
///
/// The API gives no ordering guarantee between them, so either value is
/// accepted and the observed one is logged.
///
/// # Errors
///
/// First failed check.
pub fn sequential_updates(ctx: &ScenarioContext<'_>) -> Result<(), CheckError> {
    const FIRST: &str = "Concurrent_1";
    const SECOND: &str = "Concurrent_2";

    let user = ctx.provision(stock_user())?;
    let username = user.username.as_str();
    tracing::info!("issuing two updates for user {username}");

    let first = ctx.client().update_user(username, &user.with_names(FIRST, &user.last_name))?;
    let second = ctx.client().update_user(username, &user.with_names(SECOND, &user.last_name))?;
    ctx.expect_status(&first, 200)?;
    ctx.expect_status(&second, 200)?;

    let resp = ctx.client().get_user(username)?;
    ctx.expect_status(&resp, 200)?;
    let stored = resp
        .field("firstName")
        .cloned()
        .unwrap_or(serde_json::Value::Null);
    if stored != FIRST && stored != SECOND {
        return Err(CheckError::FieldMismatch {
            field: "firstName".to_string(),
            expected: format!("{FIRST} or {SECOND}").into(),
            actual: stored,
        });
    }
    tracing::info!("stored firstName after both updates: {stored}");
    Ok(())
}

/// Same update twice, identical state on the third read.
///
/// # Errors
///
/// First failed check.
pub fn update_idempotent(ctx: &ScenarioContext<'_>) -> Result<(), CheckError> {
    let user = ctx.provision(stock_user())?;
    let username = user.username.as_str();
    let updated = user.with_names("Idem", "Potent");

    for attempt in 1..=2 {
        tracing::info!("update attempt {attempt} for user {username}");
        ctx.expect_status(&ctx.client().update_user(username, &updated)?, 200)?;
    }

    let resp = ctx.client().get_user(username)?;
    ctx.expect_status(&resp, 200)?;
    expect_field(&resp, "firstName", "Idem")?;
    expect_field(&resp, "lastName", "Potent")?;
    expect_field(&resp, "username", username)?;
    Ok(())
}

/// An unknown username yields 404.
///
/// # Errors
///
/// First failed check.
pub fn missing_returns_404(ctx: &ScenarioContext<'_>) -> Result<(), CheckError> {
    let username = format!("non_existing_{}", ids::unique_username());
    tracing::info!("reading unknown user {username}");
    ctx.expect_status(&ctx.client().get_user(&username)?, 404)
}
