//! Scenario catalogue
//!
//! Each scenario is a linear sequence: fixture setup, client calls,
//! assertions, implicit teardown. Parameterized scenarios are expanded into
//! one named entry per variant, e.g. `pet::create_with_status[pending]`.

pub mod pets;
pub mod store;
pub mod users;

use petcheck_core::{CheckError, PetStatus};

use crate::context::ScenarioContext;

type ScenarioFn = dyn Fn(&ScenarioContext<'_>) -> Result<(), CheckError> + Send + Sync;

/// A named, independently runnable check
pub struct Scenario {
    name: String,
    body: Box<ScenarioFn>,
}

impl Scenario {
    pub fn new<F>(name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&ScenarioContext<'_>) -> Result<(), CheckError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            body: Box::new(body),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the body once.
    ///
    /// # Errors
    ///
    /// Whatever the body returns.
    pub fn run(&self, ctx: &ScenarioContext<'_>) -> Result<(), CheckError> {
        (self.body)(ctx)
    }
}

impl std::fmt::Debug for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scenario").field("name", &self.name).finish()
    }
}

/// Every scenario, in run order.
#[must_use]
pub fn catalogue() -> Vec<Scenario> {
    let mut all = Vec::new();

    for status in PetStatus::ALL {
        all.push(Scenario::new(
            format!("pet::create_with_status[{status}]"),
            move |ctx| pets::create_with_status(ctx, status),
        ));
    }
    for data in pets::PET_DATA {
        all.push(Scenario::new(
            format!("pet::create_with_data[{}]", data.1),
            move |ctx| pets::create_with_data(ctx, data),
        ));
    }
    for update in pets::PET_UPDATES {
        all.push(Scenario::new(
            format!("pet::update[{}]", update.0),
            move |ctx| pets::update(ctx, update),
        ));
    }
    all.push(Scenario::new("pet::update_idempotent", pets::update_idempotent));
    for data in pets::PETS_TO_DELETE {
        all.push(Scenario::new(
            format!("pet::delete[{}]", data.0),
            move |ctx| pets::delete(ctx, data),
        ));
    }
    all.push(Scenario::new("pet::lifecycle", pets::lifecycle));
    for status in PetStatus::ALL {
        all.push(Scenario::new(
            format!("pet::find_by_status[{status}]"),
            move |ctx| pets::find_by_status(ctx, status),
        ));
    }
    all.push(Scenario::new("pet::upload_image", pets::upload_image));
    all.push(Scenario::new("pet::missing_returns_404", pets::missing_returns_404));

    all.push(Scenario::new("user::create_update_delete", users::create_update_delete));
    all.push(Scenario::new("user::duplicate_rejected", users::duplicate_rejected));
    all.push(Scenario::new("user::sequential_updates", users::sequential_updates));
    all.push(Scenario::new("user::update_idempotent", users::update_idempotent));
    all.push(Scenario::new("user::missing_returns_404", users::missing_returns_404));

    all.push(Scenario::new("store::inventory", store::inventory));
    all.push(Scenario::new("store::order_lifecycle", store::order_lifecycle));

    all
}
