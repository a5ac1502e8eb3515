//! Store scenarios

use petcheck_core::check::{expect_field, expect_schema};
use petcheck_core::schema::{inventory_schema, order_schema};
use petcheck_core::{CheckError, Order};

use crate::context::ScenarioContext;
use crate::ids;

/// Inventory is a map of status name to integer count.
///
/// # Errors
///
/// First failed check.
pub fn inventory(ctx: &ScenarioContext<'_>) -> Result<(), CheckError> {
    let resp = ctx.client().get_inventory()?;
    ctx.expect_status(&resp, 200)?;
    expect_schema(&resp, &inventory_schema())?;
    Ok(())
}

/// Place an order, read it back, delete it, and confirm it is gone.
///
/// # Errors
///
/// First failed check.
pub fn order_lifecycle(ctx: &ScenarioContext<'_>) -> Result<(), CheckError> {
    let order = ctx.provision(Order::placed(ids::unique_order_id(), ids::unique_pet_id(), 2))?;
    tracing::info!("placed order {} for pet {}", order.id, order.pet_id);

    let resp = ctx.client().get_order(order.id)?;
    ctx.expect_status(&resp, 200)?;
    expect_schema(&resp, &order_schema())?;
    expect_field(&resp, "petId", order.pet_id)?;
    expect_field(&resp, "quantity", order.quantity)?;

    ctx.expect_status(&ctx.client().delete_order(order.id)?, 200)?;
    ctx.expect_status(&ctx.client().get_order(order.id)?, 404)?;
    Ok(())
}
