//! Pet scenarios

use std::io::Write as _;

use petcheck_core::check::{expect_field, expect_gone, expect_schema};
use petcheck_core::schema::{api_response_schema, pet_list_schema, pet_schema};
use petcheck_core::{Category, CheckError, Pet, PetStatus};

use crate::context::ScenarioContext;
use crate::ids;

/// Id shared by the status variants and the lifecycle scenario.
pub const TEST_PET_ID: i64 = 124;

/// `(id, name, category id, category name)` for the data variants.
pub const PET_DATA: [(i64, &str, i64, &str); 3] = [
    (125, "Doggo", 1, "Dogs"),
    (126, "Kitty", 2, "Cats"),
    (127, "Birdo", 3, "Birds"),
];

/// Same shape as [`PET_DATA`], for the deletion variants.
pub const PETS_TO_DELETE: [(i64, &str, i64, &str); 3] = [
    (128, "DoggoToDelete", 1, "Dogs"),
    (129, "KittyToDelete", 2, "Cats"),
    (130, "BirdoToDelete", 3, "Birds"),
];

/// `(new name, new status)` applied to the stock pet.
pub const PET_UPDATES: [(&str, PetStatus); 3] = [
    ("FluffyUpdated", PetStatus::Sold),
    ("FluffySuper", PetStatus::Pending),
    ("FluffyMax", PetStatus::Available),
];

/// Minimal PNG signature plus padding; the server does not inspect content.
const FAKE_PNG: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR petcheck";

fn test_pet(status: PetStatus) -> Pet {
    Pet::new(TEST_PET_ID, "TestPet", Category::new(2, "Cats"), status)
}

/// The stock pet used as a precondition, under a fresh id.
#[must_use]
pub fn stock_pet() -> Pet {
    Pet::new(
        ids::unique_pet_id(),
        "Fluffy",
        Category::new(1, "Dogs"),
        PetStatus::Available,
    )
}

/// Creating a pet stores the requested status.
///
/// # Errors
///
/// First failed check.
pub fn create_with_status(ctx: &ScenarioContext<'_>, status: PetStatus) -> Result<(), CheckError> {
    tracing::info!("creating pet with status {status}");
    let pet = ctx.provision(test_pet(status))?;
    let resp = pet.created();
    ctx.expect_status(resp, 200)?;
    expect_schema(resp, &pet_schema())?;
    expect_field(resp, "status", status.as_str())?;
    tracing::info!("pet with status {status} created");
    Ok(())
}

/// Creating a pet stores the requested name and category.
///
/// # Errors
///
/// First failed check.
pub fn create_with_data(
    ctx: &ScenarioContext<'_>,
    (id, name, category_id, category_name): (i64, &str, i64, &str),
) -> Result<(), CheckError> {
    tracing::info!("creating pet {name} in category {category_name}");
    let pet = ctx.provision(Pet::new(
        id,
        name,
        Category::new(category_id, category_name),
        PetStatus::Available,
    ))?;
    let resp = pet.created();
    ctx.expect_status(resp, 200)?;
    expect_schema(resp, &pet_schema())?;
    expect_field(resp, "name", name)?;
    let category = resp.field("category").cloned().unwrap_or_default();
    if category.get("name").and_then(|n| n.as_str()) != Some(category_name) {
        return Err(CheckError::FieldMismatch {
            field: "category.name".to_string(),
            expected: category_name.into(),
            actual: category.get("name").cloned().unwrap_or_default(),
        });
    }
    tracing::info!("pet {name} created");
    Ok(())
}

/// Updating the stock pet changes name and status.
///
/// # Errors
///
/// First failed check.
pub fn update(ctx: &ScenarioContext<'_>, (name, status): (&str, PetStatus)) -> Result<(), CheckError> {
    let pet = ctx.provision(stock_pet())?;
    let updated = pet.renamed(name, status);
    tracing::info!("updating pet {}: name -> {name}, status -> {status}", pet.id);

    let resp = ctx.client().update_pet(&updated)?;
    ctx.expect_status(&resp, 200)?;
    expect_schema(&resp, &pet_schema())?;
    expect_field(&resp, "name", name)?;
    expect_field(&resp, "status", status.as_str())?;
    tracing::info!("pet {} updated", pet.id);
    Ok(())
}

/// Applying the same update twice leaves the same state on the next read.
///
/// # Errors
///
/// First failed check.
pub fn update_idempotent(ctx: &ScenarioContext<'_>) -> Result<(), CheckError> {
    let pet = ctx.provision(stock_pet())?;
    let updated = pet.renamed("FluffyTwice", PetStatus::Sold);

    for attempt in 1..=2 {
        tracing::info!("update attempt {attempt} for pet {}", pet.id);
        let resp = ctx.client().update_pet(&updated)?;
        ctx.expect_status(&resp, 200)?;
    }

    let resp = ctx.client().get_pet(pet.id)?;
    ctx.expect_status(&resp, 200)?;
    expect_schema(&resp, &pet_schema())?;
    let stored: Pet = resp.decode()?;
    if stored.name != updated.name || stored.status != updated.status {
        return Err(CheckError::FieldMismatch {
            field: "pet".to_string(),
            expected: serde_json::to_value(&updated).unwrap_or_default(),
            actual: resp.body.clone().unwrap_or_default(),
        });
    }
    Ok(())
}

/// After deletion the pet is gone, and deleting again never brings it back.
///
/// # Errors
///
/// First failed check.
pub fn delete(
    ctx: &ScenarioContext<'_>,
    (id, name, category_id, category_name): (i64, &str, i64, &str),
) -> Result<(), CheckError> {
    tracing::info!("creating pet {id} for deletion");
    let pet = ctx.provision(Pet::new(
        id,
        name,
        Category::new(category_id, category_name),
        PetStatus::Available,
    ))?;

    tracing::info!("deleting pet {id}");
    let resp = ctx.client().delete_pet(pet.id)?;
    ctx.expect_status(&resp, 200)?;
    ctx.expect_status(&ctx.client().get_pet(pet.id)?, 404)?;

    expect_gone(&ctx.client().delete_pet(pet.id)?)?;
    ctx.expect_status(&ctx.client().get_pet(pet.id)?, 404)?;
    tracing::info!("pet {id} deleted");
    Ok(())
}

/// Create a pending pet, delete it, and see it disappear.
///
/// # Errors
///
/// First failed check.
pub fn lifecycle(ctx: &ScenarioContext<'_>) -> Result<(), CheckError> {
    let pet = ctx.provision(test_pet(PetStatus::Pending))?;
    let created = pet.created();
    ctx.expect_status(created, 200)?;
    expect_field(created, "status", "pending")?;

    ctx.expect_status(&ctx.client().delete_pet(TEST_PET_ID)?, 200)?;
    ctx.expect_status(&ctx.client().get_pet(TEST_PET_ID)?, 404)?;
    Ok(())
}

/// A freshly created pet shows up under its status.
///
/// # Errors
///
/// First failed check.
pub fn find_by_status(ctx: &ScenarioContext<'_>, status: PetStatus) -> Result<(), CheckError> {
    let pet = ctx.provision(Pet {
        status,
        ..stock_pet()
    })?;

    let resp = ctx.client().find_pets_by_status(status)?;
    ctx.expect_status(&resp, 200)?;
    expect_schema(&resp, &pet_list_schema())?;

    let listed = resp
        .body
        .as_ref()
        .and_then(|b| b.as_array())
        .is_some_and(|pets| pets.iter().any(|p| p.get("id").and_then(|v| v.as_i64()) == Some(pet.id)));
    if !listed {
        return Err(CheckError::FieldMismatch {
            field: "id".to_string(),
            expected: pet.id.into(),
            actual: serde_json::Value::Null,
        });
    }
    tracing::info!("pet {} listed under {status}", pet.id);
    Ok(())
}

/// Uploading an image to an existing pet is accepted.
///
/// # Errors
///
/// First failed check, or a local file error.
pub fn upload_image(ctx: &ScenarioContext<'_>) -> Result<(), CheckError> {
    let pet = ctx.provision(stock_pet())?;

    let image = tempfile::Builder::new()
        .prefix("petcheck-")
        .suffix(".png")
        .tempfile()
        .and_then(|mut f| f.write_all(FAKE_PNG).map(|()| f))
        .map_err(|e| CheckError::Io {
            path: "temporary image".to_string(),
            message: e.to_string(),
        })?;

    tracing::info!("uploading image for pet {}", pet.id);
    let resp = ctx.client().upload_pet_image(pet.id, image.path())?;
    ctx.expect_status(&resp, 200)?;
    expect_schema(&resp, &api_response_schema())?;
    Ok(())
}

/// Reading an id nobody created yields 404.
///
/// # Errors
///
/// First failed check.
pub fn missing_returns_404(ctx: &ScenarioContext<'_>) -> Result<(), CheckError> {
    let id = ids::unique_pet_id();
    tracing::info!("reading unknown pet {id}");
    ctx.expect_status(&ctx.client().get_pet(id)?, 404)
}
