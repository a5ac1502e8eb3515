//! Resource payloads exchanged with the Petstore API
//!
//! Field names follow the API's camelCase wire format. The remote server owns
//! all state; these types only describe what is sent and read back.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a pet in the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PetStatus {
    Available,
    Pending,
    Sold,
}

impl PetStatus {
    /// Every status, in the order scenarios are parameterized over.
    pub const ALL: [Self; 3] = [Self::Available, Self::Pending, Self::Sold];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Pending => "pending",
            Self::Sold => "sold",
        }
    }
}

impl std::fmt::Display for PetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

impl Category {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
}

/// A pet record. Identity is `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    pub id: i64,
    pub name: String,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub photo_urls: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
    pub status: PetStatus,
}

impl Pet {
    pub fn new(id: i64, name: impl Into<String>, category: Category, status: PetStatus) -> Self {
        Self {
            id,
            name: name.into(),
            category,
            photo_urls: Vec::new(),
            tags: Vec::new(),
            status,
        }
    }

    /// Copy of this pet with a new name and status, keeping identity and category.
    #[must_use]
    pub fn renamed(&self, name: impl Into<String>, status: PetStatus) -> Self {
        Self {
            name: name.into(),
            status,
            ..self.clone()
        }
    }
}

/// Status of a store order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Placed,
    Approved,
    Delivered,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    pub pet_id: i64,
    pub quantity: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ship_date: Option<String>,
    pub status: OrderStatus,
    #[serde(default)]
    pub complete: bool,
}

impl Order {
    #[must_use]
    pub fn placed(id: i64, pet_id: i64, quantity: i32) -> Self {
        Self {
            id,
            pet_id,
            quantity,
            ship_date: None,
            status: OrderStatus::Placed,
            complete: false,
        }
    }
}

/// A user account. `username` is the natural key for lookup, update and delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub user_status: i32,
}

impl User {
    /// The stock account used by user scenarios: John Doe, reachable at
    /// `<username>@example.com`.
    pub fn sample(id: i64, username: impl Into<String>) -> Self {
        let username = username.into();
        Self {
            id,
            email: format!("{username}@example.com"),
            username,
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            password: "password123".to_string(),
            phone: "+1234567890".to_string(),
            user_status: 1,
        }
    }

    #[must_use]
    pub fn with_names(&self, first_name: &str, last_name: &str) -> Self {
        Self {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            ..self.clone()
        }
    }
}

/// Generic reply of the upload endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub code: i32,
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn pet_serializes_with_wire_names() {
        let pet = Pet::new(124, "TestPet", Category::new(2, "Cats"), PetStatus::Pending);
        let value = serde_json::to_value(&pet).unwrap();
        assert_eq!(
            value,
            json!({
                "id": 124,
                "name": "TestPet",
                "category": {"id": 2, "name": "Cats"},
                "status": "pending"
            })
        );
    }

    #[test]
    fn pet_deserializes_server_extras() {
        let body = json!({
            "id": 7,
            "name": "Rex",
            "category": {"id": 1, "name": "Dogs"},
            "photoUrls": ["a.png"],
            "tags": [{"id": 3, "name": "good"}],
            "status": "sold"
        });
        let pet: Pet = serde_json::from_value(body).unwrap();
        assert_eq!(pet.photo_urls, vec!["a.png".to_string()]);
        assert_eq!(pet.tags[0].name, "good");
        assert_eq!(pet.status, PetStatus::Sold);
    }

    #[test]
    fn renamed_keeps_identity() {
        let pet = Pet::new(1, "Fluffy", Category::new(1, "Dogs"), PetStatus::Available);
        let updated = pet.renamed("FluffyMax", PetStatus::Sold);
        assert_eq!(updated.id, 1);
        assert_eq!(updated.category, pet.category);
        assert_eq!(updated.name, "FluffyMax");
        assert_eq!(updated.status, PetStatus::Sold);
    }

    #[test]
    fn user_uses_camel_case() {
        let user = User::sample(5, "user_abc");
        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value["firstName"], "John");
        assert_eq!(value["userStatus"], 1);
        assert_eq!(value["email"], "user_abc@example.com");
    }

    #[test]
    fn order_status_lowercase() {
        let order = Order::placed(3, 124, 2);
        let value = serde_json::to_value(&order).unwrap();
        assert_eq!(value["petId"], 124);
        assert_eq!(value["status"], "placed");
        assert!(value.get("shipDate").is_none());
    }

    #[test]
    fn status_display_matches_wire() {
        for status in PetStatus::ALL {
            let wire = serde_json::to_value(status).unwrap();
            assert_eq!(wire, json!(status.to_string()));
        }
    }
}
