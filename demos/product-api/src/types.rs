//! Product model and request payloads.

use restpack::extract::{Validate, ValidationErrors};
use serde::{Deserialize, Serialize};

/// Longest accepted product name, in characters.
pub const MAX_NAME_LEN: usize = 255;

/// A stored product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Row id.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Image URL.
    #[serde(rename = "image")]
    pub image_url: String,
    /// Unit price.
    pub price: f64,
    /// Units in stock.
    pub quantity: i64,
    /// Creation timestamp as stored by the database.
    pub created_at: String,
}

/// Body of `POST /products`.
///
/// Missing numeric fields decode as zero and fail validation as required.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateProductPayload {
    /// Display name, required.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Image URL.
    #[serde(rename = "image")]
    pub image_url: String,
    /// Unit price, required and positive.
    pub price: f64,
    /// Units in stock, required and positive.
    pub quantity: i64,
}

/// Body of `PUT /products/{id}`. The id in the path wins over the body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateProductPayload {
    /// Row id, required and positive.
    pub id: i64,
    /// Display name, required.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Image URL.
    #[serde(rename = "image")]
    pub image_url: String,
    /// Unit price, required and positive.
    pub price: f64,
    /// Units in stock, required and positive.
    pub quantity: i64,
}

// Zero is the decoded value of a missing field.
#[allow(clippy::float_cmp)]
fn check_fields(errors: &mut ValidationErrors, name: &str, price: f64, quantity: i64) {
    if name.trim().is_empty() {
        errors.required("name");
    } else if name.chars().count() > MAX_NAME_LEN {
        errors.above_max("name");
    }

    if price == 0.0 {
        errors.required("price");
    } else if price < 0.0 || price.is_nan() {
        errors.below_min("price");
    }

    if quantity == 0 {
        errors.required("quantity");
    } else if quantity < 0 {
        errors.below_min("quantity");
    }
}

impl Validate for CreateProductPayload {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_fields(&mut errors, &self.name, self.price, self.quantity);
        errors.into_result()
    }
}

impl Validate for UpdateProductPayload {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.id == 0 {
            errors.required("id");
        } else if self.id < 0 {
            errors.below_min("id");
        }
        check_fields(&mut errors, &self.name, self.price, self.quantity);
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_product_json_names() {
        let product = Product {
            id: 1,
            name: "Lamp".into(),
            description: "Desk lamp".into(),
            image_url: "img/lamp.png".into(),
            price: 19.5,
            quantity: 3,
            created_at: "2024-10-01 10:00:00".into(),
        };
        assert_eq!(
            serde_json::to_value(&product).unwrap(),
            json!({
                "id": 1,
                "name": "Lamp",
                "description": "Desk lamp",
                "image": "img/lamp.png",
                "price": 19.5,
                "quantity": 3,
                "createdAt": "2024-10-01 10:00:00"
            })
        );
    }

    #[test]
    fn test_empty_create_payload_requires_fields() {
        let payload: CreateProductPayload = serde_json::from_str("{}").unwrap();
        let errors = payload.validate().unwrap_err();

        assert_eq!(
            errors.to_details(),
            json!({
                "name": "'name' is required",
                "price": "'price' is required",
                "quantity": "'quantity' is required"
            })
        );
    }

    #[test]
    fn test_negative_values_below_min() {
        let payload = CreateProductPayload {
            name: "Lamp".into(),
            price: -1.0,
            quantity: -4,
            ..Default::default()
        };
        let errors = payload.validate().unwrap_err();
        assert_eq!(errors.get("price"), Some("'price' is less than the required minimum"));
        assert_eq!(
            errors.get("quantity"),
            Some("'quantity' is less than the required minimum")
        );
        assert!(errors.get("name").is_none());
    }

    #[test]
    fn test_long_name_above_max() {
        let payload = CreateProductPayload {
            name: "x".repeat(MAX_NAME_LEN + 1),
            price: 1.0,
            quantity: 1,
            ..Default::default()
        };
        let errors = payload.validate().unwrap_err();
        assert_eq!(errors.get("name"), Some("'name' is greater than the required maximum"));
    }

    #[test]
    fn test_update_requires_id() {
        let payload = UpdateProductPayload {
            name: "Lamp".into(),
            price: 2.5,
            quantity: 1,
            ..Default::default()
        };
        let errors = payload.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("id"), Some("'id' is required"));

        let valid = UpdateProductPayload { id: 9, ..payload };
        assert!(valid.validate().is_ok());
    }
}
