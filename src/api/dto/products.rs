/*
 * Responsibility
 * - Request/response DTOs for products
 * - Ids go out encoded; internal ids never leak
 */
use serde::{Deserialize, Serialize};

use crate::repos::product_repo::{NewProduct, ProductPatch, ProductRow};
use crate::services::id_codec::{IdCodec, Result as IdCodecResult};

fn check_text(value: &str, empty: &'static str) -> Result<(), &'static str> {
    if value.trim().is_empty() {
        return Err(empty);
    }
    Ok(())
}

fn check_price(price: f64) -> Result<(), &'static str> {
    if !price.is_finite() || price < 0.0 {
        return Err("price must be a non-negative number");
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub category: String,
    pub price: f64,
}

impl CreateProductRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        check_text(&self.name, "name is required")?;
        check_text(&self.category, "category is required")?;
        check_price(self.price)
    }

    pub fn into_new_product(self) -> NewProduct {
        NewProduct {
            name: self.name.trim().to_string(),
            category: self.category.trim().to_string(),
            price: self.price,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
}

impl UpdateProductRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if let Some(name) = &self.name {
            check_text(name, "name cannot be empty")?;
        }
        if let Some(category) = &self.category {
            check_text(category, "category cannot be empty")?;
        }
        if let Some(price) = self.price {
            check_price(price)?;
        }
        Ok(())
    }

    pub fn into_patch(self) -> ProductPatch {
        ProductPatch {
            name: self.name.map(|s| s.trim().to_string()),
            category: self.category.map(|s| s.trim().to_string()),
            price: self.price,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProductResponse {
    pub id: String, // encoded
    pub name: String,
    pub category: String,
    pub price: f64,
}

impl ProductResponse {
    pub fn from_row(row: ProductRow, codec: &IdCodec) -> IdCodecResult<Self> {
        Ok(Self {
            id: codec.encode(row.id)?,
            name: row.name,
            category: row.category,
            price: row.price,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_requires_name_category_and_sane_price() {
        let ok = CreateProductRequest {
            name: "Laptop".into(),
            category: "Electronics".into(),
            price: 0.0,
        };
        assert!(ok.validate().is_ok());

        let blank = CreateProductRequest {
            name: "  ".into(),
            ..ok
        };
        assert_eq!(blank.validate(), Err("name is required"));

        let negative = CreateProductRequest {
            name: "Laptop".into(),
            category: "Electronics".into(),
            price: -1.0,
        };
        assert!(negative.validate().is_err());
    }

    #[test]
    fn update_checks_only_present_fields() {
        assert!(UpdateProductRequest::default().validate().is_ok());

        let req = UpdateProductRequest {
            category: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(req.validate(), Err("category cannot be empty"));

        let req = UpdateProductRequest {
            price: Some(f64::NAN),
            ..Default::default()
        };
        assert!(req.validate().is_err());
    }
}
