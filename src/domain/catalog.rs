use crate::error::{AppError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: Decimal,
    pub image: String,
    pub category: String,
}

/// Admin form payload for creating or editing a menu item.
///
/// `image` is a reference (URL or path) to an already uploaded picture.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Decimal,
    pub image: String,
    pub category: String,
}

impl MenuItemInput {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().chars().count() < 2 {
            return Err(AppError::ValidationError(
                "Name must be at least 2 characters.".to_string(),
            ));
        }
        if self.price < Decimal::ZERO {
            return Err(AppError::ValidationError(
                "Price must be a positive number.".to_string(),
            ));
        }
        if self.category.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Please select a category.".to_string(),
            ));
        }
        if self.image.trim().is_empty() {
            return Err(AppError::ValidationError(
                "An image reference is required.".to_string(),
            ));
        }
        Ok(())
    }

    pub fn into_item(self, id: String) -> MenuItem {
        MenuItem {
            id,
            name: self.name.trim().to_string(),
            description: self.description.filter(|d| !d.trim().is_empty()),
            price: self.price,
            image: self.image,
            category: self.category,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Category {
    pub id: String,
    pub name: String,
}

pub fn validate_category_name(name: &str) -> Result<()> {
    if name.trim().chars().count() < 2 {
        return Err(AppError::ValidationError(
            "Category name must be at least 2 characters.".to_string(),
        ));
    }
    Ok(())
}
