use super::activity::ActivityRecorder;
use crate::domain::catalog::{Category, MenuItem, MenuItemInput, validate_category_name};
use crate::domain::new_id;
use crate::domain::ports::SharedCatalogStore;
use crate::error::{AppError, Result};
use serde_json::json;
use tracing::info;

/// Menu items and categories, for the storefront and the admin back office.
#[derive(Clone)]
pub struct CatalogService {
    catalog: SharedCatalogStore,
    activity: ActivityRecorder,
}

impl CatalogService {
    pub fn new(catalog: SharedCatalogStore, activity: ActivityRecorder) -> Self {
        Self { catalog, activity }
    }

    pub async fn menu_items(&self) -> Result<Vec<MenuItem>> {
        self.catalog.menu_items().await
    }

    pub async fn categories(&self) -> Result<Vec<Category>> {
        self.catalog.categories().await
    }

    pub async fn create_menu_item(&self, input: MenuItemInput, actor: Option<&str>) -> Result<MenuItem> {
        input.validate()?;
        let item = input.into_item(new_id());
        self.catalog.save_menu_item(item.clone()).await?;
        info!(item_id = %item.id, name = %item.name, "Menu item created");
        self.activity
            .admin_action(
                actor,
                format!("Added menu item: {}", item.name),
                json!({ "menuItemId": item.id, "name": item.name, "price": item.price }),
            )
            .await;
        Ok(item)
    }

    pub async fn update_menu_item(
        &self,
        id: &str,
        input: MenuItemInput,
        actor: Option<&str>,
    ) -> Result<MenuItem> {
        input.validate()?;
        if self.catalog.menu_item(id).await?.is_none() {
            return Err(AppError::NotFound(format!("Menu item {id}")));
        }
        let item = input.into_item(id.to_string());
        self.catalog.save_menu_item(item.clone()).await?;
        self.activity
            .admin_action(
                actor,
                format!("Updated menu item: {}", item.name),
                json!({ "menuItemId": item.id, "name": item.name, "price": item.price }),
            )
            .await;
        Ok(item)
    }

    pub async fn delete_menu_item(&self, id: &str, actor: Option<&str>) -> Result<()> {
        if !self.catalog.delete_menu_item(id).await? {
            return Err(AppError::NotFound(format!("Menu item {id}")));
        }
        self.activity
            .admin_action(actor, "Deleted a menu item", json!({ "menuItemId": id }))
            .await;
        Ok(())
    }

    pub async fn create_category(&self, name: &str, actor: Option<&str>) -> Result<Category> {
        validate_category_name(name)?;
        let category = Category {
            id: new_id(),
            name: name.trim().to_string(),
        };
        self.catalog.save_category(category.clone()).await?;
        self.activity
            .admin_action(
                actor,
                format!("Added category: {}", category.name),
                json!({ "categoryId": category.id }),
            )
            .await;
        Ok(category)
    }

    pub async fn rename_category(&self, id: &str, name: &str, actor: Option<&str>) -> Result<Category> {
        validate_category_name(name)?;
        let Some(mut category) = self.catalog.category(id).await? else {
            return Err(AppError::NotFound(format!("Category {id}")));
        };
        category.name = name.trim().to_string();
        self.catalog.save_category(category.clone()).await?;
        self.activity
            .admin_action(
                actor,
                format!("Renamed category to: {}", category.name),
                json!({ "categoryId": category.id }),
            )
            .await;
        Ok(category)
    }

    pub async fn delete_category(&self, id: &str, actor: Option<&str>) -> Result<()> {
        if !self.catalog.delete_category(id).await? {
            return Err(AppError::NotFound(format!("Category {id}")));
        }
        self.activity
            .admin_action(actor, "Deleted a category", json!({ "categoryId": id }))
            .await;
        Ok(())
    }
}
