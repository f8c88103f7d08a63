use chrono::Utc;
use rust_decimal::Decimal;
use tracing::debug;

use crate::actor_framework::Entity;
use crate::domain::{Product, ProductCreate, ProductPatch, ReservedStock};
use super::actions::{ProductAction, ProductActionResult};
use super::error::ProductError;

fn validate(name: &str, slug: &str, price: Decimal) -> Result<(), ProductError> {
    if name.trim().is_empty() {
        return Err(ProductError::ValidationError("name is required".to_string()));
    }
    if slug.trim().is_empty() {
        return Err(ProductError::ValidationError("slug is required".to_string()));
    }
    if price < Decimal::ZERO {
        return Err(ProductError::ValidationError(format!("price must not be negative, got {price}")));
    }
    Ok(())
}

impl Entity for Product {
    type Id = String;
    type CreateParams = ProductCreate;
    type Patch = ProductPatch;
    type Action = ProductAction;
    type ActionResult = ProductActionResult;
    type Error = ProductError;

    fn id(&self) -> &String { &self.id }

    /// Creates a new Product from creation parameters.
    ///
    /// # Errors
    /// Rejects an empty name or slug and a negative price.
    fn from_create_params(id: String, params: ProductCreate) -> Result<Self, ProductError> {
        validate(&params.name, &params.slug, params.price)?;
        let now = Utc::now();
        Ok(Self {
            id,
            name: params.name.trim().to_string(),
            slug: params.slug.trim().to_string(),
            category: params.category,
            weight: params.weight,
            price: params.price,
            stock: params.stock,
            images: params.images,
            description: params.description,
            is_deleted: false,
            created_at: now,
            updated_at: now,
        })
    }

    /// Applies the present fields of the patch, then re-validates the result.
    fn on_update(&mut self, patch: ProductPatch) -> Result<(), ProductError> {
        if let Some(name) = patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(slug) = patch.slug {
            self.slug = slug.trim().to_string();
        }
        if let Some(category) = patch.category {
            self.category = Some(category);
        }
        if let Some(weight) = patch.weight {
            self.weight = Some(weight);
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(stock) = patch.stock {
            self.stock = stock;
        }
        if let Some(images) = patch.images {
            self.images = images;
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
        validate(&self.name, &self.slug, self.price)?;
        self.updated_at = Utc::now();
        Ok(())
    }

    fn conflicts_with(&self, other: &Self) -> Option<ProductError> {
        self.slug
            .eq_ignore_ascii_case(&other.slug)
            .then(|| ProductError::DuplicateSlug(self.slug.clone()))
    }

    /// Handles product-specific actions.
    ///
    /// # Actions
    /// - `CheckStock`: Returns the current stock level
    /// - `ReserveStock(amount)`: Decrements stock and snapshots name and price
    /// - `ReleaseStock(amount)`: Adds stock back
    /// - `SoftDelete`: Flags the product as deleted
    fn handle_action(&mut self, action: ProductAction) -> Result<ProductActionResult, ProductError> {
        match action {
            ProductAction::CheckStock => Ok(ProductActionResult::CheckStock(self.stock)),
            ProductAction::ReserveStock(amount) => {
                if amount == 0 {
                    return Err(ProductError::InvalidQuantity(amount));
                }
                // Hidden products cannot be bought.
                if self.is_deleted {
                    return Err(ProductError::NotFound(self.id.clone()));
                }
                if amount > self.stock {
                    return Err(ProductError::InsufficientStock {
                        product: self.name.clone(),
                        requested: amount,
                        available: self.stock,
                    });
                }
                self.stock -= amount;
                debug!(product_id = %self.id, amount, remaining = self.stock, "Stock reserved");
                Ok(ProductActionResult::ReserveStock(ReservedStock {
                    product_id: self.id.clone(),
                    name: self.name.clone(),
                    price: self.price,
                    qty: amount,
                }))
            }
            ProductAction::ReleaseStock(amount) => {
                self.stock = self.stock.saturating_add(amount);
                debug!(product_id = %self.id, amount, remaining = self.stock, "Stock released");
                Ok(ProductActionResult::ReleaseStock(self.stock))
            }
            ProductAction::SoftDelete => {
                self.is_deleted = true;
                self.updated_at = Utc::now();
                Ok(ProductActionResult::SoftDelete(self.clone()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(price: i64, stock: u32) -> Product {
        Product::from_create_params(
            "product_1".to_string(),
            ProductCreate::new("Wireless Mouse", "wireless-mouse", Decimal::from(price), stock),
        )
        .unwrap()
    }

    #[test]
    fn test_create_validates() {
        let no_name = Product::from_create_params("p".into(), ProductCreate::new(" ", "s", Decimal::ONE, 1));
        assert!(matches!(no_name, Err(ProductError::ValidationError(_))));

        let no_slug = Product::from_create_params("p".into(), ProductCreate::new("n", "", Decimal::ONE, 1));
        assert!(matches!(no_slug, Err(ProductError::ValidationError(_))));

        let negative = Product::from_create_params("p".into(), ProductCreate::new("n", "s", Decimal::from(-1), 1));
        assert!(matches!(negative, Err(ProductError::ValidationError(_))));

        let free = Product::from_create_params("p".into(), ProductCreate::new("n", "s", Decimal::ZERO, 1));
        assert!(free.is_ok());
    }

    #[test]
    fn test_reserve_decrements_and_snapshots() {
        let mut p = product(100, 5);
        match p.handle_action(ProductAction::ReserveStock(2)).unwrap() {
            ProductActionResult::ReserveStock(reserved) => {
                assert_eq!(reserved.price, Decimal::from(100));
                assert_eq!(reserved.name, "Wireless Mouse");
                assert_eq!(reserved.qty, 2);
            }
            other => panic!("Unexpected result: {:?}", other),
        }
        assert_eq!(p.stock, 3);
    }

    #[test]
    fn test_reserve_never_goes_negative() {
        let mut p = product(100, 2);
        let err = p.handle_action(ProductAction::ReserveStock(3)).unwrap_err();
        assert_eq!(
            err,
            ProductError::InsufficientStock { product: "Wireless Mouse".into(), requested: 3, available: 2 }
        );
        assert_eq!(p.stock, 2);

        assert!(p.handle_action(ProductAction::ReserveStock(2)).is_ok());
        assert_eq!(p.stock, 0);
        assert!(p.handle_action(ProductAction::ReserveStock(1)).is_err());
    }

    #[test]
    fn test_reserve_rejects_zero_and_deleted() {
        let mut p = product(100, 2);
        assert_eq!(p.handle_action(ProductAction::ReserveStock(0)).unwrap_err(), ProductError::InvalidQuantity(0));

        p.handle_action(ProductAction::SoftDelete).unwrap();
        assert!(p.is_deleted);
        assert_eq!(
            p.handle_action(ProductAction::ReserveStock(1)).unwrap_err(),
            ProductError::NotFound("product_1".into())
        );
    }

    #[test]
    fn test_release_restores_stock() {
        let mut p = product(100, 5);
        p.handle_action(ProductAction::ReserveStock(4)).unwrap();
        match p.handle_action(ProductAction::ReleaseStock(4)).unwrap() {
            ProductActionResult::ReleaseStock(level) => assert_eq!(level, 5),
            other => panic!("Unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_update_revalidates() {
        let mut p = product(100, 5);
        let bad = ProductPatch { price: Some(Decimal::from(-5)), ..Default::default() };
        assert!(p.on_update(bad).is_err());

        let good = ProductPatch { price: Some(Decimal::new(8999, 2)), stock: Some(9), ..Default::default() };
        p.on_update(good).unwrap();
        assert_eq!(p.price, Decimal::new(8999, 2));
        assert_eq!(p.stock, 9);
    }

    #[test]
    fn test_slug_conflict_is_case_insensitive() {
        let a = product(1, 1);
        let mut b = product(1, 1);
        b.id = "product_2".into();
        b.slug = "Wireless-Mouse".into();
        assert_eq!(a.conflicts_with(&b), Some(ProductError::DuplicateSlug("wireless-mouse".into())));
    }
}
