use rust_decimal::Decimal;
use tracing::{info, instrument};

use crate::actor_framework::Query;
use crate::auth::AccessControl;
use crate::config::SeedConfig;
use crate::domain::{Product, ProductCreate, User, UserCreate};

use super::{StoreSystem, SystemError};

/// What a seeding run left behind.
#[derive(Debug)]
pub struct SeedReport {
    pub admin: User,
    pub products_created: usize,
    pub admin_token: Option<String>,
}

fn sample_products() -> Vec<ProductCreate> {
    vec![
        ProductCreate::new("Red T-Shirt Men", "red-tshirtmen", Decimal::new(9999, 2), 50)
            .with_category("Clothing")
            .with_image("https://tse1.explicit.bing.net/th/id/OIP.4ykESxxHfPd39NGTMVRaGgHaE8")
            .with_description("Comfortable cotton t-shirt"),
        ProductCreate::new("Blue Jeans Women", "blue-jeans-women", Decimal::new(14999, 2), 30)
            .with_category("Clothing")
            .with_image("https://tse1.mm.bing.net/th/id/OIP.J08V2I24Z7GI9prn8rRiBgHaJ4")
            .with_description("Stylish blue jeans"),
        ProductCreate::new("Wireless Mouse", "wireless-mouse", Decimal::new(22499, 2), 100)
            .with_category("Electronics")
            .with_image("https://mytarget.my/wp-content/uploads/2021/01/LOGITECH-WIRELESS-MOUSE-M185-BLUE-2048x2048.jpg")
            .with_description("Ergonomic wireless mouse"),
    ]
}

/// Creates the admin account and sample catalog, skipping whatever already exists.
#[instrument(skip_all, fields(admin_email = %config.admin_email))]
pub async fn seed(system: &StoreSystem, config: &SeedConfig, access: &AccessControl) -> Result<SeedReport, SystemError> {
    let admin = match system.user_client.find_by_email(&config.admin_email).await? {
        Some(existing) => {
            info!("Admin exists");
            existing
        }
        None => {
            let hash = access.passwords().hash(&config.admin_password).await?;
            let admin = system
                .user_client
                .create_user(
                    UserCreate::admin(config.admin_name.clone(), config.admin_email.clone()).with_password_hash(hash),
                )
                .await?;
            info!(user_id = %admin.id, "Admin created");
            admin
        }
    };

    let mut products_created = 0;
    for params in sample_products() {
        let slug = params.slug.clone();
        let existing = system
            .product_client
            .list_products(Query::new(move |p: &Product| p.slug == slug))
            .await?;
        if existing.is_empty() {
            let product = system.product_client.create_product(params).await?;
            info!(product_id = %product.id, name = %product.name, "Seeded");
            products_created += 1;
        } else {
            info!(slug = %params.slug, "Product exists");
        }
    }

    let admin_token = if config.log_admin_token {
        Some(access.tokens().issue(&admin)?)
    } else {
        None
    };

    Ok(SeedReport {
        admin,
        products_created,
        admin_token,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{Passwords, TokenAuthority};
    use crate::domain::Role;

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let system = StoreSystem::new(10);
        let access = AccessControl::new(
            TokenAuthority::new("seed-secret", 60),
            Passwords::new(4),
            system.user_client.clone(),
        );
        let config = SeedConfig {
            log_admin_token: true,
            ..SeedConfig::default()
        };

        let first = seed(&system, &config, &access).await.unwrap();
        assert!(first.admin.is_admin());
        assert_eq!(first.products_created, 3);
        let token = first.admin_token.expect("token requested");
        assert_eq!(access.tokens().verify(&token).unwrap().sub, first.admin.id);

        let login = access.login("admin@example.com", "Admin@12345", Role::Admin).await.unwrap();
        assert_eq!(login.user.id, first.admin.id);

        let second = seed(&system, &SeedConfig::default(), &access).await.unwrap();
        assert_eq!(second.admin.id, first.admin.id);
        assert_eq!(second.products_created, 0);
        assert!(second.admin_token.is_none());

        let mouse = system
            .product_client
            .list_products(Query::new(|p: &Product| p.slug == "wireless-mouse"))
            .await
            .unwrap();
        assert_eq!(mouse[0].price, Decimal::new(22499, 2));
        assert_eq!(mouse[0].stock, 100);

        system.shutdown().await.unwrap();
    }
}
