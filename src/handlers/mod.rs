pub mod auth;
pub mod form;
pub mod resources;
pub mod users;

use actix_web::web;
use serde::Serialize;
use utoipa::OpenApi;

use crate::application::IssuedToken;
use crate::domain::errors::DomainError;
use crate::errors::AppError;
use crate::models::cart::Cart;
use crate::models::cart_item::CartItem;
use crate::models::item::Item;
use crate::models::order::{Order, OrderStatus};
use crate::models::order_item::OrderItem;
use crate::models::role::Role;
use crate::models::table::DiningTable;
use crate::models::user::User;
use crate::models::user_role::UserRole;
use crate::models::vendor::Vendor;
use crate::models::vendor_admin::VendorAdmin;
use crate::models::Entity;
use crate::models::FromFields;

/// Success body: `{"data": …}`.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Runs blocking database or file work on actix's thread pool.
pub(crate) async fn blocking<T, F>(work: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, DomainError> + Send + 'static,
    T: Send + 'static,
{
    Ok(web::block(work)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??)
}

#[derive(OpenApi)]
#[openapi(
    paths(users::signup, users::login, users::current_user, users::update_user),
    components(schemas(
        User,
        Vendor,
        VendorAdmin,
        Role,
        UserRole,
        Item,
        DiningTable,
        Order,
        OrderStatus,
        OrderItem,
        Cart,
        CartItem,
        IssuedToken,
    )),
    tags(
        (name = "users", description = "Accounts and sessions"),
    )
)]
pub struct ApiDoc;

// ── Routes ───────────────────────────────────────────────────────────────────

/// `GET` and `POST` on the collection path.
fn collection<E>(path: &str) -> actix_web::Resource
where
    E: Entity,
    E::New: FromFields,
{
    web::resource(path)
        .route(web::get().to(resources::list::<E>))
        .route(web::post().to(resources::create::<E>))
}

/// `GET`, `PUT` and `DELETE` on a single record.
fn member<E>(path: &str) -> actix_web::Resource
where
    E: Entity,
    E::Changes: FromFields,
{
    web::resource(path)
        .route(web::get().to(resources::show::<E>))
        .route(web::put().to(resources::update::<E>))
        .route(web::delete().to(resources::delete::<E>))
}

/// Registers every resource. Literal paths come before `{id}` patterns.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/users").route(web::get().to(resources::list::<User>)))
        .service(web::resource("/users/signup").route(web::post().to(users::signup)))
        .service(web::resource("/users/login").route(web::post().to(users::login)))
        .service(web::resource("/users/me").route(web::get().to(users::current_user)))
        .service(
            web::resource("/users/{id}")
                .route(web::get().to(resources::show::<User>))
                .route(web::put().to(users::update_user))
                .route(web::delete().to(resources::delete::<User>)),
        )
        .service(web::resource("/vendors").route(web::get().to(resources::list::<Vendor>)))
        .service(
            web::resource("/vendors/signup").route(web::post().to(resources::create::<Vendor>)),
        )
        .service(member::<Vendor>("/vendors/{id}"))
        .service(collection::<VendorAdmin>("/vendor_admins"))
        .service(member::<VendorAdmin>("/vendor_admins/{user_id}/{vendor_id}"))
        .service(collection::<Role>("/roles"))
        .service(member::<Role>("/roles/{id}"))
        .service(collection::<UserRole>("/user_roles"))
        .service(member::<UserRole>("/user_roles/{user_id}/{role_id}"))
        .service(collection::<Item>("/items"))
        .service(member::<Item>("/items/{id}"))
        .service(collection::<DiningTable>("/tables"))
        .service(member::<DiningTable>("/tables/{id}"))
        .service(collection::<Order>("/orders"))
        .service(member::<Order>("/orders/{id}"))
        .service(collection::<OrderItem>("/order_items"))
        .service(member::<OrderItem>("/order_items/{id}"))
        .service(collection::<Cart>("/carts"))
        .service(member::<Cart>("/carts/{id}"))
        .service(collection::<CartItem>("/cart_items"))
        .service(member::<CartItem>("/cart_items/{cart_id}/{item_id}"));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_wraps_data() {
        let json = serde_json::to_value(Envelope::new("Item deleted")).unwrap();
        assert_eq!(json, serde_json::json!({ "data": "Item deleted" }));
    }

    #[actix_web::test]
    async fn blocking_maps_domain_errors() {
        let err = blocking(|| Err::<(), _>(DomainError::NotFound("Cart")))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref e) if e == "Cart"));
    }

    #[test]
    fn openapi_lists_user_routes() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/users/login"));
        assert!(doc.paths.paths.contains_key("/users/{id}"));
    }
}
