//! Blog category management with derived post counts.
//!
//! Categories classify blog posts and may point at a parent category.
//! Slugs are derived from names and kept unique with an incrementing
//! suffix; deletion is blocked while any post still references the
//! category.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/categories` | List categories with published post counts |
//! | POST | `/categories` | Create category |
//! | PUT | `/categories` | Update category (partial) |
//! | DELETE | `/categories?id=` | Delete category if unreferenced |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::CategoryService;
