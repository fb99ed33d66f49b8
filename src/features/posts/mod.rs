//! Blog post management.
//!
//! Posts are the documents categories classify. Slugs are derived from
//! titles (or supplied explicitly) and kept unique with an incrementing
//! suffix; the first transition to published stamps the publication time.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/posts` | List posts, newest first |
//! | GET | `/posts/{slug}` | Get a published post |
//! | POST | `/posts` | Create post |
//! | PUT | `/posts` | Update post (partial) |
//! | DELETE | `/posts?id=` | Delete post |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::PostService;
