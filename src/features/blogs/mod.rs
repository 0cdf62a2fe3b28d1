//! Blog posts with uploaded cover images.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | POST | `/api/blogs` | No | Create a post (multipart, image uploaded first) |
//! | GET | `/api/blogs` | No | List every post |
//! | GET | `/api/blogs/{id}` | No | Get a post by public id |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod upload;

pub use repositories::PgBlogRepository;
pub use routes::BlogState;
pub use services::BlogService;
