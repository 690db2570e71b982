//! HTML surface: the intake form, link creation and the stats page.
//!
//! Pages are rendered with Askama templates from `templates/`.

pub mod handlers;
pub mod routes;

pub use routes::create_web_router;
