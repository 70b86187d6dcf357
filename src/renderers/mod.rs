pub mod renderer;
pub mod web;

pub use renderer::PageRenderer;
pub use web::WebRenderer;
