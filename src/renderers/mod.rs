pub mod http;
pub mod renderer;
pub mod web;

pub use http::HttpRenderer;
pub use renderer::Renderer;
pub use web::WebDriverRenderer;
