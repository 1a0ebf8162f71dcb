//! Helper functions shared by the renderer and the HTML views

mod date;
mod html;
mod url;

pub use date::*;
pub use html::*;
pub use url::*;
