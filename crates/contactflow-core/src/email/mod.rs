/// Email composition and templates
pub mod composer;
pub mod templates;

pub use composer::compose;
