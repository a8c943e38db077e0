//! Configuration module

mod site;

pub use site::HighlightConfig;
pub use site::I18nConfig;
pub use site::SiteConfig;
