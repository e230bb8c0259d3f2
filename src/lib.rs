#![forbid(unsafe_code)]

pub mod assets;
pub mod build;
pub mod cli;
pub mod config;
pub mod formats;
pub mod html;
pub mod logging;
pub mod markdown;
pub mod sidebar;
pub mod sitemap;
pub mod summary;
pub mod template;
