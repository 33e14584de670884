//! Configuration domain module

mod app_config;
mod collision;

pub use app_config::{default_music_dir, AppConfig};
pub use collision::CollisionPolicy;
