pub mod app;
pub mod command;
pub mod dispatch;
pub mod input;
pub mod message;
pub mod render;
pub mod theme;
pub mod update;

#[cfg(test)]
mod fixtures;

pub use app::run;
