pub mod common;
pub mod compose;
pub mod debug;
pub mod feed;
pub mod forward;
pub mod help_overlay;
pub mod notice;
pub mod notifications;
pub mod spinner;
pub mod status_bar;
pub mod wizard;

#[cfg(test)]
pub mod tests;
