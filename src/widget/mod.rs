//! UI building blocks composed by the app shell.

pub mod locate;
pub mod map_view;
pub mod search_box;
