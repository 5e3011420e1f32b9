pub mod messages;
pub mod view;
