pub mod contact;
pub mod content;
pub mod events;
pub mod gallery;
pub mod root;
pub mod team;
pub mod volunteer;
