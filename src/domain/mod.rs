pub mod contact;
pub mod content;
pub mod event;
pub mod gallery;
pub mod team;
pub mod volunteer;

pub use contact::*;
pub use content::*;
pub use event::*;
pub use gallery::*;
pub use team::*;
pub use volunteer::*;
