mod click;
mod link;

pub use click::{Click, NewClick, UNKNOWN_CLIENT};
pub use link::{CreateLinkForm, Link};
