//! Link intake and reporting: everything around the redirect path that
//! writes links or reads them back with their clicks.

pub mod intake;
pub mod slug;
pub mod stats;

pub use intake::{apply_timestamp, IntakeError, LinkService};
pub use slug::generate_slug;
pub use stats::{StatsReport, StatsReporter, RECENT_CLICKS_LIMIT};
