mod item;

#[cfg(feature = "github")]
pub mod github;

pub use item::*;

pub type Timestamp = chrono::DateTime<chrono::Utc>;
