pub mod analyzers;
pub mod error;
pub mod filter;
pub mod output;
pub mod parser;
pub mod record;
pub mod schema;
pub mod session;
pub mod shell;

pub use error::DashboardError;
pub use record::{Account, AccountDataset, EngagementRecord};
pub use session::{Dashboard, Session, SessionConfig};
