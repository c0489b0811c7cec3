//! External collaborators: the model oracle, its async bridge, logging.

pub mod bridge;
pub mod logging;
pub mod oracle;
