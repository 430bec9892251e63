mod lobby;
mod server;
mod session;

pub use lobby::*;
pub use server::*;
pub use session::*;
