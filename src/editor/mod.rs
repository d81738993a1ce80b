mod session;
mod store;

pub use session::{EditorSession, SessionError, SessionState};
pub use store::{ContentStore, DbContentStore};
