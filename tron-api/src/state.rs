use std::sync::Arc;

use tokio::sync::Mutex;
use tron_editor::EditorSession;

/// One open document per server process
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<Mutex<EditorSession>>,
}

impl AppState {
    pub fn new(session: EditorSession) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
        }
    }
}
