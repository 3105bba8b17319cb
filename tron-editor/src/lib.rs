pub mod models;
pub mod changes;
pub mod export;
pub mod session;

pub use models::{BenefitField, BenefitRef, EditingContext, EditorState, Intent};
pub use changes::{apply, ChangeHandler, EditError};
pub use export::{export, filtered_campaign, ExportError};
pub use session::{EditorSession, ErrorClass, LoadSource, LoadedSnapshot, SessionError, SessionView};
