mod project;
mod survey;
mod transaction;
mod user;

pub use project::ProjectCommands;
pub use survey::{SurveyCommands, SurveyKeyArgs};
pub use transaction::TransactionCommands;
pub use user::UserCommands;
