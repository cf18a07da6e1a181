//! Record structs for the four Mart collections.
//!
//! Each collection has a stored record (`User`, `Project`, ...) returned by
//! lookups and an input struct (`NewUser`, `NewProject`, ...) accepted by
//! inserts. Records derive `Serialize`, `Deserialize`, and `JsonSchema` for
//! JSON output and schema validation.

mod project;
mod survey;
mod transaction;
mod user;

pub use project::{NewProject, Project};
pub use survey::{NewSurvey, Survey, SurveyKey};
pub use transaction::{NewTransaction, Transaction};
pub use user::{NewUser, Payment, User};
