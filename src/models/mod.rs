pub mod from_row;
pub mod swim_set;
pub mod training_session;
pub mod user;

pub use from_row::FromSqliteRow;
pub use swim_set::{CreateSet, CreatedSet, NewSet, Stroke, SwimSet};
pub use training_session::{CreateSession, CreatedSession, SessionWithSets, TrainingSession};
pub use user::{LoginCredentials, NewUser, Signup, User, UserProfile, UserRole};
