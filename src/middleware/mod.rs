pub mod auth;

pub use auth::{AuthUser, Authenticator, CoachUser, SwimmerUser};
