/// Server services
pub mod auth;
pub mod users;

pub use auth::{AuthService, Claims};
pub use users::{NewUser, UserChanges, UserService};
