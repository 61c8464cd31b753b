//! Account commands (write operations)

pub mod change_password;
pub mod login;
pub mod signup;

pub use change_password::{ChangePasswordCommand, ChangePasswordError};
pub use login::{LoginCommand, LoginError};
pub use signup::{SignupCommand, SignupError};
