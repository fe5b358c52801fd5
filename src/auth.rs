//! Consumer credentials, bearer material, and the token lifecycle manager.

pub mod credential;
pub mod manager;
pub mod token;

pub use credential::*;
pub use manager::*;
pub use token::*;
