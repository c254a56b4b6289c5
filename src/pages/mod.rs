//! Routed Pages

mod admin;
mod home;
mod reset;

pub use admin::AdminPage;
pub use home::HomePage;
pub use reset::ResetPage;
