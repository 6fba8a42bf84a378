//! aadauth Core - Domain types and traits for the Azure AD profile provider

pub mod error;
pub mod oauth;
pub mod options;
pub mod profile;
pub mod traits;


pub use error::*;
pub use oauth::*;
pub use options::*;
pub use profile::*;
pub use traits::*;
