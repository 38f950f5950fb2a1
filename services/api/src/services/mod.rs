//! Service flows orchestrating repositories, mail dispatch and session tokens

pub mod accounts;

pub use accounts::AccountService;
