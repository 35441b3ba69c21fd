pub mod accounts;
pub mod middleware;
pub mod password;
pub mod session;
