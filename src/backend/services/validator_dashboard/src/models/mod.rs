pub mod candidate;
pub mod currency;
pub mod duty;
pub mod log;
pub mod validator;
