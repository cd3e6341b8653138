pub mod constants;
pub mod session;
pub mod slots;
