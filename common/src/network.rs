pub mod mac;
pub mod subnet;
