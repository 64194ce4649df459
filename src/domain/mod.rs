pub mod credentials;
pub mod income;
pub mod ports;
