pub mod client;
pub mod ticket;
