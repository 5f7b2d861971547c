pub mod client;
pub mod objects;
