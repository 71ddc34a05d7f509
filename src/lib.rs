pub mod app;
pub mod config;
pub mod display;
pub mod engine;
pub mod error;
pub mod scheduler;
pub mod strap;

mod link;
pub use self::link::{LinkClient, LinkTransport, ReadReply, SimStrap, TransportEvent};
