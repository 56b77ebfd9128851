pub mod case;
pub mod case_request;
pub mod common;
pub mod config;
pub mod error;
pub mod message;
pub mod notification;
pub mod police_station;
pub mod user;

pub use case::*;
pub use case_request::*;
pub use common::*;
pub use config::*;
pub use error::*;
pub use message::*;
pub use notification::*;
pub use police_station::*;
pub use user::*;
