pub mod case;
pub mod case_request;
pub mod message;
pub mod notification;
pub mod police_station;
pub mod user;
