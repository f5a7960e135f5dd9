#![cfg_attr(not(test), no_std)]

#[macro_use]
mod log;
mod error;

pub mod channel;
pub mod config;
pub mod device;
pub mod interface;
pub mod params;
pub mod registers;

pub use crate::channel::{ChannelConfig, ChannelReadback};
pub use crate::config::Config;
pub use crate::device::Ad4130;
pub use crate::error::{Error, Result};
