// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

#![doc = include_str!("../README.md")]
#![no_std]

#[cfg(feature = "std")]
extern crate std;

mod adapter;
mod codec;
mod error;
mod frame;
mod transport;

pub use adapter::Adapter;
pub use codec::{Encoded, decode, encode, encode_for_bus, map_status};
pub use error::*;
pub use frame::*;
pub use transport::{Config, Firmware, MethodNames, Transport};
