// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Firmware mailbox frames (ACPI SMBus-over-EC register model).

use super::*;
use crate::error::*;

/// Protocol byte values.
pub mod protocol {
    pub const WRITE: u8 = 0x00;
    pub const READ: u8 = 0x01;
    pub const QUICK: u8 = 0x02;
    pub const BYTE: u8 = 0x04;
    pub const BYTE_DATA: u8 = 0x06;
    pub const WORD_DATA: u8 = 0x08;
    pub const BLOCK_DATA: u8 = 0x0A;
    pub const PROC_CALL: u8 = 0x0C;
    pub const BLOCK_PROC_CALL: u8 = 0x0D;
    pub const PEC: u8 = 0x80;
}

/// Size of the command header (protocol, address, command, bus, byte count).
pub const COMMAND_HEADER_LEN: usize = 5;

/// Maximum size of a serialized command.
pub const MAX_COMMAND_LEN: usize = COMMAND_HEADER_LEN + BLOCK_MAX;

/// The command buffer handed to the firmware's execute method.
///
/// Only the first `byte_count` bytes of `data` are transmitted.
#[cfg_attr(all(feature = "defmt", target_os = "none"), derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FirmwareCommand {
    pub(crate) protocol: u8,
    pub(crate) address: u8,
    pub(crate) command: u8,
    pub(crate) bus: u8,
    pub(crate) byte_count: u8,
    pub(crate) data: [u8; BLOCK_MAX],
}

impl FirmwareCommand {
    pub(crate) const fn new(address: Address, command: u8, bus: u8) -> Self {
        Self {
            protocol: protocol::WRITE,
            address: address << 1,
            command,
            bus,
            byte_count: 0,
            data: [0; BLOCK_MAX],
        }
    }

    pub(crate) fn set_block(&mut self, block: &Block) {
        let len = block.len();
        self.data[..len].copy_from_slice(block);
        self.byte_count = block.byte_count();
    }

    /// Protocol byte: direction, transaction size and PEC flag.
    #[must_use]
    pub const fn protocol(&self) -> u8 {
        self.protocol
    }

    /// Device address, already shifted by one bit.
    #[must_use]
    pub const fn address(&self) -> u8 {
        self.address
    }

    #[must_use]
    pub const fn command(&self) -> u8 {
        self.command
    }

    #[must_use]
    pub const fn bus(&self) -> u8 {
        self.bus
    }

    #[must_use]
    pub const fn byte_count(&self) -> u8 {
        self.byte_count
    }

    /// The whole data array, including bytes that are not transmitted.
    #[must_use]
    pub const fn data(&self) -> &[u8; BLOCK_MAX] {
        &self.data
    }

    /// Number of bytes of the serialized command.
    #[must_use]
    pub const fn len(&self) -> usize {
        COMMAND_HEADER_LEN + self.byte_count as usize
    }

    /// Serialize the command into `buf`.
    pub fn encode<'b>(&self, buf: &'b mut [u8; MAX_COMMAND_LEN]) -> &'b [u8] {
        let len = self.len();
        buf[0] = self.protocol;
        buf[1] = self.address;
        buf[2] = self.command;
        buf[3] = self.bus;
        buf[4] = self.byte_count;
        buf[COMMAND_HEADER_LEN..len].copy_from_slice(&self.data[..usize::from(self.byte_count)]);
        &buf[..len]
    }
}

impl TryFrom<&[u8]> for FirmwareCommand {
    type Error = DecodeError;

    fn try_from(bytes: &[u8]) -> Result<Self, DecodeError> {
        if bytes.len() < COMMAND_HEADER_LEN {
            return Err(DecodeError::BufferSize);
        }
        let byte_count = bytes[4];
        if usize::from(byte_count) > BLOCK_MAX {
            return Err(DecodeError::OversizedBlock(byte_count));
        }
        let payload = &bytes[COMMAND_HEADER_LEN..];
        if payload.len() < usize::from(byte_count) {
            return Err(DecodeError::ByteCount(byte_count));
        }
        let mut data = [0; BLOCK_MAX];
        data[..usize::from(byte_count)].copy_from_slice(&payload[..usize::from(byte_count)]);
        Ok(Self {
            protocol: bytes[0],
            address: bytes[1],
            command: bytes[2],
            bus: bytes[3],
            byte_count,
            data,
        })
    }
}

/// What the firmware answered to a successful transaction.
#[cfg_attr(all(feature = "defmt", target_os = "none"), derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FirmwareResponse {
    pub status: Status,
    /// Number of valid bytes in `data`.
    pub byte_count: u8,
    pub data: [u8; BLOCK_MAX],
}

impl FirmwareResponse {
    /// A response that carries no payload.
    #[must_use]
    pub const fn empty(status: Status) -> Self {
        Self {
            status,
            byte_count: 0,
            data: [0; BLOCK_MAX],
        }
    }
}

/// The firmware's SMBus status register.
#[cfg_attr(all(feature = "defmt", target_os = "none"), derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Status(pub u8);

impl Status {
    const DONE: u8 = 0x80;
    const ALARM: u8 = 0x40;
    const RESERVED: u8 = 0x20;
    const CODE_MASK: u8 = 0x1F;

    /// Status code (low 5 bits).
    #[must_use]
    pub const fn code(self) -> StatusCode {
        StatusCode::new(self.0 & Self::CODE_MASK)
    }

    #[must_use]
    pub const fn is_done(self) -> bool {
        self.0 & Self::DONE != 0
    }

    /// An SMBus alarm was received.
    #[must_use]
    pub const fn alarm(self) -> bool {
        self.0 & Self::ALARM != 0
    }

    #[must_use]
    pub const fn reserved(self) -> bool {
        self.0 & Self::RESERVED != 0
    }
}

/// Status codes of the SMBus-over-EC register model.
#[cfg_attr(all(feature = "defmt", target_os = "none"), derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    Ok,
    Fail,
    DeviceNak,
    DeviceError,
    CommandDenied,
    Unknown,
    AccessDenied,
    Timeout,
    NotSupported,
    Busy,
    Pec,
    Other(u8),
}

impl StatusCode {
    /// Create a new [`StatusCode`] from the low 5 bits of the status register.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        match value {
            0x00 => Self::Ok,
            0x07 => Self::Fail,
            0x10 => Self::DeviceNak,
            0x11 => Self::DeviceError,
            0x12 => Self::CommandDenied,
            0x13 => Self::Unknown,
            0x17 => Self::AccessDenied,
            0x18 => Self::Timeout,
            0x19 => Self::NotSupported,
            0x1A => Self::Busy,
            0x1F => Self::Pec,
            code => Self::Other(code),
        }
    }

    #[must_use]
    pub const fn value(self) -> u8 {
        match self {
            Self::Ok => 0x00,
            Self::Fail => 0x07,
            Self::DeviceNak => 0x10,
            Self::DeviceError => 0x11,
            Self::CommandDenied => 0x12,
            Self::Unknown => 0x13,
            Self::AccessDenied => 0x17,
            Self::Timeout => 0x18,
            Self::NotSupported => 0x19,
            Self::Busy => 0x1A,
            Self::Pec => 0x1F,
            Self::Other(code) => code,
        }
    }

    const fn get_name(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Fail => "Unknown failure",
            Self::DeviceNak => "Device address not acknowledged",
            Self::DeviceError => "Device error",
            Self::CommandDenied => "Device command access denied",
            Self::Unknown => "Unknown error",
            Self::AccessDenied => "Device access denied",
            Self::Timeout => "Timeout",
            Self::NotSupported => "Unsupported protocol",
            Self::Busy => "SMBus host busy",
            Self::Pec => "PEC error",
            Self::Other(_) => "Unclassified failure",
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} (0x{:0>2X})", self.get_name(), self.value())
    }
}
