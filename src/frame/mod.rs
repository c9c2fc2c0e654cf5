// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

use core::{fmt, ops::BitOr};

mod block;
mod firmware;

pub use self::{block::*, firmware::*};

/// Maximum number of data bytes of a single transaction.
pub const BLOCK_MAX: usize = 32;

/// The bus number of the single bus behind the firmware mailbox.
pub const INTERNAL_BUS: u8 = 0;

/// A 7-bit device address.
pub type Address = u8;

/// The transfer direction of a transaction.
#[cfg_attr(all(feature = "defmt", target_os = "none"), derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Read,
    Write,
}

/// The SMBus transaction size (protocol) class.
#[cfg_attr(all(feature = "defmt", target_os = "none"), derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionSize {
    /// Raw size: `0`.
    Quick,

    /// Raw size: `1`.
    Byte,

    /// Raw size: `2`.
    ByteData,

    /// Raw size: `3`.
    WordData,

    /// Raw size: `4`.
    ProcCall,

    /// Raw size: `5`.
    BlockData,

    /// Raw size: `7`.
    BlockProcCall,

    /// A size the firmware has no protocol for (e.g. I2C block transfers).
    Other(u8),
}

impl TransactionSize {
    /// Create a new [`TransactionSize`] from the host's raw size number.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        match value {
            0 => Self::Quick,
            1 => Self::Byte,
            2 => Self::ByteData,
            3 => Self::WordData,
            4 => Self::ProcCall,
            5 => Self::BlockData,
            7 => Self::BlockProcCall,
            size => Self::Other(size),
        }
    }

    /// Get the raw size number of the current [`TransactionSize`].
    #[must_use]
    pub const fn value(self) -> u8 {
        match self {
            Self::Quick => 0,
            Self::Byte => 1,
            Self::ByteData => 2,
            Self::WordData => 3,
            Self::ProcCall => 4,
            Self::BlockData => 5,
            Self::BlockProcCall => 7,
            Self::Other(size) => size,
        }
    }
}

impl fmt::Display for TransactionSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value().fmt(f)
    }
}

/// Payload of a transaction request.
#[cfg_attr(all(feature = "defmt", target_os = "none"), derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Data<'r> {
    /// No payload (quick commands and reads).
    None,
    Byte(u8),
    Word(u16),
    /// Length-prefixed block: `len, b0 .. b(len-1)`.
    Block(&'r [u8]),
}

/// A transaction requested by a client.
#[cfg_attr(all(feature = "defmt", target_os = "none"), derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Request<'r> {
    pub address: Address,
    pub direction: Direction,
    pub size: TransactionSize,
    pub command: u8,
    pub data: Data<'r>,
    /// Request packet error checking.
    pub pec: bool,
}

impl<'r> Request<'r> {
    /// A read transaction without payload.
    ///
    /// Process calls always carry a payload, use [`Request::proc_call`].
    #[must_use]
    pub const fn read(address: Address, size: TransactionSize, command: u8) -> Self {
        Self {
            address,
            direction: Direction::Read,
            size,
            command,
            data: Data::None,
            pec: false,
        }
    }

    /// A write transaction carrying `data`.
    #[must_use]
    pub const fn write(
        address: Address,
        size: TransactionSize,
        command: u8,
        data: Data<'r>,
    ) -> Self {
        Self {
            address,
            direction: Direction::Write,
            size,
            command,
            data,
            pec: false,
        }
    }

    /// A process call: `data` is written and the answer read back.
    ///
    /// `data` is a [`Data::Word`] for [`TransactionSize::ProcCall`] and a
    /// [`Data::Block`] for [`TransactionSize::BlockProcCall`].
    #[must_use]
    pub const fn proc_call(
        address: Address,
        size: TransactionSize,
        command: u8,
        data: Data<'r>,
    ) -> Self {
        Self::write(address, size, command, data)
    }

    /// Enable packet error checking.
    #[must_use]
    pub const fn with_pec(mut self) -> Self {
        self.pec = true;
        self
    }
}

/// The result of a successful transaction.
#[cfg_attr(all(feature = "defmt", target_os = "none"), derive(defmt::Format))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Nothing was read back.
    None,
    Byte(u8),
    Word(u16),
    Block(Block),
}

/// Adapter capabilities, using the host's functionality bit values.
#[cfg_attr(all(feature = "defmt", target_os = "none"), derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Functionality(u32);

impl Functionality {
    pub const SMBUS_PEC: Self = Self(0x0000_0008);
    pub const SMBUS_BLOCK_PROC_CALL: Self = Self(0x0000_8000);
    pub const SMBUS_QUICK: Self = Self(0x0001_0000);
    pub const SMBUS_READ_BYTE: Self = Self(0x0002_0000);
    pub const SMBUS_WRITE_BYTE: Self = Self(0x0004_0000);
    pub const SMBUS_READ_BYTE_DATA: Self = Self(0x0008_0000);
    pub const SMBUS_WRITE_BYTE_DATA: Self = Self(0x0010_0000);
    pub const SMBUS_READ_WORD_DATA: Self = Self(0x0020_0000);
    pub const SMBUS_WRITE_WORD_DATA: Self = Self(0x0040_0000);
    pub const SMBUS_PROC_CALL: Self = Self(0x0080_0000);
    pub const SMBUS_READ_BLOCK_DATA: Self = Self(0x0100_0000);
    pub const SMBUS_WRITE_BLOCK_DATA: Self = Self(0x0200_0000);

    pub const SMBUS_BYTE: Self = Self(Self::SMBUS_READ_BYTE.0 | Self::SMBUS_WRITE_BYTE.0);
    pub const SMBUS_BYTE_DATA: Self =
        Self(Self::SMBUS_READ_BYTE_DATA.0 | Self::SMBUS_WRITE_BYTE_DATA.0);
    pub const SMBUS_WORD_DATA: Self =
        Self(Self::SMBUS_READ_WORD_DATA.0 | Self::SMBUS_WRITE_WORD_DATA.0);
    pub const SMBUS_BLOCK_DATA: Self =
        Self(Self::SMBUS_READ_BLOCK_DATA.0 | Self::SMBUS_WRITE_BLOCK_DATA.0);

    /// Everything the firmware mailbox can carry.
    pub const SUPPORTED: Self = Self(
        Self::SMBUS_QUICK.0
            | Self::SMBUS_BYTE.0
            | Self::SMBUS_BYTE_DATA.0
            | Self::SMBUS_WORD_DATA.0
            | Self::SMBUS_BLOCK_DATA.0
            | Self::SMBUS_PROC_CALL.0
            | Self::SMBUS_BLOCK_PROC_CALL.0
            | Self::SMBUS_PEC.0,
    );

    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Returns `true` if all capabilities of `other` are present.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for Functionality {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}
