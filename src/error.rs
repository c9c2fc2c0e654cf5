// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

use core::fmt;

use crate::frame::{BLOCK_MAX, Status};

/// A transaction could not be translated into a firmware command.
///
/// These are detected before the firmware is touched and can be
/// retried with corrected input.
#[cfg_attr(all(feature = "defmt", target_os = "none"), derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeError {
    /// The transaction size (raw value) is not supported by the firmware.
    UnsupportedSize(u8),
    /// Block length prefix exceeds [`BLOCK_MAX`].
    PayloadTooLarge(u8),
    /// The payload does not have the shape the transaction size requires.
    InvalidPayload,
    /// Device address does not fit into 7 bits.
    Address(u8),
}

/// The firmware call-and-poll handshake failed.
#[cfg_attr(all(feature = "defmt", target_os = "none"), derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// Invoking the execute method failed.
    CallFailed,
    /// The status could not be read or is out of range.
    StatusReadFailed,
    /// The response size could not be read or is out of range.
    SizeReadFailed,
    /// The response buffer could not be read.
    PayloadReadFailed,
    /// The firmware reported a failed transaction.
    ///
    /// Signaled by a response size above [`BLOCK_MAX`], the
    /// status byte tells why.
    Failed(Status),
}

/// A firmware response could not be turned into a transaction result.
#[cfg_attr(all(feature = "defmt", target_os = "none"), derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// The response claims more bytes than a block can hold.
    OversizedBlock(u8),
    /// Invalid buffer size
    BufferSize,
    /// Invalid byte count
    ByteCount(u8),
}

/// Classification of a transaction failure reported by the firmware.
#[cfg_attr(all(feature = "defmt", target_os = "none"), derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Transient failure, the transaction may be repeated.
    Retryable,
    /// The addressed device did not acknowledge.
    NoDevice,
    /// The transaction timed out.
    Timeout,
    /// The firmware does not support the operation.
    Unsupported,
    /// Packet error check mismatch.
    BadMessage,
    /// Unclassified firmware failure.
    IoError,
}

impl ErrorKind {
    /// Returns `true` if repeating the transaction may succeed.
    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(self, Self::Retryable)
    }

    /// The (positive) POSIX error number a host driver reports for this kind.
    #[must_use]
    pub const fn errno(self) -> i32 {
        match self {
            Self::Retryable => 11,    // EAGAIN
            Self::NoDevice => 6,      // ENXIO
            Self::Timeout => 110,     // ETIMEDOUT
            Self::Unsupported => 95,  // EOPNOTSUPP
            Self::BadMessage => 74,   // EBADMSG
            Self::IoError => 5,       // EIO
        }
    }

    const fn get_name(self) -> &'static str {
        match self {
            Self::Retryable => "Resource temporarily unavailable",
            Self::NoDevice => "No such device",
            Self::Timeout => "Timed out",
            Self::Unsupported => "Operation not supported",
            Self::BadMessage => "Bad message",
            Self::IoError => "I/O error",
        }
    }
}

/// ec-smbus-core Error
#[cfg_attr(all(feature = "defmt", target_os = "none"), derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    Encode(EncodeError),
    Transport(TransportError),
    /// The firmware executed the transaction and reported a failure.
    Firmware(ErrorKind),
    Decode(DecodeError),
}

impl Error {
    /// Returns `true` if the caller may repeat the same transaction.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Firmware(kind) if kind.is_retryable())
    }
}

impl From<EncodeError> for Error {
    fn from(err: EncodeError) -> Self {
        Self::Encode(err)
    }
}

impl From<TransportError> for Error {
    fn from(err: TransportError) -> Self {
        Self::Transport(err)
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Self::Firmware(kind)
    }
}

impl From<DecodeError> for Error {
    fn from(err: DecodeError) -> Self {
        Self::Decode(err)
    }
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use EncodeError::*;

        match self {
            UnsupportedSize(size) => write!(f, "Unsupported transaction size: {size}"),
            PayloadTooLarge(len) => {
                write!(f, "Block payload too large: {len} > {BLOCK_MAX}")
            }
            InvalidPayload => write!(f, "Payload does not match transaction size"),
            Address(addr) => write!(f, "Invalid 7-bit address: 0x{addr:0>2X}"),
        }
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use TransportError::*;

        match self {
            CallFailed => write!(f, "Firmware transaction call failed"),
            StatusReadFailed => write!(f, "Unable to read transaction status"),
            SizeReadFailed => write!(f, "Unable to read response size"),
            PayloadReadFailed => write!(f, "Unable to read response buffer"),
            Failed(status) => write!(f, "Transaction failed: {}", status.code()),
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use DecodeError::*;

        match self {
            OversizedBlock(cnt) => write!(f, "Oversized block: {cnt} > {BLOCK_MAX}"),
            BufferSize => write!(f, "Invalid buffer size"),
            ByteCount(cnt) => write!(f, "Invalid byte count: {cnt}"),
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.get_name())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Encode(err) => write!(f, "{err}"),
            Self::Transport(err) => write!(f, "{err}"),
            Self::Firmware(kind) => write!(f, "Firmware error: {kind}"),
            Self::Decode(err) => write!(f, "{err}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for EncodeError {}

#[cfg(feature = "std")]
impl std::error::Error for TransportError {}

#[cfg(feature = "std")]
impl std::error::Error for DecodeError {}

#[cfg(feature = "std")]
impl std::error::Error for ErrorKind {}

#[cfg(feature = "std")]
impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Encode(err) => Some(err),
            Self::Transport(err) => Some(err),
            Self::Firmware(kind) => Some(kind),
            Self::Decode(err) => Some(err),
        }
    }
}
