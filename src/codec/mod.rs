// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Translation between SMBus transactions and firmware mailbox frames.

use crate::{error::*, frame::*};
use byteorder::{ByteOrder, LittleEndian};

/// A firmware command together with the information whether
/// the response buffer has to be read back.
#[cfg_attr(all(feature = "defmt", target_os = "none"), derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Encoded {
    pub command: FirmwareCommand,
    pub read_response: bool,
}

/// Encode a request for the [`INTERNAL_BUS`].
pub fn encode(req: &Request<'_>) -> Result<Encoded, EncodeError> {
    encode_for_bus(req, INTERNAL_BUS)
}

/// Encode a request into a firmware command for `bus`.
pub fn encode_for_bus(req: &Request<'_>, bus: u8) -> Result<Encoded, EncodeError> {
    use TransactionSize as s;

    if req.address > 0x7F {
        return Err(EncodeError::Address(req.address));
    }
    let pec = if req.pec { protocol::PEC } else { 0 };
    // Quick, byte and byte data never carry the PEC flag.
    let size_code = match req.size {
        s::Quick => protocol::QUICK,
        s::Byte => protocol::BYTE,
        s::ByteData => protocol::BYTE_DATA,
        s::WordData => protocol::WORD_DATA | pec,
        s::BlockData => protocol::BLOCK_DATA | pec,
        s::ProcCall => protocol::PROC_CALL | pec,
        s::BlockProcCall => protocol::BLOCK_PROC_CALL | pec,
        s::Other(size) => return Err(EncodeError::UnsupportedSize(size)),
    };

    let mut cmd = FirmwareCommand::new(req.address, req.command, bus);
    let mut read_response = false;
    match req.direction {
        Direction::Read => {
            cmd.protocol = protocol::READ | size_code;
            read_response = true;
        }
        Direction::Write => {
            cmd.protocol = protocol::WRITE | size_code;
            match (req.size, req.data) {
                (s::Quick | s::ProcCall | s::BlockProcCall, _) | (s::Byte, Data::None) => {}
                (s::Byte, Data::Byte(byte)) => {
                    // The byte is sent in place of the command.
                    cmd.command = byte;
                }
                (s::ByteData, Data::Byte(byte)) => {
                    cmd.data[0] = byte;
                }
                (s::WordData, Data::Word(word)) => {
                    LittleEndian::write_u16(&mut cmd.data, word);
                }
                (s::BlockData, Data::Block(bytes)) => {
                    cmd.set_block(&Block::from_length_prefixed(bytes)?);
                }
                _ => return Err(EncodeError::InvalidPayload),
            }
        }
    }

    // Process calls send their payload in both directions.
    match (req.size, req.data) {
        (s::ProcCall, Data::Word(word)) => {
            LittleEndian::write_u16(&mut cmd.data, word);
            read_response = true;
        }
        (s::BlockProcCall, Data::Block(bytes)) => {
            cmd.set_block(&Block::from_length_prefixed(bytes)?);
            read_response = true;
        }
        (s::ProcCall | s::BlockProcCall, _) => return Err(EncodeError::InvalidPayload),
        _ => {}
    }

    Ok(Encoded {
        command: cmd,
        read_response,
    })
}

/// Decode the firmware response of a successful transaction.
pub fn decode(
    size: TransactionSize,
    direction: Direction,
    rsp: &FirmwareResponse,
) -> Result<Response, DecodeError> {
    use TransactionSize as s;

    let res = match (size, direction) {
        (s::Byte | s::ByteData, Direction::Read) => Response::Byte(rsp.data[0]),
        (s::WordData, Direction::Read) | (s::ProcCall, _) => {
            Response::Word(LittleEndian::read_u16(&rsp.data))
        }
        (s::BlockData, Direction::Read) | (s::BlockProcCall, _) => {
            let cnt = rsp.byte_count;
            if usize::from(cnt) > BLOCK_MAX {
                return Err(DecodeError::OversizedBlock(cnt));
            }
            let block = Block::new(&rsp.data[..usize::from(cnt)])
                .map_err(|_| DecodeError::OversizedBlock(cnt))?;
            Response::Block(block)
        }
        _ => Response::None,
    };
    Ok(res)
}

/// Classify a failure reported by the firmware (low 5 status bits).
#[must_use]
pub const fn map_status(code: u8) -> ErrorKind {
    match code & 0x1F {
        0x00 | 0x1A => ErrorKind::Retryable,
        0x10 => ErrorKind::NoDevice,
        0x18 => ErrorKind::Timeout,
        0x19 => ErrorKind::Unsupported,
        0x1F => ErrorKind::BadMessage,
        _ => ErrorKind::IoError,
    }
}
