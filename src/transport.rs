// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Firmware call-and-poll transport.
//!
//! A transaction takes up to four firmware calls: execute the command,
//! read the status, read the response size and, if requested, read the
//! response buffer. The calls are not atomic. The caller must make sure
//! that at most one transaction is in flight per firmware interface.

use core::fmt;

use crate::{error::*, frame::*};

/// Access to the named methods of the platform firmware.
pub trait Firmware {
    /// Firmware call error
    type Error: fmt::Debug;

    /// Invoke `method` with a single buffer argument, ignoring its result.
    fn call(&mut self, method: &str, arg: &[u8]) -> Result<(), Self::Error>;

    /// Invoke `method` and return its integer result.
    fn call_integer(&mut self, method: &str) -> Result<u64, Self::Error>;

    /// Invoke `method` and copy its buffer result into `buf`.
    ///
    /// It returns the number of bytes copied.
    fn call_buffer(&mut self, method: &str, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

impl<F: Firmware + ?Sized> Firmware for &mut F {
    type Error = F::Error;

    fn call(&mut self, method: &str, arg: &[u8]) -> Result<(), Self::Error> {
        (**self).call(method, arg)
    }

    fn call_integer(&mut self, method: &str) -> Result<u64, Self::Error> {
        (**self).call_integer(method)
    }

    fn call_buffer(&mut self, method: &str, buf: &mut [u8]) -> Result<usize, Self::Error> {
        (**self).call_buffer(method, buf)
    }
}

/// Paths of the firmware methods used by the transport.
#[cfg_attr(all(feature = "defmt", target_os = "none"), derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodNames {
    /// Takes the serialized command buffer.
    pub execute: &'static str,
    pub status: &'static str,
    pub response_size: &'static str,
    pub response_buffer: &'static str,
}

impl MethodNames {
    /// Acer embedded controllers.
    pub const ACER: Self = Self {
        execute: "\\_SB_.PCI0.LPC0.EC0_.ESMC",
        status: "\\_SB_.PCI0.LPC0.EC0_.SMST",
        response_size: "\\ESMS",
        response_buffer: "\\ESMB",
    };
}

impl Default for MethodNames {
    fn default() -> Self {
        Self::ACER
    }
}

/// Transport configuration
#[cfg_attr(all(feature = "defmt", target_os = "none"), derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub methods: MethodNames,
    /// Bus number written into every command.
    pub bus: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            methods: MethodNames::ACER,
            bus: INTERNAL_BUS,
        }
    }
}

/// Executes firmware commands.
#[derive(Debug)]
pub struct Transport<F> {
    firmware: F,
    config: Config,
}

impl<F: Firmware> Transport<F> {
    pub const fn new(firmware: F, config: Config) -> Self {
        Self { firmware, config }
    }

    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    pub fn firmware_mut(&mut self) -> &mut F {
        &mut self.firmware
    }

    pub fn into_inner(self) -> F {
        self.firmware
    }

    /// Run one transaction.
    ///
    /// A response size above [`BLOCK_MAX`] is the firmware's failure
    /// signal and yields [`TransportError::Failed`] with the status read
    /// before. The response buffer is only read if `read_response` is set.
    pub fn execute(
        &mut self,
        cmd: &FirmwareCommand,
        read_response: bool,
    ) -> Result<FirmwareResponse, TransportError> {
        let methods = self.config.methods;

        let buf = &mut [0; MAX_COMMAND_LEN];
        let arg = cmd.encode(buf);
        #[cfg(feature = "log")]
        log::trace!("Execute SMBus command: {arg:02X?}");
        self.firmware.call(methods.execute, arg).map_err(|_err| {
            #[cfg(feature = "log")]
            log::error!("Cannot call {}: {_err:?}", methods.execute);
            TransportError::CallFailed
        })?;

        let status = self
            .read_u8(methods.status)
            .map(Status)
            .ok_or(TransportError::StatusReadFailed)?;
        let size = self
            .read_u8(methods.response_size)
            .ok_or(TransportError::SizeReadFailed)?;

        if usize::from(size) > BLOCK_MAX {
            #[cfg(feature = "log")]
            log::debug!("SMBus transaction failed: {}", status.code());
            return Err(TransportError::Failed(status));
        }

        let mut rsp = FirmwareResponse::empty(status);
        if read_response {
            let len = usize::from(size);
            let cnt = self
                .firmware
                .call_buffer(methods.response_buffer, &mut rsp.data)
                .map_err(|_err| {
                    #[cfg(feature = "log")]
                    log::error!("Cannot call {}: {_err:?}", methods.response_buffer);
                    TransportError::PayloadReadFailed
                })?;
            if cnt < len {
                #[cfg(feature = "log")]
                log::error!(
                    "{} returned {cnt} byte(s), expected {len}",
                    methods.response_buffer
                );
                return Err(TransportError::PayloadReadFailed);
            }
            rsp.data[len..].fill(0);
            rsp.byte_count = size;
        }
        #[cfg(feature = "log")]
        log::trace!("SMBus transaction succeeded: {} byte(s)", rsp.byte_count);
        Ok(rsp)
    }

    /// Read an integer that has to fit into a byte.
    fn read_u8(&mut self, method: &str) -> Option<u8> {
        match self.firmware.call_integer(method) {
            Ok(value) => {
                let value = u8::try_from(value).ok();
                #[cfg(feature = "log")]
                if value.is_none() {
                    log::error!("{method} returned an out of range value");
                }
                value
            }
            Err(_err) => {
                #[cfg(feature = "log")]
                log::error!("Cannot call {method}: {_err:?}");
                None
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::{sim::*, *};

    fn transport(fw: Scripted) -> Transport<Scripted> {
        Transport::new(fw, Config::default())
    }

    fn block_command() -> FirmwareCommand {
        let mut cmd = FirmwareCommand::new(0x0B, 0x44, INTERNAL_BUS);
        cmd.protocol = protocol::WRITE | protocol::BLOCK_DATA;
        cmd.set_block(&Block::new(&[0xAA, 0xBB, 0xCC]).unwrap());
        cmd
    }

    #[test]
    fn call_sequence_without_response() {
        let mut t = transport(Scripted::answering(0x80, 0, &[]));
        let rsp = t.execute(&block_command(), false).unwrap();
        assert_eq!(rsp.byte_count, 0);
        assert_eq!(rsp.status, Status(0x80));
        let fw = t.into_inner();
        assert_eq!(fw.calls.as_slice(), &["execute", "status", "size"]);
        assert_eq!(
            fw.last_command.as_slice(),
            &[0x0A, 0x16, 0x44, 0x00, 0x03, 0xAA, 0xBB, 0xCC]
        );
    }

    #[test]
    fn call_sequence_with_response() {
        let mut t = transport(Scripted::answering(0x80, 2, &[0x34, 0x12, 0x99, 0x98]));
        let cmd = FirmwareCommand::new(0x0B, 0x08, INTERNAL_BUS);
        let rsp = t.execute(&cmd, true).unwrap();
        assert_eq!(rsp.byte_count, 2);
        assert_eq!(&rsp.data[..4], &[0x34, 0x12, 0x00, 0x00]);
        assert_eq!(
            t.firmware_mut().calls.as_slice(),
            &["execute", "status", "size", "buffer"]
        );
    }

    #[test]
    fn header_only_command_is_sent() {
        let mut t = transport(Scripted::answering(0x80, 0, &[]));
        let cmd = FirmwareCommand::new(0x50, 0x01, INTERNAL_BUS);
        t.execute(&cmd, false).unwrap();
        assert_eq!(t.firmware_mut().last_command.len(), 5);
    }

    #[test]
    fn full_block_response() {
        let mut t = transport(Scripted::answering(0x80, 32, &[0x77; 40]));
        let rsp = t
            .execute(&FirmwareCommand::new(0x0B, 0, INTERNAL_BUS), true)
            .unwrap();
        assert_eq!(rsp.byte_count, 32);
        assert_eq!(rsp.data, [0x77; BLOCK_MAX]);
    }

    #[test]
    fn oversized_size_signals_failure() {
        let mut t = transport(Scripted::answering(0x98, 33, &[]));
        let err = t
            .execute(&FirmwareCommand::new(0x0B, 0, INTERNAL_BUS), true)
            .err()
            .unwrap();
        assert_eq!(err, TransportError::Failed(Status(0x98)));
        assert_eq!(
            t.firmware_mut().calls.as_slice(),
            &["execute", "status", "size"]
        );
    }

    #[test]
    fn execute_failure_aborts() {
        let mut fw = Scripted::answering(0x80, 0, &[]);
        fw.execute = None;
        let mut t = transport(fw);
        let err = t.execute(&block_command(), false).err().unwrap();
        assert_eq!(err, TransportError::CallFailed);
        assert_eq!(t.firmware_mut().calls.as_slice(), &["execute"]);
    }

    #[test]
    fn status_read_failure() {
        let mut fw = Scripted::answering(0x80, 0, &[]);
        fw.status = None;
        let mut t = transport(fw);
        let err = t.execute(&block_command(), false).err().unwrap();
        assert_eq!(err, TransportError::StatusReadFailed);
        assert_eq!(t.firmware_mut().calls.as_slice(), &["execute", "status"]);

        let mut t = transport(Scripted::answering(256, 0, &[]));
        let err = t.execute(&block_command(), false).err().unwrap();
        assert_eq!(err, TransportError::StatusReadFailed);
    }

    #[test]
    fn size_read_failure() {
        let mut fw = Scripted::answering(0x80, 0, &[]);
        fw.size = None;
        let mut t = transport(fw);
        let err = t.execute(&block_command(), false).err().unwrap();
        assert_eq!(err, TransportError::SizeReadFailed);

        let mut t = transport(Scripted::answering(0x80, 0x1_00, &[]));
        let err = t.execute(&block_command(), false).err().unwrap();
        assert_eq!(err, TransportError::SizeReadFailed);
    }

    #[test]
    fn payload_read_failure() {
        let mut fw = Scripted::answering(0x80, 2, &[]);
        fw.buffer = None;
        let mut t = transport(fw);
        let err = t
            .execute(&FirmwareCommand::new(0x0B, 0, INTERNAL_BUS), true)
            .err()
            .unwrap();
        assert_eq!(err, TransportError::PayloadReadFailed);
    }

    #[test]
    fn short_payload_is_a_read_failure() {
        let mut t = transport(Scripted::answering(0x80, 4, &[0x01, 0x02]));
        let err = t
            .execute(&FirmwareCommand::new(0x0B, 0, INTERNAL_BUS), true)
            .err()
            .unwrap();
        assert_eq!(err, TransportError::PayloadReadFailed);
    }
}
