// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SMBus adapter on top of the firmware mailbox.

use crate::{
    codec::{decode, encode_for_bus, map_status},
    error::*,
    frame::*,
    transport::{Config, Firmware, Transport},
};

/// An SMBus adapter backed by platform firmware.
///
/// Transactions take `&mut self`, so a single adapter never has more
/// than one transaction in flight. Failed transactions are not retried.
#[derive(Debug)]
pub struct Adapter<F> {
    transport: Transport<F>,
}

impl<F: Firmware> Adapter<F> {
    pub const fn new(firmware: F, config: Config) -> Self {
        Self {
            transport: Transport::new(firmware, config),
        }
    }

    /// The transaction types this adapter supports.
    #[must_use]
    pub const fn functionality(&self) -> Functionality {
        Functionality::SUPPORTED
    }

    pub fn firmware_mut(&mut self) -> &mut F {
        self.transport.firmware_mut()
    }

    pub fn into_inner(self) -> F {
        self.transport.into_inner()
    }

    /// Execute an SMBus transaction.
    pub fn transfer(&mut self, req: &Request<'_>) -> Result<Response, Error> {
        let encoded = encode_for_bus(req, self.transport.config().bus)?;
        let rsp = match self.transport.execute(&encoded.command, encoded.read_response) {
            Ok(rsp) => rsp,
            Err(TransportError::Failed(status)) => {
                let kind = map_status(status.code().value());
                #[cfg(feature = "log")]
                log::debug!(
                    "Transaction to 0x{:0>2X} failed: {} ({kind})",
                    req.address,
                    status.code()
                );
                return Err(Error::Firmware(kind));
            }
            Err(err) => return Err(err.into()),
        };
        if !encoded.read_response {
            return Ok(Response::None);
        }
        let res = decode(req.size, req.direction, &rsp);
        #[cfg(feature = "log")]
        if let Err(err) = &res {
            log::error!("Failed to decode response: {err}");
        }
        res.map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{MethodNames, sim::*};

    fn adapter(fw: Scripted) -> Adapter<Scripted> {
        Adapter::new(fw, Config::default())
    }

    #[test]
    fn reports_supported_functionality() {
        let adapter = adapter(Scripted::default());
        assert_eq!(adapter.functionality(), Functionality::SUPPORTED);
    }

    #[test]
    fn read_word_data() {
        let mut adapter = adapter(Scripted::answering(0x80, 2, &[0x34, 0x12]));
        let req = Request::read(0x0B, TransactionSize::WordData, 0x08);
        assert_eq!(adapter.transfer(&req).unwrap(), Response::Word(0x1234));
        let fw = adapter.into_inner();
        assert_eq!(fw.last_command.as_slice(), &[0x09, 0x16, 0x08, 0x00, 0x00]);
    }

    #[test]
    fn read_block_data() {
        let mut adapter = adapter(Scripted::answering(0x80, 3, &[1, 2, 3, 4]));
        let req = Request::read(0x0B, TransactionSize::BlockData, 0x20);
        let Response::Block(block) = adapter.transfer(&req).unwrap() else {
            unreachable!()
        };
        assert_eq!(&*block, &[1, 2, 3]);
        let buf = &mut [0; 33];
        assert_eq!(block.write_length_prefixed(buf).unwrap(), 4);
        assert_eq!(&buf[..4], &[3, 1, 2, 3]);
    }

    #[test]
    fn write_without_response() {
        let mut adapter = adapter(Scripted::answering(0x80, 0, &[]));
        let block = &[3, 0xAA, 0xBB, 0xCC];
        let req = Request::write(0x0B, TransactionSize::BlockData, 0x44, Data::Block(block));
        assert_eq!(adapter.transfer(&req).unwrap(), Response::None);
        let fw = adapter.into_inner();
        assert_eq!(fw.calls.as_slice(), &["execute", "status", "size"]);
        assert_eq!(
            fw.last_command.as_slice(),
            &[0x0A, 0x16, 0x44, 0x00, 0x03, 0xAA, 0xBB, 0xCC]
        );
    }

    #[test]
    fn write_byte_sends_command_only() {
        let mut adapter = adapter(Scripted::answering(0x80, 0, &[]));
        let req = Request::write(0x0B, TransactionSize::Byte, 0x05, Data::None);
        assert_eq!(adapter.transfer(&req).unwrap(), Response::None);
        let fw = adapter.into_inner();
        assert_eq!(fw.last_command.as_slice(), &[0x04, 0x16, 0x05, 0x00, 0x00]);
    }

    #[test]
    fn block_process_call() {
        let mut adapter = adapter(Scripted::answering(0x80, 2, &[0x10, 0x20]));
        let block = &[1, 0x55];
        let req = Request::write(0x0B, TransactionSize::BlockProcCall, 0x30, Data::Block(block))
            .with_pec();
        assert_eq!(
            adapter.transfer(&req).unwrap(),
            Response::Block(Block::new(&[0x10, 0x20]).unwrap())
        );
        let fw = adapter.into_inner();
        assert_eq!(fw.calls.as_slice(), &["execute", "status", "size", "buffer"]);
        assert_eq!(
            fw.last_command.as_slice(),
            &[0x8D, 0x16, 0x30, 0x00, 0x01, 0x55]
        );
    }

    #[test]
    fn firmware_failures_are_classified() {
        let cases = [
            (0x80, ErrorKind::Retryable),
            (0x90, ErrorKind::NoDevice),
            (0x98, ErrorKind::Timeout),
            (0x19, ErrorKind::Unsupported),
            (0x9A, ErrorKind::Retryable),
            (0xDF, ErrorKind::BadMessage),
            (0x87, ErrorKind::IoError),
        ];
        for (status, kind) in cases {
            let mut adapter = adapter(Scripted::answering(status, 33, &[]));
            let req = Request::read(0x0B, TransactionSize::ByteData, 0);
            assert_eq!(adapter.transfer(&req).err().unwrap(), Error::Firmware(kind));
        }
    }

    #[test]
    fn timeout_is_never_a_success() {
        let mut adapter = adapter(Scripted::answering(0x18, 33, &[0x12, 0x34]));
        let req = Request::read(0x0B, TransactionSize::WordData, 0);
        let err = adapter.transfer(&req).err().unwrap();
        assert_eq!(err, Error::Firmware(ErrorKind::Timeout));
        assert!(!err.is_retryable());
    }

    #[test]
    fn encode_errors_skip_the_firmware() {
        let mut adapter = adapter(Scripted::answering(0x80, 0, &[]));
        let req = Request::read(0x0B, TransactionSize::new(8), 0);
        assert_eq!(
            adapter.transfer(&req).err().unwrap(),
            Error::Encode(EncodeError::UnsupportedSize(8))
        );
        assert!(adapter.into_inner().calls.is_empty());
    }

    #[test]
    fn transport_errors_pass_through() {
        let mut fw = Scripted::answering(0x80, 1, &[]);
        fw.buffer = None;
        let mut adapter = adapter(fw);
        let req = Request::read(0x0B, TransactionSize::Byte, 0);
        assert_eq!(
            adapter.transfer(&req).err().unwrap(),
            Error::Transport(TransportError::PayloadReadFailed)
        );
    }

    #[test]
    fn configured_bus_number() {
        let config = Config {
            methods: MethodNames::ACER,
            bus: 2,
        };
        let mut adapter = Adapter::new(Scripted::answering(0x80, 0, &[]), config);
        let req = Request::write(0x0B, TransactionSize::Quick, 0, Data::None);
        adapter.transfer(&req).unwrap();
        assert_eq!(adapter.firmware_mut().last_command[3], 2);
    }

    #[test]
    fn borrowed_firmware() {
        let mut fw = Scripted::answering(0x80, 1, &[0x42]);
        {
            let mut adapter = Adapter::new(&mut fw, Config::default());
            let req = Request::read(0x0B, TransactionSize::ByteData, 0x01);
            assert_eq!(adapter.transfer(&req).unwrap(), Response::Byte(0x42));
        }
        assert_eq!(fw.calls.len(), 4);
    }
}
