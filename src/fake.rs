//! Scripted transport double shared by the driver tests.
use std::collections::VecDeque;

use crate::Transport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Nack;

/// What the device does in response to one command write.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Reply {
    /// Command not acknowledged.
    Nack,
    /// Command acknowledged, no response bytes ever arrive.
    Silent,
    /// Command acknowledged, only one response byte arrives.
    Partial(u8),
    /// Command acknowledged, both response bytes arrive.
    Bytes([u8; 2]),
}

pub(crate) struct FakeTransport {
    script: Vec<Reply>,
    pending: Option<Reply>,
    rx: VecDeque<u8>,
    fail_start: bool,

    pub starts: usize,
    pub transmits: usize,
    pub requests: usize,
    pub commands: Vec<(u8, u8)>,
}

impl FakeTransport {
    /// Replies are consumed one per command write; the last one repeats.
    pub fn new(script: &[Reply]) -> Self {
        Self {
            script: script.to_vec(),
            pending: None,
            rx: VecDeque::new(),
            fail_start: false,
            starts: 0,
            transmits: 0,
            requests: 0,
            commands: Vec::new(),
        }
    }

    /// Make `start` report failure.
    pub fn with_failing_start(mut self) -> Self {
        self.fail_start = true;
        self
    }

    fn on_start(&mut self) -> Result<(), Nack> {
        self.starts += 1;
        if self.fail_start {
            Err(Nack)
        } else {
            Ok(())
        }
    }

    fn on_transmit(&mut self, address: u8, bytes: &[u8]) -> Result<(), Nack> {
        let reply = self
            .script
            .get(self.transmits)
            .or(self.script.last())
            .copied()
            .unwrap_or(Reply::Silent);

        self.transmits += 1;
        self.commands.push((address, bytes[0]));

        match reply {
            Reply::Nack => {
                self.pending = None;
                Err(Nack)
            }
            other => {
                self.pending = Some(other);
                Ok(())
            }
        }
    }

    fn on_request(&mut self, len: usize) -> usize {
        assert_eq!(len, 2);
        self.requests += 1;
        self.rx.clear();

        match self.pending.take() {
            Some(Reply::Bytes(bytes)) => self.rx.extend(bytes),
            Some(Reply::Partial(byte)) => self.rx.push_back(byte),
            _ => {}
        }
        self.rx.len()
    }
}

impl Transport for FakeTransport {
    type Error = Nack;

    fn start(&mut self) -> Result<(), Self::Error> {
        self.on_start()
    }

    fn transmit(&mut self, address: u8, bytes: &[u8]) -> Result<(), Self::Error> {
        self.on_transmit(address, bytes)
    }

    fn request(&mut self, _address: u8, len: usize) -> usize {
        self.on_request(len)
    }

    fn available(&mut self) -> usize {
        self.rx.len()
    }

    fn read_byte(&mut self) -> Option<u8> {
        self.rx.pop_front()
    }
}

#[cfg(feature = "async")]
impl crate::AsyncTransport for FakeTransport {
    type Error = Nack;

    async fn start(&mut self) -> Result<(), Self::Error> {
        self.on_start()
    }

    async fn transmit(&mut self, address: u8, bytes: &[u8]) -> Result<(), Self::Error> {
        self.on_transmit(address, bytes)
    }

    async fn request(&mut self, _address: u8, len: usize) -> usize {
        self.on_request(len)
    }

    fn available(&mut self) -> usize {
        self.rx.len()
    }

    fn read_byte(&mut self) -> Option<u8> {
        self.rx.pop_front()
    }
}
