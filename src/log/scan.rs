//! Forward frame scan
//!
//! The explicit form of the recovery walk: start at address 0, read a
//! length prefix, yield the frame, skip forward, stop at the first zero.

use crate::error::{CordError, Result};

use super::file::{AppendLog, LEN_WIDTH};
use super::Address;

/// One framed record, as seen by a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Where the frame starts (the address `append` returned for it).
    pub address: Address,
    /// The frame's payload, without the length prefix.
    pub payload: Vec<u8>,
}

/// Iterator over all frames between the log start and the frontier.
pub struct Frames<'a> {
    log: &'a mut AppendLog,
    pos: Address,
    done: bool,
}

impl<'a> Frames<'a> {
    pub(crate) fn new(log: &'a mut AppendLog) -> Self {
        Self {
            log,
            pos: 0,
            done: false,
        }
    }
}

impl Iterator for Frames<'_> {
    type Item = Result<Frame>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let len = match self.log.read_len_at(self.pos) {
            Ok(len) => len,
            Err(e) => {
                self.done = true;
                return Some(Err(e));
            }
        };
        if len == 0 {
            self.done = true;
            return None;
        }
        if (len as usize) < LEN_WIDTH {
            self.done = true;
            return Some(Err(CordError::Corrupt(format!(
                "frame at {} has length {} shorter than its prefix",
                self.pos, len
            ))));
        }

        let address = self.pos;
        let payload = match self.log.read(address) {
            Ok(Some(payload)) => payload,
            // read_len_at said non-zero, so absence here means the log
            // changed under us; surface it as corruption.
            Ok(None) => {
                self.done = true;
                return Some(Err(CordError::Corrupt(format!(
                    "frame at {} vanished mid-scan",
                    address
                ))));
            }
            Err(e) => {
                self.done = true;
                return Some(Err(e));
            }
        };

        self.pos = address + u64::from(len);
        Some(Ok(Frame { address, payload }))
    }
}
