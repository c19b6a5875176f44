//! AppendLog implementation
//!
//! Owns the log file, the framing, and the initialization contract.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use crate::config::SyncStrategy;
use crate::error::{CordError, Result};

use super::scan::Frames;
use super::Address;

/// Width of the length prefix in bytes (little-endian `u32`).
pub const LEN_WIDTH: usize = 4;

/// Largest total framed size the length prefix can express.
const MAX_FRAME_SIZE: usize = u32::MAX as usize;

/// Append-only framed byte storage over a single file.
///
/// The writable frontier (first zero-length prefix) is rediscovered by a
/// forward scan on every open; that scan is the only recovery mechanism.
/// From then on the frontier is tracked in memory, which is sound because
/// one `AppendLog` exclusively owns its file for its lifetime.
pub struct AppendLog {
    file: File,
    /// Address of the writable frontier; the next append lands here.
    end: Address,
    sync_strategy: SyncStrategy,
}

impl AppendLog {
    /// Open or create a log file.
    ///
    /// Opening an existing file alters nothing beyond ensuring a trailing
    /// zero marker exists; opening a fresh path creates a file consisting
    /// solely of that marker. Re-opening a well-formed log is byte-for-byte
    /// idempotent.
    pub fn open(path: &Path, sync_strategy: SyncStrategy) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(path)?;

        let mut log = Self {
            file,
            end: 0,
            sync_strategy,
        };
        log.init()?;

        tracing::debug!("log opened: {} (frontier at {})", path.display(), log.end);
        Ok(log)
    }

    /// Initialize: guarantee a zero marker terminates the data, then find
    /// the frontier.
    fn init(&mut self) -> Result<()> {
        let file_len = self.file.metadata()?.len();

        if file_len == 0 {
            // Fresh file: its entire initial state is one zero marker.
            self.write_marker(0)?;
            self.end = 0;
            return Ok(());
        }

        if !self.ends_with_marker(file_len)? {
            // Pre-existing bytes are left untouched; the marker is appended
            // after them so the frontier scan below has a place to stop.
            self.file.seek(SeekFrom::End(0))?;
            self.file.write_all(&[0u8; LEN_WIDTH])?;
        }

        self.end = self.scan_frontier()?;
        Ok(())
    }

    /// Write a zero marker at `pos`.
    fn write_marker(&mut self, pos: Address) -> Result<()> {
        self.file.seek(SeekFrom::Start(pos))?;
        self.file.write_all(&[0u8; LEN_WIDTH])?;
        Ok(())
    }

    /// Whether the file's last `LEN_WIDTH` bytes are all zero.
    fn ends_with_marker(&mut self, file_len: u64) -> Result<bool> {
        if file_len < LEN_WIDTH as u64 {
            return Ok(false);
        }
        self.file.seek(SeekFrom::End(-(LEN_WIDTH as i64)))?;
        let mut tail = [0u8; LEN_WIDTH];
        self.file.read_exact(&mut tail)?;
        Ok(tail.iter().all(|b| *b == 0))
    }

    /// Forward-scan from address 0 to the first zero-length prefix.
    ///
    /// Skips by whatever each prefix claims; reads past end-of-file count
    /// as zero, so the scan terminates even on files we did not write.
    fn scan_frontier(&mut self) -> Result<Address> {
        let mut pos: Address = 0;
        loop {
            let len = self.read_len_at(pos)?;
            if len == 0 {
                return Ok(pos);
            }
            pos += u64::from(len);
        }
    }

    /// Read the length prefix at `pos`; a truncated or absent prefix reads
    /// as zero ("no data here").
    pub(crate) fn read_len_at(&mut self, pos: Address) -> Result<u32> {
        self.file.seek(SeekFrom::Start(pos))?;
        let mut buf = [0u8; LEN_WIDTH];
        let mut filled = 0;
        while filled < LEN_WIDTH {
            let n = self.file.read(&mut buf[filled..])?;
            if n == 0 {
                return Ok(0);
            }
            filled += n;
        }
        Ok(u32::from_le_bytes(buf))
    }

    /// Append a framed payload at the frontier and return its address.
    ///
    /// A fresh zero marker is written past the new end before returning, so
    /// a scan after a crash lands on the marker rather than on garbage.
    pub fn append(&mut self, payload: &[u8]) -> Result<Address> {
        let total = LEN_WIDTH + payload.len();
        if total > MAX_FRAME_SIZE {
            return Err(CordError::FrameTooLarge {
                size: total,
                max: MAX_FRAME_SIZE,
            });
        }

        let addr = self.end;
        self.file.seek(SeekFrom::Start(addr))?;
        self.file.write_all(&(total as u32).to_le_bytes())?;
        self.file.write_all(payload)?;
        self.file.write_all(&[0u8; LEN_WIDTH])?;

        self.end = addr + total as u64;

        if self.sync_strategy == SyncStrategy::EveryAppend {
            self.file.sync_data()?;
        }

        tracing::trace!("appended {} bytes at {}", payload.len(), addr);
        Ok(addr)
    }

    /// Read the payload of the frame at `address`.
    ///
    /// Returns `None` when the position holds a zero length: absence, not
    /// an error. A length that implies a frame running past the writable
    /// frontier is corruption.
    pub fn read(&mut self, address: Address) -> Result<Option<Vec<u8>>> {
        let len = self.read_len_at(address)?;
        if len == 0 {
            return Ok(None);
        }
        let len = len as usize;
        if len < LEN_WIDTH {
            return Err(CordError::Corrupt(format!(
                "frame at {} has length {} shorter than its prefix",
                address, len
            )));
        }
        if address + len as u64 > self.end {
            return Err(CordError::Corrupt(format!(
                "frame at {} runs past the writable frontier",
                address
            )));
        }
        // The frontier itself may be a lie on a file we did not write;
        // bound the frame by the bytes that actually exist before
        // allocating for them.
        if address + len as u64 > self.file.metadata()?.len() {
            return Err(CordError::Corrupt(format!(
                "frame at {} runs past end of file",
                address
            )));
        }

        let mut payload = vec![0u8; len - LEN_WIDTH];
        self.file.seek(SeekFrom::Start(address + LEN_WIDTH as u64))?;
        self.file.read_exact(&mut payload).map_err(|e| {
            if e.kind() == std::io::ErrorKind::UnexpectedEof {
                CordError::Corrupt(format!("frame at {} runs past end of file", address))
            } else {
                CordError::Io(e)
            }
        })?;
        Ok(Some(payload))
    }

    /// Address of the first frame strictly after `address`, or `None` when
    /// `address` is at or past the last frame.
    pub fn next_address(&mut self, address: Address) -> Result<Option<Address>> {
        let mut pos: Address = 0;
        loop {
            let len = self.read_len_at(pos)?;
            if len == 0 {
                return Ok(None);
            }
            if (len as usize) < LEN_WIDTH {
                return Err(CordError::Corrupt(format!(
                    "frame at {} has length {} shorter than its prefix",
                    pos, len
                )));
            }
            if pos > address {
                return Ok(Some(pos));
            }
            pos += u64::from(len);
        }
    }

    /// Iterate over all frames from the log start to the frontier.
    pub fn frames(&mut self) -> Frames<'_> {
        Frames::new(self)
    }

    /// Rewrite the payload of an existing frame in place.
    ///
    /// The frame's length must match exactly; only the root slot is ever
    /// rewritten this way.
    pub(crate) fn overwrite_payload(&mut self, address: Address, payload: &[u8]) -> Result<()> {
        let len = self.read_len_at(address)?;
        if len as usize != LEN_WIDTH + payload.len() {
            return Err(CordError::Corrupt(format!(
                "frame at {} cannot hold a {}-byte payload",
                address,
                payload.len()
            )));
        }
        self.file.seek(SeekFrom::Start(address + LEN_WIDTH as u64))?;
        self.file.write_all(payload)?;
        Ok(())
    }

    /// Force everything written so far to disk.
    pub fn sync(&mut self) -> Result<()> {
        self.file.sync_all()?;
        Ok(())
    }

    /// Whether the log holds no frames at all.
    pub fn is_empty(&self) -> bool {
        self.end == 0
    }

    /// The writable frontier: where the next append will land.
    pub fn end(&self) -> Address {
        self.end
    }
}
