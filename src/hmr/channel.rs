//! JSON-lines hot update channel.
//!
//! The CLI host has no module cache of its own: invalidation is recorded so
//! the consumer reading the stream knows which modules to drop, and every
//! message is written as one JSON line. Once the reader hangs up the channel
//! stays closed.

use std::io::{ErrorKind, Write};

use super::invalidate::{HmrChannel, InvalidateError};
use super::message::HmrMessage;

pub struct JsonLinesChannel<W: Write> {
    out: W,
    /// Modules invalidated since the last message.
    invalidated: Vec<String>,
    closed: bool,
}

impl<W: Write> JsonLinesChannel<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            invalidated: Vec::new(),
            closed: false,
        }
    }
}

impl<W: Write> HmrChannel for JsonLinesChannel<W> {
    fn invalidate(&mut self, module: &str) -> Result<(), InvalidateError> {
        if self.closed {
            return Err(InvalidateError::ChannelClosed);
        }
        crate::debug!("hmr"; "invalidate {}", module.escape_default());
        self.invalidated.push(module.to_string());
        Ok(())
    }

    fn send(&mut self, message: HmrMessage) -> Result<(), InvalidateError> {
        if self.closed {
            return Err(InvalidateError::ChannelClosed);
        }
        crate::debug!("hmr"; "sending after {} invalidations", self.invalidated.len());
        self.invalidated.clear();
        writeln!(self.out, "{}", message.to_json())
            .and_then(|()| self.out.flush())
            .map_err(|e| {
                if e.kind() == ErrorKind::BrokenPipe {
                    self.closed = true;
                    InvalidateError::ChannelClosed
                } else {
                    InvalidateError::Send(e.to_string())
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Failing(ErrorKind);

    impl Write for Failing {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(self.0, "closed"))
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_one_line_per_message() {
        let mut out = Vec::new();
        let mut channel = JsonLinesChannel::new(&mut out);
        channel.invalidate("/src/router/index.ts").unwrap();
        assert_eq!(channel.invalidated, ["/src/router/index.ts"]);

        channel.send(HmrMessage::update(["/src/router/index.ts"])).unwrap();
        channel.send(HmrMessage::FullReload { reason: None }).unwrap();
        assert!(channel.invalidated.is_empty());

        let out = String::from_utf8(out).unwrap();
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(serde_json::from_str::<HmrMessage>(lines[0]).is_ok());
        assert_eq!(lines[1], r#"{"type":"full-reload"}"#);
    }

    #[test]
    fn test_write_failure_is_send_error() {
        let mut channel = JsonLinesChannel::new(Failing(ErrorKind::PermissionDenied));
        assert!(matches!(
            channel.send(HmrMessage::full_reload("x")),
            Err(InvalidateError::Send(_))
        ));
        // transient failures leave the channel usable
        assert!(channel.invalidate("/a.ts").is_ok());
    }

    #[test]
    fn test_hangup_closes_channel() {
        let mut channel = JsonLinesChannel::new(Failing(ErrorKind::BrokenPipe));
        assert!(matches!(
            channel.send(HmrMessage::full_reload("x")),
            Err(InvalidateError::ChannelClosed)
        ));
        assert!(matches!(
            channel.invalidate("/a.ts"),
            Err(InvalidateError::ChannelClosed)
        ));
    }
}
