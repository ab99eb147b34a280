// minimal request reading: only the request line matters

use std::time::Duration;

use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::error::ProxyError;

const READ_CHUNK: usize = 1024;

// reads until the end of the request line, at most `max_bytes`
pub async fn read_request_line<R>(
    reader: &mut R,
    max_bytes: usize,
    timeout: Duration,
) -> Result<String, ProxyError>
where
    R: AsyncRead + Unpin,
{
    match tokio::time::timeout(timeout, read_until_line_end(reader, max_bytes)).await {
        Ok(res) => res,
        Err(_) => Err(ProxyError::MalformedRequest(format!(
            "no request line within {timeout:?}"
        ))),
    }
}

async fn read_until_line_end<R>(reader: &mut R, max_bytes: usize) -> Result<String, ProxyError>
where
    R: AsyncRead + Unpin,
{
    let mut buf = BytesMut::with_capacity(READ_CHUNK.min(max_bytes));

    loop {
        if let Some(end) = buf.iter().position(|&b| b == b'\n') {
            return line_from(&buf[..end]);
        }
        if buf.len() >= max_bytes {
            return Err(ProxyError::MalformedRequest(format!(
                "request line exceeds {max_bytes} bytes"
            )));
        }

        let mut chunk = [0u8; READ_CHUNK];
        let want = READ_CHUNK.min(max_bytes - buf.len());
        let n = reader.read(&mut chunk[..want]).await?;
        if n == 0 {
            if buf.is_empty() {
                return Err(ProxyError::MalformedRequest("connection closed before request".into()));
            }
            return line_from(&buf);
        }
        buf.extend_from_slice(&chunk[..n]);
    }
}

fn line_from(raw: &[u8]) -> Result<String, ProxyError> {
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    std::str::from_utf8(raw)
        .map(str::to_owned)
        .map_err(|_| ProxyError::MalformedRequest("request line is not UTF-8".into()))
}

// second whitespace-delimited token of the request line, taken verbatim
pub fn parse_target(line: &str) -> Result<String, ProxyError> {
    line.split_whitespace()
        .nth(1)
        .map(str::to_owned)
        .ok_or_else(|| ProxyError::MalformedRequest(format!("no target in {line:?}")))
}
