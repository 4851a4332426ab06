//! Length-prefixed JSON framing over a byte stream.
//!
//! Wire format: `[u32 big-endian length][serialized frame]`. The length
//! prefix is the only size bound; translation payloads may be arbitrarily
//! large binaries.

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Write one frame. Not cancel-safe: a partial write leaves the stream
/// unusable.
pub async fn write_frame<W, T>(writer: &mut W, frame: &T) -> Result<()>
where
    W: AsyncWrite + Unpin,
    T: Serialize,
{
    let payload = serde_json::to_vec(frame).context("failed to serialize frame")?;
    let len = u32::try_from(payload.len()).context("frame too large for length prefix")?;
    writer
        .write_all(&len.to_be_bytes())
        .await
        .context("failed to write frame length")?;
    writer
        .write_all(&payload)
        .await
        .context("failed to write frame payload")?;
    writer.flush().await.context("failed to flush frame")?;
    Ok(())
}

/// Read one frame. Returns `Ok(None)` when the peer finished the stream
/// cleanly before a new frame began; end-of-stream inside a frame is an
/// error.
pub async fn read_frame<R, T>(reader: &mut R) -> Result<Option<T>>
where
    R: AsyncRead + Unpin,
    T: DeserializeOwned,
{
    let mut len_bytes = [0u8; 4];
    match reader.read_exact(&mut len_bytes).await {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(e).context("failed to read frame length"),
    }

    let len = u32::from_be_bytes(len_bytes) as usize;
    let mut payload = vec![0u8; len];
    reader
        .read_exact(&mut payload)
        .await
        .context("failed to read frame payload")?;

    let frame = serde_json::from_slice(&payload).context("failed to parse frame")?;
    Ok(Some(frame))
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct TestFrame {
        id: u32,
        body: String,
    }

    #[tokio::test]
    async fn frame_roundtrip() {
        let (mut writer, mut reader) = tokio::io::duplex(1024);

        let frame = TestFrame {
            id: 7,
            body: "hello".to_string(),
        };
        write_frame(&mut writer, &frame).await.unwrap();

        let back: TestFrame = read_frame(&mut reader).await.unwrap().unwrap();
        assert_eq!(back, frame);
    }

    #[tokio::test]
    async fn frames_arrive_in_order() {
        let (mut writer, mut reader) = tokio::io::duplex(4096);

        for id in 0..3 {
            let frame = TestFrame {
                id,
                body: format!("frame {id}"),
            };
            write_frame(&mut writer, &frame).await.unwrap();
        }

        for id in 0..3 {
            let frame: TestFrame = read_frame(&mut reader).await.unwrap().unwrap();
            assert_eq!(frame.id, id);
        }
    }

    #[tokio::test]
    async fn clean_close_reads_as_none() {
        let (writer, mut reader) = tokio::io::duplex(64);
        drop(writer);

        let frame: Option<TestFrame> = read_frame(&mut reader).await.unwrap();
        assert!(frame.is_none());
    }

    #[tokio::test]
    async fn truncated_frame_is_an_error() {
        let (mut writer, mut reader) = tokio::io::duplex(64);
        writer.write_all(&8u32.to_be_bytes()).await.unwrap();
        writer.write_all(b"abc").await.unwrap();
        drop(writer);

        let result: Result<Option<TestFrame>> = read_frame(&mut reader).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn malformed_payload_is_an_error() {
        let (mut writer, mut reader) = tokio::io::duplex(64);
        writer.write_all(&3u32.to_be_bytes()).await.unwrap();
        writer.write_all(b"{{{").await.unwrap();

        let result: Result<Option<TestFrame>> = read_frame(&mut reader).await;
        assert!(result.is_err());
    }
}
