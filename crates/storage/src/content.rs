use crate::error::{ErrorKind, Result};
use bytes::Bytes;
use futures::{Stream, StreamExt};
use std::fmt;
use std::pin::Pin;

/// Boxed stream of file bytes.
pub type ByteStream = Pin<Box<dyn Stream<Item = std::io::Result<Bytes>> + Send>>;

/// The body of an upload: a byte stream along with its total length.
///
/// Stores that need the length up front (for a `Content-Length` header) get
/// it without buffering the stream.
pub struct FileContent {
    len: u64,
    stream: ByteStream,
}

impl FileContent {
    pub fn new(len: u64, stream: ByteStream) -> Self {
        Self { len, stream }
    }

    /// Content that is already in memory, as a single chunk.
    pub fn from_bytes(data: impl Into<Bytes>) -> Self {
        let data = data.into();
        let len = data.len() as u64;
        Self { len, stream: Box::pin(futures::stream::iter([Ok(data)])) }
    }

    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn into_stream(self) -> ByteStream {
        self.stream
    }

    /// Drain the stream into memory.
    pub async fn collect(self) -> Result<Vec<u8>> {
        let mut data = Vec::with_capacity(usize::try_from(self.len).unwrap_or_default());
        let mut stream = self.stream;
        while let Some(chunk) = stream.next().await {
            data.extend_from_slice(&chunk.map_err(ErrorKind::Io)?);
        }
        Ok(data)
    }

    /// Wrap the stream with leading and trailing bytes, adjusting the length.
    pub fn surround(self, head: impl Into<Bytes>, tail: impl Into<Bytes>) -> Self {
        let (head, tail) = (head.into(), tail.into());
        let len = self.len + head.len() as u64 + tail.len() as u64;
        let stream = futures::stream::iter([Ok(head)])
            .chain(self.stream)
            .chain(futures::stream::iter([Ok(tail)]));
        Self { len, stream: Box::pin(stream) }
    }
}

impl fmt::Debug for FileContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileContent").field("len", &self.len).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_from_bytes() {
        let content = FileContent::from_bytes(b"ID3".to_vec());
        assert_eq!(content.len(), 3);
        assert_eq!(content.collect().await.unwrap(), b"ID3");
        assert!(FileContent::from_bytes(Vec::new()).is_empty());
    }

    #[tokio::test]
    async fn test_surround() {
        let chunks: ByteStream =
            Box::pin(futures::stream::iter([Ok(Bytes::from_static(b"a")), Ok(Bytes::from_static(b"bc"))]));
        let content = FileContent::new(3, chunks).surround(b"<".to_vec(), b">".to_vec());
        assert_eq!(content.len(), 5);
        assert_eq!(content.collect().await.unwrap(), b"<abc>");
    }

    #[tokio::test]
    async fn test_stream_error_surfaces() {
        let failing: ByteStream = Box::pin(futures::stream::iter([
            Ok(Bytes::from_static(b"a")),
            Err(std::io::Error::other("disk gone")),
        ]));
        let err = FileContent::new(2, failing).collect().await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Io(_)));
    }
}
