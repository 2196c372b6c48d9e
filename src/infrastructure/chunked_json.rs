// Chunked JSON streaming utilities
use crate::application::streaming_service::StreamMessage;
use crate::infrastructure::json_response::brotli_compress;
use axum::body::Body;
use axum::http::{header, Response, StatusCode};
use axum::response::IntoResponse;
use bytes::{BufMut, Bytes, BytesMut};
use futures::stream::Stream;
use futures::StreamExt;

/// Create a chunked streaming response of length-prefixed JSON messages
pub async fn chunked_json_stream<S>(
    stream: S,
    compress: bool,
) -> Result<Response<Body>, StatusCode>
where
    S: Stream<Item = StreamMessage> + Send + 'static,
{
    let byte_stream = stream.then(move |msg| async move { serialize_chunk(msg, compress).await });

    let body = Body::from_stream(byte_stream);

    // Chunks are compressed one by one, so no Content-Encoding on the response itself.
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/octet-stream")
        .header(header::TRANSFER_ENCODING, "chunked")
        .body(body)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Length header of a frame; payloads that do not fit in 32 bits are refused
fn frame_length(len: usize) -> Result<u32, std::io::Error> {
    u32::try_from(len).map_err(|_| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("chunk of {} bytes exceeds the 32-bit frame header", len),
        )
    })
}

/// Serialize one message as a 4-byte big-endian length followed by its payload
pub async fn serialize_chunk(msg: StreamMessage, compress: bool) -> Result<Bytes, std::io::Error> {
    let json = serde_json::to_vec(&msg)?;

    let payload = if compress {
        brotli_compress(json).await?
    } else {
        json
    };

    let length = frame_length(payload.len())?;
    let mut chunk = BytesMut::with_capacity(4 + payload.len());
    chunk.put_u32(length);
    chunk.put_slice(&payload);

    Ok(chunk.freeze())
}

/// Helper to create a streaming response from a receiver
pub async fn stream_from_receiver(
    mut rx: tokio::sync::mpsc::Receiver<StreamMessage>,
    compress: bool,
) -> impl IntoResponse {
    let stream = async_stream::stream! {
        while let Some(msg) = rx.recv().await {
            yield msg;
        }
    };

    match chunked_json_stream(stream, compress).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}
