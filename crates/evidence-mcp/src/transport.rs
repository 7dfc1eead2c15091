//! Newline-delimited stdio transport.

use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader,
};

use crate::jsonrpc::{error_codes, JsonRpcResponse};
use crate::server::EvidenceServer;
use crate::McpError;

/// Serve requests from stdin until it closes, writing responses to stdout.
pub async fn serve_stdio(server: &EvidenceServer) -> Result<(), McpError> {
    let reader = BufReader::new(tokio::io::stdin());
    let writer = tokio::io::stdout();

    tracing::info!(
        name = %server.config().name,
        version = %server.config().version,
        "Evidence Validator MCP server running on stdio"
    );

    serve(server, reader, writer).await
}

/// Serve requests from any line-oriented reader.
///
/// Each line is handled to completion before the next is read. Blank lines
/// are skipped; EOF ends the loop cleanly. At most `max_request_bytes` plus a
/// line ending is buffered per line; the rest of a longer line is discarded
/// unread and answered with an invalid-request error.
pub async fn serve<R, W>(server: &EvidenceServer, mut reader: R, mut writer: W) -> Result<(), McpError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    // Room for the longest accepted line plus "\r\n".
    let cap = server.config().max_request_bytes.saturating_add(2);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        let n = (&mut reader)
            .take(cap as u64)
            .read_until(b'\n', &mut buf)
            .await?;
        if n == 0 {
            tracing::info!("Input closed, shutting down");
            break;
        }

        if n == cap && buf.last() != Some(&b'\n') {
            let skipped = discard_line(&mut reader).await?;
            let response = server.oversized_response(n + skipped);
            write_response(&mut writer, &response).await?;
            continue;
        }

        let response = match std::str::from_utf8(&buf) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                server.handle_line(line)
            }
            Err(e) => Some(JsonRpcResponse::error(
                serde_json::Value::Null,
                error_codes::PARSE_ERROR,
                format!("Parse error: {}", e),
            )),
        };

        if let Some(response) = response {
            write_response(&mut writer, &response).await?;
        }
    }
    Ok(())
}

/// Skip input up to and including the next newline. Returns the bytes skipped.
async fn discard_line<R>(reader: &mut R) -> Result<usize, McpError>
where
    R: AsyncBufRead + Unpin,
{
    let mut skipped = 0;
    loop {
        let (used, done) = {
            let available = reader.fill_buf().await?;
            if available.is_empty() {
                return Ok(skipped);
            }
            match available.iter().position(|&b| b == b'\n') {
                Some(pos) => (pos + 1, true),
                None => (available.len(), false),
            }
        };
        reader.consume(used);
        skipped += used;
        if done {
            return Ok(skipped);
        }
    }
}

async fn write_response<W>(writer: &mut W, response: &JsonRpcResponse) -> Result<(), McpError>
where
    W: AsyncWrite + Unpin,
{
    let mut line = serde_json::to_vec(response)?;
    line.push(b'\n');
    writer.write_all(&line).await?;
    writer.flush().await?;
    Ok(())
}
