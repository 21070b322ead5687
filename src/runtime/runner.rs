//! One-shot evaluation of a JSON-encoded edge event.

use crate::event::EdgeEvent;
use crate::function::{EdgeError, EdgeFunction, FunctionContext};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

/// Decode an event, run `function` on it and encode what it returns.
pub async fn run_event_json(
    function: &dyn EdgeFunction,
    input: &str,
) -> Result<String, EdgeError> {
    let event: EdgeEvent = serde_json::from_str(input)?;
    let ctx = FunctionContext::for_invocation(function.name());
    debug!("Evaluating event for {} [{}]", function.name(), ctx.request_id);

    let output = function.handle(event, &ctx).await?;
    Ok(serde_json::to_string(&output)?)
}

/// Read a whole event from `reader`, evaluate it and write the output,
/// newline-terminated, to `writer`.
pub async fn run_event_io<R, W>(
    function: &dyn EdgeFunction,
    mut reader: R,
    mut writer: W,
) -> Result<(), EdgeError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut input = String::new();
    reader.read_to_string(&mut input).await?;

    let output = run_event_json(function, &input).await?;

    writer.write_all(output.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function::WwwRedirect;
    use serde_json::{json, Value};
    use std::io;

    #[tokio::test]
    async fn test_redirect_event() {
        let input = json!({
            "request": {
                "uri": "/p",
                "headers": { "host": { "value": "example.com" }, "accept": { "value": "*/*" } },
                "querystring": { "q": { "value": "1" } }
            }
        });
        let output = run_event_json(&WwwRedirect::new("example.com"), &input.to_string())
            .await
            .unwrap();

        assert_eq!(
            serde_json::from_str::<Value>(&output).unwrap(),
            json!({
                "statusCode": 302,
                "statusDescription": "Found",
                "headers": {
                    "accept": { "value": "*/*" },
                    "location": { "value": "https://www.example.com/p?q=1" }
                }
            })
        );
    }

    #[tokio::test]
    async fn test_pass_through_returns_request() {
        let request = json!({
            "method": "GET",
            "uri": "/p",
            "headers": { "host": { "value": "www.example.com" } },
            "querystring": {},
            "cookies": {}
        });
        let input = json!({ "version": "1.0", "request": request });
        let output = run_event_json(&WwwRedirect::new("example.com"), &input.to_string())
            .await
            .unwrap();

        assert_eq!(serde_json::from_str::<Value>(&output).unwrap(), request);
    }

    #[tokio::test]
    async fn test_pass_through_keeps_repeated_headers() {
        let request = json!({
            "uri": "/p",
            "headers": {
                "host": { "value": "www.example.com" },
                "accept": { "value": "a", "multiValue": [{ "value": "a" }, { "value": "b" }] }
            },
            "querystring": { "q": { "value": "1" } }
        });
        let input = json!({ "request": request });
        let output = run_event_json(&WwwRedirect::new("example.com"), &input.to_string())
            .await
            .unwrap();

        assert_eq!(serde_json::from_str::<Value>(&output).unwrap(), request);
    }

    #[tokio::test]
    async fn test_event_io() {
        let input = json!({
            "request": { "uri": "/", "headers": { "host": { "value": "example.com" } } }
        })
        .to_string();
        let mut output = Vec::new();

        run_event_io(&WwwRedirect::new("example.com"), input.as_bytes(), &mut output)
            .await
            .unwrap();

        let text = String::from_utf8(output).unwrap();
        assert!(text.ends_with('\n'));
        let value: Value = serde_json::from_str(text.trim_end()).unwrap();
        assert_eq!(value["headers"]["location"]["value"], "https://www.example.com/");
    }

    #[tokio::test]
    async fn test_event_io_read_failure() {
        let reader = tokio_test::io::Builder::new()
            .read_error(io::Error::new(io::ErrorKind::BrokenPipe, "stdin closed"))
            .build();
        let result = run_event_io(&WwwRedirect::new("example.com"), reader, Vec::new()).await;
        assert!(matches!(result, Err(EdgeError::Io(_))));
    }

    #[tokio::test]
    async fn test_event_io_write_failure() {
        let input = json!({
            "request": { "uri": "/", "headers": { "host": { "value": "a.test" } } }
        })
        .to_string();
        let writer = tokio_test::io::Builder::new()
            .write_error(io::Error::new(io::ErrorKind::BrokenPipe, "stdout closed"))
            .build();
        let result =
            run_event_io(&WwwRedirect::new("example.com"), input.as_bytes(), writer).await;
        assert!(matches!(result, Err(EdgeError::Io(_))));
    }

    #[tokio::test]
    async fn test_malformed_event() {
        let result = run_event_json(&WwwRedirect::new("example.com"), "{\"request\": 1}").await;
        assert!(matches!(result, Err(EdgeError::InvalidEvent(_))));
    }

    #[tokio::test]
    async fn test_missing_host() {
        let input = json!({ "request": { "uri": "/", "headers": {}, "querystring": {} } });
        let result = run_event_json(&WwwRedirect::new("example.com"), &input.to_string()).await;
        assert!(matches!(result, Err(EdgeError::MissingHostHeader)));
    }
}
