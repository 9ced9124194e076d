use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use crate::error::CratedigError;

/// Query parameters the provider sends back on the redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackParams {
    pub code: String,
    pub state: String,
}

/// Wait for the provider to redirect the user's browser back to the
/// loopback address and capture the authorization code and state.
pub async fn listen_for_callback(
    port: u16,
    timeout: Duration,
) -> Result<CallbackParams, CratedigError> {
    let listener = TcpListener::bind(format!("127.0.0.1:{port}")).await?;

    let accept_future = async {
        let (mut stream, _) = listener.accept().await?;

        let mut buf = vec![0u8; 4096];
        let n = stream.read(&mut buf).await?;
        let request = String::from_utf8_lossy(&buf[..n]);

        let params = parse_callback_request(&request);

        let body = match &params {
            Ok(_) => {
                "<!DOCTYPE html><html><body><h1>Authentication successful!</h1>\
                 <p>You can close this window and return to the terminal.</p></body></html>"
            }
            Err(_) => {
                "<!DOCTYPE html><html><body><h1>Authentication failed</h1>\
                 <p>Return to the terminal for details.</p></body></html>"
            }
        };
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            body.len(),
            body
        );
        stream.write_all(response.as_bytes()).await?;
        stream.shutdown().await?;

        params
    };

    tokio::time::timeout(timeout, accept_future)
        .await
        .map_err(|_| {
            CratedigError::RequestFailed(format!(
                "Timed out waiting for the authorization callback after {}s",
                timeout.as_secs()
            ))
        })?
}

fn parse_callback_request(request: &str) -> Result<CallbackParams, CratedigError> {
    // Request line looks like "GET /callback?code=...&state=... HTTP/1.1"
    let query = request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|path| path.split('?').nth(1))
        .unwrap_or_default();

    let mut code = None;
    let mut state = None;
    for param in query.split('&') {
        if let Some((key, value)) = param.split_once('=') {
            match key {
                "code" if !value.is_empty() => code = Some(urldecode(value)),
                "state" if !value.is_empty() => state = Some(urldecode(value)),
                "error" => {
                    return Err(CratedigError::RequestFailed(format!(
                        "Provider denied authorization: {}",
                        urldecode(value)
                    )));
                }
                _ => {}
            }
        }
    }

    match (code, state) {
        (Some(code), Some(state)) => Ok(CallbackParams { code, state }),
        (None, _) => Err(CratedigError::RequestFailed(
            "No authorization code in callback request".to_string(),
        )),
        (_, None) => Err(CratedigError::RequestFailed(
            "No state parameter in callback request".to_string(),
        )),
    }
}

fn urldecode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut bytes = s.bytes();
    while let Some(b) = bytes.next() {
        match b {
            b'%' => {
                let pair = [bytes.next(), bytes.next()];
                if let [Some(hi), Some(lo)] = pair {
                    if let Ok(val) =
                        u8::from_str_radix(&String::from_utf8_lossy(&[hi, lo]), 16)
                    {
                        out.push(val as char);
                        continue;
                    }
                }
                out.push('%');
            }
            b'+' => out.push(' '),
            _ => out.push(b as char),
        }
    }
    out
}
