//! Callback-style request helper

use smol::{LocalExecutor, Task};

use crate::{NetError, Request, Transport, XmlHttpRequest};

/// Issue `request` and report the outcome through exactly one callback.
///
/// At the terminal state `on_load` receives the response body. An absent or
/// empty body calls `on_error` instead. The HTTP status plays no part, so a
/// 404 with a body is a load. Transport failures are returned as `Err` and
/// call neither callback.
pub async fn ajax<T, L, E>(transport: T, request: &Request, on_load: L, on_error: E) -> Result<(), NetError>
where
    T: Transport,
    L: FnOnce(String),
    E: FnOnce(),
{
    tracing::info!("ajax {} {}", request.method, request.url);

    let mut xhr = XmlHttpRequest::new(transport);
    xhr.open(request.method, &request.url);
    for (name, value) in &request.headers {
        xhr.set_request_header(name, value)?;
    }
    xhr.send(request.payload.as_deref()).await?;

    match xhr.take_response_text() {
        Some(text) if !text.is_empty() => {
            tracing::debug!(status = xhr.status(), bytes = text.len(), "ajax load");
            on_load(text);
        }
        _ => {
            tracing::debug!(status = xhr.status(), "ajax response has no body");
            on_error();
        }
    }
    Ok(())
}

/// Schedule [`ajax`] on a single-threaded executor and return its task.
/// The caller is never suspended; callbacks run when the executor polls
/// the task to completion.
pub fn spawn_ajax<'a, T, L, E>(
    executor: &LocalExecutor<'a>,
    transport: T,
    request: Request,
    on_load: L,
    on_error: E,
) -> Task<Result<(), NetError>>
where
    T: Transport + 'a,
    L: FnOnce(String) + 'a,
    E: FnOnce() + 'a,
{
    executor.spawn(async move { ajax(transport, &request, on_load, on_error).await })
}
