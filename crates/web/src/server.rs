use crate::{handle, ApiResponse};
use anyhow::anyhow;
use deckhand_core::{DeckService, DocumentStore};
use tiny_http::{Header, Request, Response, Server, StatusCode};

/// Answers requests one at a time until the listener shuts down.
pub fn serve<S: DocumentStore>(server: &Server, service: &DeckService<S>) {
    for request in server.incoming_requests() {
        if let Err(err) = respond(request, service) {
            tracing::warn!(%err, "request error");
        }
    }
}

fn respond<S: DocumentStore>(request: Request, service: &DeckService<S>) -> anyhow::Result<()> {
    let method = request.method().clone();
    let url = request.url().to_string();
    let response = handle(service, &method, &url);
    tracing::info!(%method, %url, status = response.status, "request");
    respond_json(request, response)
}

fn respond_json(request: Request, response: ApiResponse) -> anyhow::Result<()> {
    let body = serde_json::to_vec_pretty(&response.body)?;
    let header = Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
        .map_err(|_| anyhow!("invalid content type header"))?;
    request.respond(
        Response::from_data(body)
            .with_status_code(StatusCode(response.status))
            .with_header(header),
    )?;
    Ok(())
}
