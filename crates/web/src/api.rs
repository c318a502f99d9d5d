use deckhand_core::{
    parse_card_codes, parse_count, parse_shuffle, Card, DeckError, DeckId, DeckService,
    DocumentStore, ErrorKind,
};
use serde::Serialize;
use tiny_http::Method;

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: serde_json::Value,
}

impl ApiResponse {
    fn json<T: Serialize>(status: u16, payload: &T) -> Self {
        match serde_json::to_value(payload) {
            Ok(body) => Self { status, body },
            Err(err) => Self::error(500, err.to_string()),
        }
    }

    fn error(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            body: serde_json::json!({ "error": message.into() }),
        }
    }
}

#[derive(Serialize)]
struct DrawnCards {
    cards: Vec<Card>,
}

/// Maps one request onto the deck service.
///
/// - `POST /decks?shuffle=&cards=` creates a deck (201)
/// - `GET /decks/{id}` opens a deck (200)
/// - `GET /decks/{id}/cards/count/{count}` draws cards (200)
pub fn handle<S: DocumentStore>(service: &DeckService<S>, method: &Method, url: &str) -> ApiResponse {
    let (path, query) = match url.split_once('?') {
        Some((path, query)) => (path, parse_query(query)),
        None => (url, Vec::new()),
    };
    let decoded: Vec<String> = path
        .trim_matches('/')
        .split('/')
        .map(|segment| percent_decode(segment, false))
        .collect();
    let segments: Vec<&str> = decoded.iter().map(String::as_str).collect();
    match (method, segments.as_slice()) {
        (Method::Post, ["decks"]) => create_deck(service, &query),
        (Method::Get, ["decks", deck_id]) => open_deck(service, deck_id),
        (Method::Get, ["decks", deck_id, "cards", "count", count]) => {
            draw_cards(service, deck_id, count)
        }
        (_, ["decks"]) | (_, ["decks", _]) | (_, ["decks", _, "cards", "count", _]) => {
            ApiResponse::error(405, "method not allowed")
        }
        _ => ApiResponse::error(404, "no such route"),
    }
}

fn create_deck<S: DocumentStore>(service: &DeckService<S>, query: &[(String, String)]) -> ApiResponse {
    let shuffled = match parse_shuffle(query_param(query, "shuffle")) {
        Ok(shuffled) => shuffled,
        Err(err) => return error_response(err.into()),
    };
    let requested = parse_card_codes(query_param(query, "cards"));
    match service.create_deck(shuffled, &requested) {
        Ok(deck) => ApiResponse::json(201, &deck),
        Err(err) => error_response(err),
    }
}

fn open_deck<S: DocumentStore>(service: &DeckService<S>, raw_id: &str) -> ApiResponse {
    let result = DeckId::parse(raw_id)
        .map_err(DeckError::from)
        .and_then(|id| service.open_deck(&id));
    match result {
        Ok(deck) => ApiResponse::json(200, &deck),
        Err(err) => error_response(err),
    }
}

fn draw_cards<S: DocumentStore>(service: &DeckService<S>, raw_id: &str, raw_count: &str) -> ApiResponse {
    let result = DeckId::parse(raw_id)
        .and_then(|id| parse_count(raw_count).map(|count| (id, count)))
        .map_err(DeckError::from)
        .and_then(|(id, count)| service.draw_cards(&id, count));
    match result {
        Ok(cards) => ApiResponse::json(200, &DrawnCards { cards }),
        Err(err) => error_response(err),
    }
}

fn error_response(err: DeckError) -> ApiResponse {
    let status = match err.kind() {
        ErrorKind::NotFound => 404,
        ErrorKind::Validation => 400,
        ErrorKind::Store => {
            tracing::error!(%err, "store failure");
            500
        }
    };
    ApiResponse::error(status, err.to_string())
}

fn query_param<'a>(query: &'a [(String, String)], key: &str) -> Option<&'a str> {
    query
        .iter()
        .find(|(name, _)| name == key)
        .map(|(_, value)| value.as_str())
}

fn parse_query(query: &str) -> Vec<(String, String)> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((key, value)) => {
                (percent_decode(key, true), percent_decode(value, true))
            }
            None => (percent_decode(pair, true), String::new()),
        })
        .collect()
}

/// `%XX` becomes a byte; `+` becomes a space only in query components.
/// Malformed escapes are kept verbatim. Path segments are decoded after
/// splitting, so an encoded `/` stays inside its segment.
fn percent_decode(raw: &str, plus_as_space: bool) -> String {
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut idx = 0;
    while idx < bytes.len() {
        match bytes[idx] {
            b'+' if plus_as_space => out.push(b' '),
            b'%' => {
                match (hex_value(bytes.get(idx + 1)), hex_value(bytes.get(idx + 2))) {
                    (Some(hi), Some(lo)) => {
                        out.push(hi << 4 | lo);
                        idx += 2;
                    }
                    _ => out.push(b'%'),
                }
            }
            byte => out.push(byte),
        }
        idx += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_value(byte: Option<&u8>) -> Option<u8> {
    let byte = *byte?;
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}
