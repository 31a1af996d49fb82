use axum::http::HeaderMap;
use bytes::Bytes;
use serde_json::{Map, Value};

/// Decode a request body into a JSON object according to its Content-Type.
/// Landing pages post JSON; plain HTML forms post urlencoded or multipart.
pub async fn parse(headers: &HeaderMap, body: Bytes) -> Result<Value, String> {
    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/json");

    if content_type.contains("multipart/form-data") {
        parse_multipart(content_type, body).await
    } else if content_type.contains("application/x-www-form-urlencoded") {
        parse_form_urlencoded(&body)
    } else {
        serde_json::from_slice(&body).map_err(|e| format!("Invalid JSON: {e}"))
    }
}

fn parse_form_urlencoded(body: &[u8]) -> Result<Value, String> {
    std::str::from_utf8(body).map_err(|e| format!("Invalid UTF-8: {e}"))?;

    let map: Map<String, Value> = form_urlencoded::parse(body)
        .map(|(k, v)| (k.into_owned(), Value::String(v.into_owned())))
        .collect();

    Ok(Value::Object(map))
}

async fn parse_multipart(content_type: &str, body: Bytes) -> Result<Value, String> {
    let boundary = multer::parse_boundary(content_type)
        .map_err(|_| "Missing multipart boundary".to_string())?;

    let stream = futures_util::stream::once(async { Ok::<_, std::io::Error>(body) });
    let mut multipart = multer::Multipart::new(stream, boundary);

    let mut map = Map::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| format!("Multipart error: {e}"))?
    {
        // Attachments are not relayed.
        if field.file_name().is_some() {
            continue;
        }
        let Some(name) = field.name().map(|n| n.to_string()) else {
            continue;
        };
        let value = field
            .text()
            .await
            .map_err(|e| format!("Field read error: {e}"))?;
        map.insert(name, Value::String(value));
    }

    Ok(Value::Object(map))
}
