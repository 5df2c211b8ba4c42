use axum::http::{header, HeaderMap};
use bytes::Bytes;
use serde_json::{Map, Value};

/// Encoding of a contact form body, judged from its Content-Type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyFormat {
    Json,
    UrlEncoded,
    Multipart,
    Unknown,
}

impl BodyFormat {
    /// A missing Content-Type is read as JSON.
    pub fn from_content_type(content_type: Option<&str>) -> Self {
        let Some(content_type) = content_type else {
            return BodyFormat::Json;
        };
        let mime = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match mime.as_str() {
            "application/json" => BodyFormat::Json,
            "application/x-www-form-urlencoded" => BodyFormat::UrlEncoded,
            "multipart/form-data" => BodyFormat::Multipart,
            _ => BodyFormat::Unknown,
        }
    }
}

/// Decode a posted contact form into a JSON object keyed by field name.
pub async fn parse(headers: &HeaderMap, body: Bytes) -> Result<Value, String> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());

    match BodyFormat::from_content_type(content_type) {
        BodyFormat::Json => parse_json(&body),
        BodyFormat::UrlEncoded => Ok(parse_urlencoded(&body)),
        BodyFormat::Multipart => parse_multipart(content_type.unwrap_or_default(), body).await,
        BodyFormat::Unknown => Ok(parse_json(&body).unwrap_or_else(|_| parse_urlencoded(&body))),
    }
}

fn parse_json(body: &[u8]) -> Result<Value, String> {
    serde_json::from_slice(body).map_err(|e| format!("Invalid JSON: {e}"))
}

fn parse_urlencoded(body: &[u8]) -> Value {
    let fields: Map<String, Value> = form_urlencoded::parse(body)
        .map(|(k, v)| (k.into_owned(), Value::String(v.into_owned())))
        .collect();
    Value::Object(fields)
}

/// Text parts only. The form has no uploads, so file parts and unnamed parts
/// are skipped.
async fn parse_multipart(content_type: &str, body: Bytes) -> Result<Value, String> {
    let boundary = multer::parse_boundary(content_type)
        .map_err(|_| "Missing multipart boundary".to_string())?;

    let stream = futures_util::stream::once(async { Ok::<_, std::io::Error>(body) });
    let mut multipart = multer::Multipart::new(stream, boundary);

    let mut fields = Map::new();
    while let Some(part) = multipart
        .next_field()
        .await
        .map_err(|e| format!("Multipart error: {e}"))?
    {
        if part.file_name().is_some() {
            continue;
        }
        let Some(name) = part.name().map(str::to_string) else {
            continue;
        };
        let value = part
            .text()
            .await
            .map_err(|e| format!("Unreadable field {name}: {e}"))?;
        fields.insert(name, Value::String(value));
    }

    Ok(Value::Object(fields))
}
