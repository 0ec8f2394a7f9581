use base64::{Engine as _, engine::general_purpose::STANDARD};
use mime::Mime;

/// `data:<mime>;base64,<payload>`, the form a browser `FileReader` produces.
pub fn encode(mime: &Mime, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime.essence_str(), STANDARD.encode(bytes))
}
