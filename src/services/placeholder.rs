//! Placeholder image for generated drafts

use base64::{Engine, engine::general_purpose::STANDARD};

/// Characters of the idea shown on the card
const IDEA_PREVIEW_CHARS: usize = 30;

/// Render the "Generated Image" card as an SVG document
pub fn placeholder_svg(idea: &str) -> String {
    let mut preview: String = idea.chars().take(IDEA_PREVIEW_CHARS).collect();
    if idea.chars().count() > IDEA_PREVIEW_CHARS {
        preview.push_str("...");
    }
    let preview = html_escape::encode_text(&preview);

    format!(
        r##"<svg width="400" height="300" xmlns="http://www.w3.org/2000/svg">
  <rect width="100%" height="100%" fill="#f3f4f6"/>
  <text x="50%" y="40%" font-family="Arial, sans-serif" font-size="14" fill="#667280" text-anchor="middle">Generated Image</text>
  <text x="50%" y="60%" font-family="Arial, sans-serif" font-size="12" fill="#97a3b4" text-anchor="middle">Based on your idea:</text>
  <text x="50%" y="70%" font-family="Arial, sans-serif" font-size="10" fill="#6b7280" text-anchor="middle">{preview}</text>
</svg>
"##
    )
}

/// Placeholder card as a `data:` URI
pub fn placeholder_data_uri(idea: &str) -> String {
    format!(
        "data:image/svg+xml;base64,{}",
        STANDARD.encode(placeholder_svg(idea))
    )
}
