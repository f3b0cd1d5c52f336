use base64::Engine;
use depdocs::SourceError;
use serde::Deserialize;

/// Response from GitHub's README API.
/// `GET /repos/{owner}/{repo}/readme`
#[derive(Debug, Deserialize)]
pub struct ReadmeResponse {
    pub name: String,
    pub content: Option<String>,
    pub encoding: Option<String>,
    pub html_url: Option<String>,
}

impl ReadmeResponse {
    /// Decode the base64 payload into UTF-8 text.
    pub fn decode(&self) -> Result<String, SourceError> {
        let encoded = self
            .content
            .as_deref()
            .ok_or_else(|| SourceError::Parse("no content in README response".into()))?;

        if let Some(encoding) = self.encoding.as_deref()
            && encoding != "base64"
        {
            return Err(SourceError::Parse(format!(
                "unsupported README encoding: {encoding}"
            )));
        }

        // GitHub returns base64 with newlines embedded
        let cleaned: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();

        let bytes = base64::engine::general_purpose::STANDARD
            .decode(&cleaned)
            .map_err(|e| SourceError::Parse(format!("base64 decode failed: {e}")))?;

        String::from_utf8(bytes).map_err(|e| SourceError::Parse(format!("invalid UTF-8: {e}")))
    }
}
