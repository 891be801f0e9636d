use crate::client::GenerationApi;
use crate::commands::CmdResult;
use crate::error::{Result, StickerError};

/// Context sent when the user asks for a caption without giving one.
pub const DEFAULT_CONTEXT: &str = "Generate a funny meme caption in Spanish";

/// Ask the backend for a caption suggestion.
pub fn run<G: GenerationApi>(api: &G, context: Option<&str>) -> Result<CmdResult> {
    let context = context
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(DEFAULT_CONTEXT);

    let response = api.generate_text(context)?;
    if response.success == Some(false) {
        return Err(StickerError::Generation(
            "the backend could not suggest a caption".to_string(),
        ));
    }

    Ok(CmdResult {
        text: Some(response.text),
        ..Default::default()
    })
}
