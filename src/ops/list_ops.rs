use crate::model::snapshot::Snapshot;
use crate::util::unicode::grapheme_len;

/// Maximum list title length, in grapheme clusters
pub const MAX_TITLE_LEN: usize = 100;

/// Validation errors for the list title
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TitleError {
    #[error("list title is empty")]
    Empty,
    #[error("list title is {len} characters long (maximum {max})")]
    TooLong { max: usize, len: usize },
}

/// Set the list title (trimmed). Returns Ok(false) if it is unchanged.
pub fn set_title(snap: &mut Snapshot, title: &str) -> Result<bool, TitleError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(TitleError::Empty);
    }
    let len = grapheme_len(title);
    if len > MAX_TITLE_LEN {
        return Err(TitleError::TooLong {
            max: MAX_TITLE_LEN,
            len,
        });
    }
    if snap.list_title == title {
        return Ok(false);
    }
    snap.list_title = title.to_string();
    Ok(true)
}

/// Set the theme flag. Returns false if it already had that value.
pub fn set_dark_mode(snap: &mut Snapshot, dark: bool) -> bool {
    if snap.dark_mode == dark {
        return false;
    }
    snap.dark_mode = dark;
    true
}
