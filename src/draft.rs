use crate::diary_entry::{DateKey, DiaryEntry, DEFAULT_MOOD};
use crate::editorial::Editorial;

/// Unsaved edit state for the selected date.
///
/// Replaced wholesale whenever a date is selected and dropped when the user
/// leaves the entry view, saved or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    pub content: String,
    pub mood: String,
    pub stickers: Vec<String>,
    pub image_url: String,
}

impl Draft {
    /// Starts a draft from the stored entry for `key`, or from defaults.
    pub fn for_date(key: DateKey, existing: Option<&DiaryEntry>) -> Self {
        match existing {
            Some(entry) => Draft {
                content: entry.content.clone(),
                mood: if entry.mood.is_empty() {
                    DEFAULT_MOOD.to_string()
                } else {
                    entry.mood.clone()
                },
                stickers: entry.stickers.clone(),
                image_url: entry.display_image_url(),
            },
            None => Draft {
                content: String::new(),
                mood: DEFAULT_MOOD.to_string(),
                stickers: Vec::new(),
                image_url: key.placeholder_image_url(),
            },
        }
    }

    pub fn add_sticker(&mut self, emoji: impl Into<String>) {
        self.stickers.push(emoji.into());
    }

    /// Removes the sticker at `index`; out-of-range indices are ignored.
    pub fn remove_sticker(&mut self, index: usize) -> Option<String> {
        if index < self.stickers.len() {
            Some(self.stickers.remove(index))
        } else {
            None
        }
    }

    /// Builds the full record that replaces whatever is stored for `key`.
    pub fn into_entry(self, key: DateKey, editorial: Option<Editorial>) -> DiaryEntry {
        let image_url = if self.image_url.trim().is_empty() {
            key.placeholder_image_url()
        } else {
            self.image_url.trim().to_string()
        };
        DiaryEntry {
            date: key,
            content: self.content,
            mood: self.mood,
            stickers: self.stickers,
            image_url: Some(image_url),
            editorial,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> DateKey {
        "2026-03-14".parse().unwrap()
    }

    #[test]
    fn new_draft_uses_defaults() {
        let draft = Draft::for_date(key(), None);
        assert_eq!(draft.content, "");
        assert_eq!(draft.mood, "Divine");
        assert!(draft.stickers.is_empty());
        assert_eq!(draft.image_url, key().placeholder_image_url());
    }

    #[test]
    fn stickers_keep_insertion_order_and_remove_by_index() {
        let mut draft = Draft::for_date(key(), None);
        draft.add_sticker("✨");
        draft.add_sticker("🎀");
        draft.add_sticker("✨");
        assert_eq!(draft.remove_sticker(0).as_deref(), Some("✨"));
        assert_eq!(draft.stickers, vec!["🎀", "✨"]);
        assert_eq!(draft.remove_sticker(7), None);
        assert_eq!(draft.stickers.len(), 2);
    }

    #[test]
    fn draft_from_entry_with_blank_fields_falls_back() {
        let entry = DiaryEntry {
            date: key(),
            content: "x".to_string(),
            mood: String::new(),
            stickers: vec![],
            image_url: Some(String::new()),
            editorial: None,
        };
        let draft = Draft::for_date(key(), Some(&entry));
        assert_eq!(draft.mood, "Divine");
        assert_eq!(draft.image_url, key().placeholder_image_url());
    }

    #[test]
    fn blank_image_is_replaced_by_placeholder_on_commit() {
        let mut draft = Draft::for_date(key(), None);
        draft.image_url = "   ".to_string();
        let entry = draft.into_entry(key(), None);
        assert_eq!(entry.image_url, Some(key().placeholder_image_url()));
    }
}
