#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sticker {
    pub emoji: &'static str,
    pub name: &'static str,
}

/// The sticker palette offered in the entry view.
pub const STICKERS: &[Sticker] = &[
    Sticker { emoji: "✨", name: "Sparkles" },
    Sticker { emoji: "🎀", name: "Ribbon" },
    Sticker { emoji: "🍸", name: "Martini" },
    Sticker { emoji: "💅", name: "Nails" },
    Sticker { emoji: "🥂", name: "Cheers" },
    Sticker { emoji: "🍋", name: "Lime" },
    Sticker { emoji: "👛", name: "Purse" },
    Sticker { emoji: "💄", name: "Lipstick" },
    Sticker { emoji: "🌸", name: "Cherry Blossom" },
    Sticker { emoji: "🍵", name: "Matcha" },
    Sticker { emoji: "👠", name: "Heel" },
    Sticker { emoji: "💖", name: "Heart" },
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn palette_emoji_are_distinct() {
        let unique: HashSet<_> = STICKERS.iter().map(|s| s.emoji).collect();
        assert_eq!(unique.len(), STICKERS.len());
    }
}
