//! Label vocabulary for the recognizer.
//!
//! Each entry pairs a canonical label with alias tokens. A caller-supplied
//! hint is matched against aliases case-insensitively; hints are advisory, so
//! a hint that matches nothing simply has no effect.

/// A canonical label and the alias tokens that map to it.
#[derive(Debug, Clone, Copy)]
pub struct LabelEntry {
    /// Canonical label reported to the host.
    pub label: &'static str,

    /// Alias tokens a hint may use.
    pub aliases: &'static [&'static str],
}

/// Builtin vocabulary. Order matters: the executor indexes into it.
pub const VOCABULARY: &[LabelEntry] = &[
    LabelEntry {
        label: "water_bottle",
        aliases: &["bottle", "water bottle", "flask"],
    },
    LabelEntry {
        label: "coffee_cup",
        aliases: &["cup", "coffee cup", "mug", "tumbler"],
    },
    LabelEntry {
        label: "drink_can",
        aliases: &["can", "soda can", "drink can"],
    },
    LabelEntry {
        label: "food_container",
        aliases: &["container", "takeout box", "lunchbox"],
    },
    LabelEntry {
        label: "shopping_bag",
        aliases: &["bag", "tote", "grocery bag"],
    },
    LabelEntry {
        label: "smartphone",
        aliases: &["phone", "smartphone", "mobile"],
    },
    LabelEntry {
        label: "laptop",
        aliases: &["laptop", "notebook computer"],
    },
    LabelEntry {
        label: "headphones",
        aliases: &["headphones", "headset", "earbuds"],
    },
    LabelEntry {
        label: "charging_cable",
        aliases: &["cable", "charger", "usb cable"],
    },
    LabelEntry {
        label: "battery",
        aliases: &["battery", "power bank"],
    },
    LabelEntry {
        label: "cutlery",
        aliases: &["fork", "spoon", "cutlery"],
    },
    LabelEntry {
        label: "plate",
        aliases: &["plate", "dish"],
    },
    LabelEntry {
        label: "shirt",
        aliases: &["shirt", "t-shirt", "tee"],
    },
    LabelEntry {
        label: "shoes",
        aliases: &["shoes", "sneakers", "sandals"],
    },
    LabelEntry {
        label: "toothbrush",
        aliases: &["toothbrush"],
    },
    LabelEntry {
        label: "book",
        aliases: &["book", "notebook", "magazine"],
    },
];

/// Find the vocabulary index a hint refers to, if any.
///
/// Matching is case-insensitive substring in both directions, so "Plastic
/// water bottle" matches the "water bottle" alias and "mug" matches a hint
/// of "mug".
pub fn match_hint(hint: &str) -> Option<usize> {
    let needle = hint.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }
    VOCABULARY.iter().position(|entry| {
        entry
            .aliases
            .iter()
            .any(|alias| needle.contains(alias) || alias.contains(needle.as_str()))
    })
}

/// Canonical label at `index`, wrapping past the end of the vocabulary.
pub fn label_at(index: usize) -> &'static str {
    VOCABULARY[index % VOCABULARY.len()].label
}
