/// Width in glyphs of the longest bar.
pub const BAR_WIDTH: usize = 40;
pub const BAR_GLYPH: &str = "█";
/// Longer words are cut and end with an ellipsis.
pub const MAX_LABEL_CHARS: usize = 24;
