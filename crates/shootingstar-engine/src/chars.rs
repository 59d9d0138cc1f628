//! Glyphs used to draw beam segments on a character grid.

/// Segment glyphs, from the smallest star size to the largest.
pub const STAR_GLYPHS: &[char] = &['·', '•', '✦'];

/// Pick the glyph for a segment of the given size in px.
pub fn glyph_for_size(size: u32) -> char {
    match size {
        0..12 => STAR_GLYPHS[0],
        12..16 => STAR_GLYPHS[1],
        _ => STAR_GLYPHS[2],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glyph_for_size() {
        assert_eq!(glyph_for_size(8), '·');
        assert_eq!(glyph_for_size(12), '•');
        assert_eq!(glyph_for_size(15), '•');
        assert_eq!(glyph_for_size(20), '✦');
    }
}
