use std::collections::HashMap;

use once_cell::sync::Lazy;

const FONT_HEIGHT: usize = 7;
const FONT_WIDTH: usize = 5;
const SHADOW_OFFSET: usize = 2;
const SPACING: usize = 2;
const FILL_CHAR: char = '█';
const OUTLINE_CHAR: char = '░';

/// Rows produced by [`render_flat`].
pub const FLAT_HEIGHT: usize = FONT_HEIGHT;
/// Rows produced by [`render`].
pub const BANNER_HEIGHT: usize = FONT_HEIGHT + SHADOW_OFFSET;

type Glyph = [&'static str; FONT_HEIGHT];

static GLYPHS: Lazy<HashMap<char, Glyph>> = Lazy::new(|| {
    HashMap::from([
        ('A', [" 111 ", "1   1", "1   1", "11111", "1   1", "1   1", "1   1"]),
        ('J', ["  111", "   1 ", "   1 ", "   1 ", "   1 ", "1  1 ", " 11  "]),
        ('Q', [" 111 ", "1   1", "1   1", "1   1", "1 1 1", "1  1 ", " 11 1"]),
        ('K', ["1   1", "1  1 ", "1 1  ", "11   ", "1 1  ", "1  1 ", "1   1"]),
        ('H', ["1   1", "1   1", "1   1", "11111", "1   1", "1   1", "1   1"]),
        ('I', ["11111", "  1  ", "  1  ", "  1  ", "  1  ", "  1  ", "11111"]),
        ('L', ["1    ", "1    ", "1    ", "1    ", "1    ", "1    ", "11111"]),
        ('O', [" 111 ", "1   1", "1   1", "1   1", "1   1", "1   1", " 111 "]),
        ('0', [" 111 ", "1   1", "1  11", "1 1 1", "11  1", "1   1", " 111 "]),
        ('1', ["  1  ", " 11  ", "  1  ", "  1  ", "  1  ", "  1  ", " 111 "]),
        ('2', [" 111 ", "1   1", "    1", "  11 ", " 1   ", "1    ", "11111"]),
        ('3', ["1111 ", "    1", "    1", " 111 ", "    1", "    1", "1111 "]),
        ('4', ["1   1", "1   1", "1   1", "11111", "    1", "    1", "    1"]),
        ('5', ["11111", "1    ", "1111 ", "    1", "    1", "1   1", " 111 "]),
        ('6', ["  11 ", " 1   ", "1    ", "1111 ", "1   1", "1   1", " 111 "]),
        ('7', ["11111", "    1", "   1 ", "  1  ", "  1  ", "  1  ", "  1  "]),
        ('8', [" 111 ", "1   1", "1   1", " 111 ", "1   1", "1   1", " 111 "]),
        ('9', [" 111 ", "1   1", "1   1", " 1111", "    1", "   1 ", " 11  "]),
        ('+', ["     ", "  1  ", "  1  ", "11111", "  1  ", "  1  ", "     "]),
        ('-', ["     ", "     ", "     ", "11111", "     ", "     ", "     "]),
        ('♥', ["     ", " 1 1 ", "11111", "11111", " 111 ", "  1  ", "     "]),
        ('♦', ["     ", "  1  ", " 111 ", "11111", " 111 ", "  1  ", "     "]),
        ('♣', ["  1  ", " 111 ", "  1  ", "1 1 1", "11111", "  1  ", " 111 "]),
        ('♠', ["  1  ", " 111 ", "11111", "11111", " 1 1 ", "  1  ", " 111 "]),
        (' ', ["     ", "     ", "     ", "     ", "     ", "     ", "     "]),
        ('?', [" 111 ", "1   1", "    1", "   1 ", "  1  ", "     ", "  1  "]),
    ])
});

/// Render text with the layered outline used for the title banner.
///
/// Every row is padded to the same width, so the block can be centred as a
/// whole without the glyph columns drifting apart.
pub fn render(text: &str) -> Vec<String> {
    render_with(text, true)
}

/// Render text without the outline, for card faces and counts.
pub fn render_flat(text: &str) -> Vec<String> {
    render_with(text, false)
}

/// Column count `render_flat` needs for `text`.
pub fn flat_width(text: &str) -> usize {
    let glyphs = text.chars().count();
    glyphs * FONT_WIDTH * 2 + glyphs.saturating_sub(1) * SPACING
}

/// Column count `render` needs for `text`.
pub fn banner_width(text: &str) -> usize {
    flat_width(text) + SHADOW_OFFSET * 2 + 1
}

fn render_with(text: &str, shadow: bool) -> Vec<String> {
    let content: Vec<char> = text.chars().map(|c| c.to_ascii_uppercase()).collect();
    let canvas_height = if shadow {
        FONT_HEIGHT + SHADOW_OFFSET
    } else {
        FONT_HEIGHT
    };
    if content.is_empty() {
        return vec![String::new(); canvas_height];
    }

    let glyph_width = FONT_WIDTH * 2; // double width for chunky appearance
    let total_width = if shadow {
        banner_width(text)
    } else {
        flat_width(text)
    };
    let mut canvas = vec![vec![' '; total_width]; canvas_height];

    for (index, ch) in content.iter().enumerate() {
        let Some(glyph) = GLYPHS.get(ch).or_else(|| GLYPHS.get(&'?')) else {
            continue;
        };
        let x_offset = index * (glyph_width + SPACING);
        paint_glyph(&mut canvas, glyph, x_offset, shadow);
    }

    canvas
        .into_iter()
        .map(|row| row.into_iter().collect::<String>())
        .collect()
}

fn paint_glyph(canvas: &mut [Vec<char>], glyph: &Glyph, x_offset: usize, shadow: bool) {
    for (row_idx, row) in glyph.iter().enumerate() {
        for (col_idx, symbol) in row.chars().enumerate() {
            if symbol != '1' {
                continue;
            }
            let x = x_offset + col_idx * 2;
            if shadow {
                for (dy, dx) in [(0, 0), (0, 1), (1, 0), (1, 1)] {
                    place(
                        canvas,
                        row_idx + SHADOW_OFFSET - dy,
                        x + SHADOW_OFFSET * 2 + dx,
                        OUTLINE_CHAR,
                    );
                }
            }
            place(canvas, row_idx, x, FILL_CHAR);
            place(canvas, row_idx, x + 1, FILL_CHAR);
        }
    }
}

fn place(canvas: &mut [Vec<char>], y: usize, x: usize, ch: char) {
    if y >= canvas.len() || x >= canvas[y].len() {
        return;
    }
    let cell = &mut canvas[y][x];
    if *cell == ' ' || (*cell == OUTLINE_CHAR && ch == FILL_CHAR) {
        *cell = ch;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_card_face_has_a_glyph() {
        for label in ["A", "10", "J", "Q", "K", "♥", "♦", "♣", "♠", "+", "-"] {
            for ch in label.chars() {
                assert!(GLYPHS.contains_key(&ch), "missing glyph for {ch}");
            }
        }
    }

    #[test]
    fn flat_rows_share_one_width() {
        for label in ["5♥", "10♠", "+1", "-12", "0"] {
            let lines = render_flat(label);
            assert_eq!(lines.len(), FLAT_HEIGHT);
            for line in &lines {
                assert_eq!(line.chars().count(), flat_width(label), "{label}: {line:?}");
                assert!(!line.contains(OUTLINE_CHAR));
            }
        }
    }

    #[test]
    fn flat_glyph_columns_line_up() {
        // The stem of `1` is the third glyph column, doubled.
        let lines = render_flat("1");
        for row in &lines[1..6] {
            assert_eq!(row.chars().nth(4), Some(FILL_CHAR), "{row:?}");
            assert_eq!(row.chars().nth(5), Some(FILL_CHAR), "{row:?}");
        }
        assert_eq!(lines[0], "    ██    ");
    }

    #[test]
    fn banner_has_shadow_rows() {
        let lines = render("HI-LO");
        assert_eq!(lines.len(), BANNER_HEIGHT);
        assert!(lines.iter().any(|line| line.contains(OUTLINE_CHAR)));
        assert!(lines
            .iter()
            .all(|line| line.chars().count() == banner_width("HI-LO")));
    }

    #[test]
    fn unknown_characters_fall_back() {
        assert_eq!(render_flat("Z"), render_flat("?"));
    }
}
