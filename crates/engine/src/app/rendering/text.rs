const GLYPH_WIDTH: i32 = 3;
const GLYPH_HEIGHT: usize = 5;
pub(crate) const TEXT_SCALE: i32 = 2;
pub(crate) const GLYPH_ADVANCE: i32 = (GLYPH_WIDTH + 1) * TEXT_SCALE;

type Glyph = [u8; GLYPH_HEIGHT];

/// Horizontal extent of `text` as laid out by `Surface::draw_text`.
pub fn text_width(text: &str) -> f32 {
    (text.chars().count() as i32 * GLYPH_ADVANCE) as f32
}

const BLANK: Glyph = [0; GLYPH_HEIGHT];

/// Lays out `text` starting at `(x, y)` and reports every lit pixel.
/// Lowercase letters render as uppercase; unknown characters as blanks.
pub(crate) fn for_each_text_pixel(x: i32, y: i32, text: &str, mut plot: impl FnMut(i32, i32)) {
    let mut pen_x = x;
    for ch in text.chars() {
        let glyph = glyph_for(ch.to_ascii_uppercase());
        for (row, bits) in glyph.iter().enumerate() {
            for col in 0..GLYPH_WIDTH {
                if bits & (1 << (GLYPH_WIDTH - 1 - col)) == 0 {
                    continue;
                }
                let cell_x = pen_x + col * TEXT_SCALE;
                let cell_y = y + row as i32 * TEXT_SCALE;
                for sy in 0..TEXT_SCALE {
                    for sx in 0..TEXT_SCALE {
                        plot(cell_x + sx, cell_y + sy);
                    }
                }
            }
        }
        pen_x += GLYPH_ADVANCE;
    }
}

fn glyph_for(ch: char) -> Glyph {
    match ch {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b010, 0b010, 0b010],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'A' => [0b010, 0b101, 0b111, 0b101, 0b101],
        'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'C' => [0b011, 0b100, 0b100, 0b100, 0b011],
        'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'E' => [0b111, 0b100, 0b110, 0b100, 0b111],
        'F' => [0b111, 0b100, 0b110, 0b100, 0b100],
        'G' => [0b011, 0b100, 0b101, 0b101, 0b011],
        'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'J' => [0b001, 0b001, 0b001, 0b101, 0b010],
        'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'M' => [0b101, 0b111, 0b111, 0b101, 0b101],
        'N' => [0b110, 0b101, 0b101, 0b101, 0b101],
        'O' => [0b010, 0b101, 0b101, 0b101, 0b010],
        'P' => [0b110, 0b101, 0b110, 0b100, 0b100],
        'Q' => [0b010, 0b101, 0b101, 0b110, 0b011],
        'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        'S' => [0b011, 0b100, 0b010, 0b001, 0b110],
        'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'V' => [0b101, 0b101, 0b101, 0b101, 0b010],
        'W' => [0b101, 0b101, 0b111, 0b111, 0b101],
        'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'Y' => [0b101, 0b101, 0b010, 0b010, 0b010],
        'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '!' => [0b010, 0b010, 0b010, 0b000, 0b010],
        _ => BLANK,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit_pixels(text: &str) -> Vec<(i32, i32)> {
        let mut pixels = Vec::new();
        for_each_text_pixel(0, 0, text, |x, y| pixels.push((x, y)));
        pixels
    }

    #[test]
    fn unknown_characters_draw_nothing_but_still_advance() {
        assert!(lit_pixels("~ ").is_empty());
        let shifted = lit_pixels("~1");
        assert!(shifted.iter().all(|(x, _)| *x >= GLYPH_ADVANCE));
    }

    #[test]
    fn lowercase_matches_uppercase() {
        assert_eq!(lit_pixels("score"), lit_pixels("SCORE"));
    }

    #[test]
    fn pixels_stay_inside_scaled_cell() {
        for (x, y) in lit_pixels("8") {
            assert!((0..GLYPH_WIDTH * TEXT_SCALE).contains(&x));
            assert!((0..GLYPH_HEIGHT as i32 * TEXT_SCALE).contains(&y));
        }
    }
}
