/// Braille canvas for high-resolution terminal rendering
/// Each terminal cell holds a 2×4 grid of dots, so one cell is 2 pixels wide and 4 tall.
/// Every cell also remembers which kind of object last inked it, so the
/// renderer can colour paddles and ball separately.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ink {
    #[default]
    Border,
    Paddle,
    Ball,
}

pub struct BrailleCanvas {
    width: usize,  // Width in terminal cells
    height: usize, // Height in terminal cells
    dots: Vec<u8>,
    ink: Vec<Ink>,
}

impl BrailleCanvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            dots: vec![0; width * height],
            ink: vec![Ink::default(); width * height],
        }
    }

    /// Set a dot at pixel coordinates, ignoring anything off the canvas
    pub fn set_pixel(&mut self, pixel_x: usize, pixel_y: usize, ink: Ink) {
        let cell_x = pixel_x / 2;
        let cell_y = pixel_y / 4;
        if cell_x >= self.width || cell_y >= self.height {
            return;
        }

        // Dot bit layout:
        // 0 3
        // 1 4
        // 2 5
        // 6 7
        let bit = match (pixel_x % 2, pixel_y % 4) {
            (0, 3) => 6,
            (1, 3) => 7,
            (col, row) => col * 3 + row,
        };

        let index = cell_y * self.width + cell_x;
        self.dots[index] |= 1 << bit;
        self.ink[index] = ink;
    }

    pub fn fill_rect(&mut self, x: usize, y: usize, width: usize, height: usize, ink: Ink) {
        for py in y..y + height {
            for px in x..x + width {
                self.set_pixel(px, py, ink);
            }
        }
    }

    pub fn draw_horizontal_line(&mut self, pixel_y: usize) {
        for px in 0..self.pixel_width() {
            self.set_pixel(px, pixel_y, Ink::Border);
        }
    }

    /// Braille character for a cell (U+2800 + dot pattern)
    pub fn to_char(&self, cell_x: usize, cell_y: usize) -> char {
        if cell_x >= self.width || cell_y >= self.height {
            return ' ';
        }
        let pattern = self.dots[cell_y * self.width + cell_x];
        char::from_u32(0x2800 + pattern as u32).unwrap_or(' ')
    }

    pub fn ink(&self, cell_x: usize, cell_y: usize) -> Ink {
        if cell_x >= self.width || cell_y >= self.height {
            return Ink::default();
        }
        self.ink[cell_y * self.width + cell_x]
    }

    /// Split one cell row into runs of identical ink
    pub fn row_runs(&self, cell_y: usize) -> Vec<(Ink, String)> {
        let mut runs: Vec<(Ink, String)> = Vec::new();
        for x in 0..self.width {
            let ink = self.ink(x, cell_y);
            let ch = self.to_char(x, cell_y);
            if let Some((last, text)) = runs.last_mut() {
                if *last == ink {
                    text.push(ch);
                    continue;
                }
            }
            runs.push((ink, ch.to_string()));
        }
        runs
    }

    pub fn pixel_width(&self) -> usize {
        self.width * 2
    }

    pub fn pixel_height(&self) -> usize {
        self.height * 4
    }
}
