use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Frame,
};

use super::braille::{BrailleCanvas, Ink};
use super::sink::FrameView;
use crate::config::DisplayConfig;

// Layout: one text row for generation + fitness, the field between two border
// lines, one text row for the agent count
const UI_HEADER_ROWS: u16 = 1;
const UI_FOOTER_ROWS: u16 = 1;

pub fn render(frame: &mut Frame, view: &FrameView<'_>, display: &DisplayConfig) {
    let area = frame.area();

    let bg = Block::default().style(Style::default().bg(rgb(display.background_color)));
    frame.render_widget(bg, area);

    if area.height <= UI_HEADER_ROWS + UI_FOOTER_ROWS || area.width == 0 {
        return;
    }

    let field_area = Rect {
        x: area.x,
        y: area.y + UI_HEADER_ROWS,
        width: area.width,
        height: area.height - UI_HEADER_ROWS - UI_FOOTER_ROWS,
    };
    let canvas = draw_field(view, field_area);
    render_canvas(frame, &canvas, field_area, display);

    draw_stats(frame, view, area, display);
}

/// Scale the field into braille pixels and draw borders, paddles and ball
fn draw_field(view: &FrameView<'_>, area: Rect) -> BrailleCanvas {
    let mut canvas = BrailleCanvas::new(area.width as usize, area.height as usize);

    // Borders take the first and last pixel rows
    let playable_height = canvas.pixel_height().saturating_sub(2);
    canvas.draw_horizontal_line(0);
    canvas.draw_horizontal_line(playable_height + 1);

    let scale_x = canvas.pixel_width() as f64 / view.field.width;
    let scale_y = playable_height as f64 / view.field.height;
    let to_px = |v: f64, scale: f64| (v * scale).max(0.0) as usize;

    for paddle in [view.left, view.right] {
        canvas.fill_rect(
            to_px(paddle.x, scale_x),
            to_px(paddle.top, scale_y) + 1,
            to_px(paddle.width, scale_x).max(1),
            to_px(paddle.height, scale_y).max(1),
            Ink::Paddle,
        );
    }

    canvas.fill_rect(
        to_px(view.ball.x, scale_x),
        to_px(view.ball.y, scale_y) + 1,
        to_px(view.ball.size, scale_x).max(1),
        to_px(view.ball.size, scale_y).max(1),
        Ink::Ball,
    );

    canvas
}

fn render_canvas(frame: &mut Frame, canvas: &BrailleCanvas, area: Rect, display: &DisplayConfig) {
    for y in 0..area.height {
        let spans: Vec<Span> = canvas
            .row_runs(y as usize)
            .into_iter()
            .map(|(ink, text)| {
                let color = match ink {
                    Ink::Border => display.text_color,
                    Ink::Paddle => display.paddle_color,
                    Ink::Ball => display.ball_color,
                };
                Span::styled(text, Style::default().fg(rgb(color)))
            })
            .collect();

        let row_area = Rect {
            x: area.x,
            y: area.y + y,
            width: area.width,
            height: 1,
        };
        frame.render_widget(Paragraph::new(Line::from(spans)), row_area);
    }
}

fn draw_stats(frame: &mut Frame, view: &FrameView<'_>, area: Rect, display: &DisplayConfig) {
    let style = Style::default().fg(rgb(display.text_color));
    let third = area.width / 3;
    let top_center = Rect {
        x: area.x + third,
        width: third,
        height: 1,
        ..area
    };
    let top_right = Rect {
        x: area.x + 2 * third,
        width: area.width - 2 * third,
        height: 1,
        ..area
    };
    let bottom = Rect {
        y: area.y + area.height - 1,
        height: 1,
        ..area
    };

    frame.render_widget(
        Paragraph::new(format!("generation: {}", view.generation))
            .style(style)
            .alignment(Alignment::Center),
        top_center,
    );
    frame.render_widget(
        Paragraph::new(format!("fitness: {} ", view.fitness.round()))
            .style(style)
            .alignment(Alignment::Right),
        top_right,
    );
    frame.render_widget(
        Paragraph::new(format!("agents: {}   q: quit", view.active))
            .style(style)
            .alignment(Alignment::Center),
        bottom,
    );
}

fn rgb([r, g, b]: [u8; 3]) -> Color {
    Color::Rgb(r, g, b)
}
