//! Oscilloscope of the master output

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};

/// Index of the first rising zero crossing, so a steady tone holds still.
fn trigger_point(samples: &[f32], window: usize) -> usize {
    let search = samples.len().saturating_sub(window);
    samples[..search]
        .windows(2)
        .position(|w| w[0] <= 0.0 && w[1] > 0.0)
        .unwrap_or(0)
}

pub fn render_waveform(frame: &mut Frame, area: Rect, audio_buffer: &[f32], window: usize) {
    let block = Block::default().title(" Output ").borders(Borders::ALL);

    let start = trigger_point(audio_buffer, window);
    let visible = &audio_buffer[start..(start + window).min(audio_buffer.len())];

    let data: Vec<(f64, f64)> = visible
        .iter()
        .enumerate()
        .map(|(i, &sample)| (i as f64 / window.max(1) as f64, sample as f64))
        .collect();

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Cyan))
        .data(&data);

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([0.0, 1.0])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([-0.5, 0.5])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}
