//! Parameter table widget and knob-style adjustment

use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Row, Table},
    Frame,
};

use monosynth::{FilterType, ParamField, ParamValue, ParameterSet, Waveform};

fn cycle<T: Copy + PartialEq>(all: &[T], current: T, direction: i32) -> T {
    let len = all.len() as i32;
    let index = all.iter().position(|&v| v == current).unwrap_or(0) as i32;
    all[(index + direction).rem_euclid(len) as usize]
}

/// The value one step away from the current one, clamped to the field's range.
pub fn nudge(params: &ParameterSet, field: ParamField, direction: i32) -> ParamValue {
    match params.get(field) {
        ParamValue::Waveform(w) => ParamValue::Waveform(cycle(&Waveform::ALL, w, direction)),
        ParamValue::Filter(t) => ParamValue::Filter(cycle(&FilterType::ALL, t, direction)),
        ParamValue::Number(value) => {
            let next = match field {
                // roughly a semitone per step
                ParamField::Frequency | ParamField::Cutoff => value * 1.06_f64.powi(direction),
                ParamField::Detune => value + 5.0 * direction as f64,
                ParamField::Resonance => value + 0.5 * direction as f64,
                _ => value + 0.05 * direction as f64,
            };
            let (min, max) = field.range().unwrap_or((next, next));
            ParamValue::Number(next.clamp(min, max))
        }
    }
}

fn format_value(value: ParamValue) -> String {
    match value {
        ParamValue::Number(v) if v.abs() >= 100.0 => format!("{v:.0}"),
        ParamValue::Number(v) => format!("{v:.3}"),
        other => other.to_string(),
    }
}

pub fn render_params(frame: &mut Frame, area: Rect, params: &ParameterSet, selected: usize) {
    let rows = ParamField::ALL.iter().enumerate().map(|(i, &field)| {
        let style = if i == selected {
            Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        Row::new(vec![field.path().to_string(), format_value(params.get(field))]).style(style)
    });

    let table = Table::new(rows, [Constraint::Length(20), Constraint::Min(10)])
        .block(Block::default().title(" Parameters ").borders(Borders::ALL));

    frame.render_widget(table, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nudge_clamps_to_range() {
        let params = ParameterSet::default().with_field(ParamField::Volume, 1.0).unwrap();
        assert_eq!(nudge(&params, ParamField::Volume, 1), ParamValue::Number(1.0));
    }

    #[test]
    fn nudge_cycles_enumerations() {
        let params = ParameterSet::default();
        assert_eq!(
            nudge(&params, ParamField::FilterType, -1),
            ParamValue::Filter(FilterType::BandPass)
        );
    }
}
