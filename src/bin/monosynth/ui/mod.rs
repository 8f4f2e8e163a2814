//! TUI for monosynth
//!
//! Parameter editing, a playable keyboard, and an oscilloscope of the output.

mod params;
mod waveform;

use std::time::{Duration, Instant};

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    DefaultTerminal, Frame,
};
use rtrb::Consumer;

use monosynth::{
    preset::{JsonFilePresets, OwnerId, PresetGateway},
    EnvelopeStage, ParamField, VoiceController,
};

use crate::keys::{key_frequency, key_note, note_name};
use params::{nudge, render_params};
use waveform::render_waveform;

/// Audio visualization buffer size
const VIS_BUFFER_SIZE: usize = 4096;
/// Samples shown across the oscilloscope
const VIS_WINDOW: usize = 1024;
/// Terminals only report presses; a key that stops repeating is considered released.
const RELEASE_AFTER: Duration = Duration::from_millis(600);

struct HeldKey {
    key: char,
    last_seen: Instant,
}

pub struct UiApp {
    controller: VoiceController,
    audio_rx: Consumer<f32>,
    audio_buffer: Vec<f32>,
    presets: JsonFilePresets,
    owner: Option<OwnerId>,
    selected: usize,
    held: Option<HeldKey>,
    current_note: Option<u8>,
    status: String,
    should_quit: bool,
}

impl UiApp {
    pub fn new(
        controller: VoiceController,
        audio_rx: Consumer<f32>,
        presets: JsonFilePresets,
        owner: Option<OwnerId>,
    ) -> Self {
        Self {
            controller,
            audio_rx,
            audio_buffer: vec![0.0; VIS_BUFFER_SIZE],
            presets,
            owner,
            selected: 0,
            held: None,
            current_note: None,
            status: String::from("ready"),
            should_quit: false,
        }
    }

    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_audio();
            self.release_stale_key();

            terminal.draw(|frame| self.render(frame))?;

            // ~60fps
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    match key.kind {
                        KeyEventKind::Press | KeyEventKind::Repeat => self.handle_key(key.code),
                        KeyEventKind::Release => self.handle_release(key.code),
                    }
                }
            }
        }

        self.note_off();
        Ok(())
    }

    fn poll_audio(&mut self) {
        while let Ok(sample) = self.audio_rx.pop() {
            self.audio_buffer.push(sample);
        }
        if self.audio_buffer.len() > VIS_BUFFER_SIZE {
            let excess = self.audio_buffer.len() - VIS_BUFFER_SIZE;
            self.audio_buffer.drain(0..excess);
        }
    }

    fn release_stale_key(&mut self) {
        if self
            .held
            .as_ref()
            .is_some_and(|held| held.last_seen.elapsed() > RELEASE_AFTER)
        {
            self.note_off();
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Char(' ') => self.note_off(),
            KeyCode::Up => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down => self.selected = (self.selected + 1).min(ParamField::ALL.len() - 1),
            KeyCode::Left => self.adjust(-1),
            KeyCode::Right => self.adjust(1),
            KeyCode::F(2) => self.save_preset(),
            KeyCode::F(3) => self.load_preset(),
            KeyCode::Char(c) => self.press(c),
            _ => {}
        }
    }

    fn handle_release(&mut self, key: KeyCode) {
        if let KeyCode::Char(c) = key {
            if self.held.as_ref().is_some_and(|held| held.key == c) {
                self.note_off();
            }
        }
    }

    fn press(&mut self, key: char) {
        let Some(frequency) = key_frequency(key) else {
            return;
        };

        // auto-repeat of the held key keeps the note alive
        if let Some(held) = self.held.as_mut().filter(|held| held.key == key) {
            held.last_seen = Instant::now();
            return;
        }

        match self.controller.note_on(frequency) {
            Ok(_) => {
                self.held = Some(HeldKey {
                    key,
                    last_seen: Instant::now(),
                });
                self.current_note = key_note(key);
            }
            Err(err) => {
                self.held = None;
                self.status = format!("note failed: {err}");
            }
        }
    }

    fn note_off(&mut self) {
        self.held = None;
        if let Err(err) = self.controller.note_off() {
            self.status = format!("release failed: {err}");
        }
    }

    fn adjust(&mut self, direction: i32) {
        let field = ParamField::ALL[self.selected];
        let value = nudge(self.controller.parameters(), field, direction);
        if let Err(err) = self.controller.update_parameter(field, value) {
            self.status = err.to_string();
        }
    }

    fn save_preset(&mut self) {
        let name = format!("preset {}", self.presets.list(self.owner.as_ref()).len() + 1);
        let params = *self.controller.parameters();
        self.status = match self.presets.save(self.owner.as_ref(), &name, &params) {
            Ok(id) => format!("saved '{name}' (#{id})"),
            Err(err) => format!("save failed: {err}"),
        };
    }

    fn load_preset(&mut self) {
        let Some(record) = self.presets.list(self.owner.as_ref()).pop() else {
            self.status = String::from("no presets to load");
            return;
        };
        self.status = match self.controller.set_parameters(record.params) {
            Ok(()) => format!("loaded '{}'", record.name),
            Err(err) => format!("load failed: {err}"),
        };
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Voice status
                Constraint::Min(16),   // Parameters + scope
                Constraint::Length(1), // Help bar
            ])
            .split(area);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(34), Constraint::Min(20)])
            .split(rows[1]);

        self.render_status(frame, rows[0]);
        render_params(frame, columns[0], self.controller.parameters(), self.selected);
        render_waveform(frame, columns[1], &self.audio_buffer, VIS_WINDOW);

        let help = Paragraph::new(
            " [z..,/q..p] Play  [Space] Release  [↑↓] Select  [←→] Adjust  [F2] Save  [F3] Load  [Esc] Quit",
        )
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, rows[2]);
    }

    fn render_status(&self, frame: &mut Frame, area: ratatui::layout::Rect) {
        let stage = self.controller.state();
        let stage_color = match stage {
            EnvelopeStage::Idle | EnvelopeStage::Silent => Color::DarkGray,
            EnvelopeStage::Releasing => Color::Yellow,
            _ => Color::Green,
        };
        let note = match (stage.is_sounding(), self.current_note) {
            (true, Some(note)) => note_name(note),
            _ => String::from("--"),
        };
        let owner = self.owner.as_ref().map_or("anonymous", |o| o.as_str());

        let line = Line::from(vec![
            Span::styled(format!(" {stage:<8}"), Style::default().fg(stage_color)),
            Span::raw(format!(" note {note:<4}")),
            Span::raw(format!(" level {:.3} ", self.controller.envelope().level())),
            Span::styled(format!(" {owner} "), Style::default().fg(Color::Cyan)),
            Span::styled(format!(" {}", self.status), Style::default().fg(Color::DarkGray)),
        ]);

        let paragraph = Paragraph::new(line).block(Block::default().title(" monosynth ").borders(Borders::ALL));
        frame.render_widget(paragraph, area);
    }
}
