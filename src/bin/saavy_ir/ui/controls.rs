//! Control list widget - one row per knob, with a gauge and the physical value

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};
use saavy_ir::{
    control::{ControlTarget, ModuleParam},
    dsp::amplify::gain_to_db,
    io::{queue::RenderQueue, AudioBackend as _},
    Engine, SLOT_COUNT,
};

use super::SlotInfo;

const GAUGE_WIDTH: usize = 20;

fn describe(info: &SlotInfo) -> (String, Color) {
    match info {
        SlotInfo::Empty => ("empty".into(), Color::DarkGray),
        SlotInfo::Loading => ("loading...".into(), Color::Yellow),
        SlotInfo::Loaded {
            duration_secs,
            sample_rate,
            channels,
        } => (
            format!("✓ {duration_secs:.2}s | {:.1}k | {channels}ch", sample_rate / 1000.0),
            Color::Green,
        ),
        SlotInfo::Failed { file_name } => (format!("✗ {file_name}"), Color::Red),
    }
}

fn format_value(target: ControlTarget, value: f32) -> String {
    match target {
        ControlTarget::DryWetMix => format!("{:>5.0} %", value * 100.0),
        ControlTarget::MasterGain | ControlTarget::Module(_, ModuleParam::Gain) if value <= 0.0 => {
            "  -inf dB".into()
        }
        ControlTarget::MasterGain | ControlTarget::Module(_, ModuleParam::Gain) => {
            format!("{:>+6.1} dB", gain_to_db(value))
        }
        _ if value >= 1000.0 => format!("{:>5.1} kHz", value / 1000.0),
        _ => format!("{value:>6.0} Hz"),
    }
}

fn gauge(position: f32) -> String {
    let filled = (position.clamp(0.0, 1.0) * GAUGE_WIDTH as f32).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(GAUGE_WIDTH - filled))
}

/// Render loaded files on the left and the control list on the right
pub fn render_controls(
    frame: &mut Frame,
    area: Rect,
    engine: &Engine<RenderQueue>,
    targets: &[ControlTarget],
    selected: usize,
    dry_info: &SlotInfo,
    slot_info: &[SlotInfo; SLOT_COUNT],
) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(32), Constraint::Min(40)])
        .split(area);

    // Files
    let mut lines = Vec::with_capacity(SLOT_COUNT + 1);
    let (text, color) = describe(dry_info);
    lines.push(Line::from(vec![
        Span::raw(" Sample  "),
        Span::styled(text, Style::default().fg(color)),
    ]));
    for (slot, info) in slot_info.iter().enumerate() {
        let (text, color) = describe(info);
        let voice = engine
            .session()
            .is_some_and(|session| session.has_voice(slot));
        lines.push(Line::from(vec![
            Span::raw(format!(" IR {}    ", slot + 1)),
            Span::styled(text, Style::default().fg(color)),
            Span::styled(if voice { "  ●" } else { "" }, Style::default().fg(Color::Cyan)),
        ]));
    }
    let files = Paragraph::new(lines).block(Block::default().title(" Files ").borders(Borders::ALL));
    frame.render_widget(files, columns[0]);

    // Controls
    let items: Vec<ListItem> = targets
        .iter()
        .enumerate()
        .map(|(i, &target)| {
            let value = engine.parameter(target).unwrap_or_default();
            let position = target.curve().unmap(value);
            let inactive = target
                .slot()
                .and_then(|slot| engine.slot(slot))
                .is_some_and(|slot| !slot.is_active());

            let style = if i == selected {
                Style::default().fg(Color::Black).bg(Color::Cyan)
            } else if inactive {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default()
            };

            ListItem::new(Line::from(vec![
                Span::raw(format!(" {:<18}", target.label())),
                Span::raw(gauge(position)),
                Span::raw(format!("  {}", format_value(target, value))),
            ]))
            .style(style)
        })
        .collect();

    let title = format!(" Controls @ {:.0} Hz ", engine.backend().sample_rate());
    let list = List::new(items)
        .block(Block::default().title(title).borders(Borders::ALL))
        .highlight_style(Style::default().add_modifier(Modifier::BOLD));
    frame.render_widget(list, columns[1]);
}
