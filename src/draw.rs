use log::error;
use tui::backend::Backend;
use tui::layout::{Alignment, Constraint, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Paragraph, Tabs};
use tui::{Frame, Terminal};
use tui_logger::TuiLoggerWidget;

use crate::app::{App, MenuItem};
use crate::components::bracket::BracketView;
use crate::components::theme::{BracketColor, resolve};
use crate::state::app_state::round_label;
use crate::ui::layout::LayoutAreas;

static TABS: &[&str; 2] = &["Bracket", "Help"];

static HELP_LINES: &[(&str, &str)] = &[
    ("h / l, ← / →", "scroll one step (snaps to a round when idle)"),
    ("H / L, Tab", "previous / next round"),
    ("g / G, Home / End", "first / final round"),
    ("j / k, ↓ / ↑", "scroll rows"),
    ("wheel, shift+wheel", "scroll rows / scroll rounds"),
    ("R", "reload bracket data"),
    ("f", "toggle full screen"),
    ("\"", "toggle log pane"),
    ("?, Esc", "open / close help"),
    ("q, Ctrl-C", "quit"),
];

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);

    let result = terminal.draw(|f| {
        layout.update(f.area(), app.settings.full_screen, app.state.show_logs);

        if !app.settings.full_screen {
            draw_tabs(f, layout.tab_bar, app);
        }

        match app.state.active_tab {
            MenuItem::Bracket => draw_bracket(f, layout.main, app),
            MenuItem::Help => draw_help(f, layout.main),
        }

        if let Some(logs) = layout.logs {
            draw_logs(f, logs);
        }
    });
    if let Err(e) = result {
        error!("draw failed: {e}");
    }
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn draw_tabs(f: &mut Frame, tab_bar: [Rect; 2], app: &App) {
    let style = Style::default().fg(Color::White);
    let border_type = BorderType::Rounded;

    let tab_index = match app.state.active_tab {
        MenuItem::Bracket => 0,
        MenuItem::Help => 1,
    };

    let titles: Vec<Line> = TABS.iter().map(|t| Line::from(*t)).collect();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .highlight_style(Style::default().add_modifier(Modifier::UNDERLINED))
        .select(tab_index)
        .style(style);
    f.render_widget(tabs, tab_bar[0]);

    let help = Paragraph::new("Help: ? ")
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(style);
    f.render_widget(help, tab_bar[1]);
}

fn draw_bracket(f: &mut Frame, area: Rect, app: &App) {
    let bracket = &app.state.bracket;
    let title = bracket
        .tournament
        .as_ref()
        .and_then(|t| t.title.as_deref())
        .unwrap_or("Bracket");
    let block = default_border(Color::White).title(format!(" {title} "));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(convergence) = bracket.convergence.as_ref() else {
        let msg = if let Some(err) = app.state.last_error.as_deref() {
            format!("Bracket failed to load:\n{err}")
        } else {
            "Loading bracket data...".to_string()
        };
        f.render_widget(
            Paragraph::new(msg)
                .style(resolve(BracketColor::Dim, app.settings.theme))
                .alignment(Alignment::Center),
            inner,
        );
        return;
    };

    let [header, key_legend, content] =
        Layout::vertical([Constraint::Length(1), Constraint::Length(1), Constraint::Fill(1)]).areas(inner);

    let round_count = convergence.round_count();
    let focus = bracket.focus_round().unwrap_or(0);
    let match_count = bracket.rounds.get(focus).map(|r| r.matches.len()).unwrap_or(0);
    let source = bracket.source.as_deref().unwrap_or("");
    let header_line = Line::from(vec![
        Span::styled(
            format!("Round {}/{round_count} · {}", focus + 1, round_label(focus, round_count, match_count)),
            resolve(BracketColor::Accent, app.settings.theme),
        ),
        Span::raw(format!(
            "  |  scroll {:>6.1}/{:.0}{}  |  {source}",
            bracket.scroll.offset,
            convergence.max_scroll(),
            if bracket.scroll.is_settling() { " ⇥" } else { "" },
        )),
    ]);
    f.render_widget(Paragraph::new(header_line), header);
    f.render_widget(
        Paragraph::new("Keys: h/l=scroll  H/L=round  j/k=rows  R=reload  ?=help  q=quit")
            .style(resolve(BracketColor::Dim, app.settings.theme)),
        key_legend,
    );

    f.render_widget(
        BracketView {
            rounds: &bracket.rounds,
            geometry: convergence.geometry(),
            scroll_x: bracket.scroll.offset,
            scroll_y: f64::from(bracket.scroll_y),
            focus_round: Some(focus),
            theme: app.settings.theme,
        },
        content,
    );
}

fn draw_help(f: &mut Frame, area: Rect) {
    let block = default_border(Color::White).title(" Help ");
    let key_style = Style::default().fg(Color::Yellow);
    let lines: Vec<Line> = HELP_LINES
        .iter()
        .map(|(keys, action)| {
            Line::from(vec![
                Span::styled(format!("{keys:<20}"), key_style),
                Span::raw(*action),
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_logs(f: &mut Frame, area: Rect) {
    let logs = TuiLoggerWidget::default()
        .block(default_border(Color::DarkGray).title(" Logs "))
        .style_error(Style::default().fg(Color::Red))
        .style_warn(Style::default().fg(Color::Yellow))
        .style_info(Style::default().fg(Color::Gray));
    f.render_widget(logs, area);
}
