use bracket_geometry::{
    BracketGeometry, ConnectorVisibility, DEFAULT_SAMPLE_OFFSETS, MatchPlacement, PositionedRound,
    Slot, project,
};
use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::Style;
use tui::widgets::Widget;

use crate::components::theme::{BracketColor, BracketTheme, resolve, winner_marker};

// ---------------------------------------------------------------------------
// Layout constants (terminal cells)
// ---------------------------------------------------------------------------

/// Rows per match box: top border, player 1, divider, player 2, bottom border.
pub const CELL_BOX_HEIGHT: f64 = 5.0;
pub const CELL_BOX_WIDTH: f64 = 20.0;
/// Width of each connector zone on either side of a box.
pub const CELL_CONNECTOR_WIDTH: f64 = 3.0;
pub const CELL_GAP: f64 = 1.0;

/// Blank rows above the first slot of every round.
pub const TOP_PADDING: f64 = 1.0;

/// Slots never shrink below this, so compressed rounds still leave room for
/// their connector stubs.
pub const MIN_SLOT_HEIGHT: f64 = 2.0;

/// Placed coordinates are clamped to this magnitude so offset arithmetic in
/// the drawing helpers cannot overflow `i32`.
const CELL_LIMIT: f64 = (i32::MAX / 4) as f64;

/// Default geometry for terminal rendering, one round = 27 columns.
pub fn terminal_geometry() -> BracketGeometry {
    BracketGeometry {
        match_box_height: CELL_BOX_HEIGHT,
        match_box_width: CELL_BOX_WIDTH,
        connector_width: CELL_CONNECTOR_WIDTH,
        gap: CELL_GAP,
        sample_offsets: DEFAULT_SAMPLE_OFFSETS,
    }
}

// ---------------------------------------------------------------------------
// BoxCell: one placed match box, in area-relative cells
// ---------------------------------------------------------------------------

/// Integer cell position of one match box for the current scroll sample.
/// Coordinates may be negative or past the area; drawing clips them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxCell {
    /// Left border column of the box.
    pub x: i32,
    pub top: i32,
    /// Divider row, where connectors attach.
    pub center: i32,
    pub width: i32,
    pub height: i32,
    /// First and last row of the vertical slot the margin gives this box.
    pub slot_top: i32,
    pub slot_bottom: i32,
}

impl BoxCell {
    /// Round-aligned box for a placement. Slot height is `H + 2 * margin`.
    pub fn place(placement: &MatchPlacement, geometry: &BracketGeometry, scroll_x: f64, scroll_y: f64) -> Self {
        let h = geometry.match_box_height;
        let round = placement.key.round as f64;
        let index = placement.key.index as f64;

        let column = round * geometry.snap_interval() - scroll_x;
        let slot = (h + 2.0 * placement.margin).max(MIN_SLOT_HEIGHT);
        let slot_top = TOP_PADDING - scroll_y + slot * index;
        let center_y = slot_top + slot / 2.0;

        let top = to_cell(center_y - h / 2.0);
        let height = to_cell(h);
        Self {
            x: to_cell(column + geometry.connector_width),
            top,
            center: top + height / 2,
            width: to_cell(geometry.match_box_width),
            height,
            slot_top: to_cell(slot_top),
            slot_bottom: to_cell(slot_top + slot),
        }
    }
}

fn to_cell(v: f64) -> i32 {
    v.round().clamp(-CELL_LIMIT, CELL_LIMIT) as i32
}

// ---------------------------------------------------------------------------
// BracketView widget
// ---------------------------------------------------------------------------

/// Renders every round side by side, scrolled horizontally by `scroll_x`
/// columns. Rounds ahead of the scroll position spread out and rounds behind
/// it pack together, so connectors funnel toward the next match.
pub struct BracketView<'a> {
    pub rounds: &'a [PositionedRound],
    pub geometry: &'a BracketGeometry,
    pub scroll_x: f64,
    /// Vertical scroll in rows, for first rounds taller than the terminal.
    pub scroll_y: f64,
    /// Round aligned with the left edge; its boxes get the focus border.
    pub focus_round: Option<usize>,
    pub theme: BracketTheme,
}

impl<'a> Widget for BracketView<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        // Pass 1: connectors, so boxes drawn afterwards sit on top of them.
        for placement in project(self.rounds, self.scroll_x, self.geometry) {
            let cell = BoxCell::place(&placement, self.geometry, self.scroll_x, self.scroll_y);
            draw_connectors(&cell, placement.connectors, self.geometry, area, self.theme, buf);
        }

        // Pass 2: match boxes.
        for placement in project(self.rounds, self.scroll_x, self.geometry) {
            let cell = BoxCell::place(&placement, self.geometry, self.scroll_x, self.scroll_y);
            let focused = self.focus_round == Some(placement.key.round);
            draw_match_box(&placement, &cell, focused, area, self.theme, buf);
        }
    }
}

// ---------------------------------------------------------------------------
// Drawing helpers
// ---------------------------------------------------------------------------

/// Draw the visible connector segments around one box.
///
/// ```text
///        ╭────────╮──╮            even match: right_lower runs down to the
///       ┼┤ player ┼  │            slot boundary, odd match: right_upper runs
///        ╰────────╯  ├─           up to it; both meet on the parent's row.
/// ```
fn draw_connectors(
    cell: &BoxCell,
    visible: ConnectorVisibility,
    geometry: &BracketGeometry,
    area: Rect,
    theme: BracketTheme,
    buf: &mut Buffer,
) {
    let style = resolve(BracketColor::Connector, theme);
    let cw = geometry.connector_width.round() as i32;
    let gap = geometry.gap.round() as i32;
    if cw == 0 {
        return;
    }

    // Right side: horizontal lead-out, corner, vertical run to the slot edge.
    let right_start = cell.x + cell.width;
    let vx = right_start + cw - 1;
    if visible.right_upper || visible.right_lower {
        for x in right_start..vx {
            put_char(buf, area, x, cell.center, '─', style);
        }
    }
    if visible.right_lower {
        put_char(buf, area, vx, cell.center, '╮', style);
        for y in (cell.center + 1)..cell.slot_bottom {
            put_char(buf, area, vx, y, '│', style);
        }
        if cell.slot_bottom > cell.center {
            draw_junction(buf, area, vx, cell.slot_bottom, gap, style);
        }
    }
    if visible.right_upper {
        put_char(buf, area, vx, cell.center, '╯', style);
        for y in (cell.slot_top + 1)..cell.center {
            put_char(buf, area, vx, y, '│', style);
        }
        if cell.slot_top < cell.center {
            draw_junction(buf, area, vx, cell.slot_top, gap, style);
        }
    }

    // Left side: a short fork at the zone's left edge, then a lead-in.
    let stub = cell.x - cw;
    if visible.left_upper {
        put_char(buf, area, stub, cell.center - 1, '│', style);
    }
    if visible.left_lower {
        put_char(buf, area, stub, cell.center + 1, '│', style);
    }
    let fork = match (visible.left_upper, visible.left_lower) {
        (true, true) => Some('┼'),
        (true, false) => Some('┴'),
        (false, true) => Some('┬'),
        (false, false) => None,
    };
    if let Some(fork) = fork {
        put_char(buf, area, stub, cell.center, fork, style);
        for x in (stub + 1)..cell.x {
            put_char(buf, area, x, cell.center, '─', style);
        }
    }
}

/// Sibling meeting point plus the line across the gap to the next round.
fn draw_junction(buf: &mut Buffer, area: Rect, x: i32, y: i32, gap: i32, style: Style) {
    put_char(buf, area, x, y, '├', style);
    for dx in 1..=gap {
        put_char(buf, area, x + dx, y, '─', style);
    }
}

fn draw_match_box(
    placement: &MatchPlacement,
    cell: &BoxCell,
    focused: bool,
    area: Rect,
    theme: BracketTheme,
    buf: &mut Buffer,
) {
    if cell.width < 2 || cell.height < 2 {
        return;
    }
    let border = if focused {
        resolve(BracketColor::FocusBorder, theme)
    } else {
        resolve(BracketColor::Border, theme)
    };
    let text = resolve(BracketColor::Text, theme);
    let winner_style = resolve(BracketColor::Winner, theme);

    let entry = placement.entry;
    let left = cell.x;
    let right = cell.x + cell.width - 1;
    let bottom = cell.top + cell.height - 1;
    let joined_left = placement.connectors.left_upper || placement.connectors.left_lower;
    let joined_right = placement.connectors.right_upper || placement.connectors.right_lower;

    for y in cell.top..=bottom {
        let (l, fill, r) = if y == cell.top {
            ('╭', '─', '╮')
        } else if y == bottom {
            ('╰', '─', '╯')
        } else if y == cell.center {
            (
                if joined_left { '┼' } else { '├' },
                '─',
                if joined_right { '┼' } else { '┤' },
            )
        } else {
            ('│', ' ', '│')
        };
        put_char(buf, area, left, y, l, border);
        for x in (left + 1)..right {
            put_char(buf, area, x, y, fill, border);
        }
        put_char(buf, area, right, y, r, border);
    }

    let inner = (cell.width - 2) as usize;
    let marker = winner_marker(entry.position.is_last_round());
    for (row, slot) in [(cell.top + 1, Slot::Player1), (cell.center + 1, Slot::Player2)] {
        if row <= cell.top || row >= bottom || row == cell.center {
            continue;
        }
        let won = entry.winner == Some(slot);
        let line = player_line(entry.data.player(slot), won.then_some(marker), inner);
        let style = if won { winner_style } else { text };
        put_str(buf, area, left + 1, row, &line, style);
    }
}

/// `" name… ▸"`, padded or truncated to exactly `inner` characters.
/// Boxes too narrow for the marker column keep the name instead.
fn player_line(name: &str, marker: Option<char>, inner: usize) -> String {
    let name_w = if inner >= 3 { inner - 3 } else { inner.saturating_sub(1) };
    let name: String = name.chars().take(name_w).collect();
    let mark = marker.unwrap_or(' ');
    let line = format!(" {name:<name_w$} {mark}");
    line.chars().take(inner).collect()
}

fn put_str(buf: &mut Buffer, area: Rect, x: i32, y: i32, text: &str, style: Style) {
    for (dx, ch) in text.chars().enumerate() {
        put_char(buf, area, x + dx as i32, y, ch, style);
    }
}

/// Write one cell at area-relative coordinates, ignoring anything off-area.
fn put_char(buf: &mut Buffer, area: Rect, x: i32, y: i32, ch: char, style: Style) {
    if x < 0 || y < 0 || x >= i32::from(area.width) || y >= i32::from(area.height) {
        return;
    }
    let (ax, ay) = (area.x + x as u16, area.y + y as u16);
    if let Some(cell) = buf.cell_mut((ax, ay)) {
        cell.set_char(ch);
        cell.set_style(style);
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use bracket_geometry::{Match, PositionedRound, Round, normalize};

    /// Narrow boxes so two rounds fit in a small buffer; snap = 12 + 6 + 1 = 19.
    fn small_geometry() -> BracketGeometry {
        BracketGeometry { match_box_width: 12.0, ..terminal_geometry() }
    }

    fn two_round_bracket() -> Vec<PositionedRound> {
        let rounds = vec![
            Round {
                matches: vec![
                    Match::new("Ava Moreno", "Ben Okafor").with_winner("Ava Moreno"),
                    Match::new("Cleo Tan", "Dev Patel").with_winner("Dev Patel"),
                ],
            },
            Round { matches: vec![Match::new("Ava Moreno", "Dev Patel").with_winner("Dev Patel")] },
        ];
        normalize(&rounds).expect("valid bracket")
    }

    fn render(rounds: &[PositionedRound], geometry: &BracketGeometry, scroll_x: f64) -> Buffer {
        let area = Rect::new(0, 0, 40, 14);
        let mut buf = Buffer::empty(area);
        BracketView {
            rounds,
            geometry,
            scroll_x,
            scroll_y: 0.0,
            focus_round: Some(0),
            theme: BracketTheme::Dark,
        }
        .render(area, &mut buf);
        buf
    }

    fn symbol(buf: &Buffer, x: u16, y: u16) -> &str {
        buf[(x, y)].symbol()
    }

    #[test]
    fn terminal_geometry_snaps_one_round_per_27_columns() {
        assert_eq!(terminal_geometry().snap_interval(), 27.0);
    }

    #[test]
    fn placement_at_rest_doubles_slots_for_next_round() {
        let tree = two_round_bracket();
        let g = small_geometry();
        let cells: Vec<BoxCell> =
            project(&tree, 0.0, &g).map(|p| BoxCell::place(&p, &g, 0.0, 0.0)).collect();

        assert_eq!(
            cells[0],
            BoxCell { x: 3, top: 1, center: 3, width: 12, height: 5, slot_top: 1, slot_bottom: 6 }
        );
        assert_eq!((cells[1].top, cells[1].center, cells[1].slot_top), (6, 8, 6));
        assert_eq!((cells[2].x, cells[2].top, cells[2].center), (22, 4, 6));
        // children meet exactly on the parent's divider row
        assert_eq!(cells[0].slot_bottom, cells[2].center);
        assert_eq!(cells[1].slot_top, cells[2].center);
    }

    #[test]
    fn siblings_join_into_one_line_feeding_the_next_round() {
        let tree = two_round_bracket();
        let buf = render(&tree, &small_geometry(), 0.0);

        assert_eq!(symbol(&buf, 17, 3), "╮");
        assert_eq!(symbol(&buf, 17, 4), "│");
        assert_eq!(symbol(&buf, 17, 6), "├");
        assert_eq!(symbol(&buf, 17, 7), "│");
        assert_eq!(symbol(&buf, 17, 8), "╯");
        assert_eq!(symbol(&buf, 18, 6), "─");
        assert_eq!(symbol(&buf, 19, 6), "┼");
        assert_eq!(symbol(&buf, 21, 6), "─");
    }

    #[test]
    fn boxes_show_players_and_winner_markers() {
        let tree = two_round_bracket();
        let buf = render(&tree, &small_geometry(), 0.0);

        assert_eq!(symbol(&buf, 3, 1), "╭");
        assert_eq!(symbol(&buf, 14, 5), "╯");
        assert_eq!(symbol(&buf, 5, 2), "A");
        assert_eq!(symbol(&buf, 13, 2), "▸");
        assert_eq!(symbol(&buf, 13, 4), " ");
        // the final's winner gets the trophy
        assert_eq!(symbol(&buf, 22, 4), "╭");
        assert_eq!(symbol(&buf, 32, 7), "★");
    }

    #[test]
    fn first_round_has_no_left_fork() {
        let tree = two_round_bracket();
        let buf = render(&tree, &small_geometry(), 0.0);
        assert_eq!(symbol(&buf, 0, 3), " ");
        assert_eq!(symbol(&buf, 3, 3), "├");
    }

    #[test]
    fn scrolling_one_round_packs_the_final_against_the_top() {
        let tree = two_round_bracket();
        let g = small_geometry();
        let buf = render(&tree, &g, g.snap_interval());
        assert_eq!(symbol(&buf, 3, 1), "╭");
        assert_eq!(symbol(&buf, 0, 3), "┼");
    }

    #[test]
    fn far_scroll_clips_without_panicking() {
        let tree = two_round_bracket();
        let g = small_geometry();
        for scroll in [-500.0, -20.0, 7.5, 1_000.0] {
            let _ = render(&tree, &g, scroll);
        }
    }

    #[test]
    fn player_line_fits_inner_width() {
        assert_eq!(player_line("Ava Moreno", Some('▸'), 10), " Ava Mor ▸");
        assert_eq!(player_line("Kai", None, 10).chars().count(), 10);
        assert_eq!(player_line("Kai", None, 2), " K");
        assert_eq!(player_line("Kai", Some('★'), 2), " K");
        assert_eq!(player_line("Kai", None, 1), " ");
    }

    #[test]
    fn extreme_scroll_clamps_placement() {
        let tree = two_round_bracket();
        let g = small_geometry();
        let first = project(&tree, -1.0e12, &g).next().expect("one placement");
        let cell = BoxCell::place(&first, &g, -1.0e12, 1.0e12);
        assert_eq!(cell.x, i32::MAX / 4);
        assert_eq!(cell.top, -(i32::MAX / 4));
    }

    #[test]
    fn extreme_scroll_renders_without_overflow() {
        let tree = two_round_bracket();
        let g = small_geometry();
        let area = Rect::new(0, 0, 40, 14);
        let scrolls = [(-1.0e12, 0.0), (1.0e12, 0.0), (0.0, 1.0e12), (0.0, -1.0e12), (f64::MAX, f64::MIN)];
        for (scroll_x, scroll_y) in scrolls {
            let mut buf = Buffer::empty(area);
            BracketView {
                rounds: &tree,
                geometry: &g,
                scroll_x,
                scroll_y,
                focus_round: None,
                theme: BracketTheme::Dark,
            }
            .render(area, &mut buf);
            assert_eq!(buf, Buffer::empty(area));
        }
    }
}
