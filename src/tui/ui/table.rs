use crate::cards::{Card, Suit};
use crate::game::Phase;
use crate::player::{Player, Team};
use crate::snapshot::GameSnapshot;
use crate::tui::app::{AppState, HUMAN_SEAT};
use ratatui::prelude::*;
use ratatui::widgets::*;

use super::layout::{centered_rect, compass, inner};

fn compass_cell(p: Player) -> usize {
    match p {
        Player::North => 1,
        Player::West => 3,
        Player::East => 5,
        Player::South => 7,
    }
}

pub(super) fn draw_table(f: &mut Frame, app: &AppState) {
    let snap = app.game.describe();
    let size = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // header
            Constraint::Min(12),   // seats around the trick
            Constraint::Length(5), // human hand
            Constraint::Length(8), // log and status
        ])
        .split(size);

    draw_header(f, chunks[0], app, &snap);

    let cells = compass(chunks[1]);
    for p in Player::ALL {
        render_seat(f, cells[compass_cell(p)], app, &snap, p);
    }
    render_trick(f, cells[4], &snap);

    render_hand(f, chunks[2], app, &snap);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[3]);
    let log_lines: Vec<Line> = app.log().map(|l| Line::from(l.to_string())).collect();
    let log = Paragraph::new(log_lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().title("Log").borders(Borders::ALL));
    f.render_widget(log, cols[0]);
    let status = Paragraph::new(status_lines(app, &snap))
        .wrap(Wrap { trim: true })
        .block(Block::default().title("Status").borders(Borders::ALL));
    f.render_widget(status, cols[1]);
}

fn draw_header(f: &mut Frame, area: Rect, app: &AppState, snap: &GameSnapshot) {
    let deal = match snap.phase {
        Phase::Auction => {
            let best = snap.auction.contract().map(|c| format!("{} {}", c.player, c.bid));
            format!("Best bid: {}", best.unwrap_or_else(|| "--".to_string()))
        }
        Phase::Playing => {
            let contract = snap.contract().map(|c| format!("{} {}", c.player, c.bid));
            format!("Contract: {}", contract.unwrap_or_else(|| "--".to_string()))
        }
    };
    let lines = vec![
        Line::from(format!(
            "Round {}   Phase: {}   {}",
            snap.rounds_played + 1,
            snap.phase,
            deal
        )),
        Line::from(format!(
            "Score  east/west: {}   north/south: {}   Target: {}   Redeals: {}",
            snap.score[Team::EastWest],
            snap.score[Team::NorthSouth],
            app.target_score,
            snap.redeals
        )),
    ];
    let header =
        Paragraph::new(lines).block(Block::default().title("belote-rs").borders(Borders::ALL));
    f.render_widget(header, area);
}

fn render_seat(f: &mut Frame, area: Rect, app: &AppState, snap: &GameSnapshot, p: Player) {
    let acting = app.match_started && app.winner().is_none() && snap.to_move == p;
    let mut title = p.to_string();
    if p == HUMAN_SEAT {
        title.push_str(" [You]");
    }
    if let Some(label) = app.bot_label(p) {
        title.push_str(&format!(" [BOT:{label}]"));
    }
    if acting {
        title.push_str(" [Act]");
    }
    let mut block = Block::default().title(title).borders(Borders::ALL);
    if acting {
        block = block.border_style(Style::default().fg(Color::Yellow));
    } else if p == HUMAN_SEAT {
        block = block.border_style(Style::default().fg(Color::Cyan));
    }

    let dim = Style::default().add_modifier(Modifier::DIM);
    let bid_line = match snap.auction.bids[p] {
        Some(bid) => Line::from(format!("Bid: {bid}")),
        None => Line::from(vec![Span::raw("Bid: "), Span::styled("--", dim)]),
    };
    let mut lines = vec![
        Line::from(format!("Team: {}", p.team())),
        Line::from(format!("Cards: {}", snap.hand(p).len())),
        bid_line,
    ];
    if snap.round.belote.contains(&p) {
        lines.push(Line::from(Span::styled("Belote", Style::default().fg(Color::Magenta))));
    }
    let para = Paragraph::new(lines).wrap(Wrap { trim: true }).block(block);
    f.render_widget(para, area);
}

fn render_trick(f: &mut Frame, area: Rect, snap: &GameSnapshot) {
    // between tricks the last one stays on the felt, dimmed
    let (cards, title, style) = match (snap.round.trick.leader, snap.round.last_trick()) {
        (None, Some(last)) => (
            last.cards.map(|c| Some(*c)),
            format!("Trick {} to {} ({} pts)", last.index + 1, last.winner, last.points),
            Style::default().add_modifier(Modifier::DIM),
        ),
        _ => (
            snap.round.trick.cards,
            format!("Trick {}/8", snap.round.trick_index + 1),
            Style::default(),
        ),
    };
    let block = Block::default().title(title).borders(Borders::ALL);
    let area_inner = inner(area);
    f.render_widget(block, area);
    let cells = compass(area_inner);
    for p in Player::ALL {
        if let Some(card) = cards[p] {
            let (text, card_style) = card_text(card);
            let para = Paragraph::new(Line::from(Span::styled(text, card_style.patch(style))))
                .alignment(Alignment::Center);
            f.render_widget(para, cells[compass_cell(p)]);
        }
    }
    if let Some(trump) = snap.trump() {
        let (glyph, suit_style) = suit_glyph_and_style(trump);
        let para = Paragraph::new(Line::from(vec![
            Span::styled("T:", Style::default().add_modifier(Modifier::DIM)),
            Span::styled(glyph.to_string(), suit_style),
        ]))
        .alignment(Alignment::Center);
        f.render_widget(para, cells[4]);
    }
}

fn render_hand(f: &mut Frame, area: Rect, app: &AppState, snap: &GameSnapshot) {
    let block = Block::default().title("Your hand (1-8 to play)").borders(Borders::ALL);
    let hand_inner = inner(area);
    f.render_widget(block, area);
    let hand = snap.hand(HUMAN_SEAT);
    if hand.is_empty() {
        return;
    }
    let playing = snap.phase == Phase::Playing && app.can_act();
    let card_width = hand_inner.width / 8;
    let slots = Layout::default()
        .direction(Direction::Horizontal)
        .constraints((0..8).map(|_| Constraint::Length(card_width)).collect::<Vec<_>>())
        .split(hand_inner);
    for (i, card) in hand.iter().enumerate() {
        let border = if !playing {
            None
        } else if snap.round.legal.get(i).copied().unwrap_or(false) {
            Some(Color::Green)
        } else {
            Some(Color::DarkGray)
        };
        render_card_widget(f, slots[i], *card, &format!("{}", i + 1), border);
    }
}

fn status_lines(app: &AppState, snap: &GameSnapshot) -> Vec<Line<'static>> {
    let mut lines = if !app.match_started {
        vec![Line::from("Press Space to start a match.")]
    } else if let Some(team) = app.winner() {
        vec![Line::from(Span::styled(
            format!("{team} won the match. Space for a new one."),
            Style::default().fg(Color::Green),
        ))]
    } else if app.can_act() {
        match snap.phase {
            Phase::Auction => {
                let (glyph, style) = suit_glyph_and_style(app.bid_suit);
                vec![
                    Line::from(vec![
                        Span::raw(format!("Your bid: {} ", app.bid_value)),
                        Span::styled(glyph.to_string(), style),
                        Span::raw(format!("   (min {})", app.game.auction().min_next_bid())),
                    ]),
                    Line::from("[ ] suit • +/- value • B bid • P pass"),
                ]
            }
            Phase::Playing => vec![Line::from("Your turn: play a highlighted card.")],
        }
    } else {
        vec![Line::from(format!("Waiting for {}.", snap.to_move))]
    };
    if snap.phase == Phase::Playing {
        lines.push(Line::from(format!(
            "Round points  EW: {}  NS: {}",
            snap.round.points[Team::EastWest],
            snap.round.points[Team::NorthSouth]
        )));
    }
    if let Some(err) = app.action_error() {
        lines.push(Line::from(Span::styled(
            format!("Error: {err}"),
            Style::default().fg(Color::Red),
        )));
    }
    lines.push(Line::from(Span::styled(
        "? help • M menu • Q quit",
        Style::default().add_modifier(Modifier::DIM),
    )));
    lines
}

pub(super) fn draw_help(f: &mut Frame) {
    let area = centered_rect(70, 80, f.area());
    let block = Block::default().title("Help").borders(Borders::ALL);
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let lines = vec![
        Line::from(Span::styled("Table:", bold)),
        Line::from("- Space: start a new match"),
        Line::from("- 1-8: play the card at that position"),
        Line::from("- P: pass"),
        Line::from("- ] / [: next / previous bid suit"),
        Line::from("- + / -: raise / lower bid value"),
        Line::from("- B: place the bid"),
        Line::from(""),
        Line::from(Span::styled("Menu:", bold)),
        Line::from("- M: open / close menu"),
        Line::from("- Up / Down: move selection"),
        Line::from("- + / -: adjust value"),
        Line::from("- Enter: apply"),
        Line::from("- Esc: cancel"),
        Line::from(""),
        Line::from("Q: quit • Close help: ? or Esc"),
    ];
    let para = Paragraph::new(lines).wrap(Wrap { trim: true });
    f.render_widget(Clear, area);
    f.render_widget(block, area);
    f.render_widget(para, inner(area));
}

fn suit_glyph_and_style(s: Suit) -> (char, Style) {
    let style = match s {
        Suit::Hearts | Suit::Diamonds => Style::default().fg(Color::Red),
        Suit::Spades | Suit::Clubs => Style::default().fg(Color::White),
    };
    (s.symbol(), style)
}

fn card_text(c: Card) -> (String, Style) {
    let (glyph, style) = suit_glyph_and_style(c.suit());
    (format!("{}{}", c.rank().label(), glyph), style)
}

fn render_card_widget(f: &mut Frame, area: Rect, card: Card, title: &str, border: Option<Color>) {
    let mut block = Block::default()
        .borders(Borders::ALL)
        .title(title.to_string())
        .title_alignment(Alignment::Center);
    if let Some(color) = border {
        block = block.border_style(Style::default().fg(color));
    }
    let (text, style) = card_text(card);
    let para = Paragraph::new(Line::from(Span::styled(text, style)))
        .alignment(Alignment::Center)
        .block(block);
    f.render_widget(para, area);
}
