use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, Paragraph},
    Frame,
};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::app::{InputMode, TodoApp};
use crate::theme::Theme;
use crate::todo::Category;

impl TodoApp {
    pub fn render(&mut self, f: &mut Frame) {
        let theme = Theme::of(self.store.mode());

        // 背景をモードの色で塗る
        f.render_widget(
            Block::default().style(Style::default().bg(theme.bg)),
            f.area(),
        );

        let notification_height = if self.notification.is_some() { 1 } else { 0 };
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(3),
                Constraint::Length(notification_height),
                Constraint::Length(1),
            ])
            .split(f.area());

        self.render_header(f, chunks[0], &theme);
        self.render_input(f, chunks[1], &theme);
        self.render_list(f, chunks[2], &theme);
        if let Some(ref note) = self.notification {
            let widget = Paragraph::new(note.as_str())
                .style(Style::default().fg(theme.accent).bg(theme.bg));
            f.render_widget(widget, chunks[3]);
        }
        self.render_hints(f, chunks[4], &theme);

        if self.input_mode == InputMode::ConfirmDelete {
            self.render_delete_confirm(f, &theme);
        }

        if self.show_help {
            self.render_floating_help(f, &theme);
        }
    }

    /// カテゴリタブとモードインジケータ
    pub fn render_header(&self, f: &mut Frame, area: Rect, theme: &Theme) {
        let tab_style = |category: Category| {
            if self.store.category() == category {
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.inactive)
            }
        };

        let tabs = Line::from(vec![
            Span::styled(" Work ", tab_style(Category::Work)),
            Span::raw("  "),
            Span::styled(" Travel ", tab_style(Category::Travel)),
        ]);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme.border))
            .style(Style::default().bg(theme.bg));

        let inner = block.inner(area);
        f.render_widget(block, area);

        let halves = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(10), Constraint::Length(10)])
            .split(inner);

        f.render_widget(Paragraph::new(tabs), halves[0]);
        f.render_widget(
            Paragraph::new(self.store.mode().indicator())
                .style(Style::default().fg(theme.inactive))
                .alignment(Alignment::Right),
            halves[1],
        );
    }

    pub fn render_input(&self, f: &mut Frame, area: Rect, theme: &Theme) {
        let (title, active) = match self.input_mode {
            InputMode::Insert => (self.store.category().placeholder(), true),
            InputMode::Edit => ("Edit to do (Enter: save, Esc: discard)", true),
            _ => ("Press 'i' to add a to do", false),
        };

        let input_style = if active {
            Style::default().fg(theme.font).bg(theme.bg)
        } else {
            Style::default().fg(theme.inactive).bg(theme.bg)
        };
        let border_style = if active {
            Style::default().fg(theme.accent)
        } else {
            Style::default().fg(theme.border)
        };

        let input = Paragraph::new(self.input.as_str()).style(input_style).block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_type(BorderType::Rounded)
                .border_style(border_style),
        );
        f.render_widget(input, area);

        // 入力中のみカーソルを表示（単一行入力）
        if active {
            let prefix: String = self
                .input
                .graphemes(true)
                .take(self.cursor_position)
                .collect();
            let cursor_x = area.x + UnicodeWidthStr::width(prefix.as_str()) as u16 + 1;
            f.set_cursor_position((cursor_x, area.y + 1));
        }
    }

    pub fn render_list(&mut self, f: &mut Frame, area: Rect, theme: &Theme) {
        let visible = self.store.visible_items();
        let count = visible.len();

        let items: Vec<ListItem> = visible
            .iter()
            .map(|item| {
                let check = if item.completed { "✔" } else { "☐" };
                // 編集中は下書きを表示
                let text = if item.editing {
                    item.draft_text.as_str()
                } else {
                    item.text.as_str()
                };
                let marker = if item.editing { " ✎" } else { "" };

                let style = if item.completed {
                    Style::default()
                        .fg(theme.done)
                        .add_modifier(Modifier::CROSSED_OUT)
                } else if item.editing {
                    Style::default().fg(theme.accent)
                } else {
                    Style::default().fg(theme.font)
                };

                ListItem::new(Line::from(format!("{} {}{}", check, text, marker))).style(style)
            })
            .collect();

        let title = format!("{} ({})", self.store.category().label(), count);
        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(title)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(theme.border))
                    .style(Style::default().bg(theme.bg)),
            )
            .highlight_style(Style::default().add_modifier(Modifier::BOLD))
            .highlight_symbol(">> ");

        f.render_stateful_widget(list, area, &mut self.list_state);
    }

    pub fn render_hints(&self, f: &mut Frame, area: Rect, theme: &Theme) {
        let hints = match self.input_mode {
            InputMode::Normal => {
                "q: quit | i: add | e: edit | Space: done | d: delete | w/t/Tab: category | m: light/dark | Ctrl+H: help"
            }
            InputMode::Insert => "Enter: add | Esc: back",
            InputMode::Edit => "Enter: save | Esc: discard changes",
            InputMode::ConfirmDelete => "y: delete | n: keep",
        };
        let widget = Paragraph::new(hints).style(Style::default().fg(theme.inactive).bg(theme.bg));
        f.render_widget(widget, area);
    }

    /// 削除確認のフローティングプロンプト
    pub fn render_delete_confirm(&self, f: &mut Frame, theme: &Theme) {
        let item_text = self
            .pending_delete
            .as_deref()
            .and_then(|id| self.store.list().get(id))
            .map(|item| item.text.clone())
            .unwrap_or_default();

        let area = f.area();
        let popup_width = 44.min(area.width.saturating_sub(4));
        let popup_height = 5.min(area.height.saturating_sub(4));
        let popup_area = Rect {
            x: (area.width.saturating_sub(popup_width)) / 2,
            y: (area.height.saturating_sub(popup_height)) / 2,
            width: popup_width,
            height: popup_height,
        };

        // 背景を空白で埋めて下のリストを隠す
        let clear_lines =
            vec![" ".repeat(popup_width.saturating_sub(2) as usize); popup_height.saturating_sub(2) as usize];
        f.render_widget(
            Paragraph::new(clear_lines.join("\n"))
                .style(Style::default().bg(theme.bg))
                .block(
                    Block::default()
                        .style(Style::default().bg(theme.bg))
                        .borders(Borders::ALL)
                        .border_type(BorderType::Rounded)
                        .border_style(Style::default().fg(theme.accent))
                        .title("Delete To Do"),
                ),
            popup_area,
        );

        let body = Rect {
            x: popup_area.x + 2,
            y: popup_area.y + 1,
            width: popup_area.width.saturating_sub(4),
            height: popup_area.height.saturating_sub(2),
        };
        let max_chars = body.width.saturating_sub(2) as usize;
        let text = vec![
            Line::from(Self::truncate_string_safe(&item_text, max_chars)),
            Line::from(""),
            Line::from(Span::styled(
                "Are you sure? (y/n)",
                Style::default().fg(theme.font).add_modifier(Modifier::BOLD),
            )),
        ];
        f.render_widget(
            Paragraph::new(text).style(Style::default().fg(theme.font).bg(theme.bg)),
            body,
        );
    }

    pub fn render_floating_help(&self, f: &mut Frame, theme: &Theme) {
        // 画面中央にフローティングウィンドウを配置
        let area = f.area();
        let popup_width = 60.min(area.width.saturating_sub(4));
        let popup_height = 18.min(area.height.saturating_sub(4));

        let popup_area = Rect {
            x: (area.width.saturating_sub(popup_width)) / 2,
            y: (area.height.saturating_sub(popup_height)) / 2,
            width: popup_width,
            height: popup_height,
        };

        let clear_lines =
            vec![" ".repeat(popup_width.saturating_sub(2) as usize); popup_height.saturating_sub(2) as usize];
        f.render_widget(
            Paragraph::new(clear_lines.join("\n"))
                .style(Style::default().bg(theme.bg))
                .block(
                    Block::default()
                        .style(Style::default().bg(theme.bg))
                        .borders(Borders::ALL)
                        .border_type(BorderType::Rounded)
                        .border_style(Style::default().fg(theme.accent)),
                ),
            popup_area,
        );

        let help_text = vec![
            "=== dotui ===",
            "",
            "Categories:",
            "  w                   - Show Work list",
            "  t                   - Show Travel list",
            "  Tab                 - Switch category",
            "",
            "Items:",
            "  i                   - Add a new to do",
            "  e                   - Edit selected to do",
            "  Space / Enter       - Toggle completed",
            "  d                   - Delete (asks for confirmation)",
            "  j/k or ↓/↑          - Move selection",
            "",
            "Display:",
            "  m                   - Toggle light/dark mode",
            "",
            "  q                   - Quit, Ctrl+H - Toggle this help",
        ];

        let inner = Rect {
            x: popup_area.x + 2,
            y: popup_area.y + 1,
            width: popup_area.width.saturating_sub(4),
            height: popup_area.height.saturating_sub(2),
        };
        let lines: Vec<Line> = help_text.into_iter().map(Line::from).collect();
        f.render_widget(
            Paragraph::new(lines).style(Style::default().fg(theme.font).bg(theme.bg)),
            inner,
        );
    }
}
