use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{InputMode, TodoApp};
use crate::todo::Category;

impl TodoApp {
    /// 終了要求のときのみOk(true)を返す
    pub fn handle_key_event(&mut self, key_event: KeyEvent) -> Result<bool> {
        self.notification = None;
        if key_event.kind != KeyEventKind::Press {
            return Ok(false);
        }

        match self.input_mode {
            InputMode::Normal => self.handle_normal_mode_key(key_event),
            InputMode::Insert => self.handle_insert_mode_key(key_event),
            InputMode::Edit => self.handle_edit_mode_key(key_event),
            InputMode::ConfirmDelete => self.handle_confirm_delete_key(key_event),
        }
    }

    pub fn handle_normal_mode_key(&mut self, key_event: KeyEvent) -> Result<bool> {
        // Ctrl+H でヘルプ表示を切り替え
        if key_event.modifiers.contains(KeyModifiers::CONTROL)
            && key_event.code == KeyCode::Char('h')
        {
            self.show_help = !self.show_help;
            return Ok(false);
        }

        match key_event.code {
            // 終了
            KeyCode::Char('q') => {
                return Ok(true);
            }

            // カテゴリ切り替え
            KeyCode::Char('w') => {
                self.switch_category(Category::Work);
            }
            KeyCode::Char('t') => {
                self.switch_category(Category::Travel);
            }
            KeyCode::Tab => {
                let other = match self.store.category() {
                    Category::Work => Category::Travel,
                    Category::Travel => Category::Work,
                };
                self.switch_category(other);
            }

            // 表示モード切り替え
            KeyCode::Char('m') => {
                self.store.toggle_mode();
            }

            // リスト内移動
            KeyCode::Char('j') | KeyCode::Down => {
                self.select_next();
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.select_previous();
            }

            // インサートモード（新規アイテム入力）
            KeyCode::Char('i') => {
                self.input_mode = InputMode::Insert;
            }

            // 完了トグル
            KeyCode::Char(' ') | KeyCode::Enter => {
                self.toggle_selected_completed();
            }

            // インライン編集
            KeyCode::Char('e') => {
                self.begin_edit_selected();
            }

            // 削除（確認プロンプトへ）
            KeyCode::Char('d') => {
                self.request_delete_selected();
            }

            _ => {}
        }

        Ok(false)
    }

    pub fn handle_insert_mode_key(&mut self, key_event: KeyEvent) -> Result<bool> {
        match key_event.code {
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
            }
            KeyCode::Enter => {
                self.submit_input();
                self.input_mode = InputMode::Normal;
            }
            KeyCode::Backspace => {
                self.delete_char_before_cursor();
            }
            KeyCode::Delete => {
                self.delete_char_at_cursor();
            }
            KeyCode::Left => {
                self.move_cursor_left();
            }
            KeyCode::Right => {
                self.move_cursor_right();
            }
            KeyCode::Home => {
                self.move_cursor_to_start();
            }
            KeyCode::End => {
                self.move_cursor_to_end();
            }
            KeyCode::Char(c) => {
                self.insert_char(c);
            }
            _ => {}
        }

        Ok(false)
    }

    pub fn handle_edit_mode_key(&mut self, key_event: KeyEvent) -> Result<bool> {
        match key_event.code {
            // 未保存の変更を破棄
            KeyCode::Esc => {
                self.cancel_edit();
            }
            KeyCode::Enter => {
                self.commit_edit();
            }
            KeyCode::Backspace => {
                self.delete_char_before_cursor();
                self.sync_draft();
            }
            KeyCode::Delete => {
                self.delete_char_at_cursor();
                self.sync_draft();
            }
            KeyCode::Left => {
                self.move_cursor_left();
            }
            KeyCode::Right => {
                self.move_cursor_right();
            }
            KeyCode::Home => {
                self.move_cursor_to_start();
            }
            KeyCode::End => {
                self.move_cursor_to_end();
            }
            KeyCode::Char(c) => {
                self.insert_char(c);
                self.sync_draft();
            }
            _ => {}
        }

        Ok(false)
    }

    pub fn handle_confirm_delete_key(&mut self, key_event: KeyEvent) -> Result<bool> {
        match key_event.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                self.confirm_delete();
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.cancel_delete();
            }
            _ => {}
        }

        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Storage;
    use crate::todo::TodoStore;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    async fn test_app() -> (TodoApp, tempfile::TempDir) {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = Storage::new(Some(dir.path().to_path_buf())).expect("storage");
        let store = TodoStore::load(storage).await;
        (TodoApp::new(store), dir)
    }

    fn type_text(app: &mut TodoApp, text: &str) {
        for c in text.chars() {
            app.handle_key_event(key(KeyCode::Char(c))).unwrap();
        }
    }

    #[tokio::test]
    async fn insert_mode_adds_item_on_enter() {
        let (mut app, _dir) = test_app().await;

        app.handle_key_event(key(KeyCode::Char('i'))).unwrap();
        assert_eq!(app.input_mode, InputMode::Insert);
        type_text(&mut app, "buy milk");
        app.handle_key_event(key(KeyCode::Enter)).unwrap();

        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(app.input.is_empty());
        assert_eq!(app.store.visible_items()[0].text, "buy milk");
    }

    #[tokio::test]
    async fn delete_requires_confirmation() {
        let (mut app, _dir) = test_app().await;
        app.store.add_item("task", Category::Work);
        app.clamp_selection();

        app.handle_key_event(key(KeyCode::Char('d'))).unwrap();
        assert_eq!(app.input_mode, InputMode::ConfirmDelete);

        // nで取り消し: アイテムは残る
        app.handle_key_event(key(KeyCode::Char('n'))).unwrap();
        assert_eq!(app.store.list().len(), 1);

        app.handle_key_event(key(KeyCode::Char('d'))).unwrap();
        app.handle_key_event(key(KeyCode::Char('y'))).unwrap();
        assert!(app.store.list().is_empty());
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[tokio::test]
    async fn edit_flow_commits_draft() {
        let (mut app, _dir) = test_app().await;
        app.store.add_item("old", Category::Work);
        app.clamp_selection();

        app.handle_key_event(key(KeyCode::Char('e'))).unwrap();
        assert_eq!(app.input_mode, InputMode::Edit);
        assert_eq!(app.input, "old");

        // 末尾に追記してコミット
        type_text(&mut app, "er");
        app.handle_key_event(key(KeyCode::Enter)).unwrap();

        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.store.visible_items()[0].text, "older");
        assert!(!app.store.visible_items()[0].editing);
    }

    #[tokio::test]
    async fn edit_escape_restores_text() {
        let (mut app, _dir) = test_app().await;
        app.store.add_item("keep me", Category::Work);
        app.clamp_selection();

        app.handle_key_event(key(KeyCode::Char('e'))).unwrap();
        for _ in 0.."keep me".len() {
            app.handle_key_event(key(KeyCode::Backspace)).unwrap();
        }
        type_text(&mut app, "thrown away");
        app.handle_key_event(key(KeyCode::Esc)).unwrap();

        let item = &app.store.visible_items()[0];
        assert_eq!(item.text, "keep me");
        assert_eq!(item.draft_text, "keep me");
        assert!(!item.editing);
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[tokio::test]
    async fn empty_draft_keeps_edit_mode() {
        let (mut app, _dir) = test_app().await;
        app.store.add_item("abc", Category::Work);
        app.clamp_selection();

        app.handle_key_event(key(KeyCode::Char('e'))).unwrap();
        for _ in 0..3 {
            app.handle_key_event(key(KeyCode::Backspace)).unwrap();
        }
        app.handle_key_event(key(KeyCode::Enter)).unwrap();

        // 空の下書きはコミットされず編集継続
        assert_eq!(app.input_mode, InputMode::Edit);
        assert_eq!(app.store.visible_items()[0].text, "abc");
    }

    #[tokio::test]
    async fn tab_switches_category() {
        let (mut app, _dir) = test_app().await;
        app.store.add_item("work item", Category::Work);
        app.store.add_item("travel item", Category::Travel);
        app.clamp_selection();

        assert_eq!(app.store.category(), Category::Work);
        app.handle_key_event(key(KeyCode::Tab)).unwrap();
        assert_eq!(app.store.category(), Category::Travel);
        assert_eq!(app.store.visible_items()[0].text, "travel item");
        assert_eq!(app.list_state.selected(), Some(0));
    }

    #[tokio::test]
    async fn completed_item_cannot_be_edited() {
        let (mut app, _dir) = test_app().await;
        app.store.add_item("done", Category::Work);
        app.clamp_selection();

        app.handle_key_event(key(KeyCode::Char(' '))).unwrap();
        assert!(app.store.visible_items()[0].completed);

        app.handle_key_event(key(KeyCode::Char('e'))).unwrap();
        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(app.notification.is_some());
    }
}
