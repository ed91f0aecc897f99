use ratatui::widgets::ListState;

use crate::todo::{Category, TodoStore};

// モジュール宣言
pub mod cursor_movement;
pub mod handler;
pub mod terminal_util;
pub mod ui;

#[derive(Debug, PartialEq)]
pub enum InputMode {
    Normal,
    Insert,
    Edit,
    ConfirmDelete,
}

pub struct TodoApp {
    pub store: TodoStore,
    pub input: String,
    pub cursor_position: usize, // カーソルの位置（グラフェム単位）
    pub input_mode: InputMode,
    pub list_state: ListState,
    pub editing_id: Option<String>,  // インライン編集中のアイテム
    pub pending_delete: Option<String>, // 削除確認待ちのアイテム
    pub show_help: bool,
    pub notification: Option<String>,
}

impl TodoApp {
    pub fn new(store: TodoStore) -> Self {
        let mut app = Self {
            store,
            input: String::new(),
            cursor_position: 0,
            input_mode: InputMode::Normal,
            list_state: ListState::default(),
            editing_id: None,
            pending_delete: None,
            show_help: false,
            notification: None,
        };

        if !app.store.visible_items().is_empty() {
            app.list_state.select(Some(0));
        }

        app
    }

    /// 現在の射影上で選択されているアイテムのid
    pub fn selected_id(&self) -> Option<String> {
        let items = self.store.visible_items();
        self.list_state
            .selected()
            .and_then(|index| items.get(index))
            .map(|item| item.id.clone())
    }

    /// 射影が変わった後に選択位置を有効範囲に収める
    pub fn clamp_selection(&mut self) {
        let len = self.store.visible_items().len();
        if len == 0 {
            self.list_state.select(None);
        } else {
            let index = self.list_state.selected().unwrap_or(0).min(len - 1);
            self.list_state.select(Some(index));
        }
    }

    pub fn select_next(&mut self) {
        let len = self.store.visible_items().len();
        if len == 0 {
            return;
        }
        let index = match self.list_state.selected() {
            Some(index) => (index + 1).min(len - 1),
            None => 0,
        };
        self.list_state.select(Some(index));
    }

    pub fn select_previous(&mut self) {
        if self.store.visible_items().is_empty() {
            return;
        }
        let index = self.list_state.selected().unwrap_or(0).saturating_sub(1);
        self.list_state.select(Some(index));
    }

    pub fn switch_category(&mut self, category: Category) {
        if self.store.category() == category {
            return;
        }
        self.store.set_category(category);
        // 射影が入れ替わるので先頭から選び直す
        if self.store.visible_items().is_empty() {
            self.list_state.select(None);
        } else {
            self.list_state.select(Some(0));
        }
    }

    /// 入力バッファの内容を新規アイテムとして登録する
    ///
    /// 空白のみの入力はストア側でno-opになる。バッファのクリアは
    /// こちら（プレゼンテーション層）の責務
    pub fn submit_input(&mut self) {
        self.store.add_item(&self.input, self.store.category());
        self.input.clear();
        self.cursor_position = 0;
        // 新しいアイテムは射影の先頭に来る
        if !self.store.visible_items().is_empty() {
            self.list_state.select(Some(0));
        }
    }

    /// 選択中アイテムのインライン編集を開始。完了済みは編集不可
    pub fn begin_edit_selected(&mut self) {
        let Some(id) = self.selected_id() else {
            return;
        };
        let Some(item) = self.store.list().get(&id) else {
            return;
        };
        if item.completed {
            self.show_notification("Completed items cannot be edited");
            return;
        }

        self.store.begin_edit(&id);
        self.input = self
            .store
            .list()
            .get(&id)
            .map(|item| item.draft_text.clone())
            .unwrap_or_default();
        self.cursor_position = self.input_grapheme_count();
        self.editing_id = Some(id);
        self.input_mode = InputMode::Edit;
    }

    /// 編集バッファの変更を下書きとしてストアへ反映（永続化はされない）
    pub fn sync_draft(&mut self) {
        if let Some(id) = self.editing_id.clone() {
            self.store.update_draft(&id, &self.input);
        }
    }

    /// 下書きが空ならストア側がno-opにするので編集モードに留まる
    pub fn commit_edit(&mut self) {
        let Some(id) = self.editing_id.clone() else {
            return;
        };
        self.store.commit_edit(&id);
        let still_editing = self
            .store
            .list()
            .get(&id)
            .map(|item| item.editing)
            .unwrap_or(false);
        if still_editing {
            self.show_notification("To do text cannot be empty");
            return;
        }
        self.editing_id = None;
        self.input.clear();
        self.cursor_position = 0;
        self.input_mode = InputMode::Normal;
    }

    pub fn cancel_edit(&mut self) {
        if let Some(id) = self.editing_id.take() {
            self.store.cancel_edit(&id);
        }
        self.input.clear();
        self.cursor_position = 0;
        self.input_mode = InputMode::Normal;
    }

    /// 削除は確認プロンプトを挟む
    pub fn request_delete_selected(&mut self) {
        if let Some(id) = self.selected_id() {
            self.pending_delete = Some(id);
            self.input_mode = InputMode::ConfirmDelete;
        }
    }

    pub fn confirm_delete(&mut self) {
        if let Some(id) = self.pending_delete.take() {
            self.store.delete_item(&id);
            self.clamp_selection();
        }
        self.input_mode = InputMode::Normal;
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
        self.input_mode = InputMode::Normal;
    }

    pub fn toggle_selected_completed(&mut self) {
        if let Some(id) = self.selected_id() {
            self.store.toggle_completed(&id);
        }
    }

    pub fn show_notification(&mut self, message: &str) {
        self.notification = Some(message.to_string());
    }

    pub fn truncate_string_safe(s: &str, max_chars: usize) -> String {
        if s.chars().count() <= max_chars {
            s.to_string()
        } else {
            s.chars().take(max_chars).collect::<String>() + "..."
        }
    }
}
