use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::storage::Storage;
use crate::theme::DisplayMode;

// 永続化キー
pub const TODOS_KEY: &str = "todos";
pub const CATEGORY_KEY: &str = "category";
pub const MODE_KEY: &str = "mode";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Work,
    Travel,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Category::Work => "Work",
            Category::Travel => "Travel",
        }
    }

    /// 入力欄のプレースホルダー
    pub fn placeholder(&self) -> &'static str {
        match self {
            Category::Work => "What do you have to do?",
            Category::Travel => "Where do you want to go?",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TodoItem {
    pub id: String,
    pub text: String,
    pub category: Category,
    pub completed: bool,
    pub editing: bool,
    pub draft_text: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl TodoItem {
    pub fn new(text: String, category: Category) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            draft_text: text.clone(),
            text,
            category,
            completed: false,
            editing: false,
            created_at: now,
            updated_at: now,
        }
    }
}

/// アイテム本体と挿入順序
///
/// idはUUIDなので順序を再導出できない。orderが挿入順を保持し、
/// 表示はその逆順（新しいものが先頭）。
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TodoList {
    pub items: HashMap<String, TodoItem>,
    pub order: Vec<String>,
}

impl TodoList {
    pub fn new() -> Self {
        Self {
            items: HashMap::new(),
            order: Vec::new(),
        }
    }

    pub fn add_item(&mut self, item: TodoItem) {
        let item_id = item.id.clone();
        self.items.insert(item_id.clone(), item);
        self.order.push(item_id);
    }

    /// 削除できた場合のみtrue。存在しないidはno-op
    pub fn remove_item(&mut self, item_id: &str) -> bool {
        if self.items.remove(item_id).is_some() {
            self.order.retain(|id| id != item_id);
            true
        } else {
            false
        }
    }

    pub fn toggle_completed(&mut self, item_id: &str) -> bool {
        if let Some(item) = self.items.get_mut(item_id) {
            item.completed = !item.completed;
            item.updated_at = chrono::Utc::now();
            true
        } else {
            false
        }
    }

    pub fn begin_edit(&mut self, item_id: &str) -> bool {
        if let Some(item) = self.items.get_mut(item_id) {
            item.editing = true;
            item.draft_text = item.text.clone();
            true
        } else {
            false
        }
    }

    /// 下書きのみ更新（永続化対象外）
    pub fn update_draft(&mut self, item_id: &str, text: &str) -> bool {
        if let Some(item) = self.items.get_mut(item_id) {
            item.draft_text = text.to_string();
            true
        } else {
            false
        }
    }

    /// 下書きが空の場合はno-op（editingのまま）
    pub fn commit_edit(&mut self, item_id: &str) -> bool {
        if let Some(item) = self.items.get_mut(item_id) {
            if item.draft_text.is_empty() {
                return false;
            }
            item.text = item.draft_text.clone();
            item.editing = false;
            item.updated_at = chrono::Utc::now();
            true
        } else {
            false
        }
    }

    /// 未保存の下書きを破棄してtextに戻す
    pub fn cancel_edit(&mut self, item_id: &str) -> bool {
        if let Some(item) = self.items.get_mut(item_id) {
            item.editing = false;
            item.draft_text = item.text.clone();
            true
        } else {
            false
        }
    }

    pub fn get(&self, item_id: &str) -> Option<&TodoItem> {
        self.items.get(item_id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// カテゴリ一致のみ、挿入の逆順（新しい順）。毎回再計算される純粋な射影
    pub fn iter_newest_first(&self, category: Category) -> Vec<&TodoItem> {
        self.order
            .iter()
            .rev()
            .filter_map(|id| self.items.get(id))
            .filter(|item| item.category == category)
            .collect()
    }
}

/// メモリ上の正本とストレージを同期させるリストストア
///
/// 全ての変更操作は同じパターンに従う:
/// (1) メモリ上の状態を同期的に更新
/// (2) 該当キーをfire-and-forgetで書き込む
/// 呼び出し側にエラーは返さない（失敗はStorage側でログされる）。
#[derive(Debug)]
pub struct TodoStore {
    list: TodoList,
    category: Category,
    mode: DisplayMode,
    storage: Storage,
}

impl TodoStore {
    /// 起動時ロード。3つのキーを並行に読み、欠損はデフォルトで埋める
    pub async fn load(storage: Storage) -> Self {
        let (list, category, mode) = tokio::join!(
            storage.get::<TodoList>(TODOS_KEY),
            storage.get::<Category>(CATEGORY_KEY),
            storage.get::<DisplayMode>(MODE_KEY),
        );
        Self {
            list: list.unwrap_or_default(),
            category: category.unwrap_or(Category::Work),
            mode: mode.unwrap_or(DisplayMode::Light),
            storage,
        }
    }

    pub fn list(&self) -> &TodoList {
        &self.list
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn set_category(&mut self, category: Category) {
        self.category = category;
        self.storage.set_detached(CATEGORY_KEY, &self.category);
    }

    pub fn toggle_mode(&mut self) {
        self.mode = self.mode.toggle();
        self.storage.set_detached(MODE_KEY, &self.mode);
    }

    /// 空白のみのテキストは黙って無視する
    pub fn add_item(&mut self, text: &str, category: Category) {
        if text.trim().is_empty() {
            return;
        }
        self.list.add_item(TodoItem::new(text.to_string(), category));
        self.persist_items();
    }

    /// 削除確認はプレゼンテーション層の責務。ここでは無条件に削除する
    pub fn delete_item(&mut self, item_id: &str) {
        if self.list.remove_item(item_id) {
            self.persist_items();
        }
    }

    pub fn toggle_completed(&mut self, item_id: &str) {
        if self.list.toggle_completed(item_id) {
            self.persist_items();
        }
    }

    pub fn begin_edit(&mut self, item_id: &str) {
        if self.list.begin_edit(item_id) {
            self.persist_items();
        }
    }

    /// キーストロークごとの書き込みを避けるため、永続化しない
    pub fn update_draft(&mut self, item_id: &str, text: &str) {
        self.list.update_draft(item_id, text);
    }

    pub fn commit_edit(&mut self, item_id: &str) {
        if self.list.commit_edit(item_id) {
            self.persist_items();
        }
    }

    pub fn cancel_edit(&mut self, item_id: &str) {
        if self.list.cancel_edit(item_id) {
            self.persist_items();
        }
    }

    pub fn visible_items(&self) -> Vec<&TodoItem> {
        self.list.iter_newest_first(self.category)
    }

    fn persist_items(&self) {
        self.storage.set_detached(TODOS_KEY, &self.list);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_storage() -> (Storage, tempfile::TempDir) {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = Storage::new(Some(dir.path().to_path_buf())).expect("storage");
        (storage, dir)
    }

    #[tokio::test]
    async fn empty_text_is_ignored() {
        let (storage, _dir) = test_storage();
        let mut store = TodoStore::load(storage).await;

        store.add_item("A", Category::Work);
        store.add_item("", Category::Work);
        store.add_item("   ", Category::Work);
        store.add_item("B", Category::Travel);

        assert_eq!(store.list().len(), 2);
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let (storage, _dir) = test_storage();
        let mut store = TodoStore::load(storage).await;

        store.add_item("task", Category::Work);
        let id = store.visible_items()[0].id.clone();

        store.delete_item(&id);
        assert!(store.list().is_empty());

        // 2回目は何も起きない
        store.delete_item(&id);
        assert!(store.list().is_empty());
    }

    #[tokio::test]
    async fn toggle_completed_is_self_inverse() {
        let (storage, _dir) = test_storage();
        let mut store = TodoStore::load(storage).await;

        store.add_item("task", Category::Work);
        let id = store.visible_items()[0].id.clone();

        store.toggle_completed(&id);
        assert!(store.list().get(&id).unwrap().completed);
        store.toggle_completed(&id);
        assert!(!store.list().get(&id).unwrap().completed);

        // 存在しないidはno-op
        store.toggle_completed("missing");
        assert_eq!(store.list().len(), 1);
    }

    #[tokio::test]
    async fn edit_commit_replaces_text() {
        let (storage, _dir) = test_storage();
        let mut store = TodoStore::load(storage).await;

        store.add_item("old", Category::Work);
        let id = store.visible_items()[0].id.clone();

        store.begin_edit(&id);
        assert!(store.list().get(&id).unwrap().editing);
        store.update_draft(&id, "X");
        store.commit_edit(&id);

        let item = store.list().get(&id).unwrap();
        assert_eq!(item.text, "X");
        assert!(!item.editing);
        assert_eq!(item.draft_text, "X");
    }

    #[tokio::test]
    async fn commit_with_empty_draft_is_noop() {
        let (storage, _dir) = test_storage();
        let mut store = TodoStore::load(storage).await;

        store.add_item("keep", Category::Work);
        let id = store.visible_items()[0].id.clone();

        store.begin_edit(&id);
        store.update_draft(&id, "");
        store.commit_edit(&id);

        let item = store.list().get(&id).unwrap();
        assert_eq!(item.text, "keep");
        assert!(item.editing);
    }

    #[tokio::test]
    async fn cancel_discards_draft() {
        let (storage, _dir) = test_storage();
        let mut store = TodoStore::load(storage).await;

        store.add_item("original", Category::Work);
        let id = store.visible_items()[0].id.clone();

        store.begin_edit(&id);
        store.update_draft(&id, "scribble");
        store.update_draft(&id, "more scribble");
        store.cancel_edit(&id);

        let item = store.list().get(&id).unwrap();
        assert_eq!(item.text, "original");
        assert!(!item.editing);
        assert_eq!(item.draft_text, "original");
    }

    #[tokio::test]
    async fn projection_filters_and_reverses() {
        let (storage, _dir) = test_storage();
        let mut store = TodoStore::load(storage).await;

        store.add_item("one", Category::Work);
        store.add_item("two", Category::Travel);
        store.add_item("three", Category::Work);

        let visible: Vec<&str> = store
            .visible_items()
            .iter()
            .map(|item| item.text.as_str())
            .collect();
        assert_eq!(visible, vec!["three", "one"]);

        store.set_category(Category::Travel);
        let visible: Vec<&str> = store
            .visible_items()
            .iter()
            .map(|item| item.text.as_str())
            .collect();
        assert_eq!(visible, vec!["two"]);
    }

    #[tokio::test]
    async fn defaults_on_first_launch() {
        let (storage, _dir) = test_storage();
        let store = TodoStore::load(storage).await;

        assert!(store.list().is_empty());
        assert_eq!(store.category(), Category::Work);
        assert_eq!(store.mode(), DisplayMode::Light);
    }

    #[tokio::test]
    async fn collection_round_trips_through_storage() {
        let (storage, _dir) = test_storage();

        let mut list = TodoList::new();
        list.add_item(TodoItem::new("done".to_string(), Category::Work));
        list.add_item(TodoItem::new("open".to_string(), Category::Travel));
        let first_id = list.order[0].clone();
        list.toggle_completed(&first_id);

        storage.set(TODOS_KEY, &list).await.expect("write");
        // 再起動相当: 同じストレージから新しいストアをロード
        let store = TodoStore::load(storage).await;
        assert_eq!(store.list(), &list);
    }

    #[test]
    fn draft_tracks_text_when_not_editing() {
        let item = TodoItem::new("hello".to_string(), Category::Work);
        assert!(!item.editing);
        assert_eq!(item.draft_text, item.text);
    }
}
