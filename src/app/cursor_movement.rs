use unicode_segmentation::UnicodeSegmentation;

use crate::app::TodoApp;

impl TodoApp {
    pub fn input_grapheme_count(&self) -> usize {
        self.input.graphemes(true).count()
    }

    // カーソル移動のヘルパー関数
    pub fn move_cursor_left(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
        }
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_position < self.input_grapheme_count() {
            self.cursor_position += 1;
        }
    }

    pub fn move_cursor_to_start(&mut self) {
        self.cursor_position = 0;
    }

    pub fn move_cursor_to_end(&mut self) {
        self.cursor_position = self.input_grapheme_count();
    }

    // 文字入力のヘルパー関数
    pub fn insert_char(&mut self, c: char) {
        let graphemes: Vec<&str> = self.input.graphemes(true).collect();
        let mut new_input = String::new();

        for (i, grapheme) in graphemes.iter().enumerate() {
            if i == self.cursor_position {
                new_input.push(c);
            }
            new_input.push_str(grapheme);
        }

        if self.cursor_position >= graphemes.len() {
            new_input.push(c);
        }

        self.input = new_input;
        self.cursor_position += 1;
    }

    // 文字削除のヘルパー関数
    pub fn delete_char_at_cursor(&mut self) {
        let graphemes: Vec<&str> = self.input.graphemes(true).collect();
        if self.cursor_position < graphemes.len() {
            let mut new_input = String::new();
            for (i, grapheme) in graphemes.iter().enumerate() {
                if i != self.cursor_position {
                    new_input.push_str(grapheme);
                }
            }
            self.input = new_input;
        }
    }

    pub fn delete_char_before_cursor(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
            self.delete_char_at_cursor();
        }
    }
}
