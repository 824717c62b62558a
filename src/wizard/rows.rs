//! Bullet-row editing for one day card.

use super::WizardError;

pub const INITIAL_ROWS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Focus {
    pub row: usize,
    /// Caret position in chars.
    pub caret: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayRows {
    rows: Vec<String>,
    focus: Option<Focus>,
}

impl Default for DayRows {
    fn default() -> Self {
        Self {
            rows: vec![String::new(); INITIAL_ROWS],
            focus: None,
        }
    }
}

impl DayRows {
    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    pub fn focus(&self) -> Option<Focus> {
        self.focus
    }

    pub fn set_text(&mut self, row: usize, text: impl Into<String>) -> Result<(), WizardError> {
        let slot = self.rows.get_mut(row).ok_or(WizardError::NoSuchRow(row))?;
        *slot = text.into();
        Ok(())
    }

    /// Appends an empty row and focuses it.
    pub fn add_row(&mut self) -> usize {
        self.rows.push(String::new());
        let row = self.rows.len() - 1;
        self.focus = Some(Focus { row, caret: 0 });
        row
    }

    /// Enter jumps to the next row, or opens a new one on the last row.
    pub fn press_enter(&mut self, row: usize) -> Result<Focus, WizardError> {
        self.check_row(row)?;
        if row + 1 < self.rows.len() {
            let next = row + 1;
            let focus = Focus {
                row: next,
                caret: self.rows[next].chars().count(),
            };
            self.focus = Some(focus);
            Ok(focus)
        } else {
            let row = self.add_row();
            Ok(Focus { row, caret: 0 })
        }
    }

    /// Backspace on an empty row deletes it, unless it is the only row.
    /// Focus moves to the end of the previous row if there is one.
    ///
    /// Returns whether the key was consumed.
    pub fn press_backspace(&mut self, row: usize) -> Result<bool, WizardError> {
        self.check_row(row)?;
        if !self.rows[row].is_empty() || self.rows.len() <= 1 {
            return Ok(false);
        }

        self.rows.remove(row);
        self.focus = row.checked_sub(1).map(|prev| Focus {
            row: prev,
            caret: self.rows[prev].chars().count(),
        });
        Ok(true)
    }

    /// Drag-reorder within the card.
    pub fn move_row(&mut self, from: usize, to: usize) -> Result<(), WizardError> {
        self.check_row(from)?;
        self.check_row(to)?;
        let text = self.rows.remove(from);
        self.rows.insert(to, text);
        self.focus = None;
        Ok(())
    }

    pub(crate) fn take_row(&mut self, row: usize) -> Result<String, WizardError> {
        self.check_row(row)?;
        let text = self.rows.remove(row);
        if self.rows.is_empty() {
            self.rows.push(String::new());
        }
        self.focus = None;
        Ok(text)
    }

    pub(crate) fn insert_row(&mut self, at: usize, text: String) -> Result<(), WizardError> {
        if at > self.rows.len() {
            return Err(WizardError::NoSuchRow(at));
        }
        self.rows.insert(at, text);
        self.focus = None;
        Ok(())
    }

    /// `"- a\n- b"`: trimmed, empty rows dropped.
    pub fn to_input(&self) -> String {
        self.rows
            .iter()
            .map(|row| row.trim())
            .filter(|row| !row.is_empty())
            .map(|row| format!("- {row}"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn check_row(&self, row: usize) -> Result<(), WizardError> {
        if row < self.rows.len() {
            Ok(())
        } else {
            Err(WizardError::NoSuchRow(row))
        }
    }
}
