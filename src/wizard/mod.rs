//! The four-step report wizard as explicit state.
//!
//! Step flow: gender select, day input, loading, results. The state owns the
//! bullet rows per day and the last submitted inputs so that single days can
//! be regenerated without touching the rest of the batch.

pub mod rows;

use thiserror::Error;

use crate::model::report::{is_blank, DayResult, GenerateRequest};
use crate::prompts::Gender;

pub use rows::{DayRows, Focus};

pub const DEFAULT_DAYS: [&str; 5] = ["Montag", "Dienstag", "Mittwoch", "Donnerstag", "Freitag"];

pub const NO_ACTIVITIES_MESSAGE: &str = "Bitte gebe für mindestens einen Tag eine Tätigkeit ein.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    GenderSelect,
    DayInput,
    Loading,
    Results,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WizardError {
    #[error("{}", NO_ACTIVITIES_MESSAGE)]
    NoActivities,

    #[error("no gender selected")]
    GenderNotSelected,

    #[error("action not available in step {0:?}")]
    WrongStep(Step),

    #[error("no day with index {0}")]
    NoSuchDay(usize),

    #[error("no row with index {0}")]
    NoSuchRow(usize),

    #[error("row reordering is not available")]
    ReorderUnavailable,

    #[error("Kein gültiger Text von der API erhalten.")]
    EmptyRegeneration,

    #[error("no report text for day {0}")]
    NothingToCopy(usize),
}

#[derive(Debug, Clone)]
pub struct WizardState {
    step: Step,
    gender: Option<Gender>,
    days: Vec<String>,
    rows: Vec<DayRows>,
    last_inputs: Vec<String>,
    results: Vec<DayResult>,
    reorder: bool,
}

impl Default for WizardState {
    fn default() -> Self {
        Self::new(DEFAULT_DAYS.iter().map(|d| d.to_string()).collect())
    }
}

impl WizardState {
    pub fn new(days: Vec<String>) -> Self {
        let rows = vec![DayRows::default(); days.len()];
        Self {
            step: Step::GenderSelect,
            gender: None,
            days,
            rows,
            last_inputs: Vec::new(),
            results: Vec::new(),
            reorder: false,
        }
    }

    /// Reordering is optional; input works the same without it.
    pub fn with_reorder(mut self, available: bool) -> Self {
        self.reorder = available;
        self
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn gender(&self) -> Option<Gender> {
        self.gender
    }

    pub fn days(&self) -> &[String] {
        &self.days
    }

    pub fn results(&self) -> &[DayResult] {
        &self.results
    }

    pub fn last_inputs(&self) -> &[String] {
        &self.last_inputs
    }

    pub fn select_gender(&mut self, gender: Gender) {
        self.gender = Some(gender);
        self.step = Step::DayInput;
    }

    pub fn back_to_gender(&mut self) {
        self.step = Step::GenderSelect;
    }

    pub fn rows(&self, day: usize) -> Result<&DayRows, WizardError> {
        self.rows.get(day).ok_or(WizardError::NoSuchDay(day))
    }

    pub fn rows_mut(&mut self, day: usize) -> Result<&mut DayRows, WizardError> {
        self.rows.get_mut(day).ok_or(WizardError::NoSuchDay(day))
    }

    pub fn move_row(&mut self, day: usize, from: usize, to: usize) -> Result<(), WizardError> {
        if !self.reorder {
            return Err(WizardError::ReorderUnavailable);
        }
        self.rows_mut(day)?.move_row(from, to)
    }

    /// Drag a row from one day card into another.
    pub fn transfer_row(
        &mut self,
        from_day: usize,
        from_row: usize,
        to_day: usize,
        to_row: usize,
    ) -> Result<(), WizardError> {
        if !self.reorder {
            return Err(WizardError::ReorderUnavailable);
        }
        self.rows(to_day)?;
        let text = self.rows_mut(from_day)?.take_row(from_row)?;
        self.rows_mut(to_day)?.insert_row(to_row, text)
    }

    /// One input string per day, empty for days without entries.
    pub fn collect_inputs(&self) -> Vec<String> {
        self.rows.iter().map(DayRows::to_input).collect()
    }

    /// Validates the inputs and switches to the loading step.
    pub fn begin_generation(&mut self) -> Result<GenerateRequest, WizardError> {
        if self.step != Step::DayInput {
            return Err(WizardError::WrongStep(self.step));
        }
        let gender = self.gender.ok_or(WizardError::GenderNotSelected)?;
        let inputs = self.collect_inputs();
        if inputs.iter().all(|input| is_blank(input)) {
            return Err(WizardError::NoActivities);
        }

        self.last_inputs = inputs.clone();
        self.step = Step::Loading;
        Ok(GenerateRequest {
            inputs,
            gender,
            days: self.days.clone(),
        })
    }

    pub fn finish_generation(&mut self, results: Vec<DayResult>) {
        self.results = results;
        self.step = Step::Results;
    }

    /// Batch-level failure: back to editing, inputs untouched.
    pub fn fail_generation(&mut self) {
        self.step = Step::DayInput;
    }

    /// Request that only regenerates `day`; every other slot is empty.
    pub fn regenerate_request(&self, day: usize) -> Result<GenerateRequest, WizardError> {
        if self.step != Step::Results {
            return Err(WizardError::WrongStep(self.step));
        }
        let gender = self.gender.ok_or(WizardError::GenderNotSelected)?;
        let activities = self
            .last_inputs
            .get(day)
            .ok_or(WizardError::NoSuchDay(day))?;

        let mut inputs = vec![String::new(); self.days.len()];
        inputs[day] = activities.clone();
        Ok(GenerateRequest {
            inputs,
            gender,
            days: self.days.clone(),
        })
    }

    /// Replaces the shown report for `day` if the regeneration produced
    /// text; otherwise the previous report stays.
    pub fn apply_regenerated(&mut self, day: usize, results: &[DayResult]) -> Result<(), WizardError> {
        let text = results
            .get(day)
            .and_then(|r| r.text.clone())
            .ok_or(WizardError::EmptyRegeneration)?;
        let slot = self.results.get_mut(day).ok_or(WizardError::NoSuchDay(day))?;
        slot.text = Some(text);
        Ok(())
    }

    /// Raw report text of `day` for the clipboard.
    pub fn copy_text(&self, day: usize) -> Result<&str, WizardError> {
        if self.step != Step::Results {
            return Err(WizardError::WrongStep(self.step));
        }
        let result = self.results.get(day).ok_or(WizardError::NoSuchDay(day))?;
        match result.text.as_deref() {
            Some(text) if !is_blank(text) => Ok(text),
            _ => Err(WizardError::NothingToCopy(day)),
        }
    }

    pub fn reset(&mut self) {
        self.gender = None;
        self.last_inputs.clear();
        self.results.clear();
        self.rows = vec![DayRows::default(); self.days.len()];
        self.step = Step::GenderSelect;
    }
}
