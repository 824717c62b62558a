use minijinja::{Environment, UndefinedBehavior};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

// NOTE:
// The report prompt is German only; the generated Berichtsheft text is
// expected in German regardless of the client locale.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

/// Grammatical substitutions for one gender.
#[derive(Debug, Clone, Deserialize)]
pub struct GrammaticalForms {
    /// Descriptive adjective, e.g. "männlichen".
    pub adjective: String,
    /// Sentence-initial personal pronoun, e.g. "Er".
    pub pronoun: String,
    /// Sentence-initial possessive, e.g. "Seine".
    pub possessive: String,
}

#[derive(Deserialize)]
struct ReportPromptFile {
    template: String,
    male: GrammaticalForms,
    female: GrammaticalForms,
}

macro_rules! prompt_file {
    ($lang:literal) => {
        include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/lang/",
            $lang,
            "/report_prompt.json"
        ))
    };
}

static DE_REPORT_PROMPT: Lazy<ReportPromptFile> = Lazy::new(|| {
    serde_json::from_str(prompt_file!("de")).expect("invalid report prompt config")
});

pub fn grammatical_forms(gender: Gender) -> &'static GrammaticalForms {
    match gender {
        Gender::Male => &DE_REPORT_PROMPT.male,
        Gender::Female => &DE_REPORT_PROMPT.female,
    }
}

const REPORT_TEMPLATE_NAME: &str = "report_prompt";

#[derive(Serialize)]
struct ReportContext<'a> {
    adjective: &'a str,
    pronoun: &'a str,
    possessive: &'a str,
    day: &'a str,
    activities: &'a str,
}

static REPORT_TEMPLATE: Lazy<Environment<'static>> = Lazy::new(|| {
    let mut env = Environment::new();
    env.set_keep_trailing_newline(true);
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env.add_template(REPORT_TEMPLATE_NAME, DE_REPORT_PROMPT.template.as_str())
        .unwrap_or_else(|err| panic!("failed to compile report prompt template: {err}"));
    env
});

/// Instruction asking the model to rewrite one day's activity notes as
/// third-person Berichtsheft prose.
///
/// `activities` is embedded verbatim; the caller filters out empty days.
pub fn build_report_prompt(day: &str, gender: Gender, activities: &str) -> String {
    let forms = grammatical_forms(gender);
    let ctx = ReportContext {
        adjective: &forms.adjective,
        pronoun: &forms.pronoun,
        possessive: &forms.possessive,
        day,
        activities,
    };
    render_report(&ctx).unwrap_or_else(|err| panic!("report prompt rendering failed: {err}"))
}

fn render_report(ctx: &impl Serialize) -> Result<String, minijinja::Error> {
    REPORT_TEMPLATE.get_template(REPORT_TEMPLATE_NAME)?.render(ctx)
}
