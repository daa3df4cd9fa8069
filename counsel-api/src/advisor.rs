//! Rule-based advisor.
//!
//! Replies are filled from a fixed template; the only input-dependent parts are
//! the echoed context and the focus list chosen by the consultation stage.

use shared_types::DEFAULT_STAGE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idea,
    Mvp,
    Growth,
    Scale,
}

impl Stage {
    /// Case-insensitive lookup of a documented stage label.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.to_lowercase().as_str() {
            "idea" => Some(Stage::Idea),
            "mvp" => Some(Stage::Mvp),
            "growth" => Some(Stage::Growth),
            "scale" => Some(Stage::Scale),
            _ => None,
        }
    }

    /// Unknown labels are advised as if the business were still at the idea stage.
    pub fn from_label_or_default(label: &str) -> Self {
        Self::from_label(label).unwrap_or(Stage::Idea)
    }

    pub fn focus_areas(self) -> [&'static str; 4] {
        match self {
            Stage::Idea => [
                "Problem validation",
                "Customer discovery",
                "Value proposition",
                "Competitive scan",
            ],
            Stage::Mvp => [
                "MVP scope",
                "Success metrics",
                "Go-to-market",
                "Pricing hypothesis",
            ],
            Stage::Growth => [
                "Acquisition channels",
                "Retention levers",
                "Unit economics",
                "Sales pipeline",
            ],
            Stage::Scale => [
                "Org design",
                "Process/automation",
                "Internationalization",
                "Risk & compliance",
            ],
        }
    }
}

/// Consultation fields the advisor reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsultationMeta {
    pub business_name: String,
    pub industry: String,
    pub stage: String,
    pub goal: String,
    pub notes: Option<String>,
}

impl Default for ConsultationMeta {
    fn default() -> Self {
        Self {
            business_name: String::new(),
            industry: String::new(),
            stage: DEFAULT_STAGE.to_string(),
            goal: String::new(),
            notes: None,
        }
    }
}

const NEXT_STEPS: [&str; 4] = [
    "1) Define a one-sentence goal for the next 7 days",
    "2) Pick one channel to test (e.g., LinkedIn, cold email, partnerships)",
    "3) Draft a simple success metric (e.g., 5 qualified leads)",
    "4) Schedule a weekly review to iterate",
];

const METRICS: [&str; 4] = [
    "Lead velocity",
    "Conversion to qualified opportunity",
    "CAC vs LTV",
    "Activation time",
];

const RESOURCES: [&str; 3] = [
    "Lean Canvas",
    "Mom Test (customer interviews)",
    "Pirate Metrics (AARRR)",
];

pub fn generate_advice(user_text: &str, meta: &ConsultationMeta) -> String {
    let stage = meta.stage.to_lowercase();
    let focus = Stage::from_label_or_default(&stage).focus_areas();

    let mut lines = vec![
        "Context".to_string(),
        format!("- Industry: {}", title_case(&meta.industry)),
        format!("- Stage: {}", stage),
        format!("- Goal: {}", meta.goal),
        String::new(),
        "Your prompt".to_string(),
        format!("- {}", user_text),
        String::new(),
        "Advisor Summary".to_string(),
        "- Core thesis: Align actions to the next riskiest assumption.".to_string(),
        "- Focus areas:".to_string(),
    ];
    lines.extend(focus.iter().map(|topic| {
        format!("- {topic}: Consider 1-2 experiments this week to validate assumptions.")
    }));

    lines.push(String::new());
    lines.push("Suggested Next Steps".to_string());
    lines.extend(NEXT_STEPS.iter().map(|step| step.to_string()));

    lines.push(String::new());
    lines.push("Metrics To Watch".to_string());
    lines.extend(METRICS.iter().map(|metric| format!("- {metric}")));

    lines.push(String::new());
    lines.push("Resources".to_string());
    lines.extend(RESOURCES.iter().map(|resource| format!("- {resource}")));

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Upper-cases the first letter of every alphabetic run and lower-cases the rest.
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}
