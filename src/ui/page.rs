use serde::Serialize;

/// State of the recommend button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SubmitState {
    pub enabled: bool,
    pub label: &'static str,
}

pub const SUBMIT_IDLE: SubmitState = SubmitState {
    enabled: true,
    label: "Recommend",
};

pub const SUBMIT_BUSY: SubmitState = SubmitState {
    enabled: false,
    label: "Recommending...",
};

/// The document surface the controller reads inputs from and renders into.
///
/// Region setters replace the region's whole content, like assigning `innerHTML`.
pub trait Page {
    fn query_value(&self) -> String;
    fn top_k_value(&self) -> String;

    fn set_error(&mut self, message: &str);
    fn set_submit(&mut self, state: SubmitState);
    fn set_results(&mut self, html: String);
    fn set_heatmap(&mut self, html: String);
    fn set_search_history(&mut self, html: String);
    fn set_view_history(&mut self, html: String);

    /// Interactive yes/no prompt
    fn confirm(&mut self, message: &str) -> bool;
}

/// In-memory page used for headless rendering
#[derive(Debug, Clone, Serialize)]
pub struct HtmlPage {
    pub query: String,
    pub top_k: String,
    pub error: String,
    pub submit: SubmitState,
    pub results: String,
    pub heatmap: String,
    pub search_history: String,
    pub view_history: String,
    /// Answer given to every confirmation prompt
    #[serde(skip)]
    pub confirm_answer: bool,
    /// Every button state the page went through, in order
    #[serde(skip)]
    pub submit_log: Vec<SubmitState>,
    /// Prompts shown so far
    #[serde(skip)]
    pub prompts: Vec<String>,
}

impl Default for HtmlPage {
    fn default() -> Self {
        Self {
            query: String::new(),
            top_k: "10".to_string(),
            error: String::new(),
            submit: SUBMIT_IDLE,
            results: String::new(),
            heatmap: String::new(),
            search_history: String::new(),
            view_history: String::new(),
            confirm_answer: false,
            submit_log: Vec::new(),
            prompts: Vec::new(),
        }
    }
}

impl HtmlPage {
    pub fn with_input(query: impl Into<String>, top_k: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            top_k: top_k.into(),
            ..Self::default()
        }
    }
}

impl Page for HtmlPage {
    fn query_value(&self) -> String {
        self.query.clone()
    }

    fn top_k_value(&self) -> String {
        self.top_k.clone()
    }

    fn set_error(&mut self, message: &str) {
        self.error = message.to_string();
    }

    fn set_submit(&mut self, state: SubmitState) {
        self.submit = state;
        self.submit_log.push(state);
    }

    fn set_results(&mut self, html: String) {
        self.results = html;
    }

    fn set_heatmap(&mut self, html: String) {
        self.heatmap = html;
    }

    fn set_search_history(&mut self, html: String) {
        self.search_history = html;
    }

    fn set_view_history(&mut self, html: String) {
        self.view_history = html;
    }

    fn confirm(&mut self, message: &str) -> bool {
        self.prompts.push(message.to_string());
        self.confirm_answer
    }
}
