// Setup wizard state machine
//
// Drives the `crew setup` flow: ask for the server URL, then the API key,
// then land in the lobby. Rendering and input are left to the caller so the
// transitions can be tested without a terminal.

use url::Url;

use crate::client::config::CrewConfig;

/// Prompt shown while asking for the server URL
pub const CREW_URL_PROMPT: &str = "Enter your Crew URL";

/// Prompt shown while asking for the API key
pub const CREW_API_KEY_PROMPT: &str = "Enter your crew API key";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardState {
    ConfiguringCrewUrl,
    ConfiguringCrewApiKey,
    Lobby,
}

#[derive(Debug, Clone)]
pub struct Wizard {
    state: WizardState,
    server_url: String,
    server_api_key: String,
    completed_lines: Vec<String>,
    error: Option<String>,
}

impl Default for Wizard {
    fn default() -> Self {
        Self::new()
    }
}

impl Wizard {
    /// Start a fresh wizard at the URL step
    pub fn new() -> Self {
        Self {
            state: WizardState::ConfiguringCrewUrl,
            server_url: String::new(),
            server_api_key: String::new(),
            completed_lines: Vec::new(),
            error: None,
        }
    }

    /// Start at the URL step with values from an existing config as defaults
    ///
    /// Submitting an empty line at a step keeps the pre-filled value.
    pub fn with_defaults(config: &CrewConfig) -> Self {
        Self {
            server_url: config.server_url.clone(),
            server_api_key: config.server_api_key.clone(),
            ..Self::new()
        }
    }

    /// Skip straight to the lobby with a complete saved config
    pub fn resume(config: &CrewConfig) -> Self {
        Self {
            state: WizardState::Lobby,
            ..Self::with_defaults(config)
        }
    }

    pub fn state(&self) -> WizardState {
        self.state
    }

    pub fn is_done(&self) -> bool {
        self.state == WizardState::Lobby
    }

    /// Render the current screen
    pub fn prompt(&self) -> String {
        let screen = match self.state {
            WizardState::ConfiguringCrewUrl => format!("{}:", CREW_URL_PROMPT),
            WizardState::ConfiguringCrewApiKey => format!(
                "{}\n{}:",
                self.completed_lines.join(" "),
                CREW_API_KEY_PROMPT
            ),
            WizardState::Lobby => format!("Welcome to your Crew @{}", self.server_url),
        };

        match &self.error {
            Some(err) => format!("{}\n{}", err, screen),
            None => screen,
        }
    }

    /// Feed one line of input to the current step
    ///
    /// Returns the state after the transition. Input in the lobby is ignored.
    pub fn submit(&mut self, input: &str) -> WizardState {
        self.error = None;

        match self.state {
            WizardState::ConfiguringCrewUrl => {
                let url = if input.is_empty() {
                    self.server_url.clone()
                } else {
                    input.to_string()
                };

                if let Err(e) = Url::parse(&url) {
                    self.error = Some(format!("Invalid Crew URL '{}': {}", url, e));
                    return self.state;
                }

                self.completed_lines.push(CREW_URL_PROMPT.to_string());
                self.completed_lines.push(url.clone());
                self.server_url = url;
                self.state = WizardState::ConfiguringCrewApiKey;
            }
            WizardState::ConfiguringCrewApiKey => {
                if !input.is_empty() {
                    self.server_api_key = input.to_string();
                }

                if self.server_api_key.is_empty() {
                    self.error = Some("API key is required".to_string());
                    return self.state;
                }

                self.state = WizardState::Lobby;
            }
            WizardState::Lobby => {}
        }

        self.state
    }

    /// Captured config, available once the wizard reaches the lobby
    pub fn config(&self) -> Option<CrewConfig> {
        if !self.is_done() {
            return None;
        }

        Some(CrewConfig {
            server_url: self.server_url.clone(),
            server_api_key: self.server_api_key.clone(),
        })
    }
}
