use juniper::GraphQLObject;

pub const PLACEHOLDER: &str = "Enter API Key";
pub const TITLE: &str = "Enter your Google API key to enable auto image search.";

/// The floating API key input. Masked until the user asks to see it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApiKeyInput {
    revealed: bool,
}

impl ApiKeyInput {
    /// Flips between masked and shown. Returns whether the key is now shown.
    pub fn toggle_visibility(&mut self) -> bool {
        self.revealed = !self.revealed;
        self.revealed
    }

    #[must_use]
    pub const fn input_type(self) -> &'static str {
        if self.revealed {
            "text"
        } else {
            "password"
        }
    }

    #[must_use]
    pub const fn toggle_label(self) -> &'static str {
        if self.revealed {
            "Hide"
        } else {
            "Show"
        }
    }

    #[must_use]
    pub fn display(self, api_key: &str) -> String {
        if self.revealed {
            api_key.to_owned()
        } else {
            "•".repeat(api_key.chars().count())
        }
    }

    #[must_use]
    pub fn render(self, api_key: &str) -> Settings {
        Settings {
            input_type: self.input_type().to_owned(),
            value: self.display(api_key),
            toggle_label: self.toggle_label().to_owned(),
            placeholder: PLACEHOLDER.to_owned(),
            title: TITLE.to_owned(),
            auto_search_enabled: !api_key.is_empty(),
        }
    }
}

/// How the API key input currently looks.
#[derive(Debug, Clone, PartialEq, Eq, GraphQLObject)]
pub struct Settings {
    pub input_type: String,
    pub value: String,
    pub toggle_label: String,
    pub placeholder: String,
    pub title: String,
    pub auto_search_enabled: bool,
}
