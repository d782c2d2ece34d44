use ratatui::style::Modifier;
use ratatui::style::Style;

#[derive(Clone, Debug)]
pub struct Theme {
    pub text_primary: Style,
    pub text_muted: Style,
    pub accent: Style,
    pub danger: Style,
    pub code_inline: Style,
    pub code_block: Style,
    /// Language label shown above fenced code blocks.
    pub code_label: Style,
    pub divider: Style,
    pub divider_active: Style,
    pub button: Style,
    pub button_active: Style,
    pub title: Style,
}

impl Default for Theme {
    fn default() -> Self {
        use ratatui::style::Stylize;

        Self {
            text_primary: Style::default(),
            text_muted: Style::default().dark_gray(),
            accent: Style::default().cyan(),
            danger: Style::default().red(),
            code_inline: Style::default().cyan(),
            code_block: Style::default().light_blue(),
            code_label: Style::default().black().on_cyan(),
            divider: Style::default().dark_gray(),
            divider_active: Style::default().cyan().add_modifier(Modifier::BOLD),
            button: Style::default().gray(),
            button_active: Style::default().black().on_cyan(),
            title: Style::default().cyan().add_modifier(Modifier::BOLD),
        }
    }
}
