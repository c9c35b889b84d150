use ratatui::style::Color;

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub text: Color,
    pub dim: Color,
    pub accent: Color,
    pub border: Color,
    pub error: Color,
    pub positive: Color,
    pub negative: Color,
    pub warning: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            text: Color::Rgb(220, 220, 220),
            dim: Color::Rgb(140, 140, 140),
            accent: Color::Rgb(230, 140, 60),
            border: Color::Rgb(70, 70, 70),
            error: Color::Rgb(200, 80, 80),
            positive: Color::Rgb(90, 180, 100),
            negative: Color::Rgb(200, 80, 80),
            warning: Color::Rgb(210, 170, 70),
        }
    }
}
