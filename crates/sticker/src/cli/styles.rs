//! Terminal styles.
//!
//! Renderers ask for a style by meaning (`title`, `time`, `id`) rather than
//! by color, so the palette can change in one place. `console` drops the
//! escape codes on its own when stdout is not a terminal.

use console::Style;

pub fn title() -> Style {
    Style::new().bold()
}

pub fn muted() -> Style {
    Style::new().dim()
}

pub fn time() -> Style {
    muted().italic()
}

pub fn id() -> Style {
    Style::new().yellow()
}

pub fn success() -> Style {
    Style::new().green()
}

pub fn warning() -> Style {
    Style::new().yellow().bold()
}

pub fn error() -> Style {
    Style::new().red().bold()
}

pub fn highlight() -> Style {
    Style::new().cyan().bold()
}
