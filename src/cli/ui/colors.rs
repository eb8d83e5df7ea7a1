use colored::Colorize;

use inquire::set_global_render_config;
use inquire::ui::{Color as InquireColor, RenderConfig, StyleSheet, Styled};

const ACCENT: InquireColor = InquireColor::LightCyan;

pub fn apply_inquire_theme() {
    if std::env::var("NO_COLOR").is_ok() {
        set_global_render_config(RenderConfig::empty());
        return;
    }

    let cfg = RenderConfig::default_colored()
        .with_prompt_prefix(Styled::new("?").with_fg(ACCENT))
        .with_answered_prompt_prefix(Styled::new(">").with_fg(ACCENT))
        .with_highlighted_option_prefix(Styled::new(">").with_fg(ACCENT))
        .with_selected_option(Some(StyleSheet::new().with_fg(ACCENT)))
        .with_help_message(StyleSheet::new().with_fg(ACCENT))
        .with_answer(StyleSheet::new().with_fg(ACCENT));

    set_global_render_config(cfg);
}

pub fn success(text: &str) -> String {
    text.green().to_string()
}

pub fn error(text: &str) -> String {
    text.red().to_string()
}

pub fn warning(text: &str) -> String {
    text.yellow().to_string()
}

pub fn info(text: &str) -> String {
    text.cyan().to_string()
}

pub fn highlight(text: &str) -> String {
    text.bright_blue().bold().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    struct ColorOverrideGuard;

    impl ColorOverrideGuard {
        fn force(enabled: bool) -> Self {
            colored::control::set_override(enabled);
            Self
        }
    }

    impl Drop for ColorOverrideGuard {
        fn drop(&mut self) {
            colored::control::unset_override();
        }
    }

    #[test]
    #[serial]
    fn helpers_emit_ansi_when_forced_on() {
        let _guard = ColorOverrideGuard::force(true);
        assert_eq!(success("ok"), "ok".green().to_string());
        assert_ne!(highlight("x"), "x");
    }

    #[test]
    #[serial]
    fn helpers_are_plain_when_forced_off() {
        let _guard = ColorOverrideGuard::force(false);
        assert_eq!(warning("careful"), "careful");
        assert_eq!(error("bad"), "bad");
        assert_eq!(info("fyi"), "fyi");
    }
}
