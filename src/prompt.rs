//! The four questions asked before any step runs

use anyhow::{Context, Result, bail};
use dialoguer::{Confirm, Input};
use std::io::IsTerminal;

use crate::config::AnswerDefaults;

/// Answers that drive conditional steps and git identity
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Answers {
    pub desktop: bool,
    pub wsl: bool,
    pub email: String,
    pub name: String,
}

impl Answers {
    /// Layer flags over config over built-in defaults
    pub fn resolve(flags: &AnswerDefaults, config: &AnswerDefaults) -> Self {
        Self {
            desktop: flags.desktop.or(config.desktop).unwrap_or(false),
            wsl: flags.wsl.or(config.wsl).unwrap_or(false),
            email: flags
                .email
                .clone()
                .or_else(|| config.email.clone())
                .unwrap_or_default(),
            name: flags
                .name
                .clone()
                .or_else(|| config.name.clone())
                .unwrap_or_default(),
        }
    }

    /// Fail with an actionable message if email or name is blank
    pub fn require_git_identity(&self) -> Result<()> {
        if self.email.trim().is_empty() {
            bail!(
                "A git email is required. Pass --email, set BOOTSTRAP_GIT_EMAIL, \
                 or add `email` under [answers] in config.toml"
            );
        }
        if self.name.trim().is_empty() {
            bail!(
                "A git name is required. Pass --name, set BOOTSTRAP_GIT_NAME, \
                 or add `name` under [answers] in config.toml"
            );
        }
        Ok(())
    }
}

/// Whether prompts can be shown at all
pub fn can_prompt() -> bool {
    std::io::stdin().is_terminal()
}

/// Ask the four questions, pre-filled with `defaults`
pub fn ask(defaults: Answers) -> Result<Answers> {
    let desktop = Confirm::new()
        .with_prompt("Are you running on a desktop environment?")
        .default(defaults.desktop)
        .interact()
        .context("Failed to read desktop answer")?;

    let wsl = Confirm::new()
        .with_prompt("Are you on WSL?")
        .default(defaults.wsl)
        .interact()
        .context("Failed to read WSL answer")?;

    let email: String = Input::new()
        .with_prompt("What is your email?")
        .with_initial_text(defaults.email)
        .allow_empty(true)
        .interact_text()
        .context("Failed to read email")?;

    let name: String = Input::new()
        .with_prompt("What is your name?")
        .with_initial_text(defaults.name)
        .allow_empty(true)
        .interact_text()
        .context("Failed to read name")?;

    Ok(Answers {
        desktop,
        wsl,
        email: email.trim().to_string(),
        name: name.trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn partial(desktop: Option<bool>, email: Option<&str>) -> AnswerDefaults {
        AnswerDefaults {
            desktop,
            wsl: None,
            email: email.map(str::to_string),
            name: None,
        }
    }

    #[test]
    fn test_flags_override_config() {
        let flags = partial(Some(true), None);
        let config = partial(Some(false), Some("cfg@example.com"));

        let answers = Answers::resolve(&flags, &config);
        assert!(answers.desktop);
        assert!(!answers.wsl);
        assert_eq!(answers.email, "cfg@example.com");
        assert_eq!(answers.name, "");
    }

    #[test]
    fn test_builtin_defaults() {
        let answers = Answers::resolve(&AnswerDefaults::default(), &AnswerDefaults::default());
        assert_eq!(answers, Answers::default());
    }

    #[test]
    fn test_git_identity_required() {
        let mut answers = Answers {
            email: "dev@example.com".into(),
            ..Answers::default()
        };
        let err = answers.require_git_identity().unwrap_err();
        assert!(err.to_string().contains("git name"));

        answers.name = "Dev".into();
        answers.require_git_identity().unwrap();

        answers.email = "   ".into();
        assert!(answers.require_git_identity().is_err());
    }
}
