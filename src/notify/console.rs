//! Dry-run notifier that prints to standard output or standard error

use super::{Notification, Notifier};
use crate::error::NotifyError;
use async_trait::async_trait;
use colored::Colorize;

/// Stream a console notifier writes to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConsoleTarget {
    #[default]
    Stdout,
    /// Keeps stdout free for a machine-readable report
    Stderr,
}

/// Prints notifications instead of posting them
#[derive(Debug, Default)]
pub struct ConsoleNotifier {
    target: ConsoleTarget,
}

impl ConsoleNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifier printing to standard error
    pub fn stderr() -> Self {
        Self {
            target: ConsoleTarget::Stderr,
        }
    }

    pub fn target(&self) -> ConsoleTarget {
        self.target
    }

    /// Text printed for a notification
    pub fn render(notification: &Notification) -> String {
        format!("{}\n\n{}\n", notification.title.bold(), notification.body)
    }
}

#[async_trait]
impl Notifier for ConsoleNotifier {
    async fn post(&self, notification: &Notification) -> Result<(), NotifyError> {
        let text = Self::render(notification);
        match self.target {
            ConsoleTarget::Stdout => println!("{}", text),
            ConsoleTarget::Stderr => eprintln!("{}", text),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_contains_title_and_body() {
        colored::control::set_override(false);
        let notification = Notification {
            title: "Upstream release of dependency: x".to_string(),
            body: "body text".to_string(),
        };
        assert_eq!(
            ConsoleNotifier::render(&notification),
            "Upstream release of dependency: x\n\nbody text\n"
        );
    }

    #[tokio::test]
    async fn test_post_always_succeeds() {
        let notification = Notification {
            title: "t".to_string(),
            body: "b".to_string(),
        };
        for notifier in [ConsoleNotifier::new(), ConsoleNotifier::stderr()] {
            assert!(notifier.post(&notification).await.is_ok());
        }
    }

    #[test]
    fn test_default_target_is_stdout() {
        assert_eq!(ConsoleNotifier::new().target(), ConsoleTarget::Stdout);
        assert_eq!(ConsoleNotifier::stderr().target(), ConsoleTarget::Stderr);
    }
}
