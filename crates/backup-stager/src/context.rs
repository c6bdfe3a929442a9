use core::fmt::Display;

use crate::Category;

/// Holds the context for the current backup run. Used for prefixing logs.
#[derive(Default, Debug)]
pub struct Context {
    /// The backup being produced.
    pub backup: Option<String>,
    /// The category currently being copied.
    pub category: Option<Category>,
    /// The current context
    pub current_context: &'static str,
}

impl Context {
    /// Create a context for a named backup.
    pub fn for_backup(backup_name: &str) -> Self {
        Self {
            backup: Some(backup_name.to_string()),
            category: None,
            current_context: "Init",
        }
    }
}

impl Display for Context {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if let Some(backup) = &self.backup {
            write!(f, "[{backup}] ")?;
        }

        if let Some(category) = &self.category {
            write!(f, "[{category}] ")?;
        }

        write!(f, "[{}] ", self.current_context)?;

        Ok(())
    }
}
