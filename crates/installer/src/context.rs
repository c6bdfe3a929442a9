use core::fmt::Display;

/// Holds the context for the current install. Used for prefixing logs.
#[derive(Default, Debug)]
pub struct Context {
    /// The installer running, such as `apt`.
    pub installer: Option<&'static str>,
    /// The package being installed.
    pub package: Option<String>,
    /// Set when nothing is actually installed.
    pub dry_run: bool,
}

impl Display for Context {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if self.dry_run {
            write!(f, "[DRY RUN] ")?;
        }

        if let Some(installer) = self.installer {
            write!(f, "[{installer}] ")?;
        }

        if let Some(package) = &self.package {
            write!(f, "[{package}] ")?;
        }

        Ok(())
    }
}
