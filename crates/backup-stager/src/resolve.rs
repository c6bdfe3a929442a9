//! Turning user supplied path strings into absolute paths.
//!

use std::{
    env, fs,
    path::{Component, Path, PathBuf},
};

/// Resolve a raw path string from config into an absolute path.
///
/// A leading `~` is replaced with the home directory, `$VAR` and `${VAR}` (and `%VAR%` on Windows)
/// are replaced with the variable's value, then the path is made absolute and canonicalized.
///
/// The path does not need to exist: the deepest existing ancestor is canonicalized and the
/// remaining components are appended lexically. Unset variables are left as written.
pub fn resolve(raw: &str) -> PathBuf {
    let expanded = expand(raw);
    let path = PathBuf::from(expanded);

    let absolute = if path.is_absolute() {
        path
    } else {
        match env::current_dir() {
            Ok(current_dir) => current_dir.join(path),
            Err(_) => path,
        }
    };

    canonicalize_lenient(&absolute)
}

/// Expand the home directory marker and environment variables in `raw`.
pub fn expand(raw: &str) -> String {
    let lookup = |name: &str| env::var(name).ok();

    let expanded = expand_home(raw, dirs::home_dir().as_deref());
    let expanded = expand_dollar_variables(&expanded, lookup);

    if cfg!(windows) {
        expand_percent_variables(&expanded, lookup)
    } else {
        expanded
    }
}

/// Replace a leading `~` with `home`.
///
/// Only `~` on its own or followed by a separator is expanded, `~user` is left alone.
pub fn expand_home(raw: &str, home: Option<&Path>) -> String {
    let Some(home) = home else {
        return raw.to_string();
    };

    if raw == "~" {
        return home.to_string_lossy().into_owned();
    }

    let rest = raw
        .strip_prefix("~/")
        .or_else(|| raw.strip_prefix("~\\").filter(|_| cfg!(windows)));

    match rest {
        Some(rest) => home.join(rest).to_string_lossy().into_owned(),
        None => raw.to_string(),
    }
}

/// Replace `$NAME` and `${NAME}` using `lookup`.
pub fn expand_dollar_variables<F>(raw: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut output = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(position) = rest.find('$') {
        let (before, after) = rest.split_at(position);
        output.push_str(before);
        let after = after.strip_prefix('$').unwrap_or(after);

        // ${NAME}
        if let Some(braced) = after.strip_prefix('{') {
            if let Some((name, remainder)) = braced.split_once('}') {
                match lookup_variable(name, &lookup) {
                    Some(value) => output.push_str(&value),
                    None => {
                        output.push_str("${");
                        output.push_str(name);
                        output.push('}');
                    }
                }
                rest = remainder;
            } else {
                output.push('$');
                rest = after;
            }
            continue;
        }

        // $NAME
        let name_end = after
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(after.len());
        let (name, remainder) = after.split_at(name_end);

        match lookup_variable(name, &lookup) {
            Some(value) => output.push_str(&value),
            None => {
                output.push('$');
                output.push_str(name);
            }
        }
        rest = remainder;
    }

    output.push_str(rest);
    output
}

/// Replace Windows style `%NAME%` using `lookup`.
pub fn expand_percent_variables<F>(raw: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut output = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some((before, after)) = rest.split_once('%') {
        output.push_str(before);

        let Some((name, remainder)) = after.split_once('%') else {
            output.push('%');
            rest = after;
            break;
        };

        match lookup(name).filter(|_| !name.is_empty()) {
            Some(value) => {
                output.push_str(&value);
                rest = remainder;
            }
            None => {
                // The closing `%` may open the next variable.
                output.push('%');
                output.push_str(name);
                rest = after.get(name.len()..).unwrap_or_default();
            }
        }
    }

    output.push_str(rest);
    output
}

fn lookup_variable<F>(name: &str, lookup: &F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    let starts_validly = name
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');

    if !starts_validly {
        return None;
    }

    lookup(name)
}

/// Canonicalize the deepest existing ancestor of `path` and lexically append the rest.
fn canonicalize_lenient(path: &Path) -> PathBuf {
    if let Ok(canonical) = fs::canonicalize(path) {
        return canonical;
    }

    for ancestor in path.ancestors().skip(1) {
        let Ok(base) = fs::canonicalize(ancestor) else {
            continue;
        };
        let Ok(remainder) = path.strip_prefix(ancestor) else {
            continue;
        };

        return push_lexically(base, remainder);
    }

    push_lexically(PathBuf::new(), path)
}

fn push_lexically(mut base: PathBuf, remainder: &Path) -> PathBuf {
    for component in remainder.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                base.pop();
            }
            other => base.push(other),
        }
    }

    base
}
