//! Template resolution and execution.
//!
//! This module is the narrow seam between guise and its template engine.
//! [`TemplateStore`] resolves a template two ways:
//!
//! 1. By relative path, searched across registered template directories
//!    (first directory wins)
//! 2. By inline source, compiled under a generated name
//!
//! Both produce an [`ExecutableTemplate`], a cheap handle into the store's
//! shared MiniJinja environment. Sharing one environment means renditions can
//! `{% include %}` each other's partials by path.
//!
//! # Extension Resolution
//!
//! A path without an extension is tried against the recognized extension list
//! ([`TEMPLATE_EXTENSIONS`]) in priority order, so `"blocks/card"` resolves
//! `blocks/card.html` before `blocks/card.jinja`.
//!
//! # Thread Safety
//!
//! The store is request-scoped and single-threaded; handles share the
//! environment through `Rc`.

use std::cell::{Cell, RefCell};
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use log::debug;
use minijinja::Environment;
use serde::Serialize;
use thiserror::Error;

/// Recognized template file extensions in priority order.
///
/// When a lookup path carries no extension, candidates are tried in this
/// order and the first existing file wins.
pub const TEMPLATE_EXTENSIONS: &[&str] = &[".html", ".jinja", ".j2", ".txt"];

/// Error type for template store operations.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// No registered directory contains the requested template.
    #[error("template not found: \"{name}\"")]
    NotFound { name: String },

    /// The template source failed to compile.
    #[error("template \"{name}\" failed to compile: {message}")]
    Syntax { name: String, message: String },

    /// Template execution failed (undefined operation, bad serialization, ...).
    #[error("template \"{name}\" failed to render: {message}")]
    Render { name: String, message: String },

    /// Reading a template file from disk failed.
    #[error("failed to read template \"{path}\": {message}")]
    Io { path: PathBuf, message: String },

    /// A registered template directory does not exist.
    #[error("template directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },
}

fn classify(name: &str, err: minijinja::Error) -> TemplateError {
    use minijinja::ErrorKind;

    match err.kind() {
        ErrorKind::TemplateNotFound => TemplateError::NotFound {
            name: name.to_string(),
        },
        ErrorKind::SyntaxError | ErrorKind::BadEscape => TemplateError::Syntax {
            name: name.to_string(),
            message: err.to_string(),
        },
        _ => TemplateError::Render {
            name: name.to_string(),
            message: err.to_string(),
        },
    }
}

/// A compiled template ready for execution.
///
/// Handles are cheap to clone and remain valid for the lifetime of the
/// process; the underlying source is compiled once, at resolution time.
#[derive(Clone)]
pub struct ExecutableTemplate {
    env: Rc<RefCell<Environment<'static>>>,
    name: String,
}

impl ExecutableTemplate {
    /// The name the template is registered under: its lookup path for
    /// file-based templates, a generated `inline/<n>` name otherwise.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Executes the template against a serializable context.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::Render`] if execution fails.
    pub fn render<S: Serialize>(&self, context: &S) -> Result<String, TemplateError> {
        let env = self.env.borrow();
        let template = env
            .get_template(&self.name)
            .map_err(|e| classify(&self.name, e))?;
        template
            .render(minijinja::Value::from_serialize(context))
            .map_err(|e| classify(&self.name, e))
    }
}

impl std::fmt::Debug for ExecutableTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutableTemplate")
            .field("name", &self.name)
            .finish()
    }
}

/// Resolves and compiles templates from directories or inline source.
///
/// # Example
///
/// ```rust
/// use guise::TemplateStore;
///
/// let store = TemplateStore::new();
/// let template = store.compile("Hello, {{ name }}!").unwrap();
/// let output = template.render(&serde_json::json!({"name": "World"})).unwrap();
/// assert_eq!(output, "Hello, World!");
/// ```
pub struct TemplateStore {
    env: Rc<RefCell<Environment<'static>>>,
    dirs: Vec<PathBuf>,
    inline_counter: Cell<usize>,
}

impl Default for TemplateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateStore {
    /// Creates a store with no template directories.
    pub fn new() -> Self {
        Self {
            env: Rc::new(RefCell::new(Environment::new())),
            dirs: Vec::new(),
            inline_counter: Cell::new(0),
        }
    }

    /// Adds a directory to search during [`lookup`](Self::lookup).
    ///
    /// Directories are searched in registration order; the first one
    /// containing the requested path wins.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::DirectoryNotFound`] if the path is not an
    /// existing directory.
    pub fn add_template_dir<P: AsRef<Path>>(&mut self, path: P) -> Result<(), TemplateError> {
        let path = path.as_ref();
        if !path.is_dir() {
            return Err(TemplateError::DirectoryNotFound {
                path: path.to_path_buf(),
            });
        }
        self.dirs.push(path.to_path_buf());
        Ok(())
    }

    /// Resolves a template by relative path and compiles it.
    ///
    /// The path is looked up against each registered directory in order. A
    /// path without an extension additionally tries [`TEMPLATE_EXTENSIONS`]
    /// in priority order.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::NotFound`] if no directory contains the path,
    /// [`TemplateError::Syntax`] if the source fails to compile.
    pub fn lookup(&self, path: &str) -> Result<ExecutableTemplate, TemplateError> {
        for dir in &self.dirs {
            for candidate in candidates(dir, path) {
                if !candidate.is_file() {
                    continue;
                }
                let source =
                    fs::read_to_string(&candidate).map_err(|e| TemplateError::Io {
                        path: candidate.clone(),
                        message: e.to_string(),
                    })?;
                self.env
                    .borrow_mut()
                    .add_template_owned(path.to_string(), source)
                    .map_err(|e| classify(path, e))?;
                debug!("resolved template \"{}\" from {}", path, candidate.display());
                return Ok(ExecutableTemplate {
                    env: Rc::clone(&self.env),
                    name: path.to_string(),
                });
            }
        }
        Err(TemplateError::NotFound {
            name: path.to_string(),
        })
    }

    /// Compiles inline template source under a generated name.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::Syntax`] if the source fails to compile.
    pub fn compile(&self, source: &str) -> Result<ExecutableTemplate, TemplateError> {
        let n = self.inline_counter.get();
        self.inline_counter.set(n + 1);
        let name = format!("inline/{n}");
        self.env
            .borrow_mut()
            .add_template_owned(name.clone(), source.to_string())
            .map_err(|e| classify(&name, e))?;
        Ok(ExecutableTemplate {
            env: Rc::clone(&self.env),
            name,
        })
    }
}

fn candidates(dir: &Path, path: &str) -> Vec<PathBuf> {
    if Path::new(path).extension().is_some() {
        vec![dir.join(path)]
    } else {
        TEMPLATE_EXTENSIONS
            .iter()
            .map(|ext| dir.join(format!("{path}{ext}")))
            .collect()
    }
}

impl std::fmt::Debug for TemplateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateStore")
            .field("dirs", &self.dirs)
            .field("inline_templates", &self.inline_counter.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_template(dir: &Path, relative: &str, content: &str) {
        let full = dir.join(relative);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        let mut file = fs::File::create(full).unwrap();
        file.write_all(content.as_bytes()).unwrap();
    }

    #[test]
    fn test_compile_and_render() {
        let store = TemplateStore::new();
        let template = store.compile("Hi {{ name }}").unwrap();
        let output = template.render(&serde_json::json!({"name": "there"})).unwrap();
        assert_eq!(output, "Hi there");
    }

    #[test]
    fn test_compile_syntax_error() {
        let store = TemplateStore::new();
        let result = store.compile("{% if %}");
        assert!(matches!(result, Err(TemplateError::Syntax { .. })));
    }

    #[test]
    fn test_inline_names_are_distinct() {
        let store = TemplateStore::new();
        let a = store.compile("a").unwrap();
        let b = store.compile("b").unwrap();
        assert_ne!(a.name(), b.name());
    }

    #[test]
    fn test_lookup_from_dir() {
        let temp = TempDir::new().unwrap();
        write_template(temp.path(), "blocks/card.html", "Card: {{ title }}");

        let mut store = TemplateStore::new();
        store.add_template_dir(temp.path()).unwrap();

        let template = store.lookup("blocks/card.html").unwrap();
        let output = template
            .render(&serde_json::json!({"title": "News"}))
            .unwrap();
        assert_eq!(output, "Card: News");
    }

    #[test]
    fn test_lookup_extensionless() {
        let temp = TempDir::new().unwrap();
        write_template(temp.path(), "card.html", "html wins");
        write_template(temp.path(), "card.txt", "txt loses");

        let mut store = TemplateStore::new();
        store.add_template_dir(temp.path()).unwrap();

        let template = store.lookup("card").unwrap();
        let output = template.render(&serde_json::json!({})).unwrap();
        assert_eq!(output, "html wins");
    }

    #[test]
    fn test_lookup_first_dir_wins() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        write_template(first.path(), "card.html", "first");
        write_template(second.path(), "card.html", "second");

        let mut store = TemplateStore::new();
        store.add_template_dir(first.path()).unwrap();
        store.add_template_dir(second.path()).unwrap();

        let template = store.lookup("card").unwrap();
        assert_eq!(template.render(&serde_json::json!({})).unwrap(), "first");
    }

    #[test]
    fn test_lookup_not_found() {
        let temp = TempDir::new().unwrap();
        let mut store = TemplateStore::new();
        store.add_template_dir(temp.path()).unwrap();

        let result = store.lookup("missing");
        assert!(matches!(result, Err(TemplateError::NotFound { .. })));
    }

    #[test]
    fn test_missing_dir_rejected() {
        let mut store = TemplateStore::new();
        let result = store.add_template_dir("/nonexistent/guise/templates");
        assert!(matches!(
            result,
            Err(TemplateError::DirectoryNotFound { .. })
        ));
    }

    #[test]
    fn test_includes_resolve_across_templates() {
        let store = TemplateStore::new();
        let partial = store.compile("PARTIAL").unwrap();
        let main = store
            .compile(&format!("Start {{% include '{}' %}} End", partial.name()))
            .unwrap();
        let output = main.render(&serde_json::json!({})).unwrap();
        assert_eq!(output, "Start PARTIAL End");
    }
}
