//! The process-wide block registry.
//!
//! Applications expose their blocks under stable attribute names through a
//! [`BlockRegistry`]. The registry is populated once at start-up by
//! [`install`](BlockRegistry::install)ing each application unit's
//! [`BlockPlugin`], and may be amended incrementally afterwards with
//! explicit [`register`](BlockRegistry::register) /
//! [`unregister`](BlockRegistry::unregister) calls.
//!
//! Installation is transactional per plugin: the registry state is
//! snapshotted before a plugin's blocks are applied, and any failure rolls
//! the registry back to the snapshot before the error propagates. A retried
//! installation therefore never trips over a plugin's own half-applied
//! registrations, while earlier plugins' entries stay intact.

use std::rc::Rc;

use log::debug;
use thiserror::Error;

use crate::blocks::Block;

/// Error a [`BlockPlugin`] reports when it cannot produce its blocks.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct PluginError(String);

impl PluginError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Error type for registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A block is already registered under this name. Unregister it first
    /// to register another block under the same name.
    #[error("a block is already registered as \"{name}\"")]
    AlreadyRegistered { name: String },

    /// No block is registered under this name.
    #[error("no block is registered as \"{name}\"")]
    NotRegistered { name: String },

    /// The registration name is not a valid attribute identifier.
    #[error("\"{name}\" is not a valid block attribute name")]
    InvalidBlock { name: String },

    /// A plugin failed while producing its blocks.
    #[error("plugin \"{plugin}\" failed to register its blocks: {source}")]
    Plugin {
        plugin: String,
        #[source]
        source: PluginError,
    },
}

/// One installable unit of block registrations.
///
/// A unit with nothing to contribute returns an empty list; that is not an
/// error.
pub trait BlockPlugin {
    /// The unit's name, used in diagnostics.
    fn name(&self) -> &str;

    /// The `(attribute name, block)` pairs this unit registers.
    ///
    /// # Errors
    ///
    /// Any failure aborts the unit's installation as a whole.
    fn registered_blocks(&self) -> Result<Vec<(String, Rc<dyn Block>)>, PluginError>;
}

/// An insertion-ordered `attribute name → block` registry.
#[derive(Default, Clone)]
pub struct BlockRegistry {
    entries: Vec<(String, Rc<dyn Block>)>,
}

impl BlockRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `block` under `name`, preserving insertion order.
    ///
    /// # Errors
    ///
    /// [`RegistryError::AlreadyRegistered`] if `name` is taken,
    /// [`RegistryError::InvalidBlock`] if `name` is not a valid attribute
    /// identifier.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        block: Rc<dyn Block>,
    ) -> Result<(), RegistryError> {
        let name = name.into();
        if !is_valid_attr_name(&name) {
            return Err(RegistryError::InvalidBlock { name });
        }
        if self.contains(&name) {
            return Err(RegistryError::AlreadyRegistered { name });
        }
        self.entries.push((name, block));
        Ok(())
    }

    /// Removes and returns the block registered under `name`.
    ///
    /// # Errors
    ///
    /// [`RegistryError::NotRegistered`] if `name` is absent.
    pub fn unregister(&mut self, name: &str) -> Result<Rc<dyn Block>, RegistryError> {
        match self.entries.iter().position(|(entry, _)| entry == name) {
            Some(index) => Ok(self.entries.remove(index).1),
            None => Err(RegistryError::NotRegistered {
                name: name.to_string(),
            }),
        }
    }

    /// Installs each plugin's blocks, transactionally per plugin.
    ///
    /// # Errors
    ///
    /// The first failing plugin's error, after rolling the registry back to
    /// its state before that plugin. Earlier plugins' registrations remain.
    pub fn install(&mut self, plugins: &[&dyn BlockPlugin]) -> Result<(), RegistryError> {
        for plugin in plugins {
            let snapshot = self.entries.clone();
            if let Err(err) = self.install_one(*plugin) {
                self.entries = snapshot;
                return Err(err);
            }
            debug!(
                "installed plugin \"{}\" ({} blocks registered)",
                plugin.name(),
                self.entries.len()
            );
        }
        Ok(())
    }

    fn install_one(&mut self, plugin: &dyn BlockPlugin) -> Result<(), RegistryError> {
        let pairs = plugin
            .registered_blocks()
            .map_err(|source| RegistryError::Plugin {
                plugin: plugin.name().to_string(),
                source,
            })?;
        for (name, block) in pairs {
            self.register(name, block)?;
        }
        Ok(())
    }

    /// The block registered under `name`, if any.
    pub fn get(&self, name: &str) -> Option<Rc<dyn Block>> {
        self.entries
            .iter()
            .find(|(entry, _)| entry == name)
            .map(|(_, block)| Rc::clone(block))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(entry, _)| entry == name)
    }

    /// Registered names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Rc<dyn Block>)> {
        self.entries
            .iter()
            .map(|(name, block)| (name.as_str(), block))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for BlockRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockRegistry")
            .field("names", &self.names().collect::<Vec<_>>())
            .finish()
    }
}

fn is_valid_attr_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}
