//! Non-fatal findings reported while baking.

use std::{cell::RefCell, fmt, rc::Rc};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Diagnostic {
    MaterialNotFound { name: String },
    /// Auto-tiled material whose tile size reads as zero; its generated
    /// texture coordinates are not finite.
    ZeroTileSize { material: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::MaterialNotFound { name } => write!(f, "Could not find material with name {}", name),
            Diagnostic::ZeroTileSize { material } => {
                write!(f, "Material {} has a tile size of zero, its UVs will not be finite", material)
            }
        }
    }
}

/// Receives diagnostics from chunk extraction. Reporting never aborts a bake.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

/// Forwards every diagnostic to `log::warn!`.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        log::warn!("{}", diagnostic);
    }
}

/// Keeps diagnostics in memory. Clones share the same record, so a clone can
/// be handed to the generator and inspected afterwards.
#[derive(Clone, Debug, Default)]
pub struct CollectingSink {
    entries: Rc<RefCell<Vec<Diagnostic>>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<Diagnostic> {
        self.entries.borrow().clone()
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.entries.borrow_mut().push(diagnostic);
    }
}
