//! Registry of everything a bake writes out.
//!
//! A [`FileDefinition`] collects named data definitions, macros and header
//! includes for one output file and hands out unique symbol names. It also
//! owns the per-bake state shared by the generators: the bone hierarchy and
//! the cache of extended meshes.

use std::{
    collections::{BTreeSet, HashMap, HashSet},
    fmt,
    rc::Rc,
};

use anyhow::Context;

use crate::{
    data_structures::{bones::BoneHierarchy, mesh::ExtendedMesh, scene::Scene},
    util,
};

/// Initializer data of a definition.
#[derive(Clone, Debug, PartialEq)]
pub enum DataChunk {
    Primitive(String),
    Structure(Vec<DataChunk>),
    Array(Vec<DataChunk>),
    Bytes(Vec<u8>),
}

impl DataChunk {
    pub fn primitive(value: impl ToString) -> Self {
        DataChunk::Primitive(value.to_string())
    }
}

impl fmt::Display for DataChunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataChunk::Primitive(value) => write!(f, "{}", value),
            DataChunk::Structure(children) | DataChunk::Array(children) => {
                write!(f, "{{")?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", child)?;
                }
                write!(f, "}}")
            }
            DataChunk::Bytes(bytes) => {
                write!(f, "{{")?;
                for (i, byte) in bytes.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "0x{:02x}", byte)?;
                }
                write!(f, "}}")
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DataDefinition {
    pub name: String,
    pub type_name: String,
    pub is_const: bool,
    pub data: DataChunk,
}

#[derive(Debug, Default)]
pub struct FileDefinition {
    prefix: String,
    definitions: Vec<DataDefinition>,
    headers: BTreeSet<String>,
    macros: Vec<(String, String)>,
    used_names: HashSet<String>,
    extended_meshes: HashMap<usize, Rc<ExtendedMesh>>,
    bone_hierarchy: BoneHierarchy,
}

impl FileDefinition {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: util::symbol_case(prefix),
            ..Default::default()
        }
    }

    /// `<prefix>_<name><suffix>`, numbered if already taken.
    pub fn unique_name(&mut self, name: &str, suffix: &str) -> String {
        let base = format!("{}_{}{}", self.prefix, util::symbol_case(name), suffix);
        let mut candidate = base.clone();
        let mut index = 1;
        while self.used_names.contains(&candidate) {
            candidate = format!("{}_{}", base, index);
            index += 1;
        }
        self.used_names.insert(candidate.clone());
        candidate
    }

    /// Registers a definition and returns its final symbol name.
    pub fn add_data_definition(
        &mut self,
        name: &str,
        type_name: &str,
        is_const: bool,
        suffix: &str,
        data: DataChunk,
    ) -> String {
        let name = self.unique_name(name, suffix);
        self.definitions.push(DataDefinition {
            name: name.clone(),
            type_name: type_name.to_string(),
            is_const,
            data,
        });
        name
    }

    /// Defines `<PREFIX>_<NAME>` and returns the macro name.
    pub fn add_macro(&mut self, name: &str, value: impl ToString) -> String {
        let name = util::macro_case(&format!("{}_{}", self.prefix, name));
        self.macros.retain(|(existing, _)| existing != &name);
        self.macros.push((name.clone(), value.to_string()));
        name
    }

    pub fn add_header(&mut self, header: &str) {
        self.headers.insert(header.to_string());
    }

    pub fn definitions(&self) -> &[DataDefinition] {
        &self.definitions
    }

    pub fn find_definition(&self, name: &str) -> Option<&DataDefinition> {
        self.definitions.iter().find(|d| d.name == name)
    }

    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.headers.iter().map(String::as_str)
    }

    pub fn macros(&self) -> &[(String, String)] {
        &self.macros
    }

    pub fn macro_value(&self, name: &str) -> Option<&str> {
        self.macros
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn bone_hierarchy(&self) -> &BoneHierarchy {
        &self.bone_hierarchy
    }

    /// Mutable access drops cached meshes, their skin partition depends on it.
    pub fn bone_hierarchy_mut(&mut self) -> &mut BoneHierarchy {
        self.extended_meshes.clear();
        &mut self.bone_hierarchy
    }

    /// Untransformed working copy of a scene mesh, built on first use.
    pub fn get_extended_mesh(&mut self, scene: &Scene, mesh_index: usize) -> anyhow::Result<Rc<ExtendedMesh>> {
        if let Some(mesh) = self.extended_meshes.get(&mesh_index) {
            return Ok(mesh.clone());
        }
        let source = scene
            .meshes
            .get(mesh_index)
            .with_context(|| format!("scene has no mesh with index {}", mesh_index))?;
        let mesh = Rc::new(ExtendedMesh::new(mesh_index, source, &self.bone_hierarchy));
        self.extended_meshes.insert(mesh_index, mesh.clone());
        Ok(mesh)
    }

    /// Renders the registry as C source.
    pub fn to_source(&self) -> String {
        let mut out = String::new();
        for header in &self.headers {
            out.push_str(&format!("#include {}\n", header));
        }
        if !self.headers.is_empty() {
            out.push('\n');
        }
        for (name, value) in &self.macros {
            out.push_str(&format!("#define {} {}\n", name, value));
        }
        if !self.macros.is_empty() {
            out.push('\n');
        }
        for definition in &self.definitions {
            let qualifier = if definition.is_const { "const " } else { "" };
            let array = match definition.data {
                DataChunk::Array(_) | DataChunk::Bytes(_) => "[]",
                _ => "",
            };
            out.push_str(&format!(
                "{}{} {}{} = {};\n\n",
                qualifier, definition.type_name, definition.name, array, definition.data
            ));
        }
        out
    }
}
