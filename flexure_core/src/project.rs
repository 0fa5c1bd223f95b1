//! # Project Data Structures
//!
//! The `Project` struct is the root container for saved beam cases.
//! Projects serialize to `.flx` files as human-readable JSON.
//!
//! ## Structure
//!
//! ```text
//! Project
//! ├── meta: ProjectMetadata (version, engineer, job info, timestamps)
//! ├── settings: ProjectSettings (analysis settings, default material)
//! ├── materials: MaterialTable (user materials layered over the built-ins)
//! └── cases: HashMap<Uuid, BeamCase> (beam, supports, loads, section, material)
//! ```
//!
//! Cases hold user input, not results. Section shapes and material names
//! are resolved only when a case is analyzed, so the engine itself never
//! sees a name it has to look up.
//!
//! ## Example
//!
//! ```rust
//! use flexure_core::project::Project;
//!
//! let project = Project::new("Jane Engineer", "25-042", "ACME Corp");
//!
//! // Serialize to JSON (see file_io module for atomic saves)
//! let json = serde_json::to_string_pretty(&project).unwrap();
//! assert!(json.contains("25-042"));
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculations::{AnalysisInput, AnalysisResult, AnalysisSettings, Beam, SupportConfig};
use crate::errors::CalcResult;
use crate::loads::LoadSet;
use crate::materials::{Material, MaterialLibrary, MaterialTable};
use crate::sections::{SectionInput, SectionLibrary};

/// Current schema version for .flx files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Root project container.
///
/// This is the top-level struct that gets serialized to `.flx` files.
/// Cases are stored in a flat UUID-keyed map for O(1) lookups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Project metadata (version, engineer, job info)
    pub meta: ProjectMetadata,

    /// Project-wide settings
    #[serde(default)]
    pub settings: ProjectSettings,

    /// User-defined materials
    #[serde(default)]
    pub materials: MaterialTable,

    /// All beam cases, keyed by UUID
    pub cases: HashMap<Uuid, BeamCase>,
}

impl Project {
    /// Create a new empty project.
    ///
    /// # Arguments
    ///
    /// * `engineer` - Name of the responsible engineer
    /// * `job_id` - Job/project number (e.g., "25-001")
    /// * `client` - Client name
    ///
    /// # Example
    ///
    /// ```rust
    /// use flexure_core::project::Project;
    ///
    /// let project = Project::new("John Doe", "25-001", "Client Corp");
    /// assert_eq!(project.meta.engineer, "John Doe");
    /// ```
    pub fn new(engineer: impl Into<String>, job_id: impl Into<String>, client: impl Into<String>) -> Self {
        let now = Utc::now();
        Project {
            meta: ProjectMetadata {
                version: SCHEMA_VERSION.to_string(),
                engineer: engineer.into(),
                job_id: job_id.into(),
                client: client.into(),
                created: now,
                modified: now,
            },
            settings: ProjectSettings::default(),
            materials: MaterialTable::new(),
            cases: HashMap::new(),
        }
    }

    /// Add a beam case to the project.
    ///
    /// Returns the UUID assigned to the case.
    pub fn add_case(&mut self, case: BeamCase) -> Uuid {
        let id = Uuid::new_v4();
        self.cases.insert(id, case);
        self.touch();
        id
    }

    /// Remove a beam case by UUID.
    ///
    /// Returns the removed case if it existed.
    pub fn remove_case(&mut self, id: &Uuid) -> Option<BeamCase> {
        let case = self.cases.remove(id);
        if case.is_some() {
            self.touch();
        }
        case
    }

    /// Get a beam case by UUID.
    pub fn get_case(&self, id: &Uuid) -> Option<&BeamCase> {
        self.cases.get(id)
    }

    /// Get a mutable reference to a beam case by UUID.
    ///
    /// Marks the project as modified when the case exists.
    pub fn get_case_mut(&mut self, id: &Uuid) -> Option<&mut BeamCase> {
        if self.cases.contains_key(id) {
            self.meta.modified = Utc::now();
            self.cases.get_mut(id)
        } else {
            None
        }
    }

    /// First case whose label matches (case-insensitive)
    pub fn find_case(&self, label: &str) -> Option<(&Uuid, &BeamCase)> {
        self.cases
            .iter()
            .find(|(_, case)| case.label.eq_ignore_ascii_case(label))
    }

    /// Cases sorted by label, for stable listings
    pub fn sorted_cases(&self) -> Vec<(&Uuid, &BeamCase)> {
        let mut cases: Vec<_> = self.cases.iter().collect();
        cases.sort_by(|a, b| a.1.label.cmp(&b.1.label).then_with(|| a.0.cmp(b.0)));
        cases
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    pub fn case_count(&self) -> usize {
        self.cases.len()
    }

    /// Analyze one case with the project's materials and settings
    pub fn analyze_case(&self, case: &BeamCase, sections: &dyn SectionLibrary) -> CalcResult<AnalysisResult> {
        case.analyze(&self.materials, sections, &self.settings.analysis)
    }
}

impl Default for Project {
    fn default() -> Self {
        Project::new("", "", "")
    }
}

/// Project metadata stored in the file header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// Name of the responsible engineer
    pub engineer: String,

    /// Job/project number
    pub job_id: String,

    /// Client name
    pub client: String,

    /// When the project was created
    pub created: DateTime<Utc>,

    /// When the project was last modified
    pub modified: DateTime<Utc>,
}

/// Project-wide settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSettings {
    /// Failure criterion, margins and sampling
    #[serde(default)]
    pub analysis: AnalysisSettings,

    /// Material name preselected for new cases
    #[serde(default = "default_material_name")]
    pub default_material: String,
}

fn default_material_name() -> String {
    "Carbon Steel A36".to_string()
}

impl Default for ProjectSettings {
    fn default() -> Self {
        ProjectSettings {
            analysis: AnalysisSettings::default(),
            default_material: default_material_name(),
        }
    }
}

/// A material by library name or given in full
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MaterialRef {
    /// Looked up in the material library at analysis time
    Named(String),
    /// Stored with the case
    Custom(Material),
}

impl MaterialRef {
    pub fn resolve(&self, library: &dyn MaterialLibrary) -> CalcResult<Material> {
        match self {
            MaterialRef::Named(name) => library.lookup_material(name),
            MaterialRef::Custom(material) => {
                material.validate()?;
                Ok(material.clone())
            }
        }
    }

    pub fn name(&self) -> &str {
        match self {
            MaterialRef::Named(name) => name,
            MaterialRef::Custom(material) => &material.name,
        }
    }
}

/// One beam as the user entered it.
///
/// ## JSON Example
///
/// ```json
/// {
///   "label": "Cantilever",
///   "beam": { "length": 4.0 },
///   "supports": [ { "position": 0.0, "kind": "Fixed" }, { "position": 4.0, "kind": "Free" } ],
///   "loads": [ { "type": "PointForce", "position": 4.0, "magnitude": 100.0 } ],
///   "section": { "type": "Shape", "shape": "rectangle", "dimensions": [0.05, 0.1] },
///   "material": "Carbon Steel A36"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeamCase {
    /// User label (e.g., "B-1", "Garage header")
    pub label: String,
    pub beam: Beam,
    pub supports: SupportConfig,
    #[serde(default)]
    pub loads: LoadSet,
    pub section: SectionInput,
    pub material: MaterialRef,
}

impl BeamCase {
    /// Resolve section and material into an engine input
    pub fn resolve(&self, materials: &dyn MaterialLibrary, sections: &dyn SectionLibrary) -> CalcResult<AnalysisInput> {
        Ok(AnalysisInput {
            beam: self.beam,
            supports: self.supports.clone(),
            loads: self.loads.clone(),
            section: self.section.resolve(sections)?,
            material: self.material.resolve(materials)?,
        })
    }

    pub fn analyze(
        &self,
        materials: &dyn MaterialLibrary,
        sections: &dyn SectionLibrary,
        settings: &AnalysisSettings,
    ) -> CalcResult<AnalysisResult> {
        self.resolve(materials, sections)?.analyze(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loads::Load;
    use crate::materials::BuiltinMaterials;
    use crate::sections::StandardSections;
    use approx::assert_relative_eq;

    fn cantilever_case() -> BeamCase {
        BeamCase {
            label: "C-1".to_string(),
            beam: Beam::new(4.0).unwrap(),
            supports: SupportConfig::cantilever(4.0),
            loads: LoadSet::new().with_load(Load::point(100.0, 4.0)),
            section: SectionInput::Shape {
                shape: "rectangle".to_string(),
                dimensions: vec![0.05, 0.1],
            },
            material: MaterialRef::Named("Carbon Steel A36".to_string()),
        }
    }

    #[test]
    fn test_project_creation() {
        let project = Project::new("John Doe", "25-001", "Acme Corp");
        assert_eq!(project.meta.engineer, "John Doe");
        assert_eq!(project.meta.job_id, "25-001");
        assert_eq!(project.meta.client, "Acme Corp");
        assert_eq!(project.meta.version, SCHEMA_VERSION);
    }

    #[test]
    fn test_project_serialization() {
        let mut project = Project::new("Jane Engineer", "25-042", "Test Client");
        project.add_case(cantilever_case());
        let json = serde_json::to_string_pretty(&project).unwrap();

        assert!(json.contains("Jane Engineer"));
        assert!(json.contains("\"material\": \"Carbon Steel A36\""));

        let roundtrip: Project = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip.meta.engineer, "Jane Engineer");
        assert_eq!(roundtrip.find_case("c-1").unwrap().1, &cantilever_case());
    }

    #[test]
    fn test_add_remove_case() {
        let mut project = Project::new("Engineer", "25-001", "Client");
        let id = project.add_case(cantilever_case());
        assert_eq!(project.case_count(), 1);
        assert!(project.get_case(&id).is_some());

        project.get_case_mut(&id).unwrap().label = "C-2".to_string();
        assert!(project.find_case("C-2").is_some());

        assert!(project.remove_case(&id).is_some());
        assert_eq!(project.case_count(), 0);
        assert!(project.remove_case(&id).is_none());
    }

    #[test]
    fn test_case_resolves_and_analyzes() {
        let result = cantilever_case()
            .analyze(&BuiltinMaterials, &StandardSections, &AnalysisSettings::default())
            .unwrap();
        assert_relative_eq!(result.max_moment.value, -400.0, epsilon = 1e-9);
        assert_relative_eq!(result.reactions.at_support(0).unwrap().moment, 400.0, epsilon = 1e-9);
    }

    #[test]
    fn test_material_ref_forms() {
        let named: MaterialRef = serde_json::from_str("\"Aluminum 6061-T6\"").unwrap();
        assert_eq!(named.name(), "Aluminum 6061-T6");

        let custom: MaterialRef =
            serde_json::from_str(r#"{"name": "Oak", "elastic_modulus": 1.1e10, "yield_strength": 5.0e7}"#).unwrap();
        assert!(matches!(custom, MaterialRef::Custom(_)));
        assert_relative_eq!(custom.resolve(&BuiltinMaterials).unwrap().elastic_modulus, 1.1e10);

        let missing = MaterialRef::Named("Unobtainium".to_string());
        assert_eq!(missing.resolve(&BuiltinMaterials).unwrap_err().error_code(), "MATERIAL_NOT_FOUND");
    }

    #[test]
    fn test_project_materials_take_part() {
        let mut project = Project::default();
        project
            .materials
            .insert(Material::new("Shop Steel", 2.1e11).with_yield(3.0e8))
            .unwrap();
        let mut case = cantilever_case();
        case.material = MaterialRef::Named("shop steel".to_string());
        let result = project.analyze_case(&case, &StandardSections).unwrap();
        assert_relative_eq!(result.stress.yield_strength, 3.0e8);
    }
}
