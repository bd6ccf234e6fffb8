//! Portfolio project entity.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Reasons a project record is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProjectError {
    #[error("Title is required")]
    TitleRequired,

    #[error("At least one technology is required")]
    TechRequired,

    #[error("Category is required")]
    CategoryRequired,
}

/// The closed set of categories projects are grouped under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectCategory {
    FacturacionCompliance,
    GestionServicios,
    ArquitecturaAvanzada,
    ErpTransformacion,
    Herramientas,
    Educacion,
}

impl ProjectCategory {
    pub const ALL: [ProjectCategory; 6] = [
        ProjectCategory::FacturacionCompliance,
        ProjectCategory::GestionServicios,
        ProjectCategory::ArquitecturaAvanzada,
        ProjectCategory::ErpTransformacion,
        ProjectCategory::Herramientas,
        ProjectCategory::Educacion,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            ProjectCategory::FacturacionCompliance => "facturacion-compliance",
            ProjectCategory::GestionServicios => "gestion-servicios",
            ProjectCategory::ArquitecturaAvanzada => "arquitectura-avanzada",
            ProjectCategory::ErpTransformacion => "erp-transformacion",
            ProjectCategory::Herramientas => "herramientas",
            ProjectCategory::Educacion => "educacion",
        }
    }
}

impl fmt::Display for ProjectCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demo: Option<String>,
}

/// Unvalidated project fields, as written in content files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectData {
    pub id: String,
    pub title: String,
    pub description: String,
    pub tech: Vec<String>,
    #[serde(default)]
    pub links: ProjectLinks,
    #[serde(default)]
    pub category_id: Option<ProjectCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail_slug: Option<String>,
}

/// A validated portfolio project: non-blank title, at least one technology
/// and a category. The detail page slug falls back to the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "ProjectData")]
pub struct Project {
    id: String,
    title: String,
    description: String,
    tech: Vec<String>,
    links: ProjectLinks,
    category: ProjectCategory,
    detail_slug: String,
}

impl Project {
    pub fn new(data: ProjectData) -> Result<Self, ProjectError> {
        if data.title.trim().is_empty() {
            return Err(ProjectError::TitleRequired);
        }
        if data.tech.is_empty() {
            return Err(ProjectError::TechRequired);
        }
        let category = data.category_id.ok_or(ProjectError::CategoryRequired)?;

        let detail_slug = match data.detail_slug {
            Some(slug) if !slug.trim().is_empty() => slug,
            _ => data.id.clone(),
        };

        Ok(Self {
            id: data.id,
            title: data.title,
            description: data.description,
            tech: data.tech,
            links: data.links,
            category,
            detail_slug,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn tech(&self) -> &[String] {
        &self.tech
    }

    pub fn links(&self) -> &ProjectLinks {
        &self.links
    }

    pub fn category(&self) -> ProjectCategory {
        self.category
    }

    /// Slug of the project's detail page; the id unless one was given.
    pub fn detail_slug(&self) -> &str {
        &self.detail_slug
    }

    /// Case-insensitive check for a technology.
    pub fn has_tech(&self, technology: &str) -> bool {
        let wanted = technology.to_lowercase();
        self.tech.iter().any(|t| t.to_lowercase() == wanted)
    }
}

impl TryFrom<ProjectData> for Project {
    type Error = ProjectError;

    fn try_from(data: ProjectData) -> Result<Self, Self::Error> {
        Project::new(data)
    }
}

impl From<Project> for ProjectData {
    fn from(project: Project) -> Self {
        ProjectData {
            id: project.id,
            title: project.title,
            description: project.description,
            tech: project.tech,
            links: project.links,
            category_id: Some(project.category),
            detail_slug: Some(project.detail_slug),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(title: &str, tech: &[&str]) -> ProjectData {
        ProjectData {
            id: "1".to_string(),
            title: title.to_string(),
            description: "A personal portfolio website".to_string(),
            tech: tech.iter().map(|t| t.to_string()).collect(),
            links: ProjectLinks {
                github: Some("https://github.com/user/portfolio".to_string()),
                demo: None,
            },
            category_id: Some(ProjectCategory::Herramientas),
            detail_slug: None,
        }
    }

    // ==================== Validation Tests ====================

    #[test]
    fn test_valid_project() {
        let project = Project::new(data("My Portfolio", &["Rust", "axum"])).unwrap();

        assert_eq!(project.id(), "1");
        assert_eq!(project.title(), "My Portfolio");
        assert_eq!(project.description(), "A personal portfolio website");
        assert_eq!(project.tech(), &["Rust".to_string(), "axum".to_string()]);
        assert_eq!(project.category(), ProjectCategory::Herramientas);
        assert_eq!(
            project.links().github.as_deref(),
            Some("https://github.com/user/portfolio")
        );
    }

    #[test]
    fn test_blank_title_rejected() {
        assert_eq!(
            Project::new(data("   ", &["Rust"])).unwrap_err(),
            ProjectError::TitleRequired
        );
    }

    #[test]
    fn test_no_tech_rejected() {
        assert_eq!(
            Project::new(data("My Portfolio", &[])).unwrap_err(),
            ProjectError::TechRequired
        );
    }

    #[test]
    fn test_missing_category_rejected() {
        let mut data = data("My Portfolio", &["Rust"]);
        data.category_id = None;

        let err = Project::new(data).unwrap_err();
        assert_eq!(err, ProjectError::CategoryRequired);
        assert_eq!(err.to_string(), "Category is required");
    }

    #[test]
    fn test_title_checked_before_category() {
        let mut data = data("", &["Rust"]);
        data.category_id = None;

        assert_eq!(Project::new(data).unwrap_err(), ProjectError::TitleRequired);
    }

    // ==================== Detail Slug Tests ====================

    #[test]
    fn test_detail_slug_defaults_to_id() {
        let project = Project::new(data("My Portfolio", &["Rust"])).unwrap();
        assert_eq!(project.detail_slug(), "1");
    }

    #[test]
    fn test_detail_slug_explicit() {
        let mut data = data("My Portfolio", &["Rust"]);
        data.detail_slug = Some("portfolio-site".to_string());

        let project = Project::new(data).unwrap();
        assert_eq!(project.detail_slug(), "portfolio-site");
        assert_eq!(project.id(), "1");
    }

    #[test]
    fn test_blank_detail_slug_falls_back_to_id() {
        let mut data = data("My Portfolio", &["Rust"]);
        data.detail_slug = Some("  ".to_string());

        assert_eq!(Project::new(data).unwrap().detail_slug(), "1");
    }

    // ==================== Category Tests ====================

    #[test]
    fn test_category_ids_are_kebab_case() {
        for category in ProjectCategory::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.id()));
        }
        assert_eq!(
            ProjectCategory::FacturacionCompliance.to_string(),
            "facturacion-compliance"
        );
    }

    #[test]
    fn test_unknown_category_fails_to_parse() {
        let json = r#"{"id":"3","title":"X","description":"","tech":["Rust"],"categoryId":"gaming"}"#;
        assert!(serde_json::from_str::<ProjectData>(json).is_err());
    }

    // ==================== Behavior Tests ====================

    #[test]
    fn test_has_tech_is_case_insensitive() {
        let project = Project::new(data("My Portfolio", &["TypeScript", "Next.js"])).unwrap();

        assert!(project.has_tech("typescript"));
        assert!(project.has_tech("NEXT.JS"));
        assert!(!project.has_tech("Rust"));
    }

    // ==================== Serialization Tests ====================

    #[test]
    fn test_serializes_resolved_fields() {
        let project = Project::new(data("My Portfolio", &["Rust"])).unwrap();
        let json = serde_json::to_value(&project).unwrap();

        assert_eq!(json["title"], "My Portfolio");
        assert_eq!(json["links"]["github"], "https://github.com/user/portfolio");
        assert!(json["links"].get("demo").is_none());
        assert_eq!(json["categoryId"], "herramientas");
        assert_eq!(json["detailSlug"], "1");
    }

    #[test]
    fn test_try_from_json() {
        let json = r#"{
            "id": "2",
            "title": "CLI",
            "description": "",
            "tech": ["Rust"],
            "categoryId": "erp-transformacion",
            "detailSlug": "erp-cli"
        }"#;
        let data: ProjectData = serde_json::from_str(json).unwrap();
        let project = Project::try_from(data).unwrap();

        assert_eq!(project.links(), &ProjectLinks::default());
        assert_eq!(project.category(), ProjectCategory::ErpTransformacion);
        assert_eq!(project.detail_slug(), "erp-cli");
    }

    #[test]
    fn test_json_without_category_rejected() {
        let json = r#"{"id":"2","title":"CLI","description":"","tech":["Rust"]}"#;
        let data: ProjectData = serde_json::from_str(json).unwrap();

        assert_eq!(
            Project::try_from(data).unwrap_err(),
            ProjectError::CategoryRequired
        );
    }
}
