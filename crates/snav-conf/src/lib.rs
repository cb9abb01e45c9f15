//! Block configuration.
//!
//! Settings are layered TOML: an optional user-level file, then
//! `.snav.toml`, then `snav.toml` in the given root, later sources
//! winning. Every option has a default, so an empty root is valid.

use std::path::Path;

use config::Config;
use config::ConfigError as ExternalConfigError;
use config::File;
use config::FileFormat;
use directories::ProjectDirs;
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration build/deserialize error")]
    Config(#[from] ExternalConfigError),
}

/// How course navigation items are presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CourseNavView {
    /// Flat course links under the My courses root.
    Courses,
    /// Full category trees with courses nested inside.
    #[serde(rename = "catandcourses")]
    CatAndCourses,
}

/// Which page the Home root points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HomePage {
    Site,
    Dashboard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrimMode {
    Left,
    Right,
    Center,
}

/// Deepest node kind that is pre-rendered; anything past it is handed
/// to the client for lazy expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpansionLimit {
    Everything,
    Course,
    Section,
    Activity,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub course_nav_view: CourseNavView,
    /// Bounds enrolled-course loading in flat view and doubles as the
    /// "view all" annotation threshold. 0 means unlimited.
    pub nav_course_limit: usize,
    pub show_all_courses: bool,
    pub default_home: HomePage,
    pub trim_mode: TrimMode,
    pub trim_length: usize,
    pub expansion_limit: ExpansionLimit,
    pub link_categories: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            course_nav_view: CourseNavView::Courses,
            nav_course_limit: 20,
            show_all_courses: false,
            default_home: HomePage::Site,
            trim_mode: TrimMode::Left,
            trim_length: 50,
            expansion_limit: ExpansionLimit::Everything,
            link_categories: false,
        }
    }
}

impl Settings {
    pub fn new(root: &Path) -> Result<Self, ConfigError> {
        let user_config_file = ProjectDirs::from("com.github", "ulcc", "snav")
            .map(|proj_dirs| proj_dirs.config_dir().join("snav.toml"));

        Self::load_from_paths(root, user_config_file.as_deref())
    }

    fn load_from_paths(root: &Path, user_config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        if let Some(path) = user_config_path {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(false));
        }

        builder = builder.add_source(
            File::from(root.join(".snav.toml"))
                .format(FileFormat::Toml)
                .required(false),
        );

        builder = builder.add_source(
            File::from(root.join("snav.toml"))
                .format(FileFormat::Toml)
                .required(false),
        );

        let config = builder.build()?;
        let settings = config.try_deserialize()?;
        Ok(settings)
    }

    /// Threshold for abbreviated labels; half the long threshold,
    /// rounded up.
    #[must_use]
    pub fn short_trim_length(&self) -> usize {
        self.trim_length.div_ceil(2)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    mod defaults {
        use super::*;

        #[test]
        fn load_no_files_gives_defaults() {
            let dir = tempdir().unwrap();
            let settings = Settings::new(dir.path()).unwrap();
            assert_eq!(settings, Settings::default());
            assert_eq!(settings.nav_course_limit, 20);
            assert_eq!(settings.trim_mode, TrimMode::Left);
            assert_eq!(settings.short_trim_length(), 25);
        }

        #[test]
        fn short_trim_length_rounds_up() {
            let settings = Settings {
                trim_length: 9,
                ..Settings::default()
            };
            assert_eq!(settings.short_trim_length(), 5);
        }
    }

    mod project_files {
        use super::*;

        #[test]
        fn load_snav_toml() {
            let dir = tempdir().unwrap();
            fs::write(
                dir.path().join("snav.toml"),
                "course_nav_view = \"catandcourses\"\nnav_course_limit = 10\n",
            )
            .unwrap();
            let settings = Settings::new(dir.path()).unwrap();
            assert_eq!(settings.course_nav_view, CourseNavView::CatAndCourses);
            assert_eq!(settings.nav_course_limit, 10);
            assert_eq!(settings.trim_length, 50);
        }

        #[test]
        fn load_dot_snav_toml() {
            let dir = tempdir().unwrap();
            fs::write(dir.path().join(".snav.toml"), "show_all_courses = true").unwrap();
            let settings = Settings::new(dir.path()).unwrap();
            assert!(settings.show_all_courses);
        }

        #[test]
        fn enum_options_parse() {
            let dir = tempdir().unwrap();
            fs::write(
                dir.path().join("snav.toml"),
                "trim_mode = \"center\"\nexpansion_limit = \"course\"\ndefault_home = \"dashboard\"\n",
            )
            .unwrap();
            let settings = Settings::new(dir.path()).unwrap();
            assert_eq!(settings.trim_mode, TrimMode::Center);
            assert_eq!(settings.expansion_limit, ExpansionLimit::Course);
            assert_eq!(settings.default_home, HomePage::Dashboard);
        }
    }

    mod priority {
        use super::*;

        #[test]
        fn snav_toml_overrides_dot_snav_toml() {
            let dir = tempdir().unwrap();
            fs::write(dir.path().join(".snav.toml"), "nav_course_limit = 5").unwrap();
            fs::write(dir.path().join("snav.toml"), "nav_course_limit = 7").unwrap();
            let settings = Settings::new(dir.path()).unwrap();
            assert_eq!(settings.nav_course_limit, 7);
        }

        #[test]
        fn project_overrides_user_file() {
            let user_dir = tempdir().unwrap();
            let project_dir = tempdir().unwrap();
            let user_conf_path = user_dir.path().join("snav.toml");
            fs::write(&user_conf_path, "nav_course_limit = 5").unwrap();
            fs::write(project_dir.path().join("snav.toml"), "nav_course_limit = 7").unwrap();

            let settings =
                Settings::load_from_paths(project_dir.path(), Some(&user_conf_path)).unwrap();
            assert_eq!(settings.nav_course_limit, 7);
        }

        #[test]
        fn user_file_alone_applies() {
            let user_dir = tempdir().unwrap();
            let project_dir = tempdir().unwrap();
            let user_conf_path = user_dir.path().join("snav.toml");
            fs::write(&user_conf_path, "link_categories = true").unwrap();

            let settings =
                Settings::load_from_paths(project_dir.path(), Some(&user_conf_path)).unwrap();
            assert!(settings.link_categories);
        }
    }

    mod errors {
        use super::*;

        #[test]
        fn invalid_value_is_a_config_error() {
            let dir = tempdir().unwrap();
            fs::write(dir.path().join("snav.toml"), "trim_mode = \"diagonal\"").unwrap();
            let result = Settings::new(dir.path());
            assert!(matches!(result.unwrap_err(), ConfigError::Config(_)));
        }
    }
}
